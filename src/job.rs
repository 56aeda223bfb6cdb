//! Download orchestration: one job per top-level URL.
//!
//! A job owns exactly one connection (a crawled folder in one-shot mode
//! adds one per child). Jobs spawned by [`multi_connection_job`] are fully
//! independent: no shared connection, no shared state beyond the sink, and
//! one job's failure never touches its siblings. No retries anywhere.

use std::sync::Arc;

use crate::config::Config;
use crate::crawl;
use crate::error::FetchError;
use crate::http::connection::Connection;
use crate::observe::{Observer, Phase, TransferEvent};
use crate::sink::{SavedFile, Sink};
use crate::urls;

/// Everything a job needs besides its URL.
#[derive(Clone)]
pub struct JobContext {
    pub cfg: Config,
    pub sink: Arc<dyn Sink>,
    pub observer: Arc<dyn Observer>,
}

impl JobContext {
    fn emit(&self, phase: Phase, url: &str, outcome: Option<&str>) {
        self.observer.on_event(&TransferEvent { phase, url, outcome });
    }
}

/// Opens a connection for `url`, reporting progress through the observer.
pub(crate) async fn open_connection(
    url: &str,
    ctx: &JobContext,
) -> Result<Connection, FetchError> {
    ctx.emit(Phase::Connecting, url, None);
    match Connection::connect(url, &ctx.cfg).await {
        Ok(conn) => {
            ctx.emit(Phase::Connected, url, None);
            Ok(conn)
        }
        Err(e) => {
            ctx.emit(Phase::Failed, url, Some(&e.to_string()));
            Err(e)
        }
    }
}

/// Fetches one file over an existing connection and hands it to the sink.
///
/// On any failure the observer is told the reason and nothing is written.
pub(crate) async fn download_file(
    conn: &mut Connection,
    url: &str,
    close: bool,
    subfolder: Option<&str>,
    ctx: &JobContext,
) -> anyhow::Result<()> {
    let host = conn.host().to_string();
    let filename = urls::filename(url).replace("%20", " ");
    ctx.emit(Phase::Downloading, url, None);

    let bytes = match conn.fetch(url, close).await {
        Ok(bytes) => bytes,
        Err(e) => {
            ctx.emit(Phase::Failed, url, Some(&e.to_string()));
            return Err(e.into());
        }
    };

    let file = SavedFile {
        host,
        subfolder: subfolder.map(str::to_string),
        filename,
        bytes,
    };
    if let Err(e) = ctx.sink.save(&file) {
        ctx.emit(Phase::Failed, url, Some(&e.to_string()));
        return Err(e.into());
    }

    ctx.emit(Phase::Succeeded, url, None);
    Ok(())
}

/// Runs one top-level URL to completion over a single connection.
///
/// A folder URL (one that neither ends at the host nor names a file) is
/// crawled with keep-alive reuse; anything else is a single-file download
/// that closes the connection when done.
pub async fn single_connection_job(url: &str, ctx: &JobContext) -> anyhow::Result<()> {
    let mut conn = open_connection(url, ctx).await?;

    if urls::is_folder(url) {
        crawl::crawl_folder(&mut conn, url, true, ctx).await
    } else {
        download_file(&mut conn, url, true, None, ctx).await
    }
}

/// Fans out one independent job per URL and waits for all of them.
pub async fn multi_connection_job(urls: Vec<String>, ctx: &JobContext) {
    let mut handles = Vec::with_capacity(urls.len());

    for url in urls {
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            if let Err(e) = single_connection_job(&url, &ctx).await {
                tracing::debug!(url = %url, error = %e, "Job failed");
            }
        }));
    }

    for handle in handles {
        let _ = handle.await;
    }
}
