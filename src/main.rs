use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use rawget::config::Config;
use rawget::job::{self, JobContext};
use rawget::observe::LogObserver;
use rawget::sink::FsSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();
    let ctx = JobContext {
        sink: Arc::new(FsSink::new(&cfg.output_dir)),
        observer: Arc::new(LogObserver),
        cfg,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut urls = Vec::new();

    loop {
        print!("url (exit to quit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line == "exit" {
            break;
        }
        if !line.is_empty() {
            urls.push(line.to_string());
        }
    }

    match urls.len() {
        0 => {}
        1 => {
            let _ = job::single_connection_job(&urls[0], &ctx).await;
        }
        _ => job::multi_connection_job(urls, &ctx).await,
    }

    tracing::info!("Downloading process has finished");
    Ok(())
}
