//! Flat directory-listing crawler.
//!
//! A folder URL is fetched once, child links are pulled out of the listing
//! HTML with a narrow anchor-tag pattern (deliberately not an HTML
//! parser), and each child is downloaded into the folder's subdirectory.

use regex::Regex;
use std::sync::OnceLock;

use crate::http::connection::Connection;
use crate::job::{self, JobContext};

/// A fetched listing: the normalized folder URL plus the child URLs found
/// in it, in document order.
#[derive(Debug)]
pub struct DirectoryListing {
    pub base: String,
    pub children: Vec<String>,
}

fn anchor_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // href must contain a dot: skips parent-directory and query-only links
    RE.get_or_init(|| Regex::new(r#"<a href="([^"]+\.[^"]+?)">[^<]+</a>"#).unwrap())
}

/// Extracts child links from listing HTML.
///
/// Hrefs are assumed to be simple relative filenames and are resolved by
/// direct concatenation onto the folder URL; absolute and path-relative
/// hrefs are not specially handled.
pub fn extract_links(base: &str, html: &str) -> DirectoryListing {
    let children = anchor_pattern()
        .captures_iter(html)
        .map(|c| format!("{}{}", base, &c[1]))
        .collect();
    DirectoryListing {
        base: base.to_string(),
        children,
    }
}

/// Fetches a folder's listing and downloads every child file.
///
/// In multi-request mode all children ride the job's existing connection
/// sequentially with keep-alive; otherwise each child gets a fresh
/// connection. A failing child is reported and skipped, the rest of the
/// listing is still downloaded.
pub async fn crawl_folder(
    conn: &mut Connection,
    url: &str,
    multi_request: bool,
    ctx: &JobContext,
) -> anyhow::Result<()> {
    let (folder_url, trimmed) = if let Some(t) = url.strip_suffix('/') {
        (url.to_string(), t)
    } else {
        (format!("{}/", url), url)
    };
    let subfolder = trimmed
        .rsplit('/')
        .next()
        .unwrap_or(trimmed)
        .to_string();
    tracing::info!(folder = %subfolder, url = %folder_url, "Crawling directory listing");

    let close = !multi_request;
    let body = conn.fetch(&folder_url, close).await?;
    let html = String::from_utf8_lossy(&body);
    let listing = extract_links(&folder_url, &html);
    tracing::debug!(count = listing.children.len(), "Listing entries found");

    for child in &listing.children {
        if multi_request {
            let _ = job::download_file(conn, child, false, Some(&subfolder), ctx).await;
        } else {
            match job::open_connection(child, ctx).await {
                Ok(mut child_conn) => {
                    let _ =
                        job::download_file(&mut child_conn, child, true, Some(&subfolder), ctx)
                            .await;
                }
                // connect failure was already reported through the observer
                Err(_) => continue,
            }
        }
    }

    Ok(())
}
