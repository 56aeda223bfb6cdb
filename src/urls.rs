//! Pure string decomposition of URLs into domain, path and filename.
//!
//! No general URL parsing: this mirrors exactly what the rest of the client
//! needs. Scheme and a leading `www.` are optional and ignored; the domain
//! runs up to the first `:`, `/`, `?` or newline.

/// Domain name of the server, with scheme and a leading `www.` stripped.
///
/// Returns an empty string when the URL holds no domain at all; callers
/// must treat an empty domain as an unresolvable URL.
pub fn domain(url: &str) -> &str {
    let rest = strip_scheme(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let end = rest
        .find([':', '/', '?', '\n'])
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Everything strictly after the domain portion, empty if nothing follows.
///
/// The domain portion here includes any `www.` prefix actually present, so
/// `path("www.example.com/a")` is `"/a"`.
pub fn path(url: &str) -> &str {
    let rest = strip_scheme(url);
    let end = rest
        .find([':', '/', '?', '\n'])
        .unwrap_or(rest.len());
    &rest[end..]
}

/// Filename named by the URL.
///
/// `"index.html"` when the URL ends exactly at the host or at `host/`;
/// otherwise the substring after the final `/`. A trailing-slash subfolder
/// therefore yields an empty filename, which is how folder URLs are told
/// apart from files.
pub fn filename(url: &str) -> String {
    let host = domain(url);
    if ends_at_host(url, host) {
        return "index.html".to_string();
    }
    match url.rfind('/') {
        Some(i) => url[i + 1..].to_string(),
        None => url.to_string(),
    }
}

/// True when the URL names the bare host, with or without a trailing slash.
pub fn ends_at_host(url: &str, host: &str) -> bool {
    !host.is_empty() && (url.ends_with(host) || url.ends_with(&format!("{host}/")))
}

/// True when the URL denotes a directory listing rather than a file.
pub fn is_folder(url: &str) -> bool {
    !ends_at_host(url, domain(url)) && filename(url).is_empty()
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}
