use std::io;

/// Everything that can go wrong while fetching one URL.
///
/// Socket-level failures carry the underlying `io::Error`; a timeout shows
/// up as `io::ErrorKind::TimedOut` inside the same variant. Status-code
/// failures carry no body: the response body is never read for them.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The URL has no recognizable domain.
    #[error("unresolvable URL: no domain found")]
    Unresolvable,

    /// DNS returned no usable IPv4 address for the host.
    #[error("DNS resolution failed for {host}")]
    DnsResolution { host: String },

    /// The host resolved but the TCP connect was refused or timed out.
    #[error("connect to {host} failed: {source}")]
    Connect { host: String, source: io::Error },

    #[error("send failed: {0}")]
    Send(io::Error),

    #[error("receive failed: {0}")]
    Receive(io::Error),

    #[error("301 Moved Permanently")]
    Redirect,

    #[error("400 Bad Request")]
    BadRequest,

    #[error("403 Forbidden")]
    Forbidden,

    #[error("404 Not Found")]
    NotFound,

    #[error("503 Service Unavailable")]
    Unavailable,

    /// A status code outside the classified set; treated as no data.
    #[error("unrecognized status code {0}")]
    UnrecognizedStatus(u16),

    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),

    #[error("malformed header: {0:?}")]
    MalformedHeader(String),

    /// Peer closed mid-chunk; only chunked bodies fail on truncation.
    #[error("body truncated inside a chunk")]
    TruncatedBody,

    #[error("malformed chunk size line: {0:?}")]
    MalformedChunkHeader(String),
}

impl FetchError {
    /// Maps an HTTP status code to its failure, or `None` for 200.
    pub fn from_status(code: u16) -> Option<Self> {
        match code {
            200 => None,
            301 => Some(FetchError::Redirect),
            400 => Some(FetchError::BadRequest),
            403 => Some(FetchError::Forbidden),
            404 => Some(FetchError::NotFound),
            503 => Some(FetchError::Unavailable),
            other => Some(FetchError::UnrecognizedStatus(other)),
        }
    }
}
