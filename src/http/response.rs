//! Response header inspection: status line and body framing.
//!
//! Both work on the raw header text read off the socket, before any body
//! byte is consumed.

use crate::error::FetchError;

/// How the response body is delimited on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// No recognized body framing; nothing is read after the headers.
    None,
    /// Body is exactly this many bytes.
    ContentLength(usize),
    /// Body is a sequence of hex-length-prefixed chunks ending in size 0.
    Chunked,
}

/// Parses the status code out of a header block.
///
/// The status line is the first line; the code is its second
/// whitespace-separated token.
pub fn status_code(header: &str) -> Result<u16, FetchError> {
    let status_line = header.split("\r\n").next().unwrap_or("");
    status_line
        .split_whitespace()
        .nth(1)
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| FetchError::MalformedStatusLine(status_line.to_string()))
}

/// Determines body framing from the header text.
///
/// The chunked check always takes precedence over Content-Length.
pub fn framing(header: &str) -> Result<Framing, FetchError> {
    if header.contains("Transfer-Encoding: chunked") {
        return Ok(Framing::Chunked);
    }
    if !header.contains("Content-Length:") {
        return Ok(Framing::None);
    }
    for line in header.split("\r\n") {
        if line.contains("Content-Length:") {
            let n = line
                .split_whitespace()
                .nth(1)
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| FetchError::MalformedHeader(line.to_string()))?;
            return Ok(Framing::ContentLength(n));
        }
    }
    Ok(Framing::None)
}

/// Parses one chunk-size line: hex digits, optionally followed by an
/// ignored `;extension`.
pub fn chunk_size(line: &str) -> Result<usize, FetchError> {
    let size_part = line.split(';').next().unwrap_or("").trim();
    usize::from_str_radix(size_part, 16)
        .map_err(|_| FetchError::MalformedChunkHeader(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunked_takes_precedence_over_content_length() {
        let header =
            "HTTP/1.1 200 OK\r\nContent-Length: 10\r\nTransfer-Encoding: chunked\r\n";
        assert_eq!(framing(header).unwrap(), Framing::Chunked);
    }

    #[test]
    fn chunk_size_ignores_extension() {
        assert_eq!(chunk_size("1a;name=value").unwrap(), 26);
        assert_eq!(chunk_size("0").unwrap(), 0);
        assert!(matches!(
            chunk_size("zz"),
            Err(FetchError::MalformedChunkHeader(_))
        ));
    }
}
