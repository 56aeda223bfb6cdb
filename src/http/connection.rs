use bytes::{Bytes, BytesMut};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::Config;
use crate::error::FetchError;
use crate::http::response::{self, Framing};
use crate::urls;

const BUFFER_SIZE: usize = 8192;

/// A TCP connection to one host, used for sequential request cycles.
///
/// Timeouts are fixed at construction and applied per socket operation.
/// There is no pipelining: one `fetch` runs to completion before the next.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    host: String,
    recv_timeout: Duration,
    send_timeout: Duration,
}

/// One request/response cycle, driven as an explicit state machine.
enum Cycle {
    Idle,
    RequestSent,
    HeadersRead(String),
    ReadingBody(Framing),
    Complete(Bytes),
}

impl Connection {
    /// Resolves the URL's domain and opens a TCP connection to it.
    ///
    /// Takes the first IPv4 address DNS returns. An empty domain, a name
    /// that does not resolve, and a refused or timed-out connect are each
    /// reported distinctly.
    pub async fn connect(url: &str, cfg: &Config) -> Result<Self, FetchError> {
        let host = urls::domain(url).to_string();
        if host.is_empty() {
            return Err(FetchError::Unresolvable);
        }

        let addr = tokio::net::lookup_host((host.as_str(), cfg.port))
            .await
            .map_err(|_| FetchError::DnsResolution { host: host.clone() })?
            .find(|a| a.is_ipv4())
            .ok_or_else(|| FetchError::DnsResolution { host: host.clone() })?;

        let stream = timeout(cfg.recv_timeout(), TcpStream::connect(addr))
            .await
            .map_err(|_| FetchError::Connect {
                host: host.clone(),
                source: io::ErrorKind::TimedOut.into(),
            })?
            .map_err(|e| FetchError::Connect {
                host: host.clone(),
                source: e,
            })?;

        Ok(Self {
            stream,
            host,
            recv_timeout: cfg.recv_timeout(),
            send_timeout: cfg.send_timeout(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Runs one full GET cycle for `url` and returns the body bytes.
    ///
    /// Non-200 statuses fail without reading a body. With `close` the
    /// stream is shut down once the cycle ends, success or not; otherwise
    /// it stays open for keep-alive reuse by the same job.
    pub async fn fetch(&mut self, url: &str, close: bool) -> Result<Bytes, FetchError> {
        let result = self.request_cycle(url).await;
        if close {
            let _ = self.stream.shutdown().await;
        }
        result
    }

    async fn request_cycle(&mut self, url: &str) -> Result<Bytes, FetchError> {
        let mut state = Cycle::Idle;

        loop {
            state = match state {
                Cycle::Idle => {
                    self.send_request(url).await?;
                    Cycle::RequestSent
                }

                Cycle::RequestSent => Cycle::HeadersRead(self.read_header_block().await?),

                Cycle::HeadersRead(header) => {
                    let code = response::status_code(&header)?;
                    if let Some(err) = FetchError::from_status(code) {
                        return Err(err);
                    }
                    Cycle::ReadingBody(response::framing(&header)?)
                }

                Cycle::ReadingBody(framing) => {
                    let body = match framing {
                        Framing::None => Bytes::new(),
                        Framing::ContentLength(n) => self.read_sized(n).await?,
                        Framing::Chunked => self.read_chunked_body().await?,
                    };
                    Cycle::Complete(body)
                }

                Cycle::Complete(body) => return Ok(body),
            };
        }
    }

    async fn send_request(&mut self, url: &str) -> Result<(), FetchError> {
        // The bare host maps to "/" whether or not a slash is present.
        let path = if urls::ends_at_host(url, &self.host) {
            "/"
        } else {
            urls::path(url)
        };

        let request = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: Keep-Alive\r\n\r\n",
            path, self.host
        );

        timeout(self.send_timeout, self.stream.write_all(request.as_bytes()))
            .await
            .map_err(|_| FetchError::Send(io::ErrorKind::TimedOut.into()))?
            .map_err(FetchError::Send)
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, FetchError> {
        timeout(self.recv_timeout, self.stream.read(buf))
            .await
            .map_err(|_| FetchError::Receive(io::ErrorKind::TimedOut.into()))?
            .map_err(FetchError::Receive)
    }

    /// Reads bytes one at a time until CRLF.
    ///
    /// A zero-byte read (peer closed) ends the line early with whatever
    /// accumulated so far.
    async fn read_line(&mut self, keep_terminator: bool) -> Result<String, FetchError> {
        let mut line: Vec<u8> = Vec::new();
        let mut buf = [0u8; 1];

        loop {
            let n = self.recv(&mut buf).await?;
            if n == 0 {
                break;
            }
            let c = buf[0];
            if line.last() == Some(&b'\r') && c == b'\n' {
                if keep_terminator {
                    line.push(c);
                } else {
                    line.pop();
                }
                break;
            }
            line.push(c);
        }

        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    /// Reads header lines until the bare `\r\n` separator and concatenates
    /// them, terminators included. An empty line means the peer closed
    /// before the separator arrived.
    async fn read_header_block(&mut self) -> Result<String, FetchError> {
        let mut header = String::new();
        loop {
            let line = self.read_line(true).await?;
            if line == "\r\n" || line.is_empty() {
                break;
            }
            header.push_str(&line);
        }
        Ok(header)
    }

    /// Reads up to `size` bytes. An early peer close yields the truncated
    /// prefix rather than an error.
    async fn read_sized(&mut self, size: usize) -> Result<Bytes, FetchError> {
        let mut body = BytesMut::with_capacity(size.min(BUFFER_SIZE));
        let mut buf = [0u8; BUFFER_SIZE];

        while body.len() < size {
            let want = (size - body.len()).min(BUFFER_SIZE);
            let n = self.recv(&mut buf[..want]).await?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&buf[..n]);
        }

        Ok(body.freeze())
    }

    /// Reads a chunked body: hex size line, payload, 2 discarded trailer
    /// bytes, until a size-0 chunk ends the loop with nothing further read.
    async fn read_chunked_body(&mut self) -> Result<Bytes, FetchError> {
        let mut body = BytesMut::new();

        loop {
            let line = self.read_line(false).await?;
            let size = response::chunk_size(&line)?;
            if size == 0 {
                break;
            }

            let chunk = self.read_sized(size).await?;
            if chunk.len() < size {
                return Err(FetchError::TruncatedBody);
            }
            body.extend_from_slice(&chunk);

            // chunk payload is followed by a mandatory CRLF
            self.read_sized(2).await?;
        }

        Ok(body.freeze())
    }
}
