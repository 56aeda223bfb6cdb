//! Hand-rolled HTTP/1.1 client over raw TCP.
//!
//! No HTTP library: requests are formatted and responses parsed directly
//! off the socket. Only GET over plaintext TCP is supported.
//!
//! # Request cycle state machine
//!
//! Each call to [`connection::Connection::fetch`] drives one cycle:
//!
//! ```text
//!   Idle → RequestSent → HeadersRead → ReadingBody{None |
//!       ContentLength | Chunked} → Complete
//! ```
//!
//! with an error exit from any state. Framing is decided from the header
//! text before any body byte is consumed; the chunked check takes
//! precedence over Content-Length. Non-200 statuses fail the cycle without
//! a body read.

pub mod connection;
pub mod response;
