//! rawget - a minimal HTTP download client on raw TCP sockets.
//!
//! Fetches single files or crawls flat directory listings and saves the
//! results locally, with one independent concurrent job per top-level URL.
//! The HTTP engine is hand-rolled: plaintext GET over port 80, no TLS, no
//! redirects, no compression.

pub mod config;
pub mod crawl;
pub mod error;
pub mod http;
pub mod job;
pub mod observe;
pub mod sink;
pub mod urls;
