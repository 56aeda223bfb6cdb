//! Progress reporting for downloads.
//!
//! The core emits structured events and never touches the console itself;
//! presentation belongs to whatever `Observer` the caller injects. The
//! default observer forwards events to `tracing`.

/// Where in its lifecycle a transfer currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Connected,
    Downloading,
    Succeeded,
    Failed,
}

/// One structured progress event for one URL.
#[derive(Debug)]
pub struct TransferEvent<'a> {
    pub phase: Phase,
    pub url: &'a str,
    /// Failure reason, present only for `Phase::Failed`.
    pub outcome: Option<&'a str>,
}

pub trait Observer: Send + Sync {
    fn on_event(&self, event: &TransferEvent);
}

/// Default observer: structured `tracing` output.
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&self, event: &TransferEvent) {
        match event.phase {
            Phase::Connecting => tracing::info!(url = %event.url, "Connecting"),
            Phase::Connected => tracing::info!(url = %event.url, "Connected"),
            Phase::Downloading => tracing::info!(url = %event.url, "Downloading"),
            Phase::Succeeded => tracing::info!(url = %event.url, "Download succeeded"),
            Phase::Failed => tracing::error!(
                url = %event.url,
                reason = event.outcome.unwrap_or("unknown"),
                "Download failed"
            ),
        }
    }
}

/// Observer that drops every event. Handy in tests.
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_event(&self, _event: &TransferEvent) {}
}
