use std::fmt;
use std::sync::Arc;

use tracing::info;

/// Fire-and-forget sink for single-line, human-readable status updates.
///
/// Every user-visible action that can fail reports a short cause here —
/// "macro executed", "no macro assigned", error text. The surrounding
/// application decides where the lines go (log, status bar); the default
/// sink logs them.
#[derive(Clone)]
pub struct StatusSink {
    sink: Arc<dyn Fn(String) + Send + Sync>,
}

impl StatusSink {
    /// Wrap an arbitrary string consumer.
    pub fn new(sink: impl Fn(String) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Sink that writes status lines to the log.
    pub fn log_only() -> Self {
        Self::new(|message| info!(status = %message, "Status"))
    }

    /// Report a status line. Never fails, never blocks meaningfully.
    pub fn report(&self, message: impl Into<String>) {
        (self.sink)(message.into());
    }
}

impl fmt::Debug for StatusSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatusSink")
    }
}
