//! Dry-run sink.

use super::NotificationSink;
use crate::error::SentinelError;

/// Logs each message at info level and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    async fn send(&self, destination: &str, text: &str) -> Result<(), SentinelError> {
        tracing::info!(destination, dry_run = true, "alert:\n{text}");
        Ok(())
    }
}
