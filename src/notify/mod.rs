//! Notification sinks: where alert messages go.
//!
//! [`TelegramSink`] posts to the Telegram Bot API. [`LogSink`] writes the
//! message to the log instead, for dry runs without a bot token.

pub mod log_sink;
pub mod telegram;

use std::future::Future;

use crate::error::SentinelError;

pub use log_sink::LogSink;
pub use telegram::TelegramSink;

/// Delivers a text message to a destination.
pub trait NotificationSink {
    /// Sends `text` to `destination` (for Telegram, a chat id).
    ///
    /// # Errors
    ///
    /// Returns a [`SentinelError`] if delivery fails. Callers log the
    /// failure and carry on; there is no retry.
    fn send(
        &self,
        destination: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), SentinelError>> + Send;
}
