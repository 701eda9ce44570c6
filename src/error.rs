//! Error types for the feed, notification, and configuration layers.
//!
//! [`SentinelError`] is the central error type. Malformed feed records are
//! not errors: the filter skips them. Only failures of the external
//! collaborators (network, API, feed-level JSON, configuration) surface here.

use reqwest::StatusCode;

/// Crate-wide error enum.
#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    /// Transport-level HTTP failure, including timeouts.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body could not be decoded as JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The feed answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// Requested URL.
        url: String,
        /// Status returned by the server.
        status: StatusCode,
    },

    /// The feed body is JSON but not a feature collection.
    #[error("malformed feed: {0}")]
    MalformedFeed(String),

    /// The messaging API rejected a notification.
    #[error("notification rejected ({status}): {description}")]
    Notification {
        /// HTTP status of the API response.
        status: StatusCode,
        /// Description reported by the API, if any.
        description: String,
    },

    /// Invalid or incomplete configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SentinelError {
    /// Returns a short, stable identifier for this variant.
    ///
    /// Used as a structured field in log records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Json(_) => "json",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::MalformedFeed(_) => "malformed_feed",
            Self::Notification { .. } => "notification",
            Self::Config(_) => "config",
        }
    }
}
