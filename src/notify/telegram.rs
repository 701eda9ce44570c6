//! Telegram Bot API sink (`sendMessage`).

use std::fmt;
use std::time::Duration;

use reqwest::header::CONNECTION;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::NotificationSink;
use crate::error::SentinelError;

/// Public Bot API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Envelope every Bot API response is wrapped in.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts alerts through a Telegram bot.
///
/// The bot token is part of the request path; it is kept out of `Debug`
/// output and stripped from transport errors.
#[derive(Clone)]
pub struct TelegramSink {
    client: Client,
    api_base: String,
    token: String,
}

impl fmt::Debug for TelegramSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSink")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl TelegramSink {
    /// Creates a sink whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SentinelError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }
}

impl NotificationSink for TelegramSink {
    async fn send(&self, destination: &str, text: &str) -> Result<(), SentinelError> {
        let body = SendMessage {
            chat_id: destination,
            text,
            parse_mode: "Markdown",
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .header(CONNECTION, "close")
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let raw = response.text().await.map_err(reqwest::Error::without_url)?;
        interpret_response(status, &raw)?;

        tracing::debug!(destination, "telegram message delivered");
        Ok(())
    }
}

/// Maps a Bot API reply to success or [`SentinelError::Notification`].
fn interpret_response(status: StatusCode, body: &str) -> Result<(), SentinelError> {
    let parsed = serde_json::from_str::<ApiResponse>(body).ok();
    match parsed {
        Some(ApiResponse { ok: true, .. }) if status.is_success() => Ok(()),
        Some(reply) => Err(SentinelError::Notification {
            status,
            description: reply
                .description
                .unwrap_or_else(|| "request rejected".to_string()),
        }),
        None => Err(SentinelError::Notification {
            status,
            description: "unreadable response body".to_string(),
        }),
    }
}
