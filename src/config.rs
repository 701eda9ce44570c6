//! Bot configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Nothing secret is compiled in; without
//! `TELEGRAM_BOT_TOKEN` the bot runs dry and only logs its alerts.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::{FilterConfig, GeoPoint};
use crate::error::SentinelError;
use crate::feed::usgs::DEFAULT_FEED_URL;
use crate::notify::telegram::DEFAULT_API_BASE;

/// Default reference latitude (degrees).
pub const DEFAULT_REFERENCE_LAT: f64 = 33.752473;
/// Default reference longitude (degrees).
pub const DEFAULT_REFERENCE_LON: f64 = 72.778760;
/// Default inclusive magnitude threshold.
pub const DEFAULT_MIN_MAGNITUDE: f64 = 3.0;
/// Default inclusive alert radius in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 400.0;

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Telegram credentials and endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    /// Bot token (`123456:ABC...`).
    pub token: String,
    /// Destination chat id.
    pub chat_id: String,
    /// API base URL, normally [`DEFAULT_API_BASE`].
    pub api_base: String,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Top-level configuration.
///
/// Loaded once at startup via [`SentinelConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentinelConfig {
    /// Reference point and thresholds for the proximity filter.
    pub filter: FilterConfig,

    /// GeoJSON feed URL.
    pub feed_url: String,

    /// Timeout for one feed request.
    pub feed_timeout: Duration,

    /// Telegram settings; `None` means dry run.
    pub telegram: Option<TelegramConfig>,

    /// Timeout for one `sendMessage` request.
    pub send_timeout: Duration,

    /// Delay between passes; `None` runs a single pass and exits.
    pub poll_interval: Option<Duration>,

    /// Log output format.
    pub log_format: LogFormat,
}

impl SentinelConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// See [`SentinelConfig::from_lookup`].
    pub fn from_env() -> Result<Self, SentinelError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Timeouts and the poll interval fall back to their defaults when
    /// missing or unparseable.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::Config`] if the reference point or a
    /// threshold is set but invalid, or if a bot token is given without
    /// `TELEGRAM_CHAT_ID`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SentinelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let latitude = parse_strict(&lookup, "REFERENCE_LAT", DEFAULT_REFERENCE_LAT)?;
        let longitude = parse_strict(&lookup, "REFERENCE_LON", DEFAULT_REFERENCE_LON)?;
        let reference = GeoPoint::checked(latitude, longitude).ok_or_else(|| {
            SentinelError::Config(format!(
                "reference point ({latitude}, {longitude}) is out of range"
            ))
        })?;

        let min_magnitude = parse_strict(&lookup, "MIN_MAGNITUDE", DEFAULT_MIN_MAGNITUDE)?;
        let radius_km = parse_strict(&lookup, "RADIUS_KM", DEFAULT_RADIUS_KM)?;
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(SentinelError::Config(format!(
                "RADIUS_KM must be a non-negative number, got {radius_km}"
            )));
        }
        if !min_magnitude.is_finite() {
            return Err(SentinelError::Config(
                "MIN_MAGNITUDE must be finite".to_string(),
            ));
        }

        let feed_url = non_empty(&lookup, "FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        let feed_timeout = Duration::from_secs(parse_or(&lookup, "FEED_TIMEOUT_SECS", 10));
        let send_timeout = Duration::from_secs(parse_or(&lookup, "SEND_TIMEOUT_SECS", 10));

        let poll_secs: u64 = parse_or(&lookup, "POLL_INTERVAL_SECS", 0);
        let poll_interval = (poll_secs > 0).then(|| Duration::from_secs(poll_secs));

        let dry_run = parse_bool(&lookup, "DRY_RUN", false);
        let telegram = match non_empty(&lookup, "TELEGRAM_BOT_TOKEN") {
            Some(_) if dry_run => None,
            Some(token) => {
                let chat_id = non_empty(&lookup, "TELEGRAM_CHAT_ID").ok_or_else(|| {
                    SentinelError::Config(
                        "TELEGRAM_CHAT_ID is required when TELEGRAM_BOT_TOKEN is set".to_string(),
                    )
                })?;
                let api_base = non_empty(&lookup, "TELEGRAM_API_BASE")
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
                Some(TelegramConfig {
                    token,
                    chat_id,
                    api_base,
                })
            }
            None => None,
        };

        let log_format = match non_empty(&lookup, "LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            filter: FilterConfig {
                reference,
                min_magnitude,
                radius_km,
            },
            feed_url,
            feed_timeout,
            telegram,
            send_timeout,
            poll_interval,
            log_format,
        })
    }

    /// Whether alerts are only logged.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.telegram.is_none()
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    non_empty(lookup, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses `key` as `f64`; a present but unparseable value is an error.
fn parse_strict<F>(lookup: &F, key: &str, default: f64) -> Result<f64, SentinelError>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| SentinelError::Config(format!("{key} is not a number: {v:?}"))),
    }
}

/// Parses `key` as a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
