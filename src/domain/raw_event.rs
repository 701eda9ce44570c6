//! Event records as received from the upstream feed.
//!
//! Everything here is optional: the feed is not trusted to be complete or
//! well-typed, and a single odd record must not stop a batch. Coercion to
//! concrete types happens in [`super::filter_events`].

use serde::{Deserialize, Serialize};

/// A numeric feed value that may arrive as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedNumber {
    /// A JSON number.
    Number(f64),
    /// A JSON string, expected to hold a number.
    Text(String),
}

impl FeedNumber {
    /// Coerces to a finite `f64`. Numeric strings are trimmed and parsed;
    /// anything else yields `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Coerces to whole milliseconds, truncating any fractional part.
    #[must_use]
    pub fn as_millis(&self) -> Option<i64> {
        if let Some(ms) = self.as_text().and_then(|s| s.trim().parse::<i64>().ok()) {
            return Some(ms);
        }
        let value = self.as_f64()?;
        if value.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(value.trunc() as i64)
    }
}

impl From<f64> for FeedNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FeedNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One earthquake record as delivered by an event source.
///
/// Field names follow the USGS GeoJSON summary format. Fields beyond the
/// identifier, coordinates, magnitude and time are informational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Feed identifier (e.g. `"us7000abcd"`).
    pub id: String,
    /// Epicentre longitude in degrees.
    pub longitude: Option<f64>,
    /// Epicentre latitude in degrees.
    pub latitude: Option<f64>,
    /// Hypocentre depth in kilometres.
    pub depth_km: Option<f64>,
    /// Magnitude, possibly as a numeric string.
    pub magnitude: Option<FeedNumber>,
    /// Magnitude type (`ml`, `mb`, `mww`, ...).
    pub mag_type: Option<String>,
    /// Human-readable place description.
    pub place: Option<String>,
    /// Origin time in milliseconds since the Unix epoch.
    pub time: Option<FeedNumber>,
    /// Last update time in milliseconds since the Unix epoch.
    pub updated: Option<i64>,
    /// Review status (`automatic`, `reviewed`, `deleted`).
    pub status: Option<String>,
    /// Contributing network code.
    pub net: Option<String>,
    /// Significance score.
    pub sig: Option<i64>,
    /// Tsunami flag; `1` when a tsunami advisory applies.
    pub tsunami: Option<i64>,
    /// PAGER alert level (`green`, `yellow`, `orange`, `red`).
    pub alert: Option<String>,
    /// Number of felt reports.
    pub felt: Option<i64>,
    /// Maximum community-reported intensity.
    pub cdi: Option<f64>,
    /// Maximum instrumental intensity.
    pub mmi: Option<f64>,
    /// Number of stations used to locate the event.
    pub nst: Option<i64>,
    /// Largest azimuthal gap between stations, in degrees.
    pub gap: Option<f64>,
    /// RMS travel-time residual, in seconds.
    pub rms: Option<f64>,
    /// Distance to the nearest station, in degrees.
    pub dmin: Option<f64>,
    /// Event type (`earthquake`, `quarry blast`, ...).
    pub event_type: Option<String>,
    /// Feed-provided title.
    pub title: Option<String>,
    /// Link to the event page.
    pub url: Option<String>,
}
