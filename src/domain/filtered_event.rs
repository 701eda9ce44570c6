//! Normalized events that passed the proximity filter.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::GeoPoint;

/// Placeholder rendered for optional numeric fields the feed did not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Hypocentre depth classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DepthCategory {
    /// Shallower than 70 km.
    Shallow,
    /// From 70 km up to (not including) 300 km.
    Intermediate,
    /// 300 km or deeper.
    Deep,
}

impl DepthCategory {
    /// Classifies a depth in kilometres.
    #[must_use]
    pub fn from_depth_km(depth_km: f64) -> Self {
        if depth_km < 70.0 {
            Self::Shallow
        } else if depth_km < 300.0 {
            Self::Intermediate
        } else {
            Self::Deep
        }
    }

    /// Returns the label used in notifications.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shallow => "Shallow",
            Self::Intermediate => "Intermediate",
            Self::Deep => "Deep",
        }
    }
}

impl fmt::Display for DepthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event that met the magnitude and distance thresholds.
///
/// Built once by [`super::filter_events`] with every optional feed field
/// resolved to its default, and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredEvent {
    /// Feed identifier, `"unknown"` when absent.
    pub id: String,
    /// Trimmed feed identifier; `None` when the feed gave none.
    pub feed_id: Option<String>,
    /// Coerced magnitude.
    pub magnitude: f64,
    /// Magnitude type, `"N/A"` when absent.
    pub mag_type: String,
    /// Place description, `"Unknown location"` when absent.
    pub place: String,
    /// Epicentre.
    pub epicentre: GeoPoint,
    /// Depth in kilometres, `0.0` when absent.
    pub depth_km: f64,
    /// Classification of [`Self::depth_km`].
    pub depth_category: DepthCategory,
    /// Great-circle distance from the reference point.
    pub distance_km: f64,
    /// Origin time.
    pub time: DateTime<Utc>,
    /// Last update time, when supplied.
    pub updated: Option<DateTime<Utc>>,
    /// Relative age of the event at filtering time.
    pub time_ago: String,
    /// Event type, `"earthquake"` when absent.
    pub event_type: String,
    /// Review status, `"N/A"` when absent.
    pub status: String,
    /// Network code, `"N/A"` when absent.
    pub net: String,
    /// Significance score, `0` when absent.
    pub significance: i64,
    /// Felt reports, `0` when absent.
    pub felt: i64,
    /// `true` only when the feed flag is exactly `1`.
    pub tsunami: bool,
    /// PAGER alert level, `"None"` when absent or empty.
    pub alert: String,
    /// Community intensity.
    pub cdi: Option<f64>,
    /// Instrumental intensity.
    pub mmi: Option<f64>,
    /// Station count.
    pub nst: Option<i64>,
    /// Azimuthal gap in degrees.
    pub gap: Option<f64>,
    /// RMS residual in seconds.
    pub rms: Option<f64>,
    /// Nearest station distance in degrees.
    pub dmin: Option<f64>,
    /// Feed-provided title.
    pub title: Option<String>,
    /// Link to the event page.
    pub url: Option<String>,
    /// Rendered alert message.
    pub notification_text: String,
}

impl FilteredEvent {
    /// `"Yes"` or `"No"` for the tsunami flag.
    #[must_use]
    pub const fn tsunami_label(&self) -> &'static str {
        if self.tsunami { "Yes" } else { "No" }
    }
}

/// Renders an optional value, or [`NOT_AVAILABLE`].
#[must_use]
pub fn or_not_available<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Human-readable age of `occurred` relative to `now`.
///
/// Timestamps less than a minute old, or in the future, are `"just now"`.
#[must_use]
pub fn time_ago(occurred: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(occurred);
    if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    }
    let (count, unit) = if elapsed.num_hours() < 1 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        (elapsed.num_hours(), "hour")
    } else {
        (elapsed.num_days(), "day")
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}
