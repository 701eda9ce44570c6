//! Proximity filter: magnitude and distance thresholds over raw events.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::filtered_event::time_ago;
use super::notification::format_notification;
use super::{DepthCategory, FilteredEvent, GeoPoint, RawEvent, distance};

/// Thresholds and reference point for one filtering pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Point distances are measured from.
    pub reference: GeoPoint,
    /// Inclusive lower bound on magnitude.
    pub min_magnitude: f64,
    /// Inclusive upper bound on distance, in kilometres.
    pub radius_km: f64,
}

/// Why a raw event was dropped before threshold checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Malformed {
    Coordinates,
    Magnitude,
    Time,
}

impl Malformed {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Coordinates => "missing or invalid coordinates",
            Self::Magnitude => "missing or non-numeric magnitude",
            Self::Time => "missing or unparseable time",
        }
    }
}

/// Keeps the events with `magnitude >= min_magnitude` and
/// `distance <= radius_km`, in input order.
///
/// Records with unusable coordinates, magnitude, or time are skipped and
/// logged at debug level. `now` is only used to compute
/// [`FilteredEvent::time_ago`].
#[must_use]
pub fn filter_events(
    config: &FilterConfig,
    raw_events: &[RawEvent],
    now: DateTime<Utc>,
) -> Vec<FilteredEvent> {
    raw_events
        .iter()
        .filter_map(|raw| match qualify(config, raw, now) {
            Ok(event) => event,
            Err(reason) => {
                tracing::debug!(id = %raw.id, reason = reason.as_str(), "skipping malformed event");
                None
            }
        })
        .collect()
}

fn qualify(
    config: &FilterConfig,
    raw: &RawEvent,
    now: DateTime<Utc>,
) -> Result<Option<FilteredEvent>, Malformed> {
    let epicentre = match (raw.latitude, raw.longitude) {
        (Some(lat), Some(lon)) => GeoPoint::checked(lat, lon).ok_or(Malformed::Coordinates)?,
        _ => return Err(Malformed::Coordinates),
    };
    let magnitude = raw
        .magnitude
        .as_ref()
        .and_then(|m| m.as_f64())
        .ok_or(Malformed::Magnitude)?;
    let time = raw
        .time
        .as_ref()
        .and_then(|t| t.as_millis())
        .and_then(from_millis)
        .ok_or(Malformed::Time)?;

    let distance_km = distance(config.reference, epicentre);
    if magnitude < config.min_magnitude || distance_km > config.radius_km {
        return Ok(None);
    }

    Ok(Some(normalize(raw, epicentre, magnitude, distance_km, time, now)))
}

fn normalize(
    raw: &RawEvent,
    epicentre: GeoPoint,
    magnitude: f64,
    distance_km: f64,
    time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> FilteredEvent {
    let depth_km = raw.depth_km.filter(|d| d.is_finite()).unwrap_or(0.0);
    let feed_id = non_empty(&raw.id);
    let mut event = FilteredEvent {
        id: feed_id.clone().unwrap_or_else(|| "unknown".to_string()),
        feed_id,
        magnitude,
        mag_type: text_or(raw.mag_type.as_deref(), "N/A"),
        place: text_or(raw.place.as_deref(), "Unknown location"),
        epicentre,
        depth_km,
        depth_category: DepthCategory::from_depth_km(depth_km),
        distance_km,
        time,
        updated: raw.updated.and_then(from_millis),
        time_ago: time_ago(time, now),
        event_type: text_or(raw.event_type.as_deref(), "earthquake"),
        status: text_or(raw.status.as_deref(), "N/A"),
        net: text_or(raw.net.as_deref(), "N/A"),
        significance: raw.sig.unwrap_or(0),
        felt: raw.felt.unwrap_or(0),
        tsunami: raw.tsunami == Some(1),
        alert: text_or(raw.alert.as_deref(), "None"),
        cdi: raw.cdi,
        mmi: raw.mmi,
        nst: raw.nst,
        gap: raw.gap,
        rms: raw.rms,
        dmin: raw.dmin,
        title: raw.title.as_deref().and_then(non_empty),
        url: raw.url.as_deref().and_then(non_empty),
        notification_text: String::new(),
    };
    event.notification_text = format_notification(&event);
    event
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn text_or(value: Option<&str>, default: &str) -> String {
    value
        .and_then(non_empty)
        .unwrap_or_else(|| default.to_string())
}
