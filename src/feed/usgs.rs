//! USGS GeoJSON summary feed.
//!
//! See <https://earthquake.usgs.gov/earthquakes/feed/v1.0/geojson.php>.
//! Each feature carries `geometry.coordinates = [lon, lat, depth]` and the
//! remaining attributes under `properties`.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::EventSource;
use crate::domain::{FeedNumber, RawEvent};
use crate::error::SentinelError;

/// Past-day feed of all magnitudes.
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for one USGS feed URL.
#[derive(Debug, Clone)]
pub struct UsgsFeed {
    client: Client,
    url: String,
}

impl UsgsFeed {
    /// Creates a feed reader whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::Http`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SentinelError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Returns the feed URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EventSource for UsgsFeed {
    async fn fetch_events(&self) -> Result<Vec<RawEvent>, SentinelError> {
        tracing::debug!(url = %self.url, "fetching feed");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentinelError::UnexpectedStatus {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.text().await?;
        let events = parse_feature_collection(&body)?;
        tracing::info!(count = events.len(), "feed fetched");
        Ok(events)
    }
}

/// Parses a GeoJSON `FeatureCollection` body into raw events.
///
/// Features that are not JSON objects are dropped with a warning.
/// Malformed properties inside a feature become `None`.
///
/// # Errors
///
/// Returns [`SentinelError::Json`] if the body is not JSON and
/// [`SentinelError::MalformedFeed`] if it has no `features` array.
pub fn parse_feature_collection(body: &str) -> Result<Vec<RawEvent>, SentinelError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(mut root) = value else {
        return Err(SentinelError::MalformedFeed(
            "top-level value is not an object".to_string(),
        ));
    };
    let Some(Value::Array(features)) = root.remove("features") else {
        return Err(SentinelError::MalformedFeed(
            "missing `features` array".to_string(),
        ));
    };

    let events = features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| match serde_json::from_value::<Feature>(feature) {
            Ok(feature) => Some(RawEvent::from(feature)),
            Err(e) => {
                tracing::warn!(index, error = %e, "dropping unreadable feature");
                None
            }
        })
        .collect();
    Ok(events)
}

/// Deserializes a field into `Some(T)`, or `None` when it has the wrong
/// shape, so one bad attribute never rejects the whole feature.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "lenient")]
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default, deserialize_with = "lenient")]
    coordinates: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Properties {
    #[serde(default, deserialize_with = "lenient")]
    mag: Option<FeedNumber>,
    #[serde(default, deserialize_with = "lenient")]
    mag_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    place: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    time: Option<FeedNumber>,
    #[serde(default, deserialize_with = "lenient")]
    updated: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    net: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    sig: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    tsunami: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    alert: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    felt: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    cdi: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    mmi: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    nst: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    gap: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    rms: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    dmin: Option<f64>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
}

impl From<Feature> for RawEvent {
    fn from(feature: Feature) -> Self {
        let coords = feature
            .geometry
            .and_then(|g| g.coordinates)
            .unwrap_or_default();
        let coord = |i: usize| coords.get(i).and_then(Value::as_f64);
        let props = feature.properties.unwrap_or_default();

        Self {
            id: feature.id.unwrap_or_default(),
            longitude: coord(0),
            latitude: coord(1),
            depth_km: coord(2),
            magnitude: props.mag,
            mag_type: props.mag_type,
            place: props.place,
            time: props.time,
            updated: props.updated,
            status: props.status,
            net: props.net,
            sig: props.sig,
            tsunami: props.tsunami,
            alert: props.alert,
            felt: props.felt,
            cdi: props.cdi,
            mmi: props.mmi,
            nst: props.nst,
            gap: props.gap,
            rms: props.rms,
            dmin: props.dmin,
            event_type: props.event_type,
            title: props.title,
            url: props.url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"generated": 1750361650000, "count": 3},
        "features": [
            {
                "type": "Feature",
                "id": "us7000q1ab",
                "properties": {
                    "mag": 4.6, "place": "45 km SSW of Jurm, Afghanistan",
                    "time": 1750361000000, "updated": 1750361500000,
                    "felt": null, "cdi": null, "mmi": 3.1, "alert": "green",
                    "status": "reviewed", "tsunami": 0, "sig": 326,
                    "net": "us", "nst": 54, "dmin": 1.2, "rms": 0.6,
                    "gap": 44, "magType": "mb", "type": "earthquake",
                    "title": "M 4.6 - 45 km SSW of Jurm, Afghanistan"
                },
                "geometry": {"type": "Point", "coordinates": [70.7, 36.45, 212.3]}
            },
            {
                "type": "Feature",
                "id": "ak0257abc",
                "properties": {"mag": "2.1", "time": 1750360000000, "felt": "lots", "sig": {"x": 1}},
                "geometry": {"type": "Point", "coordinates": [-150.1, 61.2]}
            },
            "not a feature"
        ]
    }"#;

    #[test]
    fn parses_full_feature() {
        let Ok(events) = parse_feature_collection(SAMPLE) else {
            panic!("sample should parse");
        };
        assert_eq!(events.len(), 2);
        let e = &events[0];
        assert_eq!(e.id, "us7000q1ab");
        assert_eq!(e.longitude, Some(70.7));
        assert_eq!(e.latitude, Some(36.45));
        assert_eq!(e.depth_km, Some(212.3));
        assert_eq!(e.magnitude, Some(FeedNumber::Number(4.6)));
        assert_eq!(e.mag_type.as_deref(), Some("mb"));
        assert_eq!(e.event_type.as_deref(), Some("earthquake"));
        assert_eq!(e.alert.as_deref(), Some("green"));
        assert_eq!(e.felt, None);
        assert_eq!(e.gap, Some(44.0));
        assert_eq!(e.sig, Some(326));
    }

    #[test]
    fn malformed_properties_become_none() {
        let Ok(events) = parse_feature_collection(SAMPLE) else {
            panic!("sample should parse");
        };
        let e = &events[1];
        assert_eq!(e.magnitude, Some(FeedNumber::Text("2.1".to_string())));
        assert_eq!(e.felt, None);
        assert_eq!(e.sig, None);
        assert_eq!(e.depth_km, None);
        assert_eq!(e.place, None);
    }

    #[test]
    fn missing_features_is_an_error() {
        let result = parse_feature_collection(r#"{"type": "FeatureCollection"}"#);
        assert!(matches!(result, Err(SentinelError::MalformedFeed(_))));
        let result = parse_feature_collection("[1, 2]");
        assert!(matches!(result, Err(SentinelError::MalformedFeed(_))));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let result = parse_feature_collection("<html>503</html>");
        assert!(matches!(result, Err(SentinelError::Json(_))));
    }

    #[test]
    fn empty_collection_is_ok() {
        let result = parse_feature_collection(r#"{"features": []}"#);
        assert!(matches!(result, Ok(ref v) if v.is_empty()));
    }

    #[test]
    fn feed_keeps_url() {
        let Ok(feed) = UsgsFeed::new(DEFAULT_FEED_URL, Duration::from_secs(5)) else {
            panic!("client should build");
        };
        assert_eq!(feed.url(), DEFAULT_FEED_URL);
    }
}
