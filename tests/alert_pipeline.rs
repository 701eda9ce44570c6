//! End-to-end pass over a recorded feed snapshot, without network access.
#![allow(clippy::panic, clippy::indexing_slicing, missing_docs)]

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use quake_sentinel::config::SentinelConfig;
use quake_sentinel::domain::{DepthCategory, RawEvent, filter_events};
use quake_sentinel::error::SentinelError;
use quake_sentinel::feed::{EventSource, parse_feature_collection};
use quake_sentinel::notify::NotificationSink;
use quake_sentinel::service::AlertService;

/// Generated 2025-06-19 20:00:00 UTC. Reference point is the default one.
const SNAPSHOT: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "id": "us6000near",
     "properties": {"mag": 4.3, "place": "10 km E of Haripur, Pakistan", "time": 1750361650000,
                    "tsunami": 0, "sig": 284, "status": "reviewed", "magType": "mb",
                    "type": "earthquake", "alert": null, "felt": 5},
     "geometry": {"type": "Point", "coordinates": [72.88, 33.99, 35.0]}},
    {"type": "Feature", "id": "us6000deep",
     "properties": {"mag": "4.8", "place": "Hindu Kush region, Afghanistan", "time": 1750358000000,
                    "tsunami": 0, "sig": 354, "status": "reviewed", "magType": "mb",
                    "type": "earthquake", "alert": "green"},
     "geometry": {"type": "Point", "coordinates": [70.9, 36.5, 210.0]}},
    {"type": "Feature", "id": "ak0251small",
     "properties": {"mag": 1.4, "place": "Alaska", "time": 1750360000000},
     "geometry": {"type": "Point", "coordinates": [-150.0, 61.0, 12.0]}},
    {"type": "Feature", "id": "us6000weak",
     "properties": {"mag": 2.2, "place": "near home", "time": 1750361000000},
     "geometry": {"type": "Point", "coordinates": [72.8, 33.8, 10.0]}},
    {"type": "Feature", "id": "us6000notime",
     "properties": {"mag": 5.5, "place": "near home"},
     "geometry": {"type": "Point", "coordinates": [72.8, 33.8, 10.0]}},
    {"type": "Feature", "id": "us6000badmag",
     "properties": {"mag": "not-a-number", "place": "near home", "time": 1750361000000},
     "geometry": {"type": "Point", "coordinates": [72.8, 33.8, 10.0]}}
  ]
}"#;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 19, 20, 0, 0)
        .single()
        .unwrap_or_default()
}

fn default_config() -> SentinelConfig {
    let Ok(cfg) = SentinelConfig::from_lookup(|_| None) else {
        panic!("defaults should load");
    };
    cfg
}

#[test]
fn snapshot_filters_to_nearby_strong_events() {
    let Ok(raw) = parse_feature_collection(SNAPSHOT) else {
        panic!("snapshot should parse");
    };
    assert_eq!(raw.len(), 6);

    let out = filter_events(&default_config().filter, &raw, now());
    let ids: Vec<_> = out.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["us6000near", "us6000deep"]);

    let near = &out[0];
    assert_eq!(near.depth_category, DepthCategory::Shallow);
    assert_eq!(near.alert, "None");
    assert_eq!(near.felt, 5);
    assert!(near.notification_text.contains("Magnitude: 4.3 (mb)"));
    assert!(near.notification_text.contains("10 km E of Haripur, Pakistan"));
    assert!(near.notification_text.contains("ID: us6000near"));

    let deep = &out[1];
    assert_eq!(deep.depth_category, DepthCategory::Intermediate);
    assert_eq!(deep.felt, 0);
    assert!(deep.distance_km <= 400.0);
    assert!(deep.notification_text.contains("PAGER alert: green"));
}

struct Snapshot(Vec<RawEvent>);

impl EventSource for Snapshot {
    async fn fetch_events(&self) -> Result<Vec<RawEvent>, SentinelError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct Outbox(Mutex<Vec<String>>);

impl NotificationSink for Outbox {
    async fn send(&self, _destination: &str, text: &str) -> Result<(), SentinelError> {
        if let Ok(mut guard) = self.0.lock() {
            guard.push(text.to_string());
        }
        Ok(())
    }
}

#[tokio::test]
async fn service_dispatches_snapshot_matches_once() {
    let Ok(raw) = parse_feature_collection(SNAPSHOT) else {
        panic!("snapshot should parse");
    };
    let mut service = AlertService::new(
        Snapshot(raw),
        Outbox::default(),
        default_config().filter,
        "8151",
    );

    let Ok(first) = service.run_once(now()).await else {
        panic!("first pass should succeed");
    };
    assert_eq!(first.fetched, 6);
    assert_eq!(first.matched, 2);
    assert_eq!(first.sent, 2);

    let Ok(second) = service.run_once(now()).await else {
        panic!("second pass should succeed");
    };
    assert_eq!(second.sent, 0);
    assert_eq!(second.skipped_duplicates, 2);

    let outbox = service.sink().0.lock().map(|g| g.clone()).unwrap_or_default();
    assert_eq!(outbox.len(), 2);
    assert!(outbox[1].contains("(1 hour ago)"));
}
