//! Event sources: where raw earthquake records come from.
//!
//! [`EventSource`] is the seam between the alert service and the network.
//! [`UsgsFeed`] reads the USGS GeoJSON summary feeds.

pub mod usgs;

use std::future::Future;

use crate::domain::RawEvent;
use crate::error::SentinelError;

pub use usgs::{UsgsFeed, parse_feature_collection};

/// Supplies one snapshot of raw events per call.
pub trait EventSource {
    /// Fetches the current list of events.
    ///
    /// # Errors
    ///
    /// Returns a [`SentinelError`] when the source cannot be reached or
    /// its response is not a recognisable event collection. Individual
    /// malformed records are not errors.
    fn fetch_events(&self) -> impl Future<Output = Result<Vec<RawEvent>, SentinelError>> + Send;
}
