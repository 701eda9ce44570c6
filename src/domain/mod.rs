//! Domain layer: the proximity event filter.
//!
//! Pure code with no I/O: coordinates and haversine distance, raw and
//! filtered event records, the filtering pass, and the alert template.
//! The current time is always passed in by the caller.

pub mod filter;
pub mod filtered_event;
pub mod geo;
pub mod notification;
pub mod raw_event;

pub use filter::{FilterConfig, filter_events};
pub use filtered_event::{DepthCategory, FilteredEvent};
pub use geo::{GeoPoint, distance};
pub use notification::format_notification;
pub use raw_event::{FeedNumber, RawEvent};
