//! # quake-sentinel
//!
//! Earthquake proximity alerts: reads the USGS GeoJSON feed, keeps the
//! events above a magnitude threshold within a radius of a reference
//! point, and posts one message per event to a Telegram chat.
//!
//! The filter itself ([`domain::filter_events`]) is pure; the feed and the
//! messaging API are reached through the [`feed::EventSource`] and
//! [`notify::NotificationSink`] traits.
//!
//! ## Architecture
//!
//! ```text
//! USGS feed (HTTP)
//!     │
//!     ├── UsgsFeed (feed/)
//!     │
//!     ├── AlertService (service/)
//!     │     └── filter_events / format_notification (domain/)
//!     │
//!     └── TelegramSink | LogSink (notify/)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod notify;
pub mod service;
