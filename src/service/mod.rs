//! Service layer: one alerting pass and the polling loop.
//!
//! [`AlertService`] pulls from an [`crate::feed::EventSource`], runs the
//! proximity filter, and pushes through a [`crate::notify::NotificationSink`].

pub mod alert_service;

pub use alert_service::{AlertService, RunSummary};
