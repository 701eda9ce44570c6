//! Alert service: fetch, filter, dispatch.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::domain::filtered_event::or_not_available;
use crate::domain::{FilterConfig, filter_events};
use crate::error::SentinelError;
use crate::feed::EventSource;
use crate::notify::NotificationSink;

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Records returned by the source.
    pub fetched: usize,
    /// Records that passed the filter.
    pub matched: usize,
    /// Notifications delivered.
    pub sent: usize,
    /// Notifications the sink rejected.
    pub failed: usize,
    /// Matches already notified by an earlier pass.
    pub skipped_duplicates: usize,
}

/// Coordinates one [`EventSource`] and one [`NotificationSink`].
///
/// Every pass follows the same sequence: fetch → filter → drop already
/// notified ids → send one message per remaining event, in feed order.
/// The only state carried between passes is the set of notified feed ids
/// (trimmed), pruned to the ids still present in the latest snapshot.
/// Events without a feed id cannot be told apart and are always sent.
#[derive(Debug)]
pub struct AlertService<S, N> {
    source: S,
    sink: N,
    filter: FilterConfig,
    destination: String,
    notified: HashSet<String>,
}

impl<S, N> AlertService<S, N>
where
    S: EventSource,
    N: NotificationSink,
{
    /// Creates a service that sends alerts to `destination`.
    #[must_use]
    pub fn new(source: S, sink: N, filter: FilterConfig, destination: impl Into<String>) -> Self {
        Self {
            source,
            sink,
            filter,
            destination: destination.into(),
            notified: HashSet::new(),
        }
    }

    /// Returns the filter configuration.
    #[must_use]
    pub const fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    /// Returns the sink.
    #[must_use]
    pub const fn sink(&self) -> &N {
        &self.sink
    }

    /// Runs a single pass with `now` as the reference time.
    ///
    /// A rejected notification is logged and counted; it does not stop
    /// the remaining ones and is attempted again on the next pass.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the fetch fails.
    pub async fn run_once(&mut self, now: DateTime<Utc>) -> Result<RunSummary, SentinelError> {
        let raw_events = self.source.fetch_events().await?;
        let matches = filter_events(&self.filter, &raw_events, now);

        let current: HashSet<&str> = raw_events
            .iter()
            .map(|e| e.id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        self.notified.retain(|id| current.contains(id.as_str()));

        let mut summary = RunSummary {
            fetched: raw_events.len(),
            matched: matches.len(),
            ..RunSummary::default()
        };

        for event in &matches {
            let feed_id = event.feed_id.as_deref();
            if feed_id.is_some_and(|id| self.notified.contains(id)) {
                summary.skipped_duplicates += 1;
                continue;
            }

            tracing::info!(
                id = %event.id,
                magnitude = event.magnitude,
                distance_km = event.distance_km,
                place = %event.place,
                title = event.title.as_deref().unwrap_or_default(),
                cdi = %or_not_available(event.cdi),
                mmi = %or_not_available(event.mmi),
                "earthquake matched"
            );

            match self.sink.send(&self.destination, &event.notification_text).await {
                Ok(()) => {
                    summary.sent += 1;
                    if let Some(id) = feed_id {
                        self.notified.insert(id.to_string());
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(id = %event.id, kind = e.kind(), error = %e, "alert not delivered");
                }
            }
        }

        tracing::info!(
            fetched = summary.fetched,
            matched = summary.matched,
            sent = summary.sent,
            failed = summary.failed,
            duplicates = summary.skipped_duplicates,
            "pass complete"
        );
        Ok(summary)
    }

    /// Runs a pass every `interval` until `shutdown` resolves.
    ///
    /// A failed pass is logged and polling continues.
    pub async fn run_polling<F>(&mut self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested, stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once(Utc::now()).await {
                        tracing::error!(kind = e.kind(), error = %e, "pass failed");
                    }
                }
            }
        }
    }
}
