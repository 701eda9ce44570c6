//! quake-sentinel entry point.
//!
//! Runs one alerting pass, or polls when `POLL_INTERVAL_SECS` is set.

use tracing_subscriber::EnvFilter;

use quake_sentinel::config::{LogFormat, SentinelConfig};
use quake_sentinel::feed::{EventSource, UsgsFeed};
use quake_sentinel::notify::{LogSink, NotificationSink, TelegramSink};
use quake_sentinel::service::AlertService;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; a bad value is still reported through tracing
    let config = match SentinelConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!(kind = e.kind(), error = %e, "invalid configuration");
            return Err(e.into());
        }
    };

    init_tracing(config.log_format);

    let feed = UsgsFeed::new(config.feed_url.clone(), config.feed_timeout)?;

    match &config.telegram {
        Some(tg) => {
            let sink = TelegramSink::new(tg.api_base.clone(), tg.token.clone(), config.send_timeout)?;
            run(feed, sink, &config, tg.chat_id.clone()).await
        }
        None => run(feed, LogSink, &config, "log".to_string()).await,
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn run<S, N>(
    feed: S,
    sink: N,
    config: &SentinelConfig,
    destination: String,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: EventSource,
    N: NotificationSink,
{
    let mut service = AlertService::new(feed, sink, config.filter, destination);

    let filter = service.filter();
    tracing::info!(
        reference = %filter.reference,
        min_magnitude = filter.min_magnitude,
        radius_km = filter.radius_km,
        dry_run = config.is_dry_run(),
        "starting quake-sentinel"
    );

    match config.poll_interval {
        Some(interval) => {
            tracing::info!(interval_secs = interval.as_secs(), "polling");
            service
                .run_polling(interval, async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!(error = %e, "cannot listen for ctrl-c, stopping");
                    }
                })
                .await;
        }
        None => {
            let summary = service.run_once(chrono::Utc::now()).await?;
            tracing::info!(sent = summary.sent, failed = summary.failed, "done");
        }
    }

    Ok(())
}
