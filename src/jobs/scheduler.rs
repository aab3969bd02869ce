//! Recurring system-wide analysis loop.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::orchestrator::JobOrchestrator;
use crate::error::Result;
use crate::store::TrendStore;

/// Run system-wide analysis on a fixed interval until shutdown.
///
/// The first pass runs immediately; later passes run once per interval
/// with missed ticks skipped, so a pass running longer than the interval
/// does not queue up a backlog. The shutdown receiver doubles as the
/// cancellation signal for an in-flight pass, checked between per-topic
/// units.
pub async fn run_scheduled<S: TrendStore + 'static>(
    orchestrator: JobOrchestrator<S>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    info!(interval_secs = interval.as_secs(), "Starting scheduled analysis loop");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            result = shutdown.changed() => {
                match result {
                    Ok(_) => {
                        if *shutdown.borrow() {
                            info!("Shutdown signal received");
                            break;
                        }
                    }
                    Err(_) => {
                        info!("Shutdown channel closed");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                match orchestrator.analyze_all_system_wide(Some(shutdown.clone())).await {
                    Ok(report) => info!(
                        owners = report.owners.len(),
                        succeeded = report.succeeded,
                        failed = report.failed,
                        "Scheduled analysis pass complete"
                    ),
                    Err(e) => warn!(error = %e, "Scheduled analysis pass failed"),
                }
            }
        }
    }

    Ok(())
}
