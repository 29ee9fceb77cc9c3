use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument};

use super::repository::SessionRepository;

/// Starts the background task that periodically sweeps expired and idle
/// sessions. Runs for the life of the process.
#[instrument(skip(session_repository))]
pub async fn start_sweep_task(
    session_repository: Arc<dyn SessionRepository + Send + Sync>,
    sweep_interval: Duration,
) {
    info!(
        sweep_interval_secs = sweep_interval.as_secs(),
        "Starting session sweep background task"
    );

    let mut sweep_interval = interval(sweep_interval);
    sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately; the first sweep is one interval in
    sweep_interval.tick().await;

    loop {
        sweep_interval.tick().await;
        run_sweep(session_repository.as_ref());
    }
}

/// Runs one sweep and logs the outcome along with current occupancy
pub fn run_sweep(session_repository: &(dyn SessionRepository + Send + Sync)) -> usize {
    let removed = session_repository.sweep_sessions();
    let stats = session_repository.session_stats();

    if removed > 0 {
        info!(
            removed_sessions = removed,
            total = stats.total,
            active = stats.active,
            inactive = stats.inactive,
            "Swept expired sessions"
        );
    } else {
        debug!(
            total = stats.total,
            active = stats.active,
            inactive = stats.inactive,
            "Session sweep found nothing to remove"
        );
    }

    removed
}
