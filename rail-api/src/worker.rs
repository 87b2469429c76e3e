use std::sync::Arc;

use rail_catalog::TrainTracker;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

/// Moves the live trains every `refresh_seconds` until the task is dropped.
pub async fn start_tracker_worker(tracker: Arc<TrainTracker>, refresh_seconds: u64) {
    let mut ticker = interval(Duration::from_secs(refresh_seconds.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    info!("Tracker worker started, refreshing every {}s", refresh_seconds);

    loop {
        ticker.tick().await;
        tracker.refresh().await;
        debug!("Live train positions refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_worker_refreshes_positions() {
        let tracker = Arc::new(TrainTracker::demo());
        let before = tracker.snapshot().await;

        let handle = tokio::spawn(start_tracker_worker(tracker.clone(), 30));
        tokio::time::sleep(Duration::from_secs(31)).await;
        handle.abort();

        let after = tracker.snapshot().await;
        assert!(after[0].last_updated >= before[0].last_updated);
        assert_ne!(after[0].current_location, before[0].current_location);
    }
}
