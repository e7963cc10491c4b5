use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use lilac_holds::HoldSweeper;

/// Drives the hold sweeper on a fixed wall-clock interval.
///
/// Each run is bounded by `run_timeout`; a failed or timed-out run is
/// abandoned and the overdue holds stay eligible for the next tick.
pub async fn start_sweeper_loop(
    sweeper: Arc<HoldSweeper>,
    interval: Duration,
    run_timeout: Duration,
) {
    info!("Hold sweeper scheduled every {:?}", interval);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let now = Utc::now().timestamp_millis();
        match tokio::time::timeout(run_timeout, sweeper.run_once(now)).await {
            Ok(Ok(_)) => {} // run_once logs its own zero-count and reclaim lines
            Ok(Err(e)) => error!("Hold sweep failed, will retry next tick: {}", e),
            Err(_) => warn!("Hold sweep timed out after {:?}", run_timeout),
        }
    }
}
