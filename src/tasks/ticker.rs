//! Periodic tick background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that advances every timer once per period
pub async fn tick_task(state: Arc<AppState>, period: Duration) {
    info!("Starting tick task ({}ms period)", period.as_millis());

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match state.tick_all() {
            Ok(0) => {}
            Ok(flipped) => debug!("{} timers changed phase", flipped),
            Err(e) => error!("Failed to tick timers: {}", e),
        }
    }
}
