//! Periodic lifecycle driver
//!
//! Polls the store on a fixed tick, deleting expired records and applying
//! due class transitions. The loop awaits each tick's full due-set before
//! the next one starts, so two ticks never run concurrently against the
//! same store.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::services::alarm_service::AlarmService;

pub struct LifecycleScheduler {
    service: Arc<AlarmService>,
    tick_interval: Duration,
}

impl LifecycleScheduler {
    pub fn new(service: Arc<AlarmService>, tick_interval: Duration) -> Self {
        Self {
            service,
            tick_interval,
        }
    }

    /// Run forever. Intended to be spawned as a background task.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.tick_interval);
        // A slow tick delays the next one instead of bursting to catch up.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Starting lifecycle scheduler with tick interval {:?}",
            self.tick_interval
        );

        loop {
            interval.tick().await;

            let now = Utc::now().timestamp();
            if let Err(e) = self.service.tick(now).await {
                error!("Scheduler tick failed: {}", e);
            }
        }
    }
}
