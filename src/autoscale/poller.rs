//! Readiness polling.
//!
//! # Responsibilities
//! - Query backend status on a fixed interval, first check immediately
//! - Stop ticking as soon as the backend reports up
//! - Invoke the readiness callback exactly once, after the last tick
//!
//! Failed checks count as "not ready"; the poller only ends on success
//! (or when its task is aborted at process shutdown).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::control::BackendControl;
use crate::observability::metrics;

pub struct ReadinessPoller<C> {
    control: Arc<C>,
    interval: Duration,
}

impl<C: BackendControl> ReadinessPoller<C> {
    pub fn new(control: Arc<C>, interval: Duration) -> Self {
        Self { control, interval }
    }

    /// Spawn the polling task. `on_ready` runs inside the task once the
    /// ticker has been dropped, so no check can follow it.
    pub fn start_polling<F, Fut>(self, on_ready: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            let checks = self.poll_until_ready().await;
            tracing::info!(checks, "Main backend is ready");
            on_ready().await;
        })
    }

    async fn poll_until_ready(self) -> u32 {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut checks = 0;
        loop {
            ticker.tick().await;
            checks += 1;

            let status = self.control.status().await;
            metrics::record_poll_check(status);
            if status.is_ready() {
                return checks;
            }
            tracing::debug!(%status, checks, "Main backend not ready yet");
        }
    }
}
