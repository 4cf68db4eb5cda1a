//! Idle shutdown timer.
//!
//! # Responsibilities
//! - Wait out the grace period after main occupancy reached zero
//! - Issue `stop()` once, unless the firing was superseded
//!
//! Cancellation is owned by the controller (`BackendState::cancel_if_pending`).
//! Before stopping, the timer asks the controller to `claim` the firing; a
//! timer that was cancelled while waking up loses the claim and exits quietly.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::control::BackendControl;
use crate::observability::metrics;

pub struct IdleShutdownTimer<C> {
    control: Arc<C>,
    grace: Duration,
}

impl<C: BackendControl> IdleShutdownTimer<C> {
    pub fn new(control: Arc<C>, grace: Duration) -> Self {
        Self { control, grace }
    }

    pub fn schedule_shutdown<F, Fut>(self, claim: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        tokio::spawn(async move {
            tokio::time::sleep(self.grace).await;

            if !claim().await {
                tracing::debug!("Idle shutdown superseded before firing");
                return;
            }

            tracing::info!(grace_secs = self.grace.as_secs(), "Main backend idle, requesting stop");
            match self.control.stop().await {
                Ok(()) => metrics::record_command("stop", true),
                Err(e) => {
                    metrics::record_command("stop", false);
                    tracing::warn!(error = %e, "Stop command not confirmed");
                }
            }
        })
    }
}
