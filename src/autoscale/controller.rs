//! Demand-driven lifecycle controller.
//!
//! # Event Handling
//! ```text
//! held arrival     → no poller?  start() + spawn poller      (else join in-flight)
//! main connect     → pending idle timer? cancel it           (always checked)
//! main disconnect  → remaining == 0 and no timer? arm timer  (else no-op)
//! poller success   → migrate every held user to main
//! timer fires      → claim slot, stop()
//! ```
//!
//! All check-then-create sequences run under one mutex. Remote calls never
//! happen while it is held.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::autoscale::idle::IdleShutdownTimer;
use crate::autoscale::poller::ReadinessPoller;
use crate::autoscale::state::{BackendState, Phase, TaskSlot};
use crate::config::ScalingConfig;
use crate::control::BackendControl;
use crate::gateway::{RoutingGateway, UserId};
use crate::observability::metrics;

/// Point-in-time view of the controller, served by the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub phase: Phase,
    pub polling: bool,
    pub shutdown_pending: bool,
}

struct Inner<C, G> {
    control: Arc<C>,
    gateway: Arc<G>,
    config: ScalingConfig,
    state: Mutex<BackendState>,
}

/// Cheaply cloneable handle to the lifecycle controller.
pub struct Controller<C, G> {
    inner: Arc<Inner<C, G>>,
}

impl<C, G> Clone for Controller<C, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: BackendControl, G: RoutingGateway> Controller<C, G> {
    pub fn new(control: Arc<C>, gateway: Arc<G>, config: ScalingConfig) -> Self {
        tracing::info!(
            poll_interval_secs = config.poll_interval_secs,
            idle_grace_secs = config.idle_grace_secs,
            "Lifecycle controller created"
        );
        metrics::record_phase(Phase::Idle);

        Self {
            inner: Arc::new(Inner {
                control,
                gateway,
                config,
                state: Mutex::new(BackendState::new()),
            }),
        }
    }

    /// A player was parked on the holding backend.
    pub async fn on_held_arrival(&self, user: UserId) {
        {
            let mut state = self.inner.state.lock().await;
            if state.active_poll.is_some() {
                tracing::debug!(%user, "Provisioning already in flight, joining it");
                return;
            }

            let id = state.next_task_id();
            let this = self.clone();
            let handle = ReadinessPoller::new(
                Arc::clone(&self.inner.control),
                self.inner.config.poll_interval(),
            )
            .start_polling(move || async move { this.handle_ready(id).await });

            state.active_poll = Some(TaskSlot::new(id, handle));
            state.set_phase(Phase::Provisioning);
        }

        tracing::info!(%user, "Player waiting in holding area, starting main backend");
        let control = Arc::clone(&self.inner.control);
        tokio::spawn(async move {
            match control.start().await {
                Ok(()) => metrics::record_command("start", true),
                Err(e) => {
                    metrics::record_command("start", false);
                    tracing::warn!(error = %e, "Start command not confirmed");
                }
            }
        });
    }

    /// A player connected to the main backend, from any server.
    pub async fn on_main_connect(&self, user: UserId) {
        let mut state = self.inner.state.lock().await;
        if state.cancel_if_pending() {
            tracing::info!(%user, "Player joined main backend, idle shutdown cancelled");
        }
        if state.active_poll.is_none() {
            state.set_phase(Phase::Ready);
        }
    }

    /// A player left the main backend; `remaining` is the main occupancy
    /// observed by the gateway at the moment of the disconnect.
    pub async fn on_main_disconnect(&self, user: UserId, remaining: u32) {
        if remaining > 0 {
            tracing::debug!(%user, remaining, "Main backend still occupied");
            return;
        }

        let mut state = self.inner.state.lock().await;
        if state.pending_shutdown.is_some() {
            tracing::debug!(%user, "Idle shutdown already pending");
            return;
        }

        let id = state.next_task_id();
        let this = self.clone();
        let handle = IdleShutdownTimer::new(
            Arc::clone(&self.inner.control),
            self.inner.config.idle_grace(),
        )
        .schedule_shutdown(move || async move { this.claim_shutdown(id).await });

        state.pending_shutdown = Some(TaskSlot::new(id, handle));
        if state.active_poll.is_none() {
            state.set_phase(Phase::Draining);
        }
        tracing::info!(
            %user,
            grace_secs = self.inner.config.idle_grace_secs,
            "Main backend empty, idle shutdown armed"
        );
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let state = self.inner.state.lock().await;
        ControllerSnapshot {
            phase: state.phase(),
            polling: state.active_poll.is_some(),
            shutdown_pending: state.pending_shutdown.is_some(),
        }
    }

    /// Abort the poller and any pending idle timer without issuing commands.
    pub async fn shutdown(&self) {
        let mut state = self.inner.state.lock().await;
        if let Some(slot) = state.active_poll.take() {
            slot.cancel();
        }
        state.cancel_if_pending();
        tracing::info!("Lifecycle controller stopped");
    }

    async fn handle_ready(&self, poll_id: u64) {
        {
            let mut state = self.inner.state.lock().await;
            if state.take_poll(poll_id).is_none() {
                return;
            }
            let phase = if state.pending_shutdown.is_some() {
                Phase::Draining
            } else {
                Phase::Ready
            };
            state.set_phase(phase);
        }

        self.migrate_held_users().await;
    }

    async fn migrate_held_users(&self) {
        let users = match self.inner.gateway.held_users().await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!(error = %e, "Could not list held players, migration skipped");
                return;
            }
        };

        if users.is_empty() {
            tracing::debug!("No players waiting in holding area");
            return;
        }

        let count = users.len();
        match self.inner.gateway.migrate_to_main(users).await {
            Ok(report) => {
                metrics::record_migrated(report.moved);
                if let Some(backend) = &report.missing_backend {
                    tracing::error!(
                        backend = %backend,
                        requested = count,
                        moved = report.moved,
                        failed = report.failed,
                        "Main backend is not registered with the gateway"
                    );
                    return;
                }
                tracing::info!(
                    requested = count,
                    moved = report.moved,
                    failed = report.failed,
                    "Moved held players to main backend"
                );
            }
            Err(e) => tracing::error!(error = %e, requested = count, "Migration to main backend failed"),
        }
    }

    async fn claim_shutdown(&self, timer_id: u64) -> bool {
        let mut state = self.inner.state.lock().await;
        if state.take_shutdown(timer_id).is_none() {
            return false;
        }
        let phase = if state.active_poll.is_some() {
            Phase::Provisioning
        } else {
            Phase::Idle
        };
        state.set_phase(phase);
        true
    }
}
