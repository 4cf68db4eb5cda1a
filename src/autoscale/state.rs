//! Backend lifecycle state.
//!
//! # States
//! - Idle: nothing running, no timers armed
//! - Provisioning: start requested, readiness poller running
//! - Ready: main backend confirmed serving
//! - Draining: serving, but the idle shutdown timer is armed
//!
//! # State Transitions
//! ```text
//! any          → Provisioning: player parked in holding area, poller started
//! Provisioning → Ready:        poller saw the backend up
//! Ready        → Draining:     main occupancy dropped to zero
//! Draining     → Ready:        player connected to main, timer cancelled
//! Draining     → Idle:         idle timer fired, stop requested
//! ```
//!
//! # Design Decisions
//! - Exactly one `BackendState`, owned by the controller behind one mutex
//! - Timer ownership is an `Option<TaskSlot>`; check-and-set happens under the lock
//! - Slots carry an id so a late callback cannot clear a newer slot

use serde::Serialize;
use tokio::task::JoinHandle;

/// Coarse lifecycle phase of the managed backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Provisioning,
    Ready,
    Draining,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Provisioning => "provisioning",
            Phase::Ready => "ready",
            Phase::Draining => "draining",
        }
    }

    /// Value exported on the `holdover_backend_phase` gauge.
    pub fn gauge_value(self) -> f64 {
        match self {
            Phase::Idle => 0.0,
            Phase::Provisioning => 1.0,
            Phase::Ready => 2.0,
            Phase::Draining => 3.0,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ownership handle for one spawned poller or timer task.
#[derive(Debug)]
pub struct TaskSlot {
    id: u64,
    handle: JoinHandle<()>,
}

impl TaskSlot {
    pub fn new(id: u64, handle: JoinHandle<()>) -> Self {
        Self { id, handle }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Abort the task. Aborting a task that already finished is a no-op.
    pub fn cancel(self) {
        self.handle.abort();
    }
}

/// Mutable state guarded by the controller's mutex.
#[derive(Debug)]
pub struct BackendState {
    phase: Phase,
    pub(crate) active_poll: Option<TaskSlot>,
    pub(crate) pending_shutdown: Option<TaskSlot>,
    next_task_id: u64,
}

impl BackendState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            active_poll: None,
            pending_shutdown: None,
            next_task_id: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            tracing::info!(from = %self.phase, to = %phase, "Backend phase changed");
            self.phase = phase;
        }
        crate::observability::metrics::record_phase(phase);
    }

    pub(crate) fn next_task_id(&mut self) -> u64 {
        self.next_task_id += 1;
        self.next_task_id
    }

    /// Remove the poller slot if it still belongs to `id`.
    pub(crate) fn take_poll(&mut self, id: u64) -> Option<TaskSlot> {
        if self.active_poll.as_ref().map(TaskSlot::id) == Some(id) {
            self.active_poll.take()
        } else {
            None
        }
    }

    /// Remove the shutdown slot if it still belongs to `id`.
    pub(crate) fn take_shutdown(&mut self, id: u64) -> Option<TaskSlot> {
        if self.pending_shutdown.as_ref().map(TaskSlot::id) == Some(id) {
            self.pending_shutdown.take()
        } else {
            None
        }
    }

    /// Cancel the pending shutdown timer, if any. Returns whether one was pending.
    pub(crate) fn cancel_if_pending(&mut self) -> bool {
        match self.pending_shutdown.take() {
            Some(slot) => {
                slot.cancel();
                true
            }
            None => false,
        }
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}
