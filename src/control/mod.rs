//! Backend control subsystem.
//!
//! # Data Flow
//! ```text
//! Lifecycle controller / poller / idle timer
//!     → BackendControl::{start, stop, status}
//!     → client.rs (POST /start, /stop, /status with per-call timeout)
//!     → control endpoint (external)
//! ```
//!
//! # Design Decisions
//! - Commands are best-effort: only HTTP 200 counts as accepted
//! - Errors are returned, never retried here; callers log and move on
//! - Readiness is judged by polling `status`, not by command acknowledgements

pub mod client;

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

pub use client::HttpControlClient;

/// Observed state of the managed backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStatus {
    /// Reachable and serving players.
    Up,
    /// Control endpoint answered, but the backend is not serving yet.
    Down,
    /// Control endpoint could not be reached or timed out.
    Unreachable,
}

impl BackendStatus {
    pub fn is_ready(self) -> bool {
        self == BackendStatus::Up
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendStatus::Up => "up",
            BackendStatus::Down => "down",
            BackendStatus::Unreachable => "unreachable",
        }
    }
}

impl std::fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from a single control endpoint call.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Connection refused, DNS failure, reset, ...
    #[error("transport error: {0}")]
    Transport(String),

    /// The call did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The endpoint answered with something other than 200.
    #[error("endpoint returned status {0}")]
    Status(u16),
}

/// Commands understood by the backend control endpoint.
pub trait BackendControl: Send + Sync + 'static {
    /// Ask for the backend to be provisioned. Returns once the request is accepted,
    /// not once the backend is up.
    fn start(&self) -> impl Future<Output = Result<(), ControlError>> + Send;

    /// Ask for the backend to be torn down.
    fn stop(&self) -> impl Future<Output = Result<(), ControlError>> + Send;

    /// Report current backend status. Never fails; errors map to `Unreachable`.
    fn status(&self) -> impl Future<Output = BackendStatus> + Send;
}
