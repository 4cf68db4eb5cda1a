//! Demand-driven backend lifecycle.
//!
//! # Data Flow
//! ```text
//! Gateway events
//!     → controller.rs (state machine, single mutex over state.rs)
//!     → poller.rs   (recurring status checks until the backend is up)
//!     → idle.rs     (one-shot stop after the grace period)
//!     → control::BackendControl / gateway::RoutingGateway
//! ```
//!
//! # Design Decisions
//! - At most one poller and one idle timer exist at any time
//! - Commands are fire-and-forget; polling observed state is the source of truth
//! - A failed start is retried by the next arrival, a failed stop by the next drop to zero

pub mod controller;
pub mod idle;
pub mod poller;
pub mod state;

pub use controller::{Controller, ControllerSnapshot};
pub use state::{BackendState, Phase};
