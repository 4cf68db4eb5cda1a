//! On-demand backend lifecycle controller.
//!
//! Players who arrive while the main backend is down are parked in a holding
//! area by the routing gateway. This crate starts the backend, polls it until
//! it serves, moves the parked players over, and stops it again after a
//! grace period with nobody connected.

pub mod admin;
pub mod autoscale;
pub mod config;
pub mod control;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use autoscale::Controller;
pub use config::HoldoverConfig;
pub use http::EventServer;
pub use lifecycle::Shutdown;
