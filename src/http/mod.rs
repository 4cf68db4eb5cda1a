//! HTTP event intake subsystem.
//!
//! # Data Flow
//! ```text
//! Routing gateway
//!     → POST /events/{held-arrival, main-connect, main-disconnect}
//!     → events.rs (decode JSON, filter non-main disconnects)
//!     → autoscale::Controller
//!
//! Operators
//!     → GET /admin/status → admin::handlers
//! ```

pub mod events;
pub mod server;

pub use server::{AppState, EventServer};
