//! Routing gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway connect/disconnect notifications
//!     → http::events (intake API)
//!     → autoscale::Controller
//!
//! Controller, once the main backend is ready:
//!     → RoutingGateway::held_users()
//!     → RoutingGateway::migrate_to_main(users)
//!     → http.rs (gateway admin API, one request per user)
//! ```
//!
//! # Design Decisions
//! - The gateway owns player sessions; this crate only asks it to move them
//! - Migration is best-effort per user; one failed user never blocks the rest
//! - An unknown holding/main backend fails that migration attempt only

pub mod http;

use std::collections::HashSet;
use std::future::Future;

use thiserror::Error;
use uuid::Uuid;

pub use http::HttpGateway;

/// Identity of a connected player.
pub type UserId = Uuid;

/// Errors talking to the routing gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway has no backend registered under this name.
    #[error("backend '{0}' is not registered with the gateway")]
    UnknownBackend(String),

    /// The gateway refused the request.
    #[error("gateway rejected request with status {0}")]
    Rejected(u16),

    /// Connection or timeout error.
    #[error("gateway transport error: {0}")]
    Transport(String),

    /// The gateway answered with a body we could not decode.
    #[error("invalid gateway response: {0}")]
    Decode(String),
}

/// Result of a batch migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Users the gateway accepted a connection request for.
    pub moved: usize,
    /// Users whose connection request failed.
    pub failed: usize,
    /// Set when the gateway reported the main backend as unregistered for at
    /// least one user. Users already moved stay counted in `moved`.
    pub missing_backend: Option<String>,
}

/// Operations the controller needs from the routing gateway.
pub trait RoutingGateway: Send + Sync + 'static {
    /// Users currently parked on the holding backend.
    fn held_users(&self) -> impl Future<Output = Result<HashSet<UserId>, GatewayError>> + Send;

    /// Send every user in `users` to the main backend. Each user is attempted
    /// independently; per-user failures are counted in the report, not returned.
    fn migrate_to_main(
        &self,
        users: HashSet<UserId>,
    ) -> impl Future<Output = Result<MigrationReport, GatewayError>> + Send;
}
