//! Admin API: read-only view of the controller.

pub mod handlers;

use axum::{routing::get, Router};

use crate::control::BackendControl;
use crate::gateway::RoutingGateway;
use crate::http::server::AppState;
use self::handlers::get_status;

pub fn router<C: BackendControl, G: RoutingGateway>() -> Router<AppState<C, G>> {
    Router::new().route("/admin/status", get(get_status::<C, G>))
}
