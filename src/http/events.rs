//! Gateway event intake handlers.
//!
//! Each handler hands the event to the controller and answers 202 right
//! away; the controller never performs remote I/O on the request path.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::control::BackendControl;
use crate::gateway::{RoutingGateway, UserId};
use crate::http::server::AppState;

/// A player was routed somewhere, identified by UUID.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerEvent {
    pub user: UserId,
}

/// A player disconnected from `previous_server`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisconnectEvent {
    pub user: UserId,
    pub previous_server: String,
    /// Players still on `previous_server` after this one left.
    pub remaining: u32,
}

pub async fn held_arrival<C: BackendControl, G: RoutingGateway>(
    State(state): State<AppState<C, G>>,
    Json(event): Json<PlayerEvent>,
) -> StatusCode {
    state.controller.on_held_arrival(event.user).await;
    StatusCode::ACCEPTED
}

pub async fn main_connect<C: BackendControl, G: RoutingGateway>(
    State(state): State<AppState<C, G>>,
    Json(event): Json<PlayerEvent>,
) -> StatusCode {
    state.controller.on_main_connect(event.user).await;
    StatusCode::ACCEPTED
}

pub async fn main_disconnect<C: BackendControl, G: RoutingGateway>(
    State(state): State<AppState<C, G>>,
    Json(event): Json<DisconnectEvent>,
) -> StatusCode {
    if event.previous_server != *state.main_backend {
        tracing::trace!(
            user = %event.user,
            server = %event.previous_server,
            "Ignoring disconnect from non-main server"
        );
        return StatusCode::ACCEPTED;
    }

    state
        .controller
        .on_main_disconnect(event.user, event.remaining)
        .await;
    StatusCode::ACCEPTED
}
