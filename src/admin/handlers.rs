use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::autoscale::ControllerSnapshot;
use crate::control::BackendControl;
use crate::gateway::RoutingGateway;
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    #[serde(flatten)]
    pub controller: ControllerSnapshot,
}

/// Client-side form of [`SystemStatus`].
#[derive(Debug, Deserialize)]
pub struct StatusReport {
    pub version: String,
    pub phase: String,
    pub polling: bool,
    pub shutdown_pending: bool,
}

pub async fn get_status<C: BackendControl, G: RoutingGateway>(
    State(state): State<AppState<C, G>>,
) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        controller: state.controller.snapshot().await,
    })
}
