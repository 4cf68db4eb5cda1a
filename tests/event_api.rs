//! Event intake and admin API, driven through the router without a socket.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceExt;
use uuid::Uuid;

use holdover::admin::handlers::StatusReport;
use holdover::autoscale::Controller;
use holdover::config::{ListenerConfig, ScalingConfig};
use holdover::http::{AppState, EventServer};
use holdover::lifecycle::Shutdown;

mod common;

use common::{RecordingControl, RecordingGateway};

fn app(control: Arc<RecordingControl>) -> Router {
    let controller = Controller::new(control, RecordingGateway::new(), ScalingConfig::default());
    let state = AppState {
        controller,
        main_backend: "main".into(),
    };
    EventServer::new(&ListenerConfig::default(), state).into_router()
}

fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn status(app: &Router) -> StatusReport {
    let res = app
        .clone()
        .oneshot(Request::get("/admin/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = to_bytes(res.into_body(), 64 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_status_starts_idle() {
    let app = app(RecordingControl::never_up());

    let report = status(&app).await;
    assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(report.phase, "idle");
    assert!(!report.polling);
    assert!(!report.shutdown_pending);
}

#[tokio::test]
async fn test_held_arrival_starts_provisioning() {
    let control = RecordingControl::never_up();
    let app = app(control.clone());

    let res = app
        .clone()
        .oneshot(post("/events/held-arrival", json!({ "user": Uuid::new_v4() })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let report = status(&app).await;
    assert_eq!(report.phase, "provisioning");
    assert!(report.polling);
}

#[tokio::test]
async fn test_main_disconnect_arms_and_connect_cancels() {
    let app = app(RecordingControl::always_up());
    let user = Uuid::new_v4();

    let res = app
        .clone()
        .oneshot(post(
            "/events/main-disconnect",
            json!({ "user": user, "previous_server": "main", "remaining": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let report = status(&app).await;
    assert!(report.shutdown_pending);
    assert_eq!(report.phase, "draining");

    app.clone()
        .oneshot(post("/events/main-connect", json!({ "user": user })))
        .await
        .unwrap();
    let report = status(&app).await;
    assert!(!report.shutdown_pending);
    assert_eq!(report.phase, "ready");
}

#[tokio::test]
async fn test_disconnect_from_other_server_is_ignored() {
    let app = app(RecordingControl::always_up());

    let res = app
        .clone()
        .oneshot(post(
            "/events/main-disconnect",
            json!({ "user": Uuid::new_v4(), "previous_server": "limbo", "remaining": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    assert!(!status(&app).await.shutdown_pending);
}

#[tokio::test]
async fn test_malformed_event_is_rejected() {
    let app = app(RecordingControl::never_up());

    let res = app
        .clone()
        .oneshot(post("/events/held-arrival", json!({ "user": "not-a-uuid" })))
        .await
        .unwrap();
    assert!(res.status().is_client_error());
    assert!(!status(&app).await.polling);
}

#[tokio::test]
async fn test_server_exits_on_signal_sent_before_serving() {
    let controller = Controller::new(
        RecordingControl::never_up(),
        RecordingGateway::new(),
        ScalingConfig::default(),
    );
    let state = AppState {
        controller,
        main_backend: "main".into(),
    };

    let shutdown = Shutdown::new();
    let stop = shutdown.signalled();
    shutdown.trigger();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let served = EventServer::new(&ListenerConfig::default(), state).run(listener, stop);
    tokio::time::timeout(Duration::from_secs(2), served)
        .await
        .expect("server should stop on the early signal")
        .unwrap();
}
