//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for event intake and the admin API
//! - Wire up middleware (tracing, request timeout)
//! - Serve on a bound listener until shutdown is signalled

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::autoscale::Controller;
use crate::config::ListenerConfig;
use crate::control::BackendControl;
use crate::gateway::RoutingGateway;
use crate::http::events;

/// Application state injected into handlers.
pub struct AppState<C, G> {
    pub controller: Controller<C, G>,
    /// Name of the main backend; disconnects from other servers are ignored.
    pub main_backend: Arc<str>,
}

impl<C, G> Clone for AppState<C, G> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            main_backend: Arc::clone(&self.main_backend),
        }
    }
}

/// HTTP server receiving gateway events.
pub struct EventServer {
    router: Router,
}

impl EventServer {
    pub fn new<C: BackendControl, G: RoutingGateway>(
        config: &ListenerConfig,
        state: AppState<C, G>,
    ) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router<C: BackendControl, G: RoutingGateway>(
        config: &ListenerConfig,
        state: AppState<C, G>,
    ) -> Router {
        Router::new()
            .route("/events/held-arrival", post(events::held_arrival::<C, G>))
            .route("/events/main-connect", post(events::main_connect::<C, G>))
            .route("/events/main-disconnect", post(events::main_disconnect::<C, G>))
            .merge(admin::router::<C, G>())
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve until `signal` resolves. Pass a future obtained from
    /// [`crate::lifecycle::Shutdown::signalled`] before any trigger can fire.
    pub async fn run<F>(self, listener: TcpListener, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Event intake listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("Event intake stopped");
        Ok(())
    }
}
