//! holdover daemon
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!   Routing       │                     HOLDOVER                     │
//!   gateway       │                                                  │
//!   events ───────┼─▶ http::events ──▶ autoscale::Controller         │
//!                 │                      │        │        │         │
//!                 │                      ▼        ▼        ▼         │
//!                 │               ReadinessPoller  IdleShutdownTimer │
//!                 │                      │                 │         │
//!                 │                      ▼                 ▼         │      Control
//!                 │               control::HttpControlClient ────────┼────▶ endpoint
//!                 │                                                  │
//!   Gateway  ◀────┼── gateway::HttpGateway (migrate held players) ◀──┘
//!   admin API     │                                                  │
//!                 └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use holdover::autoscale::Controller;
use holdover::config::load_or_default;
use holdover::control::HttpControlClient;
use holdover::gateway::HttpGateway;
use holdover::http::{AppState, EventServer};
use holdover::lifecycle::{signals, Shutdown};
use holdover::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "holdover")]
#[command(about = "Starts and stops an on-demand backend based on player demand", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("holdover v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        control_url = %config.control.base_url,
        gateway_url = %config.gateway.base_url,
        holding = %config.gateway.holding_backend,
        main = %config.gateway.main_backend,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let control = Arc::new(HttpControlClient::new(&config.control)?);
    let gateway = Arc::new(HttpGateway::new(&config.gateway)?);
    let controller = Controller::new(control, gateway, config.scaling.clone());

    let shutdown = Shutdown::new();
    // Subscribe before the listener exists so an early signal is not dropped.
    let stop = shutdown.signalled();
    signals::spawn_signal_listener(shutdown.clone());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let state = AppState {
        controller: controller.clone(),
        main_backend: config.gateway.main_backend.as_str().into(),
    };
    EventServer::new(&config.listener, state)
        .run(listener, stop)
        .await?;

    controller.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
