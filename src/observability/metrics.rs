//! Metrics collection and exposition.
//!
//! # Metrics
//! - `holdover_control_commands_total` (counter): commands by `command`, `outcome`
//! - `holdover_poll_checks_total` (counter): readiness checks by observed `status`
//! - `holdover_migrated_users_total` (counter): users sent from holding to main
//! - `holdover_backend_phase` (gauge): 0=idle, 1=provisioning, 2=ready, 3=draining
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::autoscale::Phase;
use crate::control::BackendStatus;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_command(command: &'static str, accepted: bool) {
    let outcome = if accepted { "accepted" } else { "failed" };
    counter!("holdover_control_commands_total", "command" => command, "outcome" => outcome)
        .increment(1);
}

pub fn record_poll_check(status: BackendStatus) {
    counter!("holdover_poll_checks_total", "status" => status.as_str()).increment(1);
}

pub fn record_migrated(users: usize) {
    counter!("holdover_migrated_users_total").increment(users as u64);
}

pub fn record_phase(phase: Phase) {
    gauge!("holdover_backend_phase").set(phase.gauge_value());
}
