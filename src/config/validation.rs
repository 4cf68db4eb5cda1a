//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges, URLs and
//! addresses. All problems are reported, not just the first.

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::HoldoverConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "scaling.poll_interval_secs").
    pub field: &'static str,
    /// Human readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &HoldoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_http_url(&mut errors, "control.base_url", &config.control.base_url);
    check_http_url(&mut errors, "gateway.base_url", &config.gateway.base_url);

    check_positive(&mut errors, "control.timeout_secs", config.control.timeout_secs);
    check_positive(&mut errors, "gateway.timeout_secs", config.gateway.timeout_secs);
    check_positive(&mut errors, "scaling.poll_interval_secs", config.scaling.poll_interval_secs);
    check_positive(&mut errors, "scaling.idle_grace_secs", config.scaling.idle_grace_secs);
    check_positive(
        &mut errors,
        "listener.request_timeout_secs",
        config.listener.request_timeout_secs,
    );

    let holding = config.gateway.holding_backend.trim();
    let main = config.gateway.main_backend.trim();
    if holding.is_empty() {
        errors.push(ValidationError::new("gateway.holding_backend", "must not be empty"));
    }
    if main.is_empty() {
        errors.push(ValidationError::new("gateway.main_backend", "must not be empty"));
    }
    if !holding.is_empty() && holding == main {
        errors.push(ValidationError::new(
            "gateway.main_backend",
            format!("must differ from the holding backend ({holding})"),
        ));
    }

    check_socket_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_socket_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{value}': {e}"))),
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, field: &'static str, value: u64) {
    if value == 0 {
        errors.push(ValidationError::new(field, "must be greater than zero"));
    }
}

fn check_socket_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            field,
            format!("invalid socket address '{value}'"),
        ));
    }
}
