//! HTTP client for the backend control endpoint.
//!
//! # Responsibilities
//! - POST to `/start`, `/stop` and `/status` on the configured base URL
//! - Enforce the per-call timeout
//! - Map responses onto `ControlError` / `BackendStatus`

use reqwest::{header, Client, StatusCode};

use crate::config::ControlConfig;
use crate::control::{BackendControl, BackendStatus, ControlError};

/// Stateless wrapper around the control endpoint.
#[derive(Debug, Clone)]
pub struct HttpControlClient {
    client: Client,
    base_url: String,
}

impl HttpControlClient {
    /// Create a new client from configuration.
    pub fn new(config: &ControlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout())
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str) -> Result<StatusCode, ControlError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ControlError::Timeout
                } else {
                    ControlError::Transport(e.to_string())
                }
            })?;

        Ok(response.status())
    }

    async fn command(&self, path: &str) -> Result<(), ControlError> {
        match self.post(path).await? {
            StatusCode::OK => Ok(()),
            other => Err(ControlError::Status(other.as_u16())),
        }
    }
}

impl BackendControl for HttpControlClient {
    async fn start(&self) -> Result<(), ControlError> {
        self.command("/start").await
    }

    async fn stop(&self) -> Result<(), ControlError> {
        self.command("/stop").await
    }

    async fn status(&self) -> BackendStatus {
        match self.post("/status").await {
            Ok(status) => status_from_code(status),
            Err(e) => {
                tracing::warn!(error = %e, "Status check failed");
                BackendStatus::Unreachable
            }
        }
    }
}

/// 200 means serving; anything else the endpoint answers with (202 "instance up,
/// server unreachable", 503 "instance down", ...) means not serving yet.
fn status_from_code(code: StatusCode) -> BackendStatus {
    if code == StatusCode::OK {
        BackendStatus::Up
    } else {
        BackendStatus::Down
    }
}
