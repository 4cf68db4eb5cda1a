//! HTTP adapter for the routing gateway's admin API.
//!
//! # Endpoints
//! - `GET  {base}/servers/{name}/players` → JSON array of player UUIDs
//! - `POST {base}/players/{uuid}/connect/{name}` → 2xx when the request is queued
//!
//! A 404 from either endpoint means the named backend is not registered.

use std::collections::HashSet;
use std::time::Duration;

use futures_util::future::join_all;
use reqwest::{Client, StatusCode};

use crate::config::GatewayConfig;
use crate::gateway::{GatewayError, MigrationReport, RoutingGateway, UserId};

/// Gateway client bound to one holding and one main backend.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    holding: String,
    main: String,
}

impl HttpGateway {
    /// Create a new gateway client from configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            holding: config.holding_backend.clone(),
            main: config.main_backend.clone(),
        })
    }

    async fn connect_one(&self, user: UserId) -> Result<(), GatewayError> {
        let url = format!("{}/players/{}/connect/{}", self.base_url, user, self.main);
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(GatewayError::UnknownBackend(self.main.clone())),
            s => Err(GatewayError::Rejected(s.as_u16())),
        }
    }
}

impl RoutingGateway for HttpGateway {
    async fn held_users(&self) -> Result<HashSet<UserId>, GatewayError> {
        let url = format!("{}/servers/{}/players", self.base_url, self.holding);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(GatewayError::UnknownBackend(self.holding.clone()));
            }
            s => return Err(GatewayError::Rejected(s.as_u16())),
        }

        let users: Vec<UserId> = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(users.into_iter().collect())
    }

    async fn migrate_to_main(&self, users: HashSet<UserId>) -> Result<MigrationReport, GatewayError> {
        let attempts = users.into_iter().map(move |user| async move {
            let result = self.connect_one(user).await;
            if let Err(ref e) = result {
                tracing::warn!(%user, error = %e, "Failed to move player to main backend");
            }
            result
        });

        let mut report = MigrationReport::default();
        for result in join_all(attempts).await {
            match result {
                Ok(()) => report.moved += 1,
                Err(GatewayError::UnknownBackend(name)) => {
                    report.failed += 1;
                    report.missing_backend = Some(name);
                }
                Err(_) => report.failed += 1,
            }
        }

        Ok(report)
    }
}
