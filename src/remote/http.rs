// src/remote/http.rs

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::errors::{Result, SolverError};
use crate::models::{ResultPayload, SubmissionRequest};
use crate::remote::SolveBoundary;

/// Talks to the solve endpoint over HTTP with a JSON body.
pub struct HttpSolveClient {
    client: Client,
    endpoint: String,
}

impl HttpSolveClient {
    /// Creates a client with the endpoint and timeout from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::new(client, config.endpoint.clone()))
    }

    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, endpoint))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SolveBoundary for HttpSolveClient {
    async fn solve(&self, request: &SubmissionRequest) -> Result<ResultPayload> {
        log::info!(
            "📡 Calling solve endpoint: {} for '{}' ({}, {})",
            self.endpoint,
            request.title(),
            request.language(),
            request.difficulty()
        );

        let start = Instant::now();

        let resp = self.client.post(&self.endpoint).json(request).send().await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Solve endpoint status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(SolverError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let body = resp.bytes().await?;
        let payload: ResultPayload = serde_json::from_slice(&body)?;

        log::debug!(
            "Solve payload: success={} response_len={}",
            payload.success,
            payload.response.as_ref().map_or(0, |r| r.len())
        );

        Ok(payload)
    }
}
