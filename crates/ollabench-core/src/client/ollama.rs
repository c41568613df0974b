//! reqwest-based client for the Ollama HTTP API

use super::{
    GenerateRequest, GenerateResponse, InferenceBackend, ModelInfo, PullOutcome, PullStatus,
};
use crate::config::ServerConfig;
use crate::error::{BenchError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama-compatible HTTP client
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create new client from configuration
    pub fn new(config: &ServerConfig) -> Result<Self> {
        // No client-wide timeout: pulls can legitimately run for minutes.
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(BenchError::Http)?;

        Ok(Self {
            http_client,
            base_url: config.base_url().to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(BenchError::Status { status, body })
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let response = self
            .http_client
            .post(self.url("/api/generate"))
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let body = response.text().await?;

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| BenchError::Parse(format!("invalid generate response: {}", e)))?;
        parsed.into_complete()
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        #[derive(Deserialize)]
        struct TagsResponse {
            #[serde(default)]
            models: Vec<ModelInfo>,
        }

        let response = self
            .http_client
            .get(self.url("/api/tags"))
            .timeout(self.timeout)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let body = response.text().await?;

        let tags: TagsResponse = serde_json::from_str(&body)
            .map_err(|e| BenchError::Parse(format!("invalid tags response: {}", e)))?;

        tracing::debug!(
            "Installed models: {:?}",
            tags.models.iter().map(|m| m.name.as_str()).collect::<Vec<_>>()
        );

        Ok(tags.models)
    }

    async fn pull_model(
        &self,
        model: &str,
        on_status: &(dyn for<'a> Fn(&'a PullStatus) + Send + Sync),
    ) -> Result<PullOutcome> {
        #[derive(Serialize)]
        struct PullRequest<'a> {
            model: &'a str,
            stream: bool,
        }

        let response = self
            .http_client
            .post(self.url("/api/pull"))
            .json(&PullRequest {
                model,
                stream: true,
            })
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        let mut outcome = PullOutcome::default();
        let mut buffer: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                if outcome.observe(&line, on_status) {
                    return Ok(outcome);
                }
            }
        }

        // Final line without a trailing newline
        outcome.observe(&buffer, on_status);

        Ok(outcome)
    }

    async fn unload_model(&self, model: &str) -> Result<()> {
        let response = self
            .http_client
            .post(self.url("/api/generate"))
            .timeout(self.timeout)
            .json(&GenerateRequest::unload(model))
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
