//! Inference server client
//!
//! The benchmark talks to an Ollama-compatible server through the
//! [`InferenceBackend`] trait:
//! - `POST /api/generate` for probes and for unloading a model
//! - `GET /api/tags` to list installed models
//! - `POST /api/pull` to download a missing model (NDJSON status stream)

mod ollama;

pub use ollama::OllamaClient;

use crate::error::{BenchError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Operations the benchmark needs from an inference server
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Run one non-streaming generation
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;

    /// List models installed on the server
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Pull a model, reporting each status line as it arrives
    async fn pull_model(
        &self,
        model: &str,
        on_status: &(dyn for<'a> Fn(&'a PullStatus) + Send + Sync),
    ) -> Result<PullOutcome>;

    /// Evict a model from server memory
    async fn unload_model(&self, model: &str) -> Result<()>;

    /// Base URL of the server
    fn base_url(&self) -> &str;
}

/// `keep_alive` accepts either a duration string ("5m") or a number of seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeepAlive {
    Duration(String),
    Seconds(i64),
}

impl KeepAlive {
    /// Unload immediately after the request
    pub fn unload() -> Self {
        KeepAlive::Seconds(0)
    }
}

/// Generate request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub keep_alive: KeepAlive,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
}

impl GenerateRequest {
    /// Empty-prompt request that only evicts the model
    pub fn unload(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: String::new(),
            stream: false,
            keep_alive: KeepAlive::unload(),
            options: None,
        }
    }
}

/// Sampling options
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

/// Generate response body. Durations are in nanoseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateResponse {
    pub model: String,
    pub response: String,
    pub done: bool,
    pub eval_count: u64,
    pub eval_duration: u64,
    pub total_duration: u64,
    pub load_duration: u64,
    pub prompt_eval_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// Reject a 2xx body that reports an error or never finished generating
    pub fn into_complete(self) -> Result<Self> {
        if let Some(error) = self.error {
            return Err(BenchError::Parse(format!("server reported error: {}", error)));
        }
        if !self.done {
            return Err(BenchError::Parse(
                "generate response is not marked done".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Installed model entry from `/api/tags`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
}

/// One line of the pull status stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PullStatus {
    pub status: String,
    pub digest: Option<String>,
    pub total: Option<u64>,
    pub completed: Option<u64>,
    pub error: Option<String>,
}

impl PullStatus {
    /// Download progress in percent, when the line carries byte counts
    pub fn progress_percent(&self) -> Option<f64> {
        match (self.total, self.completed) {
            (Some(total), Some(completed)) if total > 0 => {
                Some(completed as f64 / total as f64 * 100.0)
            }
            _ => None,
        }
    }

    pub fn is_downloading(&self) -> bool {
        self.status.contains("downloading") || self.status.starts_with("pulling ")
    }
}

/// Result of a pull. Only a `success` status line counts as success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullOutcome {
    pub success: bool,
    pub last_status: Option<String>,
    pub error: Option<String>,
}

impl PullOutcome {
    /// Feed one raw NDJSON line. Returns true once the pull has succeeded.
    ///
    /// Blank and malformed lines are skipped.
    pub fn observe(
        &mut self,
        line: &[u8],
        on_status: &(dyn for<'a> Fn(&'a PullStatus) + Send + Sync),
    ) -> bool {
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            return self.success;
        }

        let status: PullStatus = match serde_json::from_slice(trimmed) {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!("Skipping malformed pull status line: {}", e);
                return self.success;
            }
        };

        on_status(&status);

        if let Some(ref error) = status.error {
            self.error = Some(error.clone());
        }
        if !status.status.is_empty() {
            self.last_status = Some(status.status.clone());
        }
        if status.status == "success" {
            self.success = true;
        }
        self.success
    }
}
