//! Single-probe executor

use super::PromptCorpus;
use crate::client::{GenerateOptions, GenerateRequest, GenerateResponse, InferenceBackend, KeepAlive};
use crate::config::ProbeConfig;
use crate::error::BenchError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const NANOS_PER_SEC: f64 = 1e9;

/// Why a probe failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection refused, timeout, broken stream
    Transport,
    /// Server answered with a non-success status
    Status,
    /// Response body could not be decoded
    Parse,
    Other,
}

impl FailureKind {
    pub fn classify(err: &BenchError) -> Self {
        match err {
            BenchError::Http(e) if e.is_decode() => FailureKind::Parse,
            BenchError::Http(_) => FailureKind::Transport,
            BenchError::Status { .. } => FailureKind::Status,
            BenchError::Parse(_) | BenchError::Serialization(_) => FailureKind::Parse,
            _ => FailureKind::Other,
        }
    }
}

/// Metrics reported by the server for a successful probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeMetrics {
    /// Generated tokens
    pub eval_count: u64,
    pub eval_duration_seconds: f64,
    pub total_duration_seconds: f64,
    /// `eval_count` over the server-reported generation time
    pub tokens_per_second: f64,
}

impl ProbeMetrics {
    pub fn from_response(response: &GenerateResponse) -> Self {
        let tokens_per_second = if response.eval_duration > 0 {
            response.eval_count as f64 / response.eval_duration as f64 * NANOS_PER_SEC
        } else {
            0.0
        };

        Self {
            eval_count: response.eval_count,
            eval_duration_seconds: response.eval_duration as f64 / NANOS_PER_SEC,
            total_duration_seconds: response.total_duration as f64 / NANOS_PER_SEC,
            tokens_per_second,
        }
    }
}

/// Outcome of one probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeResult {
    Success(ProbeMetrics),
    Failure { kind: FailureKind, error: String },
}

impl ProbeResult {
    pub fn failure(err: &BenchError) -> Self {
        ProbeResult::Failure {
            kind: FailureKind::classify(err),
            error: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeResult::Success(_))
    }

    pub fn metrics(&self) -> Option<&ProbeMetrics> {
        match self {
            ProbeResult::Success(metrics) => Some(metrics),
            ProbeResult::Failure { .. } => None,
        }
    }
}

/// Issues one generate request per call
pub struct ProbeExecutor {
    backend: Arc<dyn InferenceBackend>,
    model: String,
    prompts: PromptCorpus,
    config: ProbeConfig,
}

impl ProbeExecutor {
    pub fn new(backend: Arc<dyn InferenceBackend>, model: impl Into<String>, config: ProbeConfig) -> Self {
        Self {
            backend,
            model: model.into(),
            prompts: PromptCorpus::default(),
            config,
        }
    }

    /// Replace the prompt corpus
    pub fn with_prompts(mut self, prompts: PromptCorpus) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    fn build_request(&self) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt: self.prompts.choose().to_string(),
            stream: false,
            keep_alive: KeepAlive::Duration(self.config.keep_alive.clone()),
            options: Some(GenerateOptions {
                temperature: self.config.temperature,
                num_predict: self.config.num_predict,
            }),
        }
    }

    /// Run one probe. Never fails: errors become [`ProbeResult::Failure`].
    pub async fn run(&self) -> ProbeResult {
        let request = self.build_request();

        match self.backend.generate(&request).await {
            Ok(response) => ProbeResult::Success(ProbeMetrics::from_response(&response)),
            Err(e) => {
                tracing::debug!("Probe failed: {}", e);
                ProbeResult::failure(&e)
            }
        }
    }
}
