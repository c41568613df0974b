//! Model availability and cleanup
//!
//! [`ModelLifecycle::run_scoped`] makes sure the model is installed before the
//! work starts and always unloads it afterwards, whatever the outcome.

use crate::client::{InferenceBackend, PullOutcome, PullStatus};
use crate::error::{BenchError, Result};
use crate::observer::BenchObserver;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Whether the model can be probed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModelAvailability {
    /// Already installed
    Present,
    /// Installed by a successful pull
    Pulled,
    /// Missing and the pull did not report success
    Unavailable { reason: String },
}

impl ModelAvailability {
    pub fn is_ready(&self) -> bool {
        !matches!(self, ModelAvailability::Unavailable { .. })
    }
}

/// Install/check/unload one model on the server
pub struct ModelLifecycle {
    backend: Arc<dyn InferenceBackend>,
    model: String,
}

impl ModelLifecycle {
    pub fn new(backend: Arc<dyn InferenceBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Exact name match against the installed models
    pub async fn check_model_exists(&self) -> Result<bool> {
        let models = self.backend.list_models().await?;
        Ok(models.iter().any(|m| m.name == self.model))
    }

    pub async fn pull_model(&self, observer: &dyn BenchObserver) -> Result<PullOutcome> {
        observer.on_info(&format!("Pulling model {}", self.model));
        let on_status = |status: &PullStatus| observer.on_pull_status(status);
        self.backend.pull_model(&self.model, &on_status).await
    }

    /// Check for the model and pull it when missing
    pub async fn ensure_available(&self, observer: &dyn BenchObserver) -> ModelAvailability {
        match self.check_model_exists().await {
            Ok(true) => {
                observer.on_info(&format!("Model {} is installed", self.model));
                return ModelAvailability::Present;
            }
            Ok(false) => {
                observer.on_info(&format!("Model {} not installed, pulling", self.model));
            }
            Err(e) => {
                observer.on_warning(&format!("Could not list models: {}", e));
            }
        }

        match self.pull_model(observer).await {
            Ok(outcome) if outcome.success => {
                observer.on_info(&format!("Model {} pulled", self.model));
                ModelAvailability::Pulled
            }
            Ok(outcome) => {
                let reason = outcome
                    .error
                    .or_else(|| {
                        outcome
                            .last_status
                            .map(|s| format!("pull ended without success (last status: {})", s))
                    })
                    .unwrap_or_else(|| "pull ended without success".to_string());
                observer.on_warning(&format!("Pulling {} failed: {}", self.model, reason));
                ModelAvailability::Unavailable { reason }
            }
            Err(e) => {
                observer.on_warning(&format!("Pulling {} failed: {}", self.model, e));
                ModelAvailability::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Evict the model from server memory
    pub async fn unload(&self) -> Result<()> {
        self.backend.unload_model(&self.model).await
    }

    async fn release(&self, observer: &dyn BenchObserver) {
        match self.unload().await {
            Ok(()) => observer.on_info(&format!("Model {} unloaded", self.model)),
            Err(e) => observer.on_warning(&format!("Unloading {} failed: {}", self.model, e)),
        }
    }

    /// Ensure the model, run `work`, then unload.
    ///
    /// The unload runs on every exit path, including a missing model, an
    /// error from `work`, and a panic inside it (re-raised afterwards).
    pub async fn run_scoped<F, Fut, T>(&self, observer: &dyn BenchObserver, work: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let outcome = AssertUnwindSafe(async move {
            match self.ensure_available(observer).await {
                ModelAvailability::Unavailable { reason } => {
                    Err(BenchError::ModelUnavailable(format!("{}: {}", self.model, reason)))
                }
                _ => work().await,
            }
        })
        .catch_unwind()
        .await;

        self.release(observer).await;

        match outcome {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}
