//! End-to-end benchmark: ensure model, pre-flight health, baseline, search

use crate::bench::{run_baseline, AdaptiveProber, ProbeExecutor, PromptCorpus, RoundRunner};
use crate::client::{InferenceBackend, OllamaClient};
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::health::HealthMonitor;
use crate::lifecycle::ModelLifecycle;
use crate::observer::BenchObserver;
use crate::report::{BenchmarkReport, TestInfo};
use std::sync::Arc;

/// Wires configuration, server client and health monitor together
pub struct Benchmark {
    config: BenchConfig,
    backend: Arc<dyn InferenceBackend>,
    health: HealthMonitor,
    prompts: PromptCorpus,
}

impl Benchmark {
    pub fn new(config: BenchConfig, backend: Arc<dyn InferenceBackend>, health: HealthMonitor) -> Self {
        Self {
            config,
            backend,
            health,
            prompts: PromptCorpus::default(),
        }
    }

    /// Ollama client plus sysinfo/nvidia-smi health monitor
    pub fn from_config(config: BenchConfig) -> Result<Self> {
        let backend = Arc::new(OllamaClient::new(&config.server)?);
        let health = HealthMonitor::system(config.health.clone());
        Ok(Self::new(config, backend, health))
    }

    pub fn with_prompts(mut self, prompts: PromptCorpus) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn InferenceBackend> {
        &self.backend
    }

    pub fn health(&self) -> &HealthMonitor {
        &self.health
    }

    pub fn executor(&self) -> Arc<ProbeExecutor> {
        Arc::new(
            ProbeExecutor::new(
                Arc::clone(&self.backend),
                self.config.server.model.clone(),
                self.config.probe.clone(),
            )
            .with_prompts(self.prompts.clone()),
        )
    }

    pub fn round_runner(&self) -> RoundRunner {
        RoundRunner::new(self.executor())
    }

    pub fn lifecycle(&self) -> ModelLifecycle {
        ModelLifecycle::new(Arc::clone(&self.backend), self.config.server.model.clone())
    }

    pub fn prober(&self) -> Result<AdaptiveProber> {
        AdaptiveProber::new(
            self.round_runner(),
            self.health.clone(),
            self.config.prober.clone(),
        )
    }

    /// Run the full benchmark inside the model scope.
    ///
    /// Fails only before load starts (unavailable model, overloaded host,
    /// invalid settings). Once the search runs, its outcome is always
    /// returned, including early stops.
    pub async fn run(&self, observer: &dyn BenchObserver) -> Result<BenchmarkReport> {
        let prober = self.prober()?;

        self.lifecycle()
            .run_scoped(observer, move || async move {
                let preflight = self.health.check(observer).await;
                if !preflight.is_healthy() {
                    return Err(BenchError::Unhealthy(
                        preflight.assessment.violations.join("; "),
                    ));
                }
                observer.on_info(&format!("Host health: {}", preflight.summary()));

                let baseline = if self.config.baseline.enabled && self.config.baseline.num_tests > 0 {
                    observer.on_info("Running single-request baseline");
                    run_baseline(
                        prober.runner().executor(),
                        self.config.baseline.num_tests,
                        self.config.baseline.cooldown(),
                        observer,
                    )
                    .await
                } else {
                    None
                };

                observer.on_info("Searching for maximum sustainable concurrency");
                let concurrency_test = prober.run(observer).await?;

                Ok(BenchmarkReport {
                    test_info: TestInfo::new(
                        self.config.server.model.clone(),
                        self.backend.base_url().to_string(),
                    ),
                    preflight_health: preflight.snapshot,
                    single_request_performance: baseline,
                    concurrency_test,
                })
            })
            .await
    }
}
