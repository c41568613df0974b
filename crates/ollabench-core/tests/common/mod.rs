//! Shared test doubles for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use ollabench_core::{
    BenchError, BenchObserver, BestUpdate, GenerateRequest, GenerateResponse, HealthReport,
    HealthSnapshot, HealthSource, InferenceBackend, ModelInfo, ProbeResult, PullOutcome,
    PullStatus, Result, RoundSummary, StopReason,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What the next generate call returns
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Ok { eval_count: u64, eval_secs: f64 },
    Fail,
}

impl Step {
    pub fn ok(eval_count: u64, eval_secs: f64) -> Self {
        Step::Ok {
            eval_count,
            eval_secs,
        }
    }
}

/// Backend that plays back a script of generate outcomes
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    delay: Duration,
    models: Vec<String>,
    pull_lines: Vec<PullStatus>,
    fail_unload: bool,
    generate_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    unload_calls: AtomicUsize,
    pull_calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedBackend {
    pub fn new(fallback: Step) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            delay: Duration::ZERO,
            models: vec!["test-model".to_string()],
            pull_lines: Vec::new(),
            fail_unload: false,
            generate_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            unload_calls: AtomicUsize::new(0),
            pull_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Steps consumed in call order before falling back
    pub fn with_script(self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.script.lock().unwrap().extend(steps);
        self
    }

    /// Simulated server time per generate call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_pull_lines(mut self, lines: Vec<PullStatus>) -> Self {
        self.pull_lines = lines;
        self
    }

    pub fn with_failing_unload(mut self) -> Self {
        self.fail_unload = true;
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn unload_calls(&self) -> usize {
        self.unload_calls.load(Ordering::SeqCst)
    }

    pub fn pull_calls(&self) -> usize {
        self.pull_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match step {
            Step::Ok {
                eval_count,
                eval_secs,
            } => Ok(GenerateResponse {
                model: request.model.clone(),
                response: "ok".to_string(),
                done: true,
                eval_count,
                eval_duration: (eval_secs * 1e9) as u64,
                total_duration: ((eval_secs + 0.25) * 1e9) as u64,
                ..Default::default()
            }),
            Step::Fail => Err(BenchError::Status {
                status: 503,
                body: "server busy".to_string(),
            }),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(self
            .models
            .iter()
            .map(|name| ModelInfo {
                name: name.clone(),
                size: 0,
                digest: None,
                modified_at: None,
            })
            .collect())
    }

    async fn pull_model(
        &self,
        _model: &str,
        on_status: &(dyn for<'a> Fn(&'a PullStatus) + Send + Sync),
    ) -> Result<PullOutcome> {
        self.pull_calls.fetch_add(1, Ordering::SeqCst);
        let mut outcome = PullOutcome::default();
        for line in &self.pull_lines {
            let raw = serde_json::to_vec(line).unwrap();
            if outcome.observe(&raw, on_status) {
                break;
            }
        }
        Ok(outcome)
    }

    async fn unload_model(&self, _model: &str) -> Result<()> {
        self.unload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_unload {
            return Err(BenchError::Status {
                status: 404,
                body: "model not found".to_string(),
            });
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        "http://scripted"
    }
}

/// Health source returning queued snapshots, then a fallback
pub struct ScriptedHealth {
    queue: Mutex<VecDeque<HealthSnapshot>>,
    fallback: HealthSnapshot,
    calls: AtomicUsize,
}

impl ScriptedHealth {
    pub fn steady(cpu: f64, memory: f64) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: HealthSnapshot::new(cpu, memory, Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn healthy() -> Self {
        Self::steady(20.0, 30.0)
    }

    pub fn then(self, snapshots: impl IntoIterator<Item = HealthSnapshot>) -> Self {
        self.queue.lock().unwrap().extend(snapshots);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthSource for ScriptedHealth {
    async fn sample(&self) -> Result<HealthSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Records events as short strings
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl BenchObserver for RecordingObserver {
    fn on_info(&self, message: &str) {
        self.push(format!("info: {}", message));
    }

    fn on_warning(&self, message: &str) {
        self.push(format!("warn: {}", message));
    }

    fn on_health(&self, report: &HealthReport) {
        self.push(format!("health: {}", report.is_healthy()));
    }

    fn on_pull_status(&self, status: &PullStatus) {
        self.push(format!("pull: {}", status.status));
    }

    fn on_baseline_probe(&self, index: usize, total: usize, result: &ProbeResult) {
        self.push(format!("baseline: {}/{} {}", index, total, result.is_success()));
    }

    fn on_round_start(&self, concurrency: usize, requests: usize) {
        self.push(format!("round_start: {} {}", concurrency, requests));
    }

    fn on_probe(&self, result: &ProbeResult) {
        self.push(format!("probe: {}", result.is_success()));
    }

    fn on_round_complete(&self, concurrency: usize, summary: Option<&RoundSummary>) {
        self.push(format!("round_done: {} {}", concurrency, summary.is_some()));
    }

    fn on_best_update(&self, update: &BestUpdate) {
        self.push(format!("best: {}", update.concurrency));
    }

    fn on_stop(&self, reason: &StopReason) {
        self.push(format!("stop: {:?}", reason));
    }
}
