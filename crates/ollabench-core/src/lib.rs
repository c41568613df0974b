//! Ollabench Core Library
//!
//! Finds the highest concurrency a local LLM inference server sustains.
//!
//! # Features
//! - Single probes against the Ollama generate API with per-call metrics
//! - Fixed-concurrency rounds with a bounded in-flight window
//! - Adaptive search with success-rate and latency bounds
//! - Host health gating on CPU, memory and GPU memory
//! - Model install check, pull, and guaranteed unload

pub mod bench;
pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observer;
pub mod report;
pub mod runner;

pub use bench::{
    run_baseline, AdaptiveProber, BaselineSummary, BestUpdate, FailureKind, ProbeExecutor,
    ProbeMetrics, ProbeReport, ProbeResult, PromptCorpus, RoundRunner, RoundSummary, StopReason,
};
pub use client::{
    GenerateOptions, GenerateRequest, GenerateResponse, InferenceBackend, KeepAlive, ModelInfo,
    OllamaClient, PullOutcome, PullStatus,
};
pub use config::{
    BaselineConfig, BenchConfig, HealthThresholds, ProbeConfig, ProberConfig, ServerConfig,
};
pub use error::{BenchError, Error, Result};
pub use health::{
    GpuReading, HealthAssessment, HealthMonitor, HealthReport, HealthSnapshot, HealthSource,
    SystemHealthSource,
};
pub use lifecycle::{ModelAvailability, ModelLifecycle};
pub use observer::{BenchObserver, NoopObserver, TracingObserver};
pub use report::{BenchmarkReport, TestInfo};
pub use runner::Benchmark;

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "ollabench";
