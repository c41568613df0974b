//! Sequential single-request baseline

use super::{ProbeExecutor, ProbeMetrics};
use crate::observer::BenchObserver;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Averages over sequential, non-overlapping probes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub total_tests: usize,
    pub successful_tests: usize,
    pub avg_tokens: f64,
    pub avg_generation_time: f64,
    pub avg_total_time: f64,
    pub avg_tokens_per_second: f64,
    pub individual_results: Vec<ProbeMetrics>,
}

impl BaselineSummary {
    /// Returns `None` when no probe succeeded
    pub fn from_metrics(total_tests: usize, results: Vec<ProbeMetrics>) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let count = results.len() as f64;
        let mean = |f: fn(&ProbeMetrics) -> f64| results.iter().map(f).sum::<f64>() / count;

        Some(Self {
            total_tests,
            successful_tests: results.len(),
            avg_tokens: mean(|m| m.eval_count as f64),
            avg_generation_time: mean(|m| m.eval_duration_seconds),
            avg_total_time: mean(|m| m.total_duration_seconds),
            avg_tokens_per_second: mean(|m| m.tokens_per_second),
            individual_results: results,
        })
    }
}

/// Run `num_tests` probes one at a time with `cooldown` between them
pub async fn run_baseline(
    executor: &ProbeExecutor,
    num_tests: usize,
    cooldown: Duration,
    observer: &dyn BenchObserver,
) -> Option<BaselineSummary> {
    let mut successes = Vec::with_capacity(num_tests);

    for index in 0..num_tests {
        let result = executor.run().await;
        observer.on_baseline_probe(index + 1, num_tests, &result);

        if let Some(metrics) = result.metrics() {
            successes.push(metrics.clone());
        }

        if index + 1 < num_tests {
            tokio::time::sleep(cooldown).await;
        }
    }

    BaselineSummary::from_metrics(num_tests, successes)
}
