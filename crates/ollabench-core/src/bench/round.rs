//! Fixed-concurrency rounds

use super::{ProbeExecutor, ProbeMetrics, ProbeResult};
use crate::error::{BenchError, Result};
use crate::observer::BenchObserver;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Aggregate of one round at a fixed concurrency level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub concurrent_requests: usize,
    pub total_requests: usize,
    pub successful_requests: usize,
    /// Successes over all requests, failures included in the denominator
    pub success_rate: f64,
    pub total_tokens: u64,
    pub average_generation_time: f64,
    pub average_total_time: f64,
    /// Mean of each probe's own tokens/second
    pub average_tokens_per_second: f64,
    /// Seconds from first launch to last completion
    pub actual_total_time: f64,
    /// `total_tokens` over `actual_total_time`
    pub system_throughput: f64,
}

impl RoundSummary {
    /// Aggregate probe results. Returns `None` when nothing succeeded.
    pub fn from_results(
        concurrency: usize,
        results: &[ProbeResult],
        wall_clock: Duration,
    ) -> Option<Self> {
        let successful: Vec<&ProbeMetrics> = results.iter().filter_map(ProbeResult::metrics).collect();
        if successful.is_empty() {
            return None;
        }

        let count = successful.len() as f64;
        let total_tokens: u64 = successful.iter().map(|m| m.eval_count).sum();
        let average_generation_time =
            successful.iter().map(|m| m.eval_duration_seconds).sum::<f64>() / count;
        let average_total_time =
            successful.iter().map(|m| m.total_duration_seconds).sum::<f64>() / count;
        let average_tokens_per_second =
            successful.iter().map(|m| m.tokens_per_second).sum::<f64>() / count;

        let actual_total_time = wall_clock.as_secs_f64();
        let system_throughput = if actual_total_time > 0.0 {
            total_tokens as f64 / actual_total_time
        } else {
            0.0
        };

        Some(Self {
            concurrent_requests: concurrency,
            total_requests: results.len(),
            successful_requests: successful.len(),
            success_rate: successful.len() as f64 / results.len() as f64,
            total_tokens,
            average_generation_time,
            average_total_time,
            average_tokens_per_second,
            actual_total_time,
            system_throughput,
        })
    }
}

/// Runs a batch of probes with a bounded number in flight
pub struct RoundRunner {
    executor: Arc<ProbeExecutor>,
    cooldown: Duration,
}

impl RoundRunner {
    /// Runner using the executor's configured per-probe cooldown
    pub fn new(executor: Arc<ProbeExecutor>) -> Self {
        let cooldown = executor.config().cooldown();
        Self { executor, cooldown }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn executor(&self) -> &Arc<ProbeExecutor> {
        &self.executor
    }

    /// Reject a zero concurrency or request count
    pub fn validate(concurrency: usize, total: usize) -> Result<()> {
        if concurrency == 0 {
            return Err(BenchError::InvalidInput(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if total == 0 {
            return Err(BenchError::InvalidInput(
                "request count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Run `total` probes with at most `concurrency` in flight.
    ///
    /// Every probe is awaited before aggregating. Each probe keeps its slot
    /// through the cooldown that follows it.
    pub async fn run(
        &self,
        concurrency: usize,
        total: usize,
        observer: &dyn BenchObserver,
    ) -> Result<Option<RoundSummary>> {
        Self::validate(concurrency, total)?;

        observer.on_round_start(concurrency, total);

        let executor = &self.executor;
        let cooldown = self.cooldown;
        let start = Instant::now();

        let results: Vec<ProbeResult> = stream::iter(0..total)
            .map(move |_| async move {
                let result = executor.run().await;
                observer.on_probe(&result);
                tokio::time::sleep(cooldown).await;
                result
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let summary = RoundSummary::from_results(concurrency, &results, start.elapsed());
        observer.on_round_complete(concurrency, summary.as_ref());

        Ok(summary)
    }
}
