//! Progress reporting hooks
//!
//! The library never configures logging itself. Callers pass a
//! [`BenchObserver`]; [`TracingObserver`] forwards events to `tracing`.

use crate::bench::{BestUpdate, ProbeResult, RoundSummary, StopReason};
use crate::client::PullStatus;
use crate::health::HealthReport;

/// Receives benchmark events. All methods default to no-ops.
pub trait BenchObserver: Send + Sync {
    fn on_info(&self, _message: &str) {}

    /// A metric crossed the soft threshold, or the search is backing off
    fn on_warning(&self, _message: &str) {}

    fn on_health(&self, _report: &HealthReport) {}

    fn on_pull_status(&self, _status: &PullStatus) {}

    fn on_baseline_probe(&self, _index: usize, _total: usize, _result: &ProbeResult) {}

    fn on_round_start(&self, _concurrency: usize, _requests: usize) {}

    fn on_probe(&self, _result: &ProbeResult) {}

    /// `summary` is `None` when no probe in the round succeeded
    fn on_round_complete(&self, _concurrency: usize, _summary: Option<&RoundSummary>) {}

    fn on_best_update(&self, _update: &BestUpdate) {}

    fn on_stop(&self, _reason: &StopReason) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BenchObserver for NoopObserver {}

/// Logs events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl BenchObserver for TracingObserver {
    fn on_info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn on_warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn on_health(&self, report: &HealthReport) {
        if report.is_healthy() {
            tracing::debug!("Host health: {}", report.summary());
        } else {
            tracing::warn!(
                "Host unhealthy: {} ({})",
                report.summary(),
                report.assessment.violations.join("; ")
            );
        }
    }

    fn on_pull_status(&self, status: &PullStatus) {
        match status.progress_percent() {
            Some(pct) if status.is_downloading() => tracing::info!(
                "Download progress: {:.1}% ({}/{} bytes)",
                pct,
                status.completed.unwrap_or(0),
                status.total.unwrap_or(0)
            ),
            _ => tracing::info!("Pull status: {}", status.status),
        }
    }

    fn on_baseline_probe(&self, index: usize, total: usize, result: &ProbeResult) {
        match result {
            ProbeResult::Success(m) => tracing::info!(
                "Baseline {}/{}: {} tokens, generation {:.2}s, total {:.2}s, {:.2} tokens/s",
                index,
                total,
                m.eval_count,
                m.eval_duration_seconds,
                m.total_duration_seconds,
                m.tokens_per_second
            ),
            ProbeResult::Failure { error, .. } => {
                tracing::warn!("Baseline {}/{} failed: {}", index, total, error)
            }
        }
    }

    fn on_round_start(&self, concurrency: usize, requests: usize) {
        tracing::info!(
            "Testing concurrency {} ({} requests)",
            concurrency,
            requests
        );
    }

    fn on_probe(&self, result: &ProbeResult) {
        if let ProbeResult::Failure { kind, error } = result {
            tracing::debug!("Probe failed ({:?}): {}", kind, error);
        }
    }

    fn on_round_complete(&self, concurrency: usize, summary: Option<&RoundSummary>) {
        match summary {
            Some(s) => tracing::info!(
                "Concurrency {}: success {}/{} ({:.0}%), avg generation {:.2}s, avg total {:.2}s, \
                 {:.2} tokens/s per request, wall clock {:.2}s, system throughput {:.2} tokens/s",
                concurrency,
                s.successful_requests,
                s.total_requests,
                s.success_rate * 100.0,
                s.average_generation_time,
                s.average_total_time,
                s.average_tokens_per_second,
                s.actual_total_time,
                s.system_throughput
            ),
            None => tracing::warn!("Concurrency {}: no request succeeded", concurrency),
        }
    }

    fn on_best_update(&self, update: &BestUpdate) {
        tracing::info!(
            "New best: concurrency {} at {:.2} tokens/s",
            update.concurrency,
            update.throughput
        );
    }

    fn on_stop(&self, reason: &StopReason) {
        match reason {
            StopReason::Unhealthy { concurrency, .. } => {
                tracing::warn!("Stopped before concurrency {}: host overloaded", concurrency)
            }
            StopReason::ConsecutiveFailures {
                concurrency,
                failures,
            } => tracing::warn!(
                "Stopped at concurrency {} after {} empty rounds",
                concurrency,
                failures
            ),
            StopReason::ThresholdBreached {
                concurrency,
                success_rate_low,
                latency_high,
            } => tracing::info!(
                "Bottleneck at concurrency {} (success rate low: {}, latency high: {})",
                concurrency,
                success_rate_low,
                latency_high
            ),
            StopReason::Completed { max_concurrent } => {
                tracing::info!("All levels up to {} passed", max_concurrent)
            }
        }
    }
}
