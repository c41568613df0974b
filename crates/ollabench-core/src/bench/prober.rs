//! Adaptive concurrency search
//!
//! Raises concurrency one level per round until a round misses the
//! success-rate or latency bound, the host reports resource exhaustion, two
//! rounds in a row produce nothing, or `max_concurrent` has been tested. The
//! best level is the one with the highest system throughput among rounds that
//! met both bounds.

use super::{RoundRunner, RoundSummary};
use crate::config::ProberConfig;
use crate::error::Result;
use crate::health::HealthMonitor;
use crate::observer::BenchObserver;
use serde::{Deserialize, Serialize};

/// Why the search ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// Host resources exhausted before the round at `concurrency`
    Unhealthy {
        concurrency: usize,
        violations: Vec<String>,
    },
    /// Rounds ending at `concurrency` produced no successful probe
    ConsecutiveFailures { concurrency: usize, failures: u32 },
    /// Round at `concurrency` crossed a bound
    ThresholdBreached {
        concurrency: usize,
        success_rate_low: bool,
        latency_high: bool,
    },
    /// Every level up to `max_concurrent` passed
    Completed { max_concurrent: usize },
}

/// A new best level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestUpdate {
    pub concurrency: usize,
    pub throughput: f64,
}

/// Outcome of the adaptive search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    /// 0 when no level satisfied the bounds
    pub optimal_concurrent: usize,
    pub max_throughput: f64,
    /// Rounds that produced at least one success, in order
    pub all_results: Vec<RoundSummary>,
    pub best_history: Vec<BestUpdate>,
    pub stop_reason: StopReason,
}

impl ProbeReport {
    pub fn found_safe_level(&self) -> bool {
        self.optimal_concurrent > 0
    }
}

#[derive(Debug)]
struct SearchState {
    concurrency: usize,
    best_concurrency: usize,
    best_throughput: f64,
    consecutive_failures: u32,
}

impl SearchState {
    fn new(start: usize) -> Self {
        Self {
            concurrency: start,
            best_concurrency: 0,
            best_throughput: 0.0,
            consecutive_failures: 0,
        }
    }
}

/// Drives rounds of increasing concurrency against the server
pub struct AdaptiveProber {
    runner: RoundRunner,
    health: HealthMonitor,
    config: ProberConfig,
}

impl AdaptiveProber {
    pub fn new(runner: RoundRunner, health: HealthMonitor, config: ProberConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            runner,
            health,
            config,
        })
    }

    pub fn config(&self) -> &ProberConfig {
        &self.config
    }

    pub fn runner(&self) -> &RoundRunner {
        &self.runner
    }

    /// Run the search to completion
    pub async fn run(&self, observer: &dyn BenchObserver) -> Result<ProbeReport> {
        let config = &self.config;
        let mut state = SearchState::new(config.start_concurrent);
        let mut rounds: Vec<RoundSummary> = Vec::new();
        let mut best_history = Vec::new();

        let stop_reason = loop {
            if state.concurrency > config.max_concurrent {
                break StopReason::Completed {
                    max_concurrent: config.max_concurrent,
                };
            }

            let health = self.health.check(observer).await;
            if !health.is_healthy() {
                observer.on_warning("Host resources exhausted, stopping search");
                tokio::time::sleep(config.recovery_cooldown()).await;
                break StopReason::Unhealthy {
                    concurrency: state.concurrency,
                    violations: health.assessment.violations,
                };
            }

            let summary = self
                .runner
                .run(state.concurrency, config.requests_per_round, observer)
                .await?;

            let Some(summary) = summary else {
                state.consecutive_failures += 1;
                if state.consecutive_failures >= config.max_consecutive_failures {
                    break StopReason::ConsecutiveFailures {
                        concurrency: state.concurrency,
                        failures: state.consecutive_failures,
                    };
                }
                state.concurrency += 1;
                continue;
            };
            state.consecutive_failures = 0;

            let success_rate_ok = summary.success_rate >= config.success_rate_threshold;
            let latency_ok = summary.average_generation_time <= config.latency_threshold_secs;

            // Strict improvement keeps the lower level on a throughput plateau
            if success_rate_ok && latency_ok && summary.system_throughput > state.best_throughput {
                state.best_concurrency = state.concurrency;
                state.best_throughput = summary.system_throughput;
                let update = BestUpdate {
                    concurrency: state.concurrency,
                    throughput: summary.system_throughput,
                };
                observer.on_best_update(&update);
                best_history.push(update);
            }

            rounds.push(summary);

            if !success_rate_ok || !latency_ok {
                break StopReason::ThresholdBreached {
                    concurrency: state.concurrency,
                    success_rate_low: !success_rate_ok,
                    latency_high: !latency_ok,
                };
            }

            // The final level still gets recovery time before control returns
            let health = self.health.check(observer).await;
            if !health.is_healthy() {
                observer.on_warning("Host needs more recovery time");
                tokio::time::sleep(config.recovery_cooldown()).await;
            } else if state.concurrency < config.max_concurrent {
                tokio::time::sleep(config.round_cooldown()).await;
            }

            state.concurrency += 1;
        };

        observer.on_stop(&stop_reason);

        Ok(ProbeReport {
            optimal_concurrent: state.best_concurrency,
            max_throughput: state.best_throughput,
            all_results: rounds,
            best_history,
            stop_reason,
        })
    }
}
