//! Load probing
//!
//! - [`ProbeExecutor`]: one generate request, never fails
//! - [`RoundRunner`]: N probes at a fixed concurrency
//! - [`AdaptiveProber`]: escalating rounds until a bound is crossed
//! - [`run_baseline`]: sequential single probes for reference numbers

mod baseline;
mod probe;
mod prober;
mod prompts;
mod round;

pub use baseline::{run_baseline, BaselineSummary};
pub use probe::{FailureKind, ProbeExecutor, ProbeMetrics, ProbeResult};
pub use prober::{AdaptiveProber, BestUpdate, ProbeReport, StopReason};
pub use prompts::{PromptCorpus, DEFAULT_PROMPTS};
pub use round::{RoundRunner, RoundSummary};
