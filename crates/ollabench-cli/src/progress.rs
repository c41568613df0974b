//! Progress reporting on stderr

use crate::output::terminal;
use ollabench_core::{
    BenchObserver, BestUpdate, HealthReport, ProbeResult, PullStatus, RoundSummary, StopReason,
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Prints benchmark progress for interactive use
#[derive(Default)]
pub struct ProgressReporter {
    total: AtomicUsize,
    processed: AtomicUsize,
    failed: AtomicUsize,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_message(&self, msg: &str) {
        eprint!("\r{:<60}", msg);
        io::stderr().flush().ok();
    }

    fn finish_line(&self) {
        eprint!("\r{:<60}\r", "");
    }
}

impl BenchObserver for ProgressReporter {
    fn on_info(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn on_warning(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }

    fn on_health(&self, report: &HealthReport) {
        if !report.is_healthy() {
            eprintln!("Host unhealthy: {}", report.assessment.violations.join("; "));
        }
    }

    fn on_pull_status(&self, status: &PullStatus) {
        match status.progress_percent() {
            Some(pct) => self.set_message(&format!("{} {:.1}%", status.status, pct)),
            None => {
                self.finish_line();
                eprintln!("{}", status.status);
            }
        }
    }

    fn on_baseline_probe(&self, index: usize, total: usize, result: &ProbeResult) {
        eprintln!("Baseline {}/{}: {}", index, total, terminal::describe_probe(result));
    }

    fn on_round_start(&self, concurrency: usize, requests: usize) {
        self.total.store(requests, Ordering::SeqCst);
        self.processed.store(0, Ordering::SeqCst);
        self.failed.store(0, Ordering::SeqCst);
        self.set_message(&format!("Concurrency {}: 0/{}", concurrency, requests));
    }

    fn on_probe(&self, result: &ProbeResult) {
        let processed = self.processed.fetch_add(1, Ordering::SeqCst) + 1;
        if !result.is_success() {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
        self.set_message(&format!(
            "Requests {}/{} ({} failed)",
            processed,
            self.total.load(Ordering::SeqCst),
            self.failed.load(Ordering::SeqCst)
        ));
    }

    fn on_round_complete(&self, concurrency: usize, summary: Option<&RoundSummary>) {
        self.finish_line();
        match summary {
            Some(summary) => eprintln!("{}", terminal::round_line(summary)),
            None => eprintln!("Concurrency {}: no successful requests", concurrency),
        }
    }

    fn on_best_update(&self, update: &BestUpdate) {
        eprintln!(
            "  New best: {} concurrent at {:.2} tokens/s",
            update.concurrency, update.throughput
        );
    }

    fn on_stop(&self, reason: &StopReason) {
        eprintln!("Stopped: {}", terminal::describe_stop(reason));
    }
}
