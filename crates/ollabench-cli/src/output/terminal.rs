//! Terminal output formatter

use ollabench_core::{
    BaselineSummary, BenchmarkReport, HealthReport, ModelAvailability, ModelInfo, ProbeResult,
    RoundSummary, StopReason,
};
use std::fmt::Write;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn describe_probe(result: &ProbeResult) -> String {
    match result {
        ProbeResult::Success(m) => format!(
            "{} tokens in {:.2}s ({:.2} tokens/s, {:.2}s total)",
            m.eval_count, m.eval_duration_seconds, m.tokens_per_second, m.total_duration_seconds
        ),
        ProbeResult::Failure { error, .. } => format!("failed: {}", error),
    }
}

pub fn describe_stop(reason: &StopReason) -> String {
    match reason {
        StopReason::Unhealthy {
            concurrency,
            violations,
        } => format!(
            "host resources exhausted before concurrency {} ({})",
            concurrency,
            violations.join("; ")
        ),
        StopReason::ConsecutiveFailures {
            concurrency,
            failures,
        } => format!(
            "{} consecutive rounds without a successful request (last at concurrency {})",
            failures, concurrency
        ),
        StopReason::ThresholdBreached {
            concurrency,
            success_rate_low,
            latency_high,
        } => {
            let mut causes = Vec::new();
            if *success_rate_low {
                causes.push("success rate below threshold");
            }
            if *latency_high {
                causes.push("latency above threshold");
            }
            format!("bottleneck at concurrency {}: {}", concurrency, causes.join(", "))
        }
        StopReason::Completed { max_concurrent } => {
            format!("all levels up to {} passed", max_concurrent)
        }
    }
}

/// One-line round result for progress output
pub fn round_line(summary: &RoundSummary) -> String {
    format!(
        "Concurrency {}: {}/{} ok ({:.0}%), avg {:.2}s, {:.2} tokens/s system",
        summary.concurrent_requests,
        summary.successful_requests,
        summary.total_requests,
        summary.success_rate * 100.0,
        summary.average_generation_time,
        summary.system_throughput
    )
}

pub fn format_round(summary: &RoundSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Concurrency:       {}", summary.concurrent_requests);
    let _ = writeln!(
        out,
        "Success:           {}/{}",
        summary.successful_requests, summary.total_requests
    );
    let _ = writeln!(out, "Total tokens:      {}", summary.total_tokens);
    let _ = writeln!(out, "Avg generation:    {:.2}s", summary.average_generation_time);
    let _ = writeln!(out, "Avg total:         {:.2}s", summary.average_total_time);
    let _ = writeln!(
        out,
        "Avg tokens/s:      {:.2}",
        summary.average_tokens_per_second
    );
    let _ = writeln!(out, "Wall clock:        {:.2}s", summary.actual_total_time);
    let _ = writeln!(
        out,
        "System throughput: {:.2} tokens/s",
        summary.system_throughput
    );
    out
}

pub fn format_baseline(summary: &BaselineSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Successful:        {}/{}",
        summary.successful_tests, summary.total_tests
    );
    let _ = writeln!(out, "Avg tokens:        {:.2}", summary.avg_tokens);
    let _ = writeln!(out, "Avg generation:    {:.2}s", summary.avg_generation_time);
    let _ = writeln!(out, "Avg total:         {:.2}s", summary.avg_total_time);
    let _ = writeln!(out, "Avg tokens/s:      {:.2}", summary.avg_tokens_per_second);
    out
}

pub fn format_health(report: &HealthReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Status:  {}",
        if report.is_healthy() { "healthy" } else { "unhealthy" }
    );

    if let Some(ref snapshot) = report.snapshot {
        let _ = writeln!(out, "CPU:     {:.1}%", snapshot.cpu_percent);
        let _ = writeln!(out, "Memory:  {:.1}%", snapshot.memory_percent);
        for gpu in &snapshot.gpus {
            let _ = write!(
                out,
                "GPU {}:   {:.1}% memory ({:.0}/{:.0} MB)",
                gpu.id, gpu.memory_percent, gpu.memory_used_mb, gpu.memory_total_mb
            );
            if let Some(util) = gpu.utilization_percent {
                let _ = write!(out, ", {:.0}% utilization", util);
            }
            out.push('\n');
        }
    }

    for warning in &report.assessment.warnings {
        let _ = writeln!(out, "Warning: {}", warning);
    }
    for violation in &report.assessment.violations {
        let _ = writeln!(out, "Limit:   {}", violation);
    }
    out
}

pub fn format_models(models: &[ModelInfo]) -> String {
    if models.is_empty() {
        return "No models installed\n".to_string();
    }

    let mut out = String::new();
    for model in models {
        let _ = writeln!(
            out,
            "{:<40} {:>8.2} GB",
            model.name,
            model.size as f64 / BYTES_PER_GB
        );
    }
    out
}

pub fn format_availability(model: &str, availability: &ModelAvailability) -> String {
    match availability {
        ModelAvailability::Present => format!("Model {} is installed\n", model),
        ModelAvailability::Pulled => format!("Model {} pulled\n", model),
        ModelAvailability::Unavailable { reason } => {
            format!("Model {} unavailable: {}\n", model, reason)
        }
    }
}

pub fn format_report(report: &BenchmarkReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model:   {}", report.test_info.model);
    let _ = writeln!(out, "Server:  {}", report.test_info.server);

    if let Some(ref baseline) = report.single_request_performance {
        out.push_str("\n=== Single request ===\n");
        out.push_str(&format_baseline(baseline));
    }

    let search = &report.concurrency_test;
    out.push_str("\n=== Concurrency ===\n");
    for round in &search.all_results {
        let _ = writeln!(out, "{}", round_line(round));
    }

    out.push_str("\n=== Summary ===\n");
    if search.found_safe_level() {
        let _ = writeln!(out, "Optimal concurrency: {}", search.optimal_concurrent);
        let _ = writeln!(
            out,
            "Max throughput:      {:.2} tokens/s",
            search.max_throughput
        );
    } else {
        out.push_str("No concurrency level met the thresholds\n");
    }
    let _ = writeln!(out, "Stopped:             {}", describe_stop(&search.stop_reason));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_threshold_breach() {
        let reason = StopReason::ThresholdBreached {
            concurrency: 4,
            success_rate_low: true,
            latency_high: true,
        };
        assert_eq!(
            describe_stop(&reason),
            "bottleneck at concurrency 4: success rate below threshold, latency above threshold"
        );
    }

    #[test]
    fn test_round_line() {
        let summary = RoundSummary {
            concurrent_requests: 3,
            total_requests: 5,
            successful_requests: 4,
            success_rate: 0.8,
            total_tokens: 1200,
            average_generation_time: 4.5,
            average_total_time: 5.0,
            average_tokens_per_second: 66.7,
            actual_total_time: 8.0,
            system_throughput: 150.0,
        };
        assert_eq!(
            round_line(&summary),
            "Concurrency 3: 4/5 ok (80%), avg 4.50s, 150.00 tokens/s system"
        );
    }

    #[test]
    fn test_empty_model_list() {
        assert_eq!(format_models(&[]), "No models installed\n");
    }
}
