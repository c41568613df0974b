//! Host health command

use crate::app::OutputFormat;
use crate::output;
use anyhow::Result;
use ollabench_core::{BenchConfig, BenchError, BenchObserver, HealthMonitor};

pub async fn run(
    config: BenchConfig,
    observer: &dyn BenchObserver,
    format: OutputFormat,
) -> Result<()> {
    let monitor = HealthMonitor::system(config.health);
    let report = monitor.check(observer).await;

    print!("{}", output::format_health(&report, format));

    if !report.is_healthy() {
        return Err(BenchError::Unhealthy(report.assessment.violations.join("; ")).into());
    }
    Ok(())
}
