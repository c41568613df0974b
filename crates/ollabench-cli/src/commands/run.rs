//! Full benchmark command

use crate::app::{OutputFormat, RunArgs};
use crate::output;
use anyhow::Result;
use ollabench_core::{BenchConfig, BenchObserver, Benchmark};

pub async fn run(
    args: RunArgs,
    mut config: BenchConfig,
    observer: &dyn BenchObserver,
    format: OutputFormat,
) -> Result<()> {
    args.apply(&mut config);

    let output_dir = config.output_dir.clone();
    let bench = Benchmark::from_config(config)?;

    observer.on_info(&format!(
        "Benchmarking {} at {}",
        bench.config().server.model,
        bench.backend().base_url()
    ));

    let report = bench.run(observer).await?;
    let path = report.write_to_dir(&output_dir)?;

    print!("{}", output::format_report(&report, format));
    eprintln!("Report written to {}", path.display());
    Ok(())
}
