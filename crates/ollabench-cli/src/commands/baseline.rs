//! Single-request baseline command

use crate::app::{BaselineArgs, OutputFormat};
use crate::output;
use anyhow::{bail, Result};
use ollabench_core::{run_baseline, BenchConfig, BenchError, BenchObserver, Benchmark};

pub async fn run(
    args: BaselineArgs,
    mut config: BenchConfig,
    observer: &dyn BenchObserver,
    format: OutputFormat,
) -> Result<()> {
    if let Some(n) = args.num_tests {
        config.baseline.num_tests = n;
    }
    if config.baseline.num_tests == 0 {
        return Err(
            BenchError::InvalidInput("--num-tests must be at least 1".to_string()).into(),
        );
    }

    let bench = Benchmark::from_config(config)?;
    let executor = bench.executor();
    let num_tests = bench.config().baseline.num_tests;
    let cooldown = bench.config().baseline.cooldown();

    let summary = bench
        .lifecycle()
        .run_scoped(observer, || async {
            Ok(run_baseline(&executor, num_tests, cooldown, observer).await)
        })
        .await?;

    match summary {
        Some(summary) => {
            print!("{}", output::format_baseline(&summary, format));
            Ok(())
        }
        None => bail!("no baseline request succeeded"),
    }
}
