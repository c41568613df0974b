//! Fixed-concurrency round command

use crate::app::{OutputFormat, RoundArgs};
use crate::output;
use anyhow::{bail, Result};
use ollabench_core::{BenchConfig, BenchObserver, Benchmark, RoundRunner};

pub async fn run(
    args: RoundArgs,
    config: BenchConfig,
    observer: &dyn BenchObserver,
    format: OutputFormat,
) -> Result<()> {
    RoundRunner::validate(args.concurrency, args.requests)?;

    let bench = Benchmark::from_config(config)?;
    let runner = bench.round_runner();

    let summary = bench
        .lifecycle()
        .run_scoped(observer, || runner.run(args.concurrency, args.requests, observer))
        .await?;

    match summary {
        Some(summary) => {
            print!("{}", output::format_round(&summary, format));
            Ok(())
        }
        None => bail!(
            "no request succeeded at concurrency {}",
            args.concurrency
        ),
    }
}
