//! Ollabench CLI
//!
//! Find the highest concurrency a local LLM inference server sustains.

use anyhow::Result;
use clap::Parser;
use ollabench_core::error::exit_codes;
use ollabench_core::{BenchConfig, BenchError, BenchObserver, TracingObserver};

mod app;
mod commands;
mod output;
mod progress;

use app::{Cli, Commands};
use progress::ProgressReporter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; -v raises the default level
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<BenchError>()
            .map(BenchError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

fn load_config(cli: &Cli) -> Result<BenchConfig> {
    let mut config = match cli.config {
        Some(ref path) => BenchConfig::load_from(path)?,
        None => BenchConfig::load()?,
    };

    if let Some(ref url) = cli.url {
        config.server.url = url.clone();
    }
    if let Some(ref model) = cli.model {
        config.server.model = model.clone();
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let observer: Box<dyn BenchObserver> = if cli.verbose {
        Box::new(TracingObserver)
    } else {
        Box::new(ProgressReporter::new())
    };
    let observer = observer.as_ref();

    match cli.command {
        Commands::Run(args) => commands::run::run(args, config, observer, cli.format).await,
        Commands::Baseline(args) => {
            commands::baseline::run(args, config, observer, cli.format).await
        }
        Commands::Round(args) => commands::round::run(args, config, observer, cli.format).await,
        Commands::Health => commands::health::run(config, observer, cli.format).await,
        Commands::Models(args) => commands::models::run(args, config, observer, cli.format).await,
    }
}
