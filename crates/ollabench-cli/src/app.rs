//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use ollabench_core::BenchConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ollabench")]
#[command(
    author,
    version,
    about = "Find the highest concurrency a local LLM inference server sustains"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides config and OLLABENCH_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Model under test (overrides config and OLLABENCH_MODEL)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run baseline and adaptive concurrency search, then write the report
    Run(RunArgs),

    /// Sequential single-request baseline
    Baseline(BaselineArgs),

    /// One round at a fixed concurrency
    Round(RoundArgs),

    /// Show host health
    Health,

    /// Manage the model on the server
    Models(ModelsArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// First concurrency level
    #[arg(long)]
    pub start: Option<usize>,

    /// Last concurrency level
    #[arg(long)]
    pub max: Option<usize>,

    /// Requests per round
    #[arg(long)]
    pub requests: Option<usize>,

    /// Minimum success rate (0-1)
    #[arg(long)]
    pub success_rate: Option<f64>,

    /// Maximum average generation time in seconds
    #[arg(long)]
    pub latency: Option<f64>,

    /// Number of baseline probes
    #[arg(long)]
    pub baseline_tests: Option<usize>,

    /// Skip the single-request baseline
    #[arg(long)]
    pub skip_baseline: bool,

    /// Directory for the JSON report
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl RunArgs {
    /// Overlay flags on the loaded configuration
    pub fn apply(&self, config: &mut BenchConfig) {
        if let Some(start) = self.start {
            config.prober.start_concurrent = start;
        }
        if let Some(max) = self.max {
            config.prober.max_concurrent = max;
        }
        if let Some(requests) = self.requests {
            config.prober.requests_per_round = requests;
        }
        if let Some(rate) = self.success_rate {
            config.prober.success_rate_threshold = rate;
        }
        if let Some(latency) = self.latency {
            config.prober.latency_threshold_secs = latency;
        }
        if let Some(tests) = self.baseline_tests {
            config.baseline.num_tests = tests;
        }
        if self.skip_baseline {
            config.baseline.enabled = false;
        }
        if let Some(ref dir) = self.output_dir {
            config.output_dir = dir.clone();
        }
    }
}

#[derive(Args)]
pub struct BaselineArgs {
    /// Number of sequential probes
    #[arg(short = 'n', long)]
    pub num_tests: Option<usize>,
}

#[derive(Args)]
pub struct RoundArgs {
    /// Requests in flight at once
    #[arg(short, long)]
    pub concurrency: usize,

    /// Total requests in the round
    #[arg(short = 'n', long)]
    pub requests: usize,
}

#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub action: ModelsAction,
}

#[derive(Subcommand)]
pub enum ModelsAction {
    /// List installed models
    #[command(alias = "ls")]
    List,
    /// Pull a model (defaults to the configured model)
    Pull { name: Option<String> },
    /// Pull the configured model when it is missing
    Ensure,
    /// Evict the configured model from server memory
    Unload,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
