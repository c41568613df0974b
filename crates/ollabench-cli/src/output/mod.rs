//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use ollabench_core::{
    BaselineSummary, BenchmarkReport, HealthReport, ModelAvailability, ModelInfo, RoundSummary,
};

pub fn format_report(report: &BenchmarkReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_value(report),
        OutputFormat::Cli => terminal::format_report(report),
    }
}

pub fn format_baseline(summary: &BaselineSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_value(summary),
        OutputFormat::Cli => terminal::format_baseline(summary),
    }
}

pub fn format_round(summary: &RoundSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_value(summary),
        OutputFormat::Cli => terminal::format_round(summary),
    }
}

pub fn format_health(report: &HealthReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_value(report),
        OutputFormat::Cli => terminal::format_health(report),
    }
}

pub fn format_models(models: &[ModelInfo], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_models(models),
        OutputFormat::Cli => terminal::format_models(models),
    }
}

pub fn format_availability(
    model: &str,
    availability: &ModelAvailability,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => json::format_availability(model, availability),
        OutputFormat::Cli => terminal::format_availability(model, availability),
    }
}
