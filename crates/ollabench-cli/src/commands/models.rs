//! Model management commands

use crate::app::{ModelsAction, ModelsArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use ollabench_core::{
    BenchConfig, BenchError, BenchObserver, InferenceBackend, ModelLifecycle, OllamaClient,
};
use std::sync::Arc;

pub async fn run(
    args: ModelsArgs,
    config: BenchConfig,
    observer: &dyn BenchObserver,
    format: OutputFormat,
) -> Result<()> {
    let backend: Arc<dyn InferenceBackend> = Arc::new(OllamaClient::new(&config.server)?);
    let model = config.server.model;

    match args.action {
        ModelsAction::List => {
            let models = backend.list_models().await?;
            print!("{}", output::format_models(&models, format));
        }
        ModelsAction::Pull { name } => {
            let name = name.unwrap_or(model);
            let lifecycle = ModelLifecycle::new(backend, name.clone());
            let outcome = lifecycle.pull_model(observer).await?;
            if !outcome.success {
                let reason = outcome
                    .error
                    .unwrap_or_else(|| "pull ended without success".to_string());
                return Err(BenchError::ModelUnavailable(format!("{}: {}", name, reason)).into());
            }
            println!("Pulled {}", name);
        }
        ModelsAction::Ensure => {
            let lifecycle = ModelLifecycle::new(backend, model.clone());
            let availability = lifecycle.ensure_available(observer).await;
            print!(
                "{}",
                output::format_availability(&model, &availability, format)
            );
            if !availability.is_ready() {
                return Err(BenchError::ModelUnavailable(model).into());
            }
        }
        ModelsAction::Unload => {
            ModelLifecycle::new(backend, model.clone()).unload().await?;
            println!("Unloaded {}", model);
        }
    }
    Ok(())
}
