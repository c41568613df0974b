//! JSON output formatter

use ollabench_core::{ModelAvailability, ModelInfo};
use serde::Serialize;

pub fn format_value<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

pub fn format_models(models: &[ModelInfo]) -> String {
    let output: Vec<serde_json::Value> = models
        .iter()
        .map(|m| {
            serde_json::json!({
                "name": m.name,
                "size": m.size,
                "digest": m.digest,
                "modified_at": m.modified_at,
            })
        })
        .collect();

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "[]".to_string()) + "\n"
}

pub fn format_availability(model: &str, availability: &ModelAvailability) -> String {
    let mut value = serde_json::to_value(availability).unwrap_or(serde_json::Value::Null);
    if let Some(map) = value.as_object_mut() {
        map.insert("model".to_string(), serde_json::Value::from(model));
    }
    format_value(&value)
}
