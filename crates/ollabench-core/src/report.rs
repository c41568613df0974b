//! Final JSON report

use crate::bench::{BaselineSummary, ProbeReport};
use crate::error::Result;
use crate::health::HealthSnapshot;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestInfo {
    pub timestamp: DateTime<Local>,
    pub model: String,
    pub server: String,
}

impl TestInfo {
    pub fn new(model: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            model: model.into(),
            server: server.into(),
        }
    }
}

/// Everything a benchmark run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub test_info: TestInfo,
    /// Host reading taken before any load was applied
    pub preflight_health: Option<HealthSnapshot>,
    pub single_request_performance: Option<BaselineSummary>,
    pub concurrency_test: ProbeReport,
}

impl BenchmarkReport {
    /// `benchmark_YYYYMMDD_HHMMSS.json` for the run's timestamp
    pub fn file_name(&self) -> String {
        format!(
            "benchmark_{}.json",
            self.test_info.timestamp.format("%Y%m%d_%H%M%S")
        )
    }

    /// Write pretty-printed JSON to `path`, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Write into `dir` under [`file_name`](Self::file_name); returns the path
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        self.write_to(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::StopReason;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn report() -> BenchmarkReport {
        BenchmarkReport {
            test_info: TestInfo {
                timestamp: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
                model: "deepseek-r1:1.5b".to_string(),
                server: "http://localhost:11434".to_string(),
            },
            preflight_health: None,
            single_request_performance: None,
            concurrency_test: ProbeReport {
                optimal_concurrent: 0,
                max_throughput: 0.0,
                all_results: Vec::new(),
                best_history: Vec::new(),
                stop_reason: StopReason::Unhealthy {
                    concurrency: 2,
                    violations: vec!["Memory usage 95.0% at or above 90%".to_string()],
                },
            },
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(report().file_name(), "benchmark_20240309_140507.json");
    }

    #[test]
    fn test_write_to_dir_creates_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("logs");

        let path = report().write_to_dir(&target).unwrap();
        assert!(path.exists());

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["test_info"]["model"], "deepseek-r1:1.5b");
        assert_eq!(value["concurrency_test"]["optimal_concurrent"], 0);
        assert_eq!(value["concurrency_test"]["stop_reason"]["reason"], "unhealthy");
        assert!(value["single_request_performance"].is_null());
    }
}
