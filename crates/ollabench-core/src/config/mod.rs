//! Configuration management

use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Target inference server
    #[serde(default)]
    pub server: ServerConfig,

    /// Per-probe request parameters
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Adaptive concurrency search
    #[serde(default)]
    pub prober: ProberConfig,

    /// Sequential single-request baseline
    #[serde(default)]
    pub baseline: BaselineConfig,

    /// Host health thresholds
    #[serde(default)]
    pub health: HealthThresholds,

    /// Directory the JSON report is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            probe: ProbeConfig::default(),
            prober: ProberConfig::default(),
            baseline: BaselineConfig::default(),
            health: HealthThresholds::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// Inference server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server
    #[serde(default = "default_url")]
    pub url: String,

    /// Model identifier under test
    #[serde(default = "default_model")]
    pub model: String,

    /// Network timeout for a single request in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ServerConfig {
    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

fn default_url() -> String {
    std::env::var("OLLABENCH_URL").unwrap_or_else(|_| "http://localhost:11434".to_string())
}

fn default_model() -> String {
    std::env::var("OLLABENCH_MODEL").unwrap_or_else(|_| "deepseek-r1:1.5b".to_string())
}

fn default_timeout() -> u64 {
    120
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Sampling parameters sent with every probe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub temperature: f32,

    /// Upper bound on generated tokens (`num_predict`)
    pub num_predict: u32,

    /// How long the server keeps the model resident after a probe
    pub keep_alive: String,

    /// Pause after each probe while it still holds its admission slot
    pub cooldown_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            num_predict: 300,
            keep_alive: "5m".to_string(),
            cooldown_ms: 500,
        }
    }
}

impl ProbeConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Adaptive concurrency search parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProberConfig {
    pub start_concurrent: usize,
    pub max_concurrent: usize,
    pub requests_per_round: usize,

    /// Minimum fraction (0-1) of successful probes in a round
    pub success_rate_threshold: f64,

    /// Maximum average generation time in seconds
    pub latency_threshold_secs: f64,

    /// Pause between healthy rounds
    pub round_cooldown_secs: u64,

    /// Pause when the host reports unhealthy
    pub recovery_cooldown_secs: u64,

    /// Empty rounds in a row that end the search
    pub max_consecutive_failures: u32,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            start_concurrent: 1,
            max_concurrent: 20,
            requests_per_round: 5,
            success_rate_threshold: 0.8,
            latency_threshold_secs: 10.0,
            round_cooldown_secs: 5,
            recovery_cooldown_secs: 30,
            max_consecutive_failures: 2,
        }
    }
}

impl ProberConfig {
    pub fn round_cooldown(&self) -> Duration {
        Duration::from_secs(self.round_cooldown_secs)
    }

    pub fn recovery_cooldown(&self) -> Duration {
        Duration::from_secs(self.recovery_cooldown_secs)
    }

    /// Reject parameter combinations the search cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.start_concurrent == 0 {
            return Err(BenchError::InvalidInput(
                "start_concurrent must be at least 1".to_string(),
            ));
        }
        if self.start_concurrent > self.max_concurrent {
            return Err(BenchError::InvalidInput(format!(
                "start_concurrent ({}) exceeds max_concurrent ({})",
                self.start_concurrent, self.max_concurrent
            )));
        }
        if self.requests_per_round == 0 {
            return Err(BenchError::InvalidInput(
                "requests_per_round must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.success_rate_threshold) {
            return Err(BenchError::InvalidInput(format!(
                "success_rate_threshold must be within 0..=1, got {}",
                self.success_rate_threshold
            )));
        }
        if !(self.latency_threshold_secs > 0.0) {
            return Err(BenchError::InvalidInput(format!(
                "latency_threshold_secs must be positive, got {}",
                self.latency_threshold_secs
            )));
        }
        if self.max_consecutive_failures == 0 {
            return Err(BenchError::InvalidInput(
                "max_consecutive_failures must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sequential baseline parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    pub enabled: bool,
    pub num_tests: usize,
    pub cooldown_secs: u64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_tests: 3,
            cooldown_secs: 2,
        }
    }
}

impl BaselineConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Resource thresholds used to classify host health (percentages)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    /// Soft threshold above which a warning is emitted
    pub warn_percent: f64,
    pub cpu_max_percent: f64,
    pub memory_max_percent: f64,
    pub gpu_memory_max_percent: f64,

    /// Window over which CPU usage is averaged
    pub sample_interval_ms: u64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            warn_percent: 85.0,
            cpu_max_percent: 90.0,
            memory_max_percent: 90.0,
            gpu_memory_max_percent: 90.0,
            sample_interval_ms: 1000,
        }
    }
}

impl HealthThresholds {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

impl BenchConfig {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a path, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: BenchConfig = serde_yaml::from_str(&content)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(BenchConfig::default())
        }
    }

    /// Save config to a path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = BenchConfig::load_from(&dir.path().join("nope.yml")).unwrap();
        assert_eq!(config.prober.start_concurrent, 1);
        assert_eq!(config.prober.max_concurrent, 20);
        assert_eq!(config.probe.num_predict, 300);
        assert_eq!(config.output_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "server:\n  url: http://gpu-box:11434\n  model: qwen2:7b\nprober:\n  max_concurrent: 5\n  success_rate_threshold: 0.95\n",
        )
        .unwrap();

        let config = BenchConfig::load_from(&path).unwrap();
        assert_eq!(config.server.url, "http://gpu-box:11434");
        assert_eq!(config.server.model, "qwen2:7b");
        assert_eq!(config.server.timeout_secs, 120);
        assert_eq!(config.prober.max_concurrent, 5);
        assert_eq!(config.prober.success_rate_threshold, 0.95);
        assert_eq!(config.prober.requests_per_round, 5);
        assert_eq!(config.health.cpu_max_percent, 90.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let mut config = BenchConfig::default();
        config.baseline.num_tests = 7;
        config.save_to(&path).unwrap();

        let loaded = BenchConfig::load_from(&path).unwrap();
        assert_eq!(loaded.baseline.num_tests, 7);
    }

    #[test]
    fn test_base_url_trims_slash() {
        let server = ServerConfig {
            url: "http://localhost:11434/".to_string(),
            model: "m".to_string(),
            timeout_secs: 5,
        };
        assert_eq!(server.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_prober_validation() {
        assert!(ProberConfig::default().validate().is_ok());

        let zero_start = ProberConfig {
            start_concurrent: 0,
            ..Default::default()
        };
        assert!(zero_start.validate().is_err());

        let inverted = ProberConfig {
            start_concurrent: 5,
            max_concurrent: 2,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let bad_rate = ProberConfig {
            success_rate_threshold: 1.5,
            ..Default::default()
        };
        assert!(bad_rate.validate().is_err());

        let bad_latency = ProberConfig {
            latency_threshold_secs: 0.0,
            ..Default::default()
        };
        assert!(bad_latency.validate().is_err());
    }
}
