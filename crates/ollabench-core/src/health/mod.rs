//! Host health monitoring
//!
//! A [`HealthSource`] produces raw [`HealthSnapshot`]s; [`assess`] turns a
//! snapshot into a healthy/unhealthy classification against
//! [`HealthThresholds`]. Classification is pure so identical readings always
//! classify the same way.

mod gpu;
mod system;

pub use gpu::{parse_nvidia_smi, query_nvidia_smi};
pub use system::SystemHealthSource;

use crate::config::HealthThresholds;
use crate::error::Result;
use crate::observer::BenchObserver;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Memory reading for one GPU (MiB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuReading {
    pub id: u32,
    pub memory_used_mb: f64,
    pub memory_total_mb: f64,
    pub memory_free_mb: f64,
    pub memory_percent: f64,
    /// Compute utilization, when the driver reports it
    pub utilization_percent: Option<f64>,
}

/// Point-in-time host resource reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    #[serde(default)]
    pub gpus: Vec<GpuReading>,
    pub captured_at: DateTime<Utc>,
}

impl HealthSnapshot {
    pub fn new(cpu_percent: f64, memory_percent: f64, gpus: Vec<GpuReading>) -> Self {
        Self {
            cpu_percent,
            memory_percent,
            gpus,
            captured_at: Utc::now(),
        }
    }
}

/// Classification of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub healthy: bool,
    /// Metrics above the soft threshold
    pub warnings: Vec<String>,
    /// Metrics above a hard threshold
    pub violations: Vec<String>,
}

/// Classify a snapshot.
///
/// Healthy requires CPU and memory strictly below their ceilings; any GPU
/// whose memory use exceeds its ceiling forces unhealthy.
pub fn assess(snapshot: &HealthSnapshot, thresholds: &HealthThresholds) -> HealthAssessment {
    let mut warnings = Vec::new();
    let mut violations = Vec::new();

    if snapshot.cpu_percent > thresholds.warn_percent {
        warnings.push(format!("CPU usage high: {:.1}%", snapshot.cpu_percent));
    }
    if snapshot.memory_percent > thresholds.warn_percent {
        warnings.push(format!("Memory usage high: {:.1}%", snapshot.memory_percent));
    }
    if snapshot.cpu_percent >= thresholds.cpu_max_percent {
        violations.push(format!(
            "CPU usage {:.1}% at or above {:.0}%",
            snapshot.cpu_percent, thresholds.cpu_max_percent
        ));
    }
    if snapshot.memory_percent >= thresholds.memory_max_percent {
        violations.push(format!(
            "Memory usage {:.1}% at or above {:.0}%",
            snapshot.memory_percent, thresholds.memory_max_percent
        ));
    }

    for gpu in &snapshot.gpus {
        if gpu.memory_percent > thresholds.warn_percent {
            warnings.push(format!(
                "GPU {} memory usage high: {:.1}%",
                gpu.id, gpu.memory_percent
            ));
        }
        if gpu.memory_percent > thresholds.gpu_memory_max_percent {
            violations.push(format!(
                "GPU {} memory usage {:.1}% above {:.0}%",
                gpu.id, gpu.memory_percent, thresholds.gpu_memory_max_percent
            ));
        }
    }

    HealthAssessment {
        healthy: violations.is_empty(),
        warnings,
        violations,
    }
}

/// Result of a health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// `None` when the host could not be sampled at all
    pub snapshot: Option<HealthSnapshot>,
    #[serde(flatten)]
    pub assessment: HealthAssessment,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.assessment.healthy
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        let Some(ref snapshot) = self.snapshot else {
            return "no health data".to_string();
        };
        let gpus = if snapshot.gpus.is_empty() {
            "no GPU data".to_string()
        } else {
            snapshot
                .gpus
                .iter()
                .map(|g| format!("GPU{}: {:.1}% memory", g.id, g.memory_percent))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "CPU: {:.1}% | Memory: {:.1}% | {}",
            snapshot.cpu_percent, snapshot.memory_percent, gpus
        )
    }
}

/// Source of raw host readings
#[async_trait]
pub trait HealthSource: Send + Sync {
    async fn sample(&self) -> Result<HealthSnapshot>;
}

/// Samples a [`HealthSource`] and classifies the result
#[derive(Clone)]
pub struct HealthMonitor {
    source: Arc<dyn HealthSource>,
    thresholds: HealthThresholds,
}

impl HealthMonitor {
    pub fn new(source: Arc<dyn HealthSource>, thresholds: HealthThresholds) -> Self {
        Self { source, thresholds }
    }

    /// Monitor backed by sysinfo and nvidia-smi
    pub fn system(thresholds: HealthThresholds) -> Self {
        let source = SystemHealthSource::new(thresholds.sample_interval());
        Self::new(Arc::new(source), thresholds)
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// Sample and classify. A failed sample is reported as unhealthy.
    pub async fn check(&self, observer: &dyn BenchObserver) -> HealthReport {
        let report = match self.source.sample().await {
            Ok(snapshot) => {
                let assessment = assess(&snapshot, &self.thresholds);
                HealthReport {
                    snapshot: Some(snapshot),
                    assessment,
                }
            }
            Err(e) => HealthReport {
                snapshot: None,
                assessment: HealthAssessment {
                    healthy: false,
                    warnings: Vec::new(),
                    violations: vec![format!("health sampling failed: {}", e)],
                },
            },
        };

        for warning in &report.assessment.warnings {
            observer.on_warning(warning);
        }
        observer.on_health(&report);

        report
    }
}
