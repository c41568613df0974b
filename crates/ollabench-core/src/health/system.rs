//! Host sampling with sysinfo

use super::{query_nvidia_smi, HealthSnapshot, HealthSource};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use sysinfo::System;

/// Reads CPU and memory through sysinfo and GPUs through nvidia-smi
pub struct SystemHealthSource {
    sample_interval: Duration,
}

impl SystemHealthSource {
    pub fn new(sample_interval: Duration) -> Self {
        Self {
            sample_interval: sample_interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }
}

#[async_trait]
impl HealthSource for SystemHealthSource {
    async fn sample(&self) -> Result<HealthSnapshot> {
        let mut sys = System::new();

        // CPU usage is a delta between two refreshes
        sys.refresh_cpu_usage();
        tokio::time::sleep(self.sample_interval).await;
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let cpu_percent = sys.global_cpu_usage() as f64;
        let total_memory = sys.total_memory();
        let memory_percent = if total_memory > 0 {
            sys.used_memory() as f64 / total_memory as f64 * 100.0
        } else {
            0.0
        };

        let gpus = query_nvidia_smi().await;

        Ok(HealthSnapshot::new(cpu_percent, memory_percent, gpus))
    }
}
