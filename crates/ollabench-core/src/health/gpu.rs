//! GPU memory readings via nvidia-smi

use super::GpuReading;
use tokio::process::Command;

const QUERY: &str = "--query-gpu=index,memory.used,memory.total,memory.free,utilization.gpu";

/// Query all NVIDIA GPUs. Missing tooling yields an empty list.
pub async fn query_nvidia_smi() -> Vec<GpuReading> {
    let output = match Command::new("nvidia-smi")
        .arg(QUERY)
        .arg("--format=csv,noheader,nounits")
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("nvidia-smi unavailable, skipping GPU metrics: {}", e);
            return Vec::new();
        }
    };

    if !output.status.success() {
        tracing::debug!(
            "nvidia-smi exited with {}, skipping GPU metrics",
            output.status
        );
        return Vec::new();
    }

    parse_nvidia_smi(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `index, used, total, free[, utilization]` CSV rows.
///
/// Rows that do not parse are dropped.
pub fn parse_nvidia_smi(output: &str) -> Vec<GpuReading> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let reading = parse_row(line);
            if reading.is_none() {
                tracing::debug!("Unparseable nvidia-smi row: {}", line);
            }
            reading
        })
        .collect()
}

fn parse_row(line: &str) -> Option<GpuReading> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 4 {
        return None;
    }

    let id = fields[0].parse::<u32>().ok()?;
    let used = fields[1].parse::<f64>().ok()?;
    let total = fields[2].parse::<f64>().ok()?;
    let free = fields[3].parse::<f64>().ok()?;
    // "[N/A]" on some drivers
    let utilization = fields.get(4).and_then(|f| f.parse::<f64>().ok());

    let memory_percent = if total > 0.0 { used / total * 100.0 } else { 0.0 };

    Some(GpuReading {
        id,
        memory_used_mb: used,
        memory_total_mb: total,
        memory_free_mb: free,
        memory_percent,
        utilization_percent: utilization,
    })
}
