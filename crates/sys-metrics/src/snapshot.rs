// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Aggregated point-in-time reading of every metric.
//!
//! A [`MetricsSnapshot`] queries each metric once. Individual failures do
//! not fail the capture: the field is left empty and the metric is listed
//! in [`MetricsSnapshot::unavailable`].

use crate::provider::{Metric, SystemMetricsProvider};
use crate::{CpuCounts, MemoryInfo};
use std::time::{SystemTime, UNIX_EPOCH};

/// A complete point-in-time reading of all host metrics.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub host_name: Option<String>,
    pub kernel_release: Option<String>,
    pub cpu_model: Option<String>,
    pub cpu_counts: Option<CpuCounts>,
    pub memory: Option<MemoryInfo>,
    pub process_count: Option<u32>,
    pub uptime_minutes: Option<i64>,
    /// Metrics whose query failed.
    pub unavailable: Vec<Metric>,
    /// Unix timestamp in milliseconds when the snapshot was taken.
    pub timestamp_ms: u64,
}

impl MetricsSnapshot {
    /// Captures a new snapshot from `provider`.
    pub fn capture(provider: &dyn SystemMetricsProvider) -> Self {
        let mut unavailable = Vec::new();
        let missing = &mut unavailable;

        let host_name = keep_ok(missing, provider, Metric::HostName, provider.host_name());
        let kernel_release =
            keep_ok(missing, provider, Metric::KernelRelease, provider.kernel_release());
        let cpu_model = keep_ok(missing, provider, Metric::CpuModel, provider.cpu_model());
        let cpu_counts = keep_ok(missing, provider, Metric::CpuCounts, provider.cpu_counts());
        let memory = keep_ok(missing, provider, Metric::Memory, provider.memory());
        let process_count =
            keep_ok(missing, provider, Metric::ProcessCount, provider.process_count());
        let uptime_minutes = keep_ok(missing, provider, Metric::Uptime, provider.uptime_minutes());

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            host_name,
            kernel_release,
            cpu_model,
            cpu_counts,
            memory,
            process_count,
            uptime_minutes,
            unavailable,
            timestamp_ms,
        }
    }

    /// Returns `true` if every metric was read.
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }

    /// Returns a one-line summary suitable for logging or CLI display.
    ///
    /// # Example output
    /// ```text
    /// node7: Linux 6.1.21-v8+, 2/4 CPUs (Cortex-A72), Mem 213/3793 MB free, 131 procs, up 586 min
    /// ```
    pub fn summary(&self) -> String {
        let or_unknown = |v: Option<String>| v.unwrap_or_else(|| "?".to_string());
        format!(
            "{}: Linux {}, {} CPUs ({}), Mem {} MB free, {} procs, up {} min",
            or_unknown(self.host_name.clone()),
            or_unknown(self.kernel_release.clone()),
            or_unknown(self.cpu_counts.map(|c| format!("{}/{}", c.online, c.possible))),
            or_unknown(self.cpu_model.clone()),
            or_unknown(self.memory.map(|m| format!("{}/{}", m.free_mb(), m.total_mb()))),
            or_unknown(self.process_count.map(|n| n.to_string())),
            or_unknown(self.uptime_minutes.map(|n| n.to_string())),
        )
    }
}

/// Unwraps a metric result, recording the metric as unavailable on failure.
fn keep_ok<T, E: std::fmt::Display>(
    unavailable: &mut Vec<Metric>,
    provider: &dyn SystemMetricsProvider,
    metric: Metric,
    result: Result<T, E>,
) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("{metric} unavailable from {}: {e}", provider.name());
            unavailable.push(metric);
            None
        }
    }
}
