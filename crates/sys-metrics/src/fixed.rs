// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! In-memory provider with canned values and per-metric failure injection.
//!
//! Used by tests and demos where the real host must not leak into output.

use crate::provider::{Metric, SystemMetricsProvider};
use crate::{CpuCounts, MemoryInfo, MetricsError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A provider returning fixed values.
///
/// # Example
/// ```
/// use sys_metrics::{FixedMetrics, Metric, SystemMetricsProvider};
///
/// let host = FixedMetrics::new("node7").with_cpu_counts(2, 4);
/// assert_eq!(host.cpu_counts().unwrap().online, 2);
///
/// host.fail(Metric::Memory);
/// assert!(host.memory().is_err());
/// ```
///
/// [`with_delay`](Self::with_delay) makes one metric slow, standing in for
/// an expensive query such as a process-table scan.
#[derive(Debug)]
pub struct FixedMetrics {
    pub host_name: String,
    pub kernel_release: String,
    pub cpu_model: String,
    pub cpu_counts: CpuCounts,
    pub memory: MemoryInfo,
    pub process_count: u32,
    pub uptime_minutes: i64,
    failing: Mutex<HashSet<Metric>>,
    calls: [AtomicUsize; Metric::COUNT],
    delays: [Duration; Metric::COUNT],
}

impl FixedMetrics {
    /// Creates a provider with the given host name and plausible defaults.
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            kernel_release: "6.6.0-fixed".to_string(),
            cpu_model: "Fixed Test Processor".to_string(),
            cpu_counts: CpuCounts {
                online: 4,
                possible: 4,
            },
            memory: MemoryInfo {
                total_bytes: 4096 * 1024 * 1024,
                free_bytes: 1024 * 1024 * 1024,
            },
            process_count: 128,
            uptime_minutes: 42,
            failing: Mutex::new(HashSet::new()),
            calls: Default::default(),
            delays: [Duration::ZERO; Metric::COUNT],
        }
    }

    pub fn with_kernel_release(mut self, release: impl Into<String>) -> Self {
        self.kernel_release = release.into();
        self
    }

    pub fn with_cpu_model(mut self, model: impl Into<String>) -> Self {
        self.cpu_model = model.into();
        self
    }

    pub fn with_cpu_counts(mut self, online: u32, possible: u32) -> Self {
        self.cpu_counts = CpuCounts { online, possible };
        self
    }

    pub fn with_memory_bytes(mut self, free_bytes: u64, total_bytes: u64) -> Self {
        self.memory = MemoryInfo {
            total_bytes,
            free_bytes,
        };
        self
    }

    pub fn with_process_count(mut self, count: u32) -> Self {
        self.process_count = count;
        self
    }

    pub fn with_uptime_minutes(mut self, minutes: i64) -> Self {
        self.uptime_minutes = minutes;
        self
    }

    /// Makes every query of `metric` sleep for `delay` before answering.
    pub fn with_delay(mut self, metric: Metric, delay: Duration) -> Self {
        self.delays[metric as usize] = delay;
        self
    }

    /// Makes every subsequent query of `metric` fail with `NotAvailable`.
    pub fn fail(&self, metric: Metric) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(metric);
    }

    /// Clears an injected failure.
    pub fn restore(&self, metric: Metric) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&metric);
    }

    /// Number of times `metric` has been queried.
    pub fn call_count(&self, metric: Metric) -> usize {
        self.calls[metric as usize].load(Ordering::Acquire)
    }

    fn query<T>(&self, metric: Metric, value: impl FnOnce() -> T) -> Result<T, MetricsError> {
        self.calls[metric as usize].fetch_add(1, Ordering::AcqRel);
        let delay = self.delays[metric as usize];
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&metric);
        if failing {
            return Err(MetricsError::NotAvailable {
                path: format!("fixed:{metric}"),
            });
        }
        Ok(value())
    }
}

impl SystemMetricsProvider for FixedMetrics {
    fn name(&self) -> &str {
        "fixed"
    }

    fn host_name(&self) -> Result<String, MetricsError> {
        self.query(Metric::HostName, || self.host_name.clone())
    }

    fn kernel_release(&self) -> Result<String, MetricsError> {
        self.query(Metric::KernelRelease, || self.kernel_release.clone())
    }

    fn cpu_model(&self) -> Result<String, MetricsError> {
        self.query(Metric::CpuModel, || self.cpu_model.clone())
    }

    fn cpu_counts(&self) -> Result<CpuCounts, MetricsError> {
        self.query(Metric::CpuCounts, || self.cpu_counts)
    }

    fn memory(&self) -> Result<MemoryInfo, MetricsError> {
        self.query(Metric::Memory, || self.memory)
    }

    fn process_count(&self) -> Result<u32, MetricsError> {
        self.query(Metric::ProcessCount, || self.process_count)
    }

    fn uptime_minutes(&self) -> Result<i64, MetricsError> {
        self.query(Metric::Uptime, || self.uptime_minutes)
    }
}
