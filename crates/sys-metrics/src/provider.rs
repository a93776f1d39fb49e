// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`SystemMetricsProvider`] capability and its Linux implementation.

use crate::cpu::{read_cpu_counts, read_cpu_model};
use crate::host::{read_host_name, read_kernel_release};
use crate::process::count_processes;
use crate::uptime::read_uptime_minutes;
use crate::{CpuCounts, MemoryInfo, MetricsError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default mount point of procfs.
pub const DEFAULT_PROCFS_ROOT: &str = "/proc";
/// Default mount point of sysfs.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys";

/// Identifies one queryable metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    HostName,
    KernelRelease,
    CpuModel,
    CpuCounts,
    Memory,
    ProcessCount,
    Uptime,
}

impl Metric {
    /// Number of distinct metrics.
    pub const COUNT: usize = 7;

    /// All metrics, in declaration order.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::HostName,
        Metric::KernelRelease,
        Metric::CpuModel,
        Metric::CpuCounts,
        Metric::Memory,
        Metric::ProcessCount,
        Metric::Uptime,
    ];

    /// Stable short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::HostName => "host_name",
            Metric::KernelRelease => "kernel_release",
            Metric::CpuModel => "cpu_model",
            Metric::CpuCounts => "cpu_counts",
            Metric::Memory => "memory",
            Metric::ProcessCount => "process_count",
            Metric::Uptime => "uptime",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only queries for the current value of each host metric.
///
/// Implementations must be side-effect free from the caller's point of
/// view and may be called any number of times per report. Calls may be
/// slow (a process count scans the process table) but never wait on
/// other callers.
pub trait SystemMetricsProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Node name of the host.
    fn host_name(&self) -> Result<String, MetricsError>;

    /// Kernel / OS release string.
    fn kernel_release(&self) -> Result<String, MetricsError>;

    /// One-line descriptive CPU model.
    fn cpu_model(&self) -> Result<String, MetricsError>;

    /// Online and possible core counts.
    fn cpu_counts(&self) -> Result<CpuCounts, MetricsError>;

    /// Free and total memory in bytes.
    fn memory(&self) -> Result<MemoryInfo, MetricsError>;

    /// Number of live processes at query time.
    fn process_count(&self) -> Result<u32, MetricsError>;

    /// Whole minutes since boot.
    fn uptime_minutes(&self) -> Result<i64, MetricsError>;

    /// Free and total memory in whole megabytes, `(free, total)`.
    fn memory_mb(&self) -> Result<(u64, u64), MetricsError> {
        self.memory().map(|m| (m.free_mb(), m.total_mb()))
    }
}

/// Reads metrics from a Linux host's procfs and sysfs.
///
/// # Example
/// ```no_run
/// use sys_metrics::{LinuxMetrics, SystemMetricsProvider};
///
/// let host = LinuxMetrics::new();
/// println!("{}", host.host_name().unwrap_or_default());
/// ```
#[derive(Debug, Clone)]
pub struct LinuxMetrics {
    procfs_root: PathBuf,
    sysfs_root: PathBuf,
}

impl LinuxMetrics {
    /// Creates a provider reading the standard `/proc` and `/sys` mounts.
    pub fn new() -> Self {
        Self::with_roots(DEFAULT_PROCFS_ROOT, DEFAULT_SYSFS_ROOT)
    }

    /// Creates a provider rooted at alternative procfs/sysfs trees.
    pub fn with_roots(procfs_root: impl Into<PathBuf>, sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            procfs_root: procfs_root.into(),
            sysfs_root: sysfs_root.into(),
        }
    }

    /// Returns the procfs root in use.
    pub fn procfs_root(&self) -> &Path {
        &self.procfs_root
    }

    /// Returns the sysfs root in use.
    pub fn sysfs_root(&self) -> &Path {
        &self.sysfs_root
    }
}

impl Default for LinuxMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemMetricsProvider for LinuxMetrics {
    fn name(&self) -> &str {
        "linux-procfs"
    }

    fn host_name(&self) -> Result<String, MetricsError> {
        read_host_name(&self.procfs_root)
    }

    fn kernel_release(&self) -> Result<String, MetricsError> {
        read_kernel_release(&self.procfs_root)
    }

    fn cpu_model(&self) -> Result<String, MetricsError> {
        read_cpu_model(&self.procfs_root)
    }

    fn cpu_counts(&self) -> Result<CpuCounts, MetricsError> {
        read_cpu_counts(&self.sysfs_root)
    }

    fn memory(&self) -> Result<MemoryInfo, MetricsError> {
        MemoryInfo::read(&self.procfs_root)
    }

    fn process_count(&self) -> Result<u32, MetricsError> {
        count_processes(&self.procfs_root)
    }

    fn uptime_minutes(&self) -> Result<i64, MetricsError> {
        read_uptime_minutes(&self.procfs_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysfs::testutil::{scratch_dir, write_file};

    fn fixture_tree(name: &str) -> PathBuf {
        let root = scratch_dir(name);
        write_file(&root, "proc/sys/kernel/hostname", "node7\n");
        write_file(&root, "proc/sys/kernel/osrelease", "6.6.0-test\n");
        write_file(&root, "proc/cpuinfo", "processor\t: 0\nmodel name\t: Test CPU @ 1.00GHz\n");
        write_file(&root, "proc/meminfo", "MemTotal: 4194304 kB\nMemFree: 1048576 kB\n");
        write_file(&root, "proc/uptime", "3600.50 12.00\n");
        for pid in ["1", "2"] {
            std::fs::create_dir_all(root.join("proc").join(pid)).unwrap();
        }
        write_file(&root, "sys/devices/system/cpu/online", "0-1\n");
        write_file(&root, "sys/devices/system/cpu/possible", "0-3\n");
        root
    }

    #[test]
    fn test_linux_metrics_from_fixture() {
        let root = fixture_tree("provider_fixture");
        let host = LinuxMetrics::with_roots(root.join("proc"), root.join("sys"));

        assert_eq!(host.host_name().unwrap(), "node7");
        assert_eq!(host.kernel_release().unwrap(), "6.6.0-test");
        assert_eq!(host.cpu_model().unwrap(), "Test CPU @ 1.00GHz");
        assert_eq!(host.cpu_counts().unwrap(), CpuCounts { online: 2, possible: 4 });
        assert_eq!(host.memory_mb().unwrap(), (1024, 4096));
        assert_eq!(host.process_count().unwrap(), 2);
        assert_eq!(host.uptime_minutes().unwrap(), 60);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_default_roots() {
        let host = LinuxMetrics::default();
        assert_eq!(host.procfs_root(), Path::new("/proc"));
        assert_eq!(host.sysfs_root(), Path::new("/sys"));
        assert_eq!(host.name(), "linux-procfs");
    }

    #[test]
    fn test_metric_names_unique() {
        let mut names: Vec<&str> = Metric::ALL.iter().map(Metric::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Metric::ALL.len());
    }
}
