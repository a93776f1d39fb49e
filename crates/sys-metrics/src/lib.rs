// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # sys-metrics
//!
//! Point-in-time host metrics for the kfetch snapshot device, read from
//! `/proc` and `/sys`.
//!
//! # Metrics
//! - **Host name** and **kernel release** — `/proc/sys/kernel/`.
//! - **CPU model** — `/proc/cpuinfo`, architecture name as last resort.
//! - **CPU counts** — online / possible lists under `/sys/devices/system/cpu/`.
//! - **Memory** — `MemFree` and `MemTotal` from `/proc/meminfo`.
//! - **Uptime** — `/proc/uptime`, in whole minutes.
//! - **Process count** — numeric entries of `/proc`.
//!
//! Every query goes through the [`SystemMetricsProvider`] trait so callers
//! can substitute [`FixedMetrics`] in tests.
//!
//! # Example
//! ```no_run
//! use sys_metrics::{LinuxMetrics, MetricsSnapshot};
//!
//! let snap = MetricsSnapshot::capture(&LinuxMetrics::new());
//! println!("{}", snap.summary());
//! ```

mod cpu;
mod error;
mod fixed;
mod host;
mod memory;
mod process;
mod provider;
mod snapshot;
mod sysfs;
mod uptime;

pub use cpu::CpuCounts;
pub use error::MetricsError;
pub use fixed::FixedMetrics;
pub use memory::MemoryInfo;
pub use provider::{
    LinuxMetrics, Metric, SystemMetricsProvider, DEFAULT_PROCFS_ROOT, DEFAULT_SYSFS_ROOT,
};
pub use snapshot::MetricsSnapshot;
