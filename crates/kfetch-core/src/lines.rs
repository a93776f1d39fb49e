// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The right-hand column of a report: host name, separator, metric lines.

use crate::{InfoFlag, InfoMask};
use sys_metrics::{Metric, MetricsError, SystemMetricsProvider};

/// The separator never grows beyond this many dashes.
pub const MAX_SEPARATOR_LEN: usize = 11;

/// Ordered lines for the right-hand column of a report.
///
/// Index 0 is the host name, index 1 the separator, then one line per
/// selected flag in [`InfoFlag::PRIORITY`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLines {
    lines: Vec<String>,
    omitted: Vec<Metric>,
}

impl MetricLines {
    /// Starts a line set for `host_name` (host line plus separator).
    pub fn new(host_name: &str) -> Self {
        let host_name = single_line(host_name);
        let separator = separator_for(&host_name);
        Self {
            lines: vec![host_name, separator],
            omitted: Vec::new(),
        }
    }

    /// Queries `provider` for the host name and every flag selected by `mask`.
    ///
    /// A failing query omits only its own line. A failing host-name query
    /// leaves an empty host name (and so an empty separator).
    pub fn collect(provider: &dyn SystemMetricsProvider, mask: InfoMask) -> Self {
        let mut set = match provider.host_name() {
            Ok(host_name) => Self::new(&host_name),
            Err(e) => {
                tracing::warn!("host name unavailable from {}: {e}", provider.name());
                let mut set = Self::new("");
                set.omitted.push(Metric::HostName);
                set
            }
        };

        for flag in mask.selected() {
            match format_flag(provider, flag) {
                Ok(line) => set.push(line),
                Err(e) => {
                    tracing::warn!("omitting {flag} line: {e}");
                    set.omitted.push(metric_for(flag));
                }
            }
        }
        set
    }

    /// Appends a metric line.
    pub fn push(&mut self, line: impl AsRef<str>) {
        self.lines.push(single_line(line.as_ref()));
    }

    pub fn host_name(&self) -> &str {
        &self.lines[0]
    }

    pub fn separator(&self) -> &str {
        &self.lines[1]
    }

    /// Lines after the separator.
    pub fn metric_lines(&self) -> &[String] {
        &self.lines[2..]
    }

    /// Line `i`, counting the host name as 0.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.lines.get(i).map(String::as_str)
    }

    /// Total line count, host name and separator included.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false`: a line set holds at least the host and separator lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Metrics whose query failed while collecting.
    pub fn omitted(&self) -> &[Metric] {
        &self.omitted
    }
}

/// `min(len(host_name), 11)` dashes, length counted in characters.
pub fn separator_for(host_name: &str) -> String {
    "-".repeat(host_name.chars().count().min(MAX_SEPARATOR_LEN))
}

/// Queries and formats the line for one flag.
pub fn format_flag(
    provider: &dyn SystemMetricsProvider,
    flag: InfoFlag,
) -> Result<String, MetricsError> {
    Ok(match flag {
        InfoFlag::Release => format!("Kernel: {}", provider.kernel_release()?),
        InfoFlag::CpuModel => format!("CPU: {}", provider.cpu_model()?),
        InfoFlag::CpuCount => {
            let counts = provider.cpu_counts()?;
            format!("CPUs: {} / {}", counts.online, counts.possible)
        }
        InfoFlag::Memory => {
            let (free, total) = provider.memory_mb()?;
            format!("Mem: {free} MB / {total} MB")
        }
        InfoFlag::ProcessCount => format!("Procs: {}", provider.process_count()?),
        InfoFlag::Uptime => format!("Uptime: {} mins", provider.uptime_minutes()?),
    })
}

fn metric_for(flag: InfoFlag) -> Metric {
    match flag {
        InfoFlag::Release => Metric::KernelRelease,
        InfoFlag::CpuModel => Metric::CpuModel,
        InfoFlag::CpuCount => Metric::CpuCounts,
        InfoFlag::Memory => Metric::Memory,
        InfoFlag::ProcessCount => Metric::ProcessCount,
        InfoFlag::Uptime => Metric::Uptime,
    }
}

/// Replaces control characters so provider text cannot break the layout.
fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
