// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! CPU model and core counts.
//!
//! Reads CPU state from:
//! - `<procfs>/cpuinfo` — model string. The key differs per architecture
//!   (`model name` on x86, `Model`/`Processor` on ARM boards, `uarch` or
//!   `isa` on RISC-V), so several keys are tried in order.
//! - `<sysfs>/devices/system/cpu/online` — online core list.
//! - `<sysfs>/devices/system/cpu/possible` — possible core list.

use crate::sysfs::{read_raw, read_trimmed};
use crate::MetricsError;
use std::path::Path;

/// `/proc/cpuinfo` keys that carry a descriptive model string, in preference order.
const MODEL_KEYS: &[&str] = &["model name", "Model", "Processor", "cpu model", "uarch", "isa", "cpu"];

/// Online and possible core counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CpuCounts {
    /// Cores currently online.
    pub online: u32,
    /// Cores the kernel could bring online (hot-plug ceiling).
    pub possible: u32,
}

/// Reads the CPU model string.
///
/// Falls back to `"<arch> Processor"` when cpuinfo has no model key, so a
/// successful read always yields one descriptive line.
pub(crate) fn read_cpu_model(procfs_root: &Path) -> Result<String, MetricsError> {
    let content = read_raw(&procfs_root.join("cpuinfo"))?;
    Ok(parse_cpu_model(&content)
        .unwrap_or_else(|| format!("{} Processor", std::env::consts::ARCH)))
}

/// Extracts the first non-empty model value from cpuinfo content.
fn parse_cpu_model(content: &str) -> Option<String> {
    for key in MODEL_KEYS {
        let found = content.lines().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            (k.trim() == *key && !v.trim().is_empty()).then(|| v.trim().to_string())
        });
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Reads online and possible core counts.
///
/// If the sysfs lists are missing, both counts fall back to
/// `std::thread::available_parallelism()`.
pub(crate) fn read_cpu_counts(sysfs_root: &Path) -> Result<CpuCounts, MetricsError> {
    let base = sysfs_root.join("devices/system/cpu");
    let online = read_core_list(&base.join("online"));
    let possible = read_core_list(&base.join("possible"));

    match (online, possible) {
        (Ok(online), Ok(possible)) => Ok(CpuCounts {
            online,
            possible: possible.max(online),
        }),
        (Ok(online), Err(_)) => Ok(CpuCounts {
            online,
            possible: online,
        }),
        (Err(e), _) => {
            tracing::debug!("cpu online list unavailable ({e}); using available_parallelism");
            let n = std::thread::available_parallelism()
                .map(|n| n.get() as u32)
                .map_err(|source| MetricsError::ReadError {
                    path: base.display().to_string(),
                    source,
                })?;
            Ok(CpuCounts {
                online: n,
                possible: n,
            })
        }
    }
}

fn read_core_list(path: &Path) -> Result<u32, MetricsError> {
    let content = read_trimmed(path)?;
    parse_cpu_range(&content).ok_or_else(|| MetricsError::ParseError {
        path: path.display().to_string(),
        detail: format!("expected a CPU list like '0-3', got '{content}'"),
    })
}

/// Parses a CPU range string like `"0-3"` → 4, `"0"` → 1, `"0,2-3"` → 3.
fn parse_cpu_range(s: &str) -> Option<u32> {
    let mut total = 0u32;
    for part in s.split(',') {
        let part = part.trim();
        if let Some((start_s, end_s)) = part.split_once('-') {
            let start: u32 = start_s.trim().parse().ok()?;
            let end: u32 = end_s.trim().parse().ok()?;
            if end < start {
                return None;
            }
            total = total.checked_add((end - start).checked_add(1)?)?;
        } else {
            let _: u32 = part.parse().ok()?;
            total = total.checked_add(1)?;
        }
    }
    (total > 0).then_some(total)
}
