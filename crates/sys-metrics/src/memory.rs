// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! System memory via `<procfs>/meminfo`.
//!
//! Only `MemTotal` and `MemFree` are used. `MemFree` is the kernel's
//! strictly unused RAM, the same figure `sysinfo(2)` reports as `freeram`.

use crate::sysfs::read_raw;
use crate::MetricsError;
use std::path::Path;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// System memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MemoryInfo {
    /// Total physical memory in bytes.
    pub total_bytes: u64,
    /// Unused memory in bytes.
    pub free_bytes: u64,
}

impl MemoryInfo {
    /// Reads memory information from `<procfs_root>/meminfo`.
    pub(crate) fn read(procfs_root: &Path) -> Result<Self, MetricsError> {
        let path = procfs_root.join("meminfo");
        let content = read_raw(&path)?;
        Self::parse(&content, &path)
    }

    /// Parses the content of a `/proc/meminfo`-formatted string.
    pub(crate) fn parse(content: &str, source_path: &Path) -> Result<Self, MetricsError> {
        let mut total_kb: Option<u64> = None;
        let mut free_kb: Option<u64> = None;

        for line in content.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                continue;
            }
            match parts[0] {
                "MemTotal:" => total_kb = Some(parse_kb_value(parts[1], source_path)?),
                "MemFree:" => free_kb = Some(parse_kb_value(parts[1], source_path)?),
                _ => {}
            }

            if total_kb.is_some() && free_kb.is_some() {
                break;
            }
        }

        let total_kb = total_kb.ok_or_else(|| MetricsError::ParseError {
            path: source_path.display().to_string(),
            detail: "MemTotal not found".to_string(),
        })?;
        let free_kb = free_kb.ok_or_else(|| MetricsError::ParseError {
            path: source_path.display().to_string(),
            detail: "MemFree not found".to_string(),
        })?;

        Ok(Self {
            total_bytes: total_kb * 1024,
            free_bytes: free_kb * 1024,
        })
    }

    /// Returns free memory in whole megabytes (floor).
    pub fn free_mb(&self) -> u64 {
        self.free_bytes / BYTES_PER_MB
    }

    /// Returns total memory in whole megabytes (floor).
    pub fn total_mb(&self) -> u64 {
        self.total_bytes / BYTES_PER_MB
    }
}

/// Parses a numeric string from `/proc/meminfo` (values are in kB).
fn parse_kb_value(s: &str, source_path: &Path) -> Result<u64, MetricsError> {
    s.parse::<u64>().map_err(|_| MetricsError::ParseError {
        path: source_path.display().to_string(),
        detail: format!("expected integer kB value, got '{s}'"),
    })
}
