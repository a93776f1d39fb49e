// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Shared helpers for pseudo-filesystem reads.

use crate::MetricsError;
use std::path::Path;

/// Reads a procfs/sysfs file and returns its trimmed content.
pub(crate) fn read_trimmed(path: &Path) -> Result<String, MetricsError> {
    read_raw(path).map(|s| s.trim().to_string())
}

/// Reads a procfs/sysfs file verbatim.
pub(crate) fn read_raw(path: &Path) -> Result<String, MetricsError> {
    if !path.exists() {
        return Err(MetricsError::NotAvailable {
            path: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| MetricsError::ReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parses a single unsigned integer, attributing failures to `path`.
pub(crate) fn parse_u64(s: &str, path: &Path, what: &str) -> Result<u64, MetricsError> {
    s.trim().parse::<u64>().map_err(|_| MetricsError::ParseError {
        path: path.display().to_string(),
        detail: format!("expected integer {what}, got '{s}'"),
    })
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::{Path, PathBuf};

    /// Creates a scratch directory unique to `name` under the system temp dir.
    /// The caller is responsible for cleanup.
    pub fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("kfetch_rt_test")
            .join(format!("{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes `content` to `root/rel`, creating parent directories.
    pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }
}
