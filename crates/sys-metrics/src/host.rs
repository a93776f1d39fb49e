// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Host identity from the kernel's UTS namespace.
//!
//! Reads `<procfs>/sys/kernel/hostname` and `<procfs>/sys/kernel/osrelease`,
//! which mirror `uname -n` and `uname -r` for the calling namespace.

use crate::sysfs::read_trimmed;
use crate::MetricsError;
use std::path::Path;

/// Reads the node name of the host.
pub(crate) fn read_host_name(procfs_root: &Path) -> Result<String, MetricsError> {
    read_trimmed(&procfs_root.join("sys/kernel/hostname"))
}

/// Reads the kernel release string, e.g. `6.1.0-rpi7-rpi-v8`.
pub(crate) fn read_kernel_release(procfs_root: &Path) -> Result<String, MetricsError> {
    let path = procfs_root.join("sys/kernel/osrelease");
    let release = read_trimmed(&path)?;
    if release.is_empty() {
        return Err(MetricsError::ParseError {
            path: path.display().to_string(),
            detail: "empty release string".to_string(),
        });
    }
    Ok(release)
}
