// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Boot-relative uptime via `<procfs>/uptime`.
//!
//! The first field is seconds since boot including time spent suspended
//! (`CLOCK_BOOTTIME`), e.g. `"35213.47 139824.01"`.

use crate::sysfs::read_trimmed;
use crate::MetricsError;
use std::path::Path;

/// Reads whole minutes elapsed since boot (floor).
pub(crate) fn read_uptime_minutes(procfs_root: &Path) -> Result<i64, MetricsError> {
    let path = procfs_root.join("uptime");
    let content = read_trimmed(&path)?;
    parse_uptime_minutes(&content).ok_or_else(|| MetricsError::ParseError {
        path: path.display().to_string(),
        detail: format!("expected '<seconds> <idle>', got '{content}'"),
    })
}

fn parse_uptime_minutes(content: &str) -> Option<i64> {
    let first = content.split_whitespace().next()?;
    // Integer part only: fractional seconds never change the minute count.
    let whole = first.split('.').next()?;
    let secs: i64 = whole.parse().ok()?;
    (secs >= 0).then_some(secs / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysfs::testutil::{scratch_dir, write_file};

    #[test]
    fn test_parse_uptime() {
        assert_eq!(parse_uptime_minutes("35213.47 139824.01"), Some(586));
        assert_eq!(parse_uptime_minutes("59.99 1.00"), Some(0));
        assert_eq!(parse_uptime_minutes("60.00 1.00"), Some(1));
    }

    #[test]
    fn test_parse_uptime_invalid() {
        assert_eq!(parse_uptime_minutes(""), None);
        assert_eq!(parse_uptime_minutes("soon"), None);
        assert_eq!(parse_uptime_minutes("-5.0 0"), None);
    }

    #[test]
    fn test_read_uptime_file() {
        let root = scratch_dir("uptime");
        write_file(&root, "uptime", "7260.12 100.00\n");
        assert_eq!(read_uptime_minutes(&root).unwrap(), 121);
        let _ = std::fs::remove_dir_all(&root);
    }
}
