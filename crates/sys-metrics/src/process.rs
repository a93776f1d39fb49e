// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Live process count: one numeric `<procfs>/<pid>` directory per thread
//! group. Threads are not listed at the top level, so this matches a walk
//! of the kernel task list by group leader.

use crate::MetricsError;
use std::path::Path;

/// Counts live processes. A point-in-time scan; entries can appear or
/// vanish while the directory is being read.
pub(crate) fn count_processes(procfs_root: &Path) -> Result<u32, MetricsError> {
    let entries = std::fs::read_dir(procfs_root).map_err(|e| MetricsError::ReadError {
        path: procfs_root.display().to_string(),
        source: e,
    })?;

    let count = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
        })
        .count();

    Ok(count as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysfs::testutil::{scratch_dir, write_file};

    #[test]
    fn test_counts_only_numeric_entries() {
        let root = scratch_dir("procs");
        for pid in ["1", "42", "1337"] {
            std::fs::create_dir_all(root.join(pid)).unwrap();
        }
        std::fs::create_dir_all(root.join("self")).unwrap();
        write_file(&root, "meminfo", "MemTotal: 1 kB\n");
        assert_eq!(count_processes(&root).unwrap(), 3);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_missing_root() {
        let result = count_processes(Path::new("/nonexistent/proc"));
        assert!(matches!(result, Err(MetricsError::ReadError { .. })));
    }

    #[test]
    fn test_real_procfs_has_self() {
        if Path::new("/proc/self").exists() {
            assert!(count_processes(Path::new("/proc")).unwrap() >= 1);
        }
    }
}
