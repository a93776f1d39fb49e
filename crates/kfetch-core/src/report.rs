// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Merging the banner with metric lines into a capacity-bounded report.
//!
//! Layout for host `node7` with only the CPU count selected:
//! ```text
//!                      node7
//!         .-.          -----
//!        (.. |         CPUs: 2 / 4
//!        <>  |
//!       / --- \
//!      ( |   | |
//!    |\\_)___/\)/\
//!   <__)------(__/
//! ```
//! The header row pairs the host name with a blank left column. Each
//! following row `i` pairs banner row `i` with metric line `i + 1`; there
//! are `max(7, line_count - 1)` such rows.

use crate::banner::{banner_row, BANNER, BLANK_ROW};
use crate::MetricLines;

/// Default report capacity in bytes.
pub const DEFAULT_REPORT_CAPACITY: usize = 1024;

/// Gap between the left and right columns.
pub const COLUMN_GAP: &str = "  ";

/// A rendered report. Never longer than the capacity it was rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    text: String,
    truncated: bool,
}

impl Report {
    /// Renders `lines` next to the banner, stopping at `capacity` bytes.
    ///
    /// The row that would overflow is cut at the last character boundary
    /// that fits and nothing after it is emitted.
    pub fn render(lines: &MetricLines, capacity: usize) -> Self {
        let mut writer = BoundedWriter::new(capacity);

        if writer.push_row(BLANK_ROW, lines.host_name()) {
            let rows = BANNER.len().max(lines.len().saturating_sub(1));
            for i in 0..rows {
                let right = lines.get(i + 1).unwrap_or("");
                if !writer.push_row(banner_row(i), right) {
                    break;
                }
            }
        }

        Self {
            text: writer.text,
            truncated: writer.truncated,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// `true` if rows were cut or dropped to respect the capacity.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Appends rows until the byte budget runs out.
struct BoundedWriter {
    text: String,
    capacity: usize,
    truncated: bool,
}

impl BoundedWriter {
    fn new(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
            truncated: false,
        }
    }

    /// Appends `left + gap + right + '\n'`. Returns `false` once the budget
    /// is exhausted (the row was cut).
    fn push_row(&mut self, left: &str, right: &str) -> bool {
        let row = format!("{left}{COLUMN_GAP}{right}\n");
        let room = self.capacity - self.text.len();
        if row.len() <= room {
            self.text.push_str(&row);
            return true;
        }

        let mut cut = room;
        while !row.is_char_boundary(cut) {
            cut -= 1;
        }
        self.text.push_str(&row[..cut]);
        self.truncated = true;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::BANNER_WIDTH;

    fn lines_with(host: &str, metrics: &[&str]) -> MetricLines {
        let mut set = MetricLines::new(host);
        for m in metrics {
            set.push(m);
        }
        set
    }

    #[test]
    fn test_single_metric_layout() {
        let report = Report::render(&lines_with("node7", &["CPUs: 2 / 4"]), DEFAULT_REPORT_CAPACITY);
        let rows: Vec<&str> = report.as_str().lines().collect();

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], format!("{BLANK_ROW}  node7"));
        assert_eq!(rows[1], format!("{}  -----", BANNER[0]));
        assert_eq!(rows[2], format!("{}  CPUs: 2 / 4", BANNER[1]));
        for (i, row) in rows[3..].iter().enumerate() {
            assert_eq!(*row, format!("{}  ", BANNER[i + 2]));
        }
        assert!(report.as_str().ends_with('\n'));
        assert!(!report.is_truncated());
    }

    #[test]
    fn test_empty_mask_layout() {
        let report = Report::render(&lines_with("node7", &[]), DEFAULT_REPORT_CAPACITY);
        let rows: Vec<&str> = report.as_str().lines().collect();
        assert_eq!(rows.len(), 8);
        assert!(rows[1].ends_with("  -----"));
        assert!(rows[2..].iter().all(|r| r.ends_with("  ") && r.len() == BANNER_WIDTH + 2));
    }

    #[test]
    fn test_rows_extend_past_banner() {
        let metrics: Vec<String> = (0..9).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = metrics.iter().map(String::as_str).collect();
        let set = lines_with("h", &refs);
        // 11 lines total: header + max(7, 10) merged rows.
        let report = Report::render(&set, DEFAULT_REPORT_CAPACITY);
        let rows: Vec<&str> = report.as_str().lines().collect();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[8], format!("{BLANK_ROW}  line 6"));
        assert_eq!(rows[10], format!("{BLANK_ROW}  line 8"));
    }

    #[test]
    fn test_exact_fit_is_not_truncated() {
        let set = lines_with("node7", &[]);
        let full = Report::render(&set, DEFAULT_REPORT_CAPACITY);
        let exact = Report::render(&set, full.len());
        assert_eq!(exact, Report { text: full.as_str().to_string(), truncated: false });
    }

    #[test]
    fn test_truncation_cuts_mid_row() {
        let set = lines_with("node7", &["CPUs: 2 / 4"]);
        let full = Report::render(&set, DEFAULT_REPORT_CAPACITY);
        let cut = Report::render(&set, 50);
        assert_eq!(cut.len(), 50);
        assert!(cut.is_truncated());
        assert_eq!(cut.as_str(), &full.as_str()[..50]);
    }

    #[test]
    fn test_oversized_lines_respect_capacity() {
        let huge = "x".repeat(5000);
        let set = lines_with(&huge, &[&huge, &huge]);
        for capacity in [0, 1, 19, 512, 1024, 4096] {
            let report = Report::render(&set, capacity);
            assert!(report.len() <= capacity, "capacity {capacity}");
            assert!(report.is_truncated());
        }
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let set = lines_with("ééééé", &[]);
        // Header is 19 + 2 ASCII bytes then two-byte characters.
        let report = Report::render(&set, 22);
        assert_eq!(report.len(), 21);
        assert!(report.is_truncated());
    }
}
