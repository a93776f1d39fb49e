// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Cumulative device counters for diagnostics.

/// Cumulative statistics about device usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DeviceStats {
    /// Sessions successfully opened.
    pub sessions_opened: u64,
    /// Sessions closed (explicitly or by dropping the handle).
    pub sessions_closed: u64,
    /// `open` calls that gave up waiting.
    pub open_timeouts: u64,
    /// Reports materialized.
    pub reports_generated: u64,
    /// Reports cut short by the capacity limit.
    pub reports_truncated: u64,
    /// Metric lines dropped because their query failed.
    pub metric_lines_omitted: u64,
    /// Successful mask writes through a session.
    pub mask_writes: u64,
    /// Operations rejected for a stale token or a bad argument.
    pub rejected_operations: u64,
    /// Report bytes copied out to readers.
    pub bytes_delivered: u64,
}

impl DeviceStats {
    pub(crate) fn record_open(&mut self) {
        self.sessions_opened += 1;
    }

    pub(crate) fn record_close(&mut self) {
        self.sessions_closed += 1;
    }

    pub(crate) fn record_open_timeout(&mut self) {
        self.open_timeouts += 1;
    }

    pub(crate) fn record_report(&mut self, truncated: bool, omitted_lines: usize) {
        self.reports_generated += 1;
        if truncated {
            self.reports_truncated += 1;
        }
        self.metric_lines_omitted += omitted_lines as u64;
    }

    pub(crate) fn record_mask_write(&mut self) {
        self.mask_writes += 1;
    }

    pub(crate) fn record_rejection(&mut self) {
        self.rejected_operations += 1;
    }

    pub(crate) fn record_delivery(&mut self, bytes: usize) {
        self.bytes_delivered += bytes as u64;
    }

    /// Number of sessions currently open (0 or 1).
    pub fn sessions_active(&self) -> u64 {
        self.sessions_opened.saturating_sub(self.sessions_closed)
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Sessions: {} opened, {} closed, {} timed out; \
             reports: {} generated ({} truncated, {} lines omitted); \
             {} mask writes, {} rejected ops, {} bytes delivered",
            self.sessions_opened,
            self.sessions_closed,
            self.open_timeouts,
            self.reports_generated,
            self.reports_truncated,
            self.metric_lines_omitted,
            self.mask_writes,
            self.rejected_operations,
            self.bytes_delivered,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let s = DeviceStats::default();
        assert_eq!(s.sessions_opened, 0);
        assert_eq!(s.sessions_active(), 0);
    }

    #[test]
    fn test_report_accounting() {
        let mut s = DeviceStats::default();
        s.record_report(false, 0);
        s.record_report(true, 2);
        assert_eq!(s.reports_generated, 2);
        assert_eq!(s.reports_truncated, 1);
        assert_eq!(s.metric_lines_omitted, 2);
    }

    #[test]
    fn test_sessions_active() {
        let mut s = DeviceStats::default();
        s.record_open();
        assert_eq!(s.sessions_active(), 1);
        s.record_close();
        assert_eq!(s.sessions_active(), 0);
    }

    #[test]
    fn test_summary() {
        let mut s = DeviceStats::default();
        s.record_open();
        s.record_delivery(300);
        s.record_rejection();
        let summary = s.summary();
        assert!(summary.contains("1 opened"));
        assert!(summary.contains("1 rejected ops"));
        assert!(summary.contains("300 bytes delivered"));
    }
}
