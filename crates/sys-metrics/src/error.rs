// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for metric queries.

/// Errors that can occur when querying a host metric.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to read a procfs or sysfs file.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse a value from a system file.
    #[error("failed to parse value from {path}: {detail}")]
    ParseError { path: String, detail: String },

    /// The metric source does not exist on this host (e.g., not Linux).
    #[error("metric source not available: {path}")]
    NotAvailable { path: String },
}
