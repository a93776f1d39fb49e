// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the snapshot device.

use crate::SessionToken;

/// Errors returned by [`SnapshotDevice`](crate::SnapshotDevice) operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The token does not name the currently open session (already closed,
    /// never issued, or superseded by a later session).
    #[error("invalid session state for {token}: {reason}")]
    InvalidSessionState {
        token: SessionToken,
        reason: &'static str,
    },

    /// A read was issued with a zero-length buffer while report data is
    /// still pending. Nothing was copied; the session is unaffected.
    #[error("read buffer has zero capacity but report data is pending")]
    BufferTooSmall,

    /// A malformed argument (e.g., a mask write that is not 4 bytes).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `open` gave up waiting for the current session to close.
    #[error("device still busy after waiting {waited_ms} ms")]
    OpenTimedOut { waited_ms: u64 },

    /// A metric query failed.
    #[error("metric unavailable: {0}")]
    MetricsUnavailable(#[from] sys_metrics::MetricsError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
