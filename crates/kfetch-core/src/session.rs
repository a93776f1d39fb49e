// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! RAII session handle that closes the device on drop.
//!
//! A [`Session`] owns exactly one open/close cycle of a
//! [`SnapshotDevice`]. Closing consumes the handle, so a closed session
//! cannot be read from again; dropping an open one closes it and wakes the
//! next waiter.

use crate::{FetchError, InfoMask, SessionToken, SnapshotDevice};

/// An open session on a [`SnapshotDevice`].
///
/// # Example
/// ```ignore
/// let mut session = device.open()?;
/// session.set_mask(InfoMask::FULL)?;
/// let report = session.read_to_string(256)?;
/// drop(session);              // device is idle again
/// ```
pub struct Session {
    device: SnapshotDevice,
    token: SessionToken,
    /// Set once the device has been told to close, so `drop` does not close twice.
    closed: bool,
}

impl Session {
    /// Wraps a freshly opened token (called internally by the device).
    pub(crate) fn new(device: SnapshotDevice, token: SessionToken) -> Self {
        Self {
            device,
            token,
            closed: false,
        }
    }

    /// Token naming this session on the device.
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Device this session was opened on.
    pub fn device(&self) -> &SnapshotDevice {
        &self.device
    }

    /// Reads the next chunk of the report. See [`SnapshotDevice::read`].
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, FetchError> {
        self.device.read(self.token, buf)
    }

    /// Drains the rest of the report using reads of `chunk` bytes.
    pub fn read_to_end(&mut self, chunk: usize) -> Result<Vec<u8>, FetchError> {
        if chunk == 0 {
            return Err(FetchError::InvalidArgument(
                "read chunk size must be greater than 0".into(),
            ));
        }
        let mut out = Vec::new();
        let mut buf = vec![0u8; chunk];
        loop {
            let n = self.read(&mut buf)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    /// Drains the rest of the report as text.
    ///
    /// A chunk boundary may split a multi-byte character; the whole buffer
    /// is decoded at once so that never shows up in the result.
    pub fn read_to_string(&mut self, chunk: usize) -> Result<String, FetchError> {
        let bytes = self.read_to_end(chunk)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Replaces the process-wide mask. See [`SnapshotDevice::set_mask`].
    pub fn set_mask(&self, mask: InfoMask) -> Result<(), FetchError> {
        self.device.set_mask(self.token, mask)
    }

    /// Raw 4-byte mask write. See [`SnapshotDevice::write`].
    pub fn write(&self, bytes: &[u8]) -> Result<usize, FetchError> {
        self.device.write(self.token, bytes)
    }

    /// Closes the session, surfacing any error instead of logging it.
    pub fn close(mut self) -> Result<(), FetchError> {
        self.closed = true;
        self.device.close(self.token)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.device.close(self.token) {
            tracing::debug!("{} already closed on drop: {e}", self.token);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token)
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{FetchError, InfoFlag, InfoMask, SnapshotDevice};
    use std::sync::Arc;
    use sys_metrics::FixedMetrics;

    fn device() -> SnapshotDevice {
        SnapshotDevice::with_defaults(Arc::new(
            FixedMetrics::new("node7").with_cpu_counts(2, 4),
        ))
    }

    #[test]
    fn test_drop_closes() {
        let device = device();
        {
            let _session = device.open().unwrap();
            assert!(device.is_open());
        }
        assert!(!device.is_open());
        let stats = device.stats();
        assert_eq!(stats.sessions_opened, 1);
        assert_eq!(stats.sessions_closed, 1);
        assert_eq!(stats.sessions_active(), 0);
    }

    #[test]
    fn test_explicit_close_then_drop_closes_once() {
        let device = device();
        let session = device.open().unwrap();
        session.close().unwrap();
        let stats = device.stats();
        assert_eq!(stats.sessions_closed, 1);
        assert_eq!(stats.rejected_operations, 0);
    }

    #[test]
    fn test_read_to_string_small_chunks() {
        let device = device();
        let mut session = device.open().unwrap();
        session
            .set_mask(InfoMask::NONE.with(InfoFlag::CpuCount))
            .unwrap();
        let text = session.read_to_string(3).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 8);
        assert!(rows[0].ends_with("  node7"));
        assert!(rows[1].ends_with("  -----"));
        assert!(rows[2].ends_with("CPUs: 2 / 4"));
        assert!(session.read_to_string(3).unwrap().is_empty());
    }

    #[test]
    fn test_zero_chunk_rejected() {
        let device = device();
        let mut session = device.open().unwrap();
        assert!(matches!(
            session.read_to_end(0),
            Err(FetchError::InvalidArgument(_))
        ));
        // The report was not consumed.
        assert!(!session.read_to_end(64).unwrap().is_empty());
    }

    #[test]
    fn test_write_through_session() {
        let device = device();
        let session = device.open().unwrap();
        assert_eq!(session.write(&0u32.to_ne_bytes()).unwrap(), 4);
        assert_eq!(device.mask(), InfoMask::NONE);
        assert!(session.write(&[0u8; 3]).is_err());
    }

    #[test]
    fn test_session_moves_across_threads() {
        let device = device();
        let mut session = device.open().unwrap();
        let handle = std::thread::spawn(move || session.read_to_end(16).unwrap().len());
        assert!(handle.join().unwrap() > 0);
        assert!(!device.is_open());
    }
}
