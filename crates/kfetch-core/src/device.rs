// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The exclusive-session snapshot device.
//!
//! ```text
//!            open()                      close(token)
//!   Idle ─────────────────► Open ─────────────────────► Idle
//!    ▲   (waits while Open)  │  write/set_mask (global)
//!    │                       │  read: 1st call renders and caches,
//!    └── next waiter wakes ◄─┘        later calls drain the cache
//! ```
//!
//! # Thread Safety
//! `SnapshotDevice` is `Clone + Send + Sync`; clones share one state.
//! `open` is the only call that waits on other callers. Waiters park on a
//! condition variable and are woken one at a time as sessions close.
//! The state lock is never held across provider queries: the first read
//! marks the session as rendering, releases the lock, renders, and then
//! installs the report if the session is still open.
//!
//! # Tokens
//! Every session gets a fresh [`SessionToken`]. `close`, `read`, `write`
//! and `set_mask` reject any token other than the open session's with
//! [`FetchError::InvalidSessionState`], so a stale handle can never close
//! or read someone else's session.

use crate::report::DEFAULT_REPORT_CAPACITY;
use crate::{
    DeviceConfig, DeviceStats, FetchError, InfoMask, MetricLines, Report, Session, SharedMask,
};
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use sys_metrics::SystemMetricsProvider;

/// Opaque identifier of one open/close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    /// Raw token value, for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Materialization state of a session's report.
enum ReportState {
    Pending,
    /// A reader is querying the provider with the state lock released.
    Rendering,
    Ready(Report),
}

impl ReportState {
    fn bytes(&self) -> &[u8] {
        match self {
            ReportState::Ready(report) => report.as_bytes(),
            _ => &[],
        }
    }
}

/// Per-session state, present only while a session is open.
struct ActiveSession {
    token: SessionToken,
    report: ReportState,
    cursor: usize,
}

struct DeviceState {
    active: Option<ActiveSession>,
    next_token: u64,
}

struct DeviceInner {
    provider: Arc<dyn SystemMetricsProvider>,
    mask: SharedMask,
    capacity: usize,
    open_timeout: Option<Duration>,
    state: Mutex<DeviceState>,
    released: Condvar,
    stats: Mutex<DeviceStats>,
}

/// The snapshot device: one mask register, one session at a time.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use kfetch_core::{InfoFlag, InfoMask, SnapshotDevice};
/// use sys_metrics::FixedMetrics;
///
/// let device = SnapshotDevice::with_defaults(Arc::new(
///     FixedMetrics::new("node7").with_cpu_counts(2, 4),
/// ));
///
/// let mut session = device.open().unwrap();
/// session.set_mask(InfoMask::NONE.with(InfoFlag::CpuCount)).unwrap();
/// let text = session.read_to_string(64).unwrap();
/// assert!(text.lines().nth(2).unwrap().ends_with("CPUs: 2 / 4"));
///
/// // The report is delivered once per session.
/// let mut buf = [0u8; 16];
/// assert_eq!(session.read(&mut buf).unwrap(), 0);
/// session.close().unwrap();
/// ```
#[derive(Clone)]
pub struct SnapshotDevice {
    inner: Arc<DeviceInner>,
}

impl SnapshotDevice {
    /// Creates a device from a validated configuration.
    ///
    /// `mask` is the process-wide register; pass a clone of it to anyone
    /// else who may rewrite the mask.
    pub fn new(
        provider: Arc<dyn SystemMetricsProvider>,
        mask: SharedMask,
        config: &DeviceConfig,
    ) -> Result<Self, FetchError> {
        config.validate()?;
        tracing::info!(
            "snapshot device created: provider '{}', capacity {} bytes, mask {}",
            provider.name(),
            config.report_capacity,
            mask.load(),
        );
        Ok(Self::build(
            provider,
            mask,
            config.report_capacity,
            config.open_timeout(),
        ))
    }

    /// Creates a device with a fresh full mask, the default capacity and
    /// no open timeout.
    pub fn with_defaults(provider: Arc<dyn SystemMetricsProvider>) -> Self {
        Self::build(provider, SharedMask::default(), DEFAULT_REPORT_CAPACITY, None)
    }

    fn build(
        provider: Arc<dyn SystemMetricsProvider>,
        mask: SharedMask,
        capacity: usize,
        open_timeout: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(DeviceInner {
                provider,
                mask,
                capacity,
                open_timeout,
                state: Mutex::new(DeviceState {
                    active: None,
                    next_token: 1,
                }),
                released: Condvar::new(),
                stats: Mutex::new(DeviceStats::default()),
            }),
        }
    }

    // ── Session lifecycle ──────────────────────────────────────

    /// Opens a session, waiting while another one is open.
    ///
    /// Waits indefinitely unless the device was configured with an open
    /// timeout, in which case it fails with [`FetchError::OpenTimedOut`].
    pub fn open(&self) -> Result<Session, FetchError> {
        self.acquire(self.inner.open_timeout)
            .map(|token| Session::new(self.clone(), token))
    }

    /// Opens a session, waiting at most `timeout`.
    pub fn open_timeout(&self, timeout: Duration) -> Result<Session, FetchError> {
        self.acquire(Some(timeout))
            .map(|token| Session::new(self.clone(), token))
    }

    /// Opens a session only if the device is idle right now.
    pub fn try_open(&self) -> Option<Session> {
        let mut state = self.lock_state();
        if state.active.is_some() {
            return None;
        }
        let token = self.activate(&mut state);
        drop(state);
        Some(Session::new(self.clone(), token))
    }

    fn acquire(&self, timeout: Option<Duration>) -> Result<SessionToken, FetchError> {
        let started = Instant::now();
        // A timeout too large to represent waits without a deadline.
        let deadline = timeout.and_then(|t| started.checked_add(t));
        let mut state = self.lock_state();
        if state.active.is_some() {
            tracing::debug!("device busy; waiting for the open session to close");
        }

        while state.active.is_some() {
            state = match deadline {
                None => self
                    .inner
                    .released
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        drop(state);
                        self.with_stats(DeviceStats::record_open_timeout);
                        let waited_ms = started.elapsed().as_millis() as u64;
                        tracing::warn!("open timed out after {waited_ms} ms");
                        return Err(FetchError::OpenTimedOut { waited_ms });
                    }
                    self.inner
                        .released
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }

        Ok(self.activate(&mut state))
    }

    /// Marks the device open under a fresh token. Caller holds the state lock.
    fn activate(&self, state: &mut DeviceState) -> SessionToken {
        let token = SessionToken(state.next_token);
        state.next_token += 1;
        state.active = Some(ActiveSession {
            token,
            report: ReportState::Pending,
            cursor: 0,
        });
        self.with_stats(DeviceStats::record_open);
        tracing::info!("{token} opened");
        token
    }

    /// Closes the session named by `token` and wakes one waiter.
    pub fn close(&self, token: SessionToken) -> Result<(), FetchError> {
        let mut state = self.lock_state();
        self.active_mut(&mut state, token)?;
        state.active = None;
        drop(state);

        self.inner.released.notify_one();
        self.with_stats(DeviceStats::record_close);
        tracing::info!("{token} closed");
        Ok(())
    }

    /// Returns `true` while a session is open.
    pub fn is_open(&self) -> bool {
        self.lock_state().active.is_some()
    }

    // ── Mask writes ────────────────────────────────────────────

    /// Replaces the process-wide mask.
    ///
    /// Visible to the next report rendered by any session; a report that
    /// has already been rendered keeps its content. Unknown bits are
    /// stored as given and ignored when selecting lines.
    pub fn set_mask(&self, token: SessionToken, mask: InfoMask) -> Result<(), FetchError> {
        let mut state = self.lock_state();
        self.active_mut(&mut state, token)?;
        let previous = self.inner.mask.store(mask);
        drop(state);

        self.with_stats(DeviceStats::record_mask_write);
        tracing::debug!("{token} set mask {previous} -> {mask}");
        Ok(())
    }

    /// Raw mask write: exactly 4 bytes holding a native-endian 32-bit mask.
    ///
    /// Returns the number of bytes consumed (always 4).
    pub fn write(&self, token: SessionToken, bytes: &[u8]) -> Result<usize, FetchError> {
        let raw: [u8; 4] = match bytes.try_into() {
            Ok(raw) => raw,
            Err(_) => {
                // Token problems take precedence over argument problems.
                self.active_mut(&mut self.lock_state(), token)?;
                self.with_stats(DeviceStats::record_rejection);
                tracing::warn!("{token} wrote {} bytes; a mask is 4 bytes", bytes.len());
                return Err(FetchError::InvalidArgument(format!(
                    "mask write must be exactly 4 bytes, got {}",
                    bytes.len()
                )));
            }
        };
        self.set_mask(token, InfoMask::from_bits(u32::from_ne_bytes(raw)))?;
        Ok(raw.len())
    }

    /// Current value of the process-wide mask.
    pub fn mask(&self) -> InfoMask {
        self.inner.mask.load()
    }

    /// Another handle to the process-wide mask register.
    pub fn shared_mask(&self) -> SharedMask {
        self.inner.mask.clone()
    }

    // ── Reads ──────────────────────────────────────────────────

    /// Copies the next chunk of the session's report into `buf`.
    ///
    /// The first read of a session renders the report with the mask in
    /// effect at that moment. Returns the number of bytes copied; 0 once
    /// the report is drained. A zero-length `buf` while data is pending
    /// fails with [`FetchError::BufferTooSmall`] and changes nothing.
    ///
    /// Rendering runs without the state lock, so `set_mask`, `write` and
    /// `close` proceed while it is in flight. A mask written meanwhile does
    /// not affect the report being rendered. If the session is closed
    /// before rendering finishes, the report is discarded and the read
    /// fails with [`FetchError::InvalidSessionState`]. A second read of the
    /// same session during rendering fails the same way instead of waiting.
    pub fn read(&self, token: SessionToken, buf: &mut [u8]) -> Result<usize, FetchError> {
        let mut state = self.lock_state();
        let active = self.active_mut(&mut state, token)?;

        let pending = match active.report {
            ReportState::Ready(_) => false,
            ReportState::Pending => true,
            ReportState::Rendering => {
                self.with_stats(DeviceStats::record_rejection);
                tracing::warn!("{token} read while its report is still rendering");
                return Err(FetchError::InvalidSessionState {
                    token,
                    reason: "report is still being rendered",
                });
            }
        };

        if pending {
            if buf.is_empty() {
                return Err(FetchError::BufferTooSmall);
            }
            active.report = ReportState::Rendering;
            let mask = self.inner.mask.load();
            drop(state);

            let report = self.render(mask);

            state = self.lock_state();
            let active = self.active_mut(&mut state, token)?;
            active.report = ReportState::Ready(report);
            active.cursor = 0;
        }

        let ActiveSession { report, cursor, .. } = self.active_mut(&mut state, token)?;
        let remaining = &report.bytes()[*cursor..];
        if remaining.is_empty() {
            return Ok(0);
        }
        if buf.is_empty() {
            return Err(FetchError::BufferTooSmall);
        }

        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        *cursor += n;
        drop(state);

        self.with_stats(|s| s.record_delivery(n));
        tracing::debug!("{token} read {n} bytes");
        Ok(n)
    }

    /// Renders a report for `mask`. Called without the state lock.
    fn render(&self, mask: InfoMask) -> Report {
        let lines = MetricLines::collect(self.inner.provider.as_ref(), mask);
        let report = Report::render(&lines, self.inner.capacity);

        self.with_stats(|s| s.record_report(report.is_truncated(), lines.omitted().len()));
        if report.is_truncated() {
            tracing::warn!(
                "report truncated to {} bytes (capacity {})",
                report.len(),
                self.inner.capacity
            );
        }
        tracing::debug!(
            "rendered report: mask {mask}, {} lines, {} bytes",
            lines.len(),
            report.len()
        );
        report
    }

    // ── Introspection ──────────────────────────────────────────

    /// Maximum report size in bytes.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Returns a snapshot of the device counters.
    pub fn stats(&self) -> DeviceStats {
        self.inner
            .stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ── Helpers ────────────────────────────────────────────────

    fn lock_state(&self) -> MutexGuard<'_, DeviceState> {
        // No code path panics mid-update, so a poisoned state is still consistent.
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_stats(&self, f: impl FnOnce(&mut DeviceStats)) {
        f(&mut self.inner.stats.lock().unwrap_or_else(PoisonError::into_inner));
    }

    /// Returns the open session if `token` names it; records and logs a
    /// rejection otherwise.
    fn active_mut<'s>(
        &self,
        state: &'s mut DeviceState,
        token: SessionToken,
    ) -> Result<&'s mut ActiveSession, FetchError> {
        match state.active.as_mut() {
            Some(active) if active.token == token => Ok(active),
            other => {
                let reason = match other {
                    None => "no session is open",
                    Some(_) => "token does not match the open session",
                };
                self.with_stats(DeviceStats::record_rejection);
                tracing::warn!("rejected {token}: {reason}");
                Err(FetchError::InvalidSessionState { token, reason })
            }
        }
    }
}

impl fmt::Debug for SnapshotDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotDevice")
            .field("provider", &self.inner.provider.name())
            .field("mask", &self.inner.mask.load())
            .field("capacity", &self.inner.capacity)
            .field("open", &self.is_open())
            .finish()
    }
}
