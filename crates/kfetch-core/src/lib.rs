// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # kfetch-core
//!
//! A system-information snapshot device with exclusive sessions.
//!
//! # Key Components
//!
//! - [`SnapshotDevice`] — the shared resource: one open session at a time,
//!   a process-wide mask, and a report delivered once per session in
//!   caller-sized chunks.
//! - [`Session`] — an RAII handle for one open/close cycle. Dropping it
//!   closes the device and wakes the next waiter.
//! - [`InfoMask`] / [`SharedMask`] — which metric lines to report, and the
//!   injected register holding the current selection.
//! - [`MetricLines`] and [`Report`] — the right-hand column and the final
//!   text merged with the banner, bounded by a byte capacity.
//! - [`DeviceConfig`] — TOML configuration; [`DeviceStats`] — counters.
//!
//! # Session Lifecycle
//!
//! ```text
//! SnapshotDevice::open()  ── waits while another session is open
//!       │
//!       ▼
//!    Session  ◄─── holds a fresh SessionToken
//!       │  set_mask / write      (process-wide, any time)
//!       │  read                  (1st read renders with the current mask)
//!       │  close() or drop()
//!       ▼
//!    device idle ──► next waiter wakes
//! ```
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use kfetch_core::{InfoMask, SnapshotDevice};
//! use sys_metrics::FixedMetrics;
//!
//! let device = SnapshotDevice::with_defaults(Arc::new(FixedMetrics::new("node7")));
//!
//! let mut session = device.open().unwrap();
//! session.set_mask(InfoMask::parse("release,mem").unwrap()).unwrap();
//! let report = session.read_to_string(256).unwrap();
//! assert!(report.contains("Kernel: "));
//! assert!(report.contains("Mem: 1024 MB / 4096 MB"));
//! assert!(!report.contains("Uptime:"));
//! ```

pub mod banner;
mod config;
mod device;
mod error;
mod lines;
mod mask;
mod report;
mod session;
mod stats;

pub use banner::{BANNER, BANNER_WIDTH, BLANK_ROW};
pub use config::DeviceConfig;
pub use device::{SessionToken, SnapshotDevice};
pub use error::FetchError;
pub use lines::{separator_for, MetricLines, MAX_SEPARATOR_LEN};
pub use mask::{InfoFlag, InfoMask, SharedMask};
pub use report::{Report, COLUMN_GAP, DEFAULT_REPORT_CAPACITY};
pub use session::Session;
pub use stats::DeviceStats;
