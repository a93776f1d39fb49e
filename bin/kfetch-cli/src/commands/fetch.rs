// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `kfetch fetch` command: one full session against the device.
//!
//! ```text
//! open → [write 4-byte mask] → read in chunks until 0 → close
//! ```
//! The device calls block, so the session runs on the blocking pool.

use kfetch_core::{DeviceConfig, DeviceStats, InfoFlag, InfoMask, SharedMask, SnapshotDevice};
use std::sync::Arc;

/// Mask selection gathered from the command line.
#[derive(Debug, Default)]
pub struct Selection {
    pub all: bool,
    pub cpu_model: bool,
    pub memory: bool,
    pub num_cpus: bool,
    pub procs: bool,
    pub release: bool,
    pub uptime: bool,
    pub mask: Option<String>,
}

impl Selection {
    /// The mask to write, or `None` to keep the device's current mask.
    pub fn to_mask(&self) -> anyhow::Result<Option<InfoMask>> {
        let picks = [
            (self.release, InfoFlag::Release),
            (self.cpu_model, InfoFlag::CpuModel),
            (self.num_cpus, InfoFlag::CpuCount),
            (self.memory, InfoFlag::Memory),
            (self.procs, InfoFlag::ProcessCount),
            (self.uptime, InfoFlag::Uptime),
        ];
        let mut mask = InfoMask::from_flags(
            picks
                .iter()
                .filter(|(picked, _)| *picked)
                .map(|(_, flag)| *flag),
        );
        let mut any = mask != InfoMask::NONE;

        if self.all {
            mask = InfoMask::FULL;
            any = true;
        }
        if let Some(expr) = &self.mask {
            mask = InfoMask::from_bits(mask.bits() | InfoMask::parse(expr)?.bits());
            any = true;
        }
        Ok(any.then_some(mask))
    }
}

pub async fn execute(
    config: DeviceConfig,
    selection: Selection,
    chunk: Option<usize>,
    show_stats: bool,
) -> anyhow::Result<()> {
    let mask = selection.to_mask()?;
    let chunk = chunk.unwrap_or(config.read_chunk_bytes);
    let register = SharedMask::new(config.initial_mask()?);
    let provider = Arc::new(config.metrics_provider());
    let device = SnapshotDevice::new(provider, register, &config)?;

    let (report, stats) = tokio::task::spawn_blocking(move || run_session(&device, mask, chunk))
        .await??;

    print!("{report}");
    if show_stats {
        println!();
        println!("{}", stats.summary());
    }
    Ok(())
}

fn run_session(
    device: &SnapshotDevice,
    mask: Option<InfoMask>,
    chunk: usize,
) -> anyhow::Result<(String, DeviceStats)> {
    let mut session = device.open()?;
    if let Some(mask) = mask {
        tracing::debug!("writing mask {mask}");
        session.write(&mask.bits().to_ne_bytes())?;
    }
    let report = session.read_to_string(chunk)?;
    session.close()?;
    Ok((report, device.stats()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sys_metrics::FixedMetrics;

    #[test]
    fn test_no_selection_keeps_mask() {
        assert_eq!(Selection::default().to_mask().unwrap(), None);
    }

    #[test]
    fn test_flags_combine() {
        let sel = Selection {
            num_cpus: true,
            memory: true,
            ..Default::default()
        };
        let mask = sel.to_mask().unwrap().unwrap();
        assert_eq!(mask.bits(), InfoFlag::CpuCount.bit() | InfoFlag::Memory.bit());
    }

    #[test]
    fn test_all_and_expression() {
        let sel = Selection {
            all: true,
            ..Default::default()
        };
        assert_eq!(sel.to_mask().unwrap(), Some(InfoMask::FULL));

        let sel = Selection {
            release: true,
            mask: Some("uptime".into()),
            ..Default::default()
        };
        let mask = sel.to_mask().unwrap().unwrap();
        assert!(mask.contains(InfoFlag::Release));
        assert!(mask.contains(InfoFlag::Uptime));

        let sel = Selection {
            mask: Some("none".into()),
            ..Default::default()
        };
        assert_eq!(sel.to_mask().unwrap(), Some(InfoMask::NONE));
    }

    #[test]
    fn test_bad_expression() {
        let sel = Selection {
            mask: Some("cpus,bogus".into()),
            ..Default::default()
        };
        assert!(sel.to_mask().is_err());
    }

    #[test]
    fn test_run_session() {
        let device = SnapshotDevice::with_defaults(Arc::new(
            FixedMetrics::new("node7").with_cpu_counts(2, 4),
        ));
        let mask = InfoMask::NONE.with(InfoFlag::CpuCount);
        let (report, stats) = run_session(&device, Some(mask), 5).unwrap();
        assert!(report.lines().nth(2).unwrap().ends_with("CPUs: 2 / 4"));
        assert_eq!(stats.mask_writes, 1);
        assert_eq!(stats.sessions_closed, 1);
    }
}
