// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The metric-selection mask and its process-wide register.
//!
//! Bit assignment (fixed, shared with existing front ends):
//!
//! | Flag           | Bit      | Name        | CLI |
//! |----------------|----------|-------------|-----|
//! | `Release`      | `1 << 0` | `release`   | `-r` |
//! | `CpuCount`     | `1 << 1` | `cpus`      | `-n` |
//! | `CpuModel`     | `1 << 2` | `cpu-model` | `-c` |
//! | `Memory`       | `1 << 3` | `mem`       | `-m` |
//! | `Uptime`       | `1 << 4` | `uptime`    | `-u` |
//! | `ProcessCount` | `1 << 5` | `procs`     | `-p` |
//!
//! Report lines follow [`InfoFlag::PRIORITY`], not bit order.

use crate::FetchError;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// One optional metric line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InfoFlag {
    Release,
    CpuModel,
    CpuCount,
    Memory,
    ProcessCount,
    Uptime,
}

impl InfoFlag {
    /// Order in which selected lines appear in a report.
    pub const PRIORITY: [InfoFlag; 6] = [
        InfoFlag::Release,
        InfoFlag::CpuModel,
        InfoFlag::CpuCount,
        InfoFlag::Memory,
        InfoFlag::ProcessCount,
        InfoFlag::Uptime,
    ];

    /// The flag's bit in the mask.
    pub const fn bit(self) -> u32 {
        match self {
            InfoFlag::Release => 1 << 0,
            InfoFlag::CpuCount => 1 << 1,
            InfoFlag::CpuModel => 1 << 2,
            InfoFlag::Memory => 1 << 3,
            InfoFlag::Uptime => 1 << 4,
            InfoFlag::ProcessCount => 1 << 5,
        }
    }

    /// Canonical name used in config files and `Display`.
    pub fn name(self) -> &'static str {
        match self {
            InfoFlag::Release => "release",
            InfoFlag::CpuModel => "cpu-model",
            InfoFlag::CpuCount => "cpus",
            InfoFlag::Memory => "mem",
            InfoFlag::ProcessCount => "procs",
            InfoFlag::Uptime => "uptime",
        }
    }

    /// Looks up a flag by name. Accepts the canonical name and a few aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "release" | "kernel" => Some(InfoFlag::Release),
            "cpu-model" | "cpu_model" | "model" => Some(InfoFlag::CpuModel),
            "cpus" | "cpu-count" | "cpu_count" => Some(InfoFlag::CpuCount),
            "mem" | "memory" => Some(InfoFlag::Memory),
            "procs" | "processes" | "process-count" => Some(InfoFlag::ProcessCount),
            "uptime" => Some(InfoFlag::Uptime),
            _ => None,
        }
    }
}

impl fmt::Display for InfoFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`InfoFlag`]s stored as a bitmask.
///
/// Any `u32` is a valid mask: bits outside [`InfoMask::FULL`] are kept as
/// written but never select a line.
///
/// # Examples
/// ```
/// use kfetch_core::{InfoFlag, InfoMask};
///
/// let m: InfoMask = "cpus,mem".parse().unwrap();
/// assert!(m.contains(InfoFlag::Memory));
/// assert_eq!(m.bits(), 0b1010);
/// assert_eq!(m.to_string(), "cpus,mem");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct InfoMask(u32);

impl InfoMask {
    /// No optional lines.
    pub const NONE: InfoMask = InfoMask(0);
    /// Every known flag.
    pub const FULL: InfoMask = InfoMask(0x3f);

    /// Wraps raw bits without validation.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits, including unknown ones.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Builds a mask from flags.
    pub fn from_flags(flags: impl IntoIterator<Item = InfoFlag>) -> Self {
        flags.into_iter().fold(Self::NONE, Self::with)
    }

    pub fn contains(self, flag: InfoFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn with(self, flag: InfoFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    pub fn without(self, flag: InfoFlag) -> Self {
        Self(self.0 & !flag.bit())
    }

    /// Bits that do not correspond to any flag.
    pub fn unknown_bits(self) -> u32 {
        self.0 & !Self::FULL.0
    }

    /// Selected flags in report priority order.
    pub fn selected(self) -> impl Iterator<Item = InfoFlag> {
        InfoFlag::PRIORITY
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }

    /// Parses a mask string.
    ///
    /// Accepted forms (case-insensitive): `"all"`/`"full"`, `"none"`, a
    /// decimal or `0x`-prefixed hex number (a negative decimal is taken as
    /// its two's-complement bits), or flag names separated by `,`, `|` or
    /// `+`.
    pub fn parse(s: &str) -> Result<Self, FetchError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FetchError::InvalidArgument("empty mask".to_string()));
        }

        let lower = s.to_lowercase();
        match lower.as_str() {
            "all" | "full" => return Ok(Self::FULL),
            "none" => return Ok(Self::NONE),
            _ => {}
        }

        if let Some(hex) = lower.strip_prefix("0x") {
            return u32::from_str_radix(hex, 16)
                .map(Self)
                .map_err(|_| FetchError::InvalidArgument(format!("invalid hex mask '{s}'")));
        }
        if let Ok(bits) = lower.parse::<u32>() {
            return Ok(Self(bits));
        }
        if let Ok(signed) = lower.parse::<i32>() {
            return Ok(Self(signed as u32));
        }

        lower
            .split(|c: char| c == ',' || c == '|' || c == '+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(Self::NONE, |mask, part| {
                InfoFlag::from_name(part).map(|flag| mask.with(flag)).ok_or_else(|| {
                    FetchError::InvalidArgument(format!(
                        "unknown flag '{part}'; expected release, cpu-model, cpus, mem, procs or uptime"
                    ))
                })
            })
    }
}

impl Default for InfoMask {
    fn default() -> Self {
        Self::FULL
    }
}

impl FromStr for InfoMask {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u32> for InfoMask {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for InfoMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.selected().map(|flag| flag.name().to_string()).collect();
        if self.unknown_bits() != 0 {
            names.push(format!("{:#x}", self.unknown_bits()));
        }
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(","))
        }
    }
}

impl fmt::Debug for InfoMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoMask({:#x}: {self})", self.0)
    }
}

/// Process-wide mask register shared by every session of a device.
///
/// Cloning yields another handle to the same register. A store is visible
/// to every report generated afterwards, whichever handle wrote it.
#[derive(Debug, Clone)]
pub struct SharedMask(Arc<AtomicU32>);

impl SharedMask {
    pub fn new(initial: InfoMask) -> Self {
        Self(Arc::new(AtomicU32::new(initial.bits())))
    }

    /// Current mask.
    pub fn load(&self) -> InfoMask {
        InfoMask(self.0.load(Ordering::Acquire))
    }

    /// Replaces the mask, returning the previous value.
    pub fn store(&self, mask: InfoMask) -> InfoMask {
        InfoMask(self.0.swap(mask.bits(), Ordering::AcqRel))
    }
}

impl Default for SharedMask {
    fn default() -> Self {
        Self::new(InfoMask::FULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_match_flag_table() {
        assert_eq!(InfoFlag::Release.bit(), 0x01);
        assert_eq!(InfoFlag::CpuCount.bit(), 0x02);
        assert_eq!(InfoFlag::CpuModel.bit(), 0x04);
        assert_eq!(InfoFlag::Memory.bit(), 0x08);
        assert_eq!(InfoFlag::Uptime.bit(), 0x10);
        assert_eq!(InfoFlag::ProcessCount.bit(), 0x20);
        assert_eq!(InfoMask::from_flags(InfoFlag::PRIORITY), InfoMask::FULL);
    }

    #[test]
    fn test_selected_in_priority_order() {
        let flags: Vec<InfoFlag> = InfoMask::FULL.selected().collect();
        assert_eq!(flags, InfoFlag::PRIORITY.to_vec());

        let m = InfoMask::from_flags([InfoFlag::Uptime, InfoFlag::Release, InfoFlag::ProcessCount]);
        let flags: Vec<InfoFlag> = m.selected().collect();
        assert_eq!(
            flags,
            vec![InfoFlag::Release, InfoFlag::ProcessCount, InfoFlag::Uptime]
        );
    }

    #[test]
    fn test_unknown_bits_ignored_for_selection() {
        let m = InfoMask::from_bits(0xffff_ff00 | InfoFlag::Memory.bit());
        assert_eq!(m.unknown_bits(), 0xffff_ff00);
        assert_eq!(m.selected().collect::<Vec<_>>(), vec![InfoFlag::Memory]);
        assert_eq!(m.bits(), 0xffff_ff08);
    }

    #[test]
    fn test_with_without() {
        let m = InfoMask::NONE.with(InfoFlag::CpuCount).with(InfoFlag::Memory);
        assert!(m.contains(InfoFlag::CpuCount));
        let m = m.without(InfoFlag::CpuCount);
        assert!(!m.contains(InfoFlag::CpuCount));
        assert!(m.contains(InfoFlag::Memory));
    }

    #[test]
    fn test_parse_keywords_and_numbers() {
        assert_eq!(InfoMask::parse("all").unwrap(), InfoMask::FULL);
        assert_eq!(InfoMask::parse(" FULL ").unwrap(), InfoMask::FULL);
        assert_eq!(InfoMask::parse("none").unwrap(), InfoMask::NONE);
        assert_eq!(InfoMask::parse("0x3F").unwrap(), InfoMask::FULL);
        assert_eq!(InfoMask::parse("10").unwrap().bits(), 10);
        assert_eq!(InfoMask::parse("-1").unwrap().bits(), u32::MAX);
    }

    #[test]
    fn test_parse_names() {
        let m = InfoMask::parse("cpus, mem|uptime+kernel").unwrap();
        assert_eq!(
            m,
            InfoMask::from_flags([
                InfoFlag::CpuCount,
                InfoFlag::Memory,
                InfoFlag::Uptime,
                InfoFlag::Release
            ])
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(InfoMask::parse(""), Err(FetchError::InvalidArgument(_))));
        assert!(matches!(InfoMask::parse("cpus,gpu"), Err(FetchError::InvalidArgument(_))));
        assert!(matches!(InfoMask::parse("0xzz"), Err(FetchError::InvalidArgument(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(InfoMask::NONE.to_string(), "none");
        assert_eq!(
            InfoMask::FULL.to_string(),
            "release,cpu-model,cpus,mem,procs,uptime"
        );
        assert_eq!(InfoMask::from_bits(0x48).to_string(), "mem,0x40");
        assert_eq!(format!("{:?}", InfoMask::from_bits(2)), "InfoMask(0x2: cpus)");
    }

    #[test]
    fn test_display_parse_roundtrip_for_known_masks() {
        for bits in 0..=InfoMask::FULL.bits() {
            let m = InfoMask::from_bits(bits);
            assert_eq!(InfoMask::parse(&m.to_string()).unwrap(), m);
        }
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&InfoMask::FULL).unwrap();
        assert_eq!(json, "63");
        let back: InfoMask = serde_json::from_str("5").unwrap();
        assert_eq!(back, InfoMask::from_flags([InfoFlag::Release, InfoFlag::CpuModel]));
    }

    #[test]
    fn test_shared_mask_visible_across_clones() {
        let a = SharedMask::default();
        let b = a.clone();
        assert_eq!(a.load(), InfoMask::FULL);
        let prev = b.store(InfoMask::NONE);
        assert_eq!(prev, InfoMask::FULL);
        assert_eq!(a.load(), InfoMask::NONE);
    }

    #[test]
    fn test_independent_registers() {
        let a = SharedMask::default();
        let b = SharedMask::default();
        a.store(InfoMask::NONE);
        assert_eq!(b.load(), InfoMask::FULL);
    }
}
