// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Device configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! report_capacity = 1024
//! default_mask = "all"
//! open_timeout_ms = 5000
//! read_chunk_bytes = 256
//! procfs_root = "/proc"
//! sysfs_root = "/sys"
//! ```

use crate::report::DEFAULT_REPORT_CAPACITY;
use crate::{FetchError, InfoMask};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sys_metrics::{LinuxMetrics, DEFAULT_PROCFS_ROOT, DEFAULT_SYSFS_ROOT};

/// Configuration for a [`SnapshotDevice`](crate::SnapshotDevice).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeviceConfig {
    /// Maximum report size in bytes.
    #[serde(default = "default_capacity")]
    pub report_capacity: usize,
    /// Mask the register starts with (see [`InfoMask::parse`]).
    #[serde(default = "default_mask")]
    pub default_mask: String,
    /// Bound on how long `open` waits for the current session; `None` waits forever.
    pub open_timeout_ms: Option<u64>,
    /// Buffer size used when draining a session in chunks.
    #[serde(default = "default_chunk")]
    pub read_chunk_bytes: usize,
    /// procfs mount point for the Linux metrics provider.
    #[serde(default = "default_procfs_root")]
    pub procfs_root: PathBuf,
    /// sysfs mount point for the Linux metrics provider.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
}

fn default_capacity() -> usize {
    DEFAULT_REPORT_CAPACITY
}

fn default_mask() -> String {
    "all".to_string()
}

fn default_chunk() -> usize {
    256
}

fn default_procfs_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROCFS_ROOT)
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from(DEFAULT_SYSFS_ROOT)
}

impl DeviceConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, FetchError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FetchError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, FetchError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| FetchError::ConfigError(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, FetchError> {
        toml::to_string_pretty(self)
            .map_err(|e| FetchError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Checks value ranges and that the default mask parses.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.report_capacity == 0 {
            return Err(FetchError::ConfigError(
                "report_capacity must be greater than zero".to_string(),
            ));
        }
        if self.read_chunk_bytes == 0 {
            return Err(FetchError::ConfigError(
                "read_chunk_bytes must be greater than zero".to_string(),
            ));
        }
        self.initial_mask()?;
        Ok(())
    }

    /// Parses [`default_mask`](Self::default_mask).
    pub fn initial_mask(&self) -> Result<InfoMask, FetchError> {
        InfoMask::parse(&self.default_mask)
            .map_err(|e| FetchError::ConfigError(format!("invalid default_mask: {e}")))
    }

    pub fn open_timeout(&self) -> Option<Duration> {
        self.open_timeout_ms.map(Duration::from_millis)
    }

    /// Creates the Linux metrics provider rooted where this config says.
    pub fn metrics_provider(&self) -> LinuxMetrics {
        LinuxMetrics::with_roots(&self.procfs_root, &self.sysfs_root)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            report_capacity: default_capacity(),
            default_mask: default_mask(),
            open_timeout_ms: None,
            read_chunk_bytes: default_chunk(),
            procfs_root: default_procfs_root(),
            sysfs_root: default_sysfs_root(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InfoFlag;

    #[test]
    fn test_default() {
        let c = DeviceConfig::default();
        assert_eq!(c.report_capacity, 1024);
        assert_eq!(c.initial_mask().unwrap(), InfoMask::FULL);
        assert_eq!(c.open_timeout(), None);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
report_capacity = 512
default_mask = "cpus,mem"
open_timeout_ms = 250
procfs_root = "/tmp/proc"
"#;
        let c = DeviceConfig::from_toml(toml).unwrap();
        assert_eq!(c.report_capacity, 512);
        assert_eq!(
            c.initial_mask().unwrap(),
            InfoMask::from_flags([InfoFlag::CpuCount, InfoFlag::Memory])
        );
        assert_eq!(c.open_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(c.read_chunk_bytes, 256);
        assert_eq!(c.metrics_provider().procfs_root(), Path::new("/tmp/proc"));
        assert_eq!(c.metrics_provider().sysfs_root(), Path::new("/sys"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let c = DeviceConfig::from_toml("").unwrap();
        assert_eq!(c.report_capacity, DEFAULT_REPORT_CAPACITY);
        assert_eq!(c.default_mask, "all");
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = DeviceConfig {
            open_timeout_ms: Some(100),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = DeviceConfig::from_toml(&toml).unwrap();
        assert_eq!(back.open_timeout_ms, Some(100));
        assert_eq!(back.default_mask, c.default_mask);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            DeviceConfig::from_toml("report_capacity = 0"),
            Err(FetchError::ConfigError(_))
        ));
        assert!(matches!(
            DeviceConfig::from_toml("read_chunk_bytes = 0"),
            Err(FetchError::ConfigError(_))
        ));
        assert!(matches!(
            DeviceConfig::from_toml("default_mask = \"gpu\""),
            Err(FetchError::ConfigError(_))
        ));
        assert!(matches!(
            DeviceConfig::from_toml("report_capacity = \"big\""),
            Err(FetchError::ConfigError(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let result = DeviceConfig::from_file(Path::new("/nonexistent/kfetch.toml"));
        assert!(matches!(result, Err(FetchError::ConfigError(_))));
    }
}
