// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared setup.

pub mod fetch;
pub mod flags;
pub mod info;

use kfetch_core::DeviceConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber. `RUST_LOG` wins over `-v` when set.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads the device configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DeviceConfig> {
    match path {
        Some(path) => {
            let config = DeviceConfig::from_file(path).map_err(|e| {
                anyhow::anyhow!("failed to load config from '{}': {e}", path.display())
            })?;
            tracing::info!("loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(DeviceConfig::default()),
    }
}
