// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `kfetch info` command: every metric, straight from the provider.
//!
//! Bypasses the device entirely, so it neither waits for nor disturbs an
//! open session. Metrics that cannot be read are listed as unavailable.

use kfetch_core::DeviceConfig;
use sys_metrics::{MetricsSnapshot, SystemMetricsProvider};

pub async fn execute(config: DeviceConfig, json: bool) -> anyhow::Result<()> {
    let provider = config.metrics_provider();
    let provider_name = provider.name().to_string();
    let snapshot = tokio::task::spawn_blocking(move || MetricsSnapshot::capture(&provider)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("  Host:      {}", opt(&snapshot.host_name));
    println!("  Kernel:    {}", opt(&snapshot.kernel_release));
    println!("  CPU:       {}", opt(&snapshot.cpu_model));
    match snapshot.cpu_counts {
        Some(c) => println!("  CPUs:      {} online / {} possible", c.online, c.possible),
        None => println!("  CPUs:      ?"),
    }
    match snapshot.memory {
        Some(m) => println!("  Memory:    {} MB free / {} MB total", m.free_mb(), m.total_mb()),
        None => println!("  Memory:    ?"),
    }
    println!("  Processes: {}", opt(&snapshot.process_count));
    println!("  Uptime:    {} min", opt(&snapshot.uptime_minutes));

    if !snapshot.unavailable.is_empty() {
        let names: Vec<&str> = snapshot.unavailable.iter().map(|m| m.name()).collect();
        println!();
        println!("  Unavailable: {}", names.join(", "));
    }
    println!();
    println!("{}", snapshot.summary());
    tracing::debug!("metrics read via {provider_name}");
    Ok(())
}

fn opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "?".to_string())
}
