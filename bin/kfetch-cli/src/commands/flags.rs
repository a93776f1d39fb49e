// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `kfetch flags` command: the mask bit assignment.

use kfetch_core::{InfoFlag, InfoMask};

pub async fn execute() -> anyhow::Result<()> {
    println!("  {:<10} {:>6}  {}", "FLAG", "BIT", "LINE");
    for flag in InfoFlag::PRIORITY {
        println!(
            "  {:<10} {:>#6x}  {}",
            flag.name(),
            flag.bit(),
            line_label(flag)
        );
    }
    println!();
    println!("  all = {:#x}, none = {:#x}", InfoMask::FULL.bits(), InfoMask::NONE.bits());
    Ok(())
}

fn line_label(flag: InfoFlag) -> &'static str {
    match flag {
        InfoFlag::Release => "Kernel: <release>",
        InfoFlag::CpuModel => "CPU: <model>",
        InfoFlag::CpuCount => "CPUs: <online> / <possible>",
        InfoFlag::Memory => "Mem: <free> MB / <total> MB",
        InfoFlag::ProcessCount => "Procs: <count>",
        InfoFlag::Uptime => "Uptime: <minutes> mins",
    }
}
