// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # kfetch
//!
//! Command-line front end for the kfetch snapshot device.
//!
//! ## Usage
//! ```bash
//! # Full report
//! kfetch fetch
//!
//! # Only CPU count and memory
//! kfetch fetch -n -m
//!
//! # Raw metrics, no banner
//! kfetch info --json
//!
//! # Mask bit assignment
//! kfetch flags
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kfetch",
    about = "System information snapshot with an ASCII banner",
    version,
    author
)]
struct Cli {
    /// Path to a TOML device configuration file.
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a session, optionally set the mask, and print the report.
    Fetch {
        /// Select every metric line.
        #[arg(short = 'a', long)]
        all: bool,

        /// CPU model.
        #[arg(short = 'c', long)]
        cpu_model: bool,

        /// Free and total memory.
        #[arg(short = 'm', long)]
        memory: bool,

        /// Online and possible CPU counts.
        #[arg(short = 'n', long)]
        num_cpus: bool,

        /// Process count.
        #[arg(short = 'p', long)]
        procs: bool,

        /// Kernel release.
        #[arg(short = 'r', long)]
        release: bool,

        /// Uptime in minutes.
        #[arg(short = 'u', long)]
        uptime: bool,

        /// Mask expression (e.g. "cpus,mem", "0x3f", "none"); combined with the flags above.
        #[arg(long)]
        mask: Option<String>,

        /// Read chunk size in bytes (defaults to the configured value).
        #[arg(long)]
        chunk: Option<usize>,

        /// Print device counters after the report.
        #[arg(long)]
        stats: bool,
    },

    /// Print every metric without the banner.
    Info {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List mask flag names and bit values.
    Flags,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch {
            all,
            cpu_model,
            memory,
            num_cpus,
            procs,
            release,
            uptime,
            mask,
            chunk,
            stats,
        } => {
            let selection = commands::fetch::Selection {
                all,
                cpu_model,
                memory,
                num_cpus,
                procs,
                release,
                uptime,
                mask,
            };
            commands::fetch::execute(config, selection, chunk, stats).await
        }
        Commands::Info { json } => commands::info::execute(config, json).await,
        Commands::Flags => commands::flags::execute().await,
    }
}
