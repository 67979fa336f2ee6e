// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cpu-streams
//!
//! Command-line interface for the CPU stream planner.
//!
//! ## Usage
//! ```bash
//! # Plan streams for a model on a described host
//! cpu-streams plan --topology ./topology.toml --model ./model.json --hint throughput
//!
//! # Cap threads and concurrent requests
//! cpu-streams plan --topology ./topology.toml --threads 12 --requests 4 --json
//!
//! # Inspect a topology description or a model profile
//! cpu-streams topology --topology ./topology.toml
//! cpu-streams profile --model ./model.json
//! ```

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cpu-streams",
    about = "Topology-aware CPU stream and thread planner",
    version,
    author
)]
struct Cli {
    /// Path to a TOML planner configuration file (CLI flags override it).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Planner inputs that can be given on the command line.
#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Topology description file (TOML or JSON).
    #[arg(short, long)]
    pub topology: Option<PathBuf>,

    /// Model profile manifest (JSON).
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Performance hint: latency, throughput, undefined.
    #[arg(long)]
    pub hint: Option<String>,

    /// Explicit stream count (0 = auto, 1 = latency).
    #[arg(short, long)]
    pub streams: Option<u32>,

    /// Ceiling on total inference threads.
    #[arg(long)]
    pub threads: Option<u32>,

    /// Ceiling on concurrent infer requests.
    #[arg(long)]
    pub requests: Option<u32>,

    /// Disable thread pinning (turns off the model preference heuristic).
    #[arg(long)]
    pub no_pinning: bool,

    /// Print the resolution as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the stream layout for a model on a host.
    Plan(PlanArgs),

    /// Display a topology description (or the host fallback).
    Topology {
        /// Topology description file (TOML or JSON).
        #[arg(short, long)]
        topology: Option<PathBuf>,

        /// Print the table as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Inspect a model profile: op mix and parallelism hints.
    Profile {
        /// Model profile manifest (JSON).
        #[arg(short, long)]
        model: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Plan(args) => commands::plan::execute(cli.config, args),
        Commands::Topology { topology, json } => {
            commands::topology::execute(cli.config, topology, json)
        }
        Commands::Profile { model } => commands::profile::execute(model),
    }
}
