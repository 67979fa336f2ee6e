// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `cpu-streams plan` command: resolve the stream layout for a model.

use crate::PlanArgs;
use model_profile::{ModelProfile, ParallelismProfile};
use std::path::PathBuf;
use stream_planner::Resolution;
use streams_runtime::{plan_streams, PerformanceHint, PlannerConfig};

pub fn execute(config: Option<PathBuf>, args: PlanArgs) -> anyhow::Result<()> {
    let mut cfg = super::load_config(config.as_deref())?;
    apply_overrides(&mut cfg, &args)?;

    let topology = cfg.load_topology()?;
    tracing::info!("topology: {}", topology.summary());

    let resolution = match &args.model {
        Some(path) => {
            let model = ModelProfile::from_file(path).map_err(|e| {
                anyhow::anyhow!("failed to load model profile from '{}': {e}", path.display())
            })?;
            tracing::info!("model: {}", model.summary());
            plan_streams(&cfg, &topology, &model)
        }
        None => {
            tracing::debug!("no model profile given, planning without op hints");
            plan_streams(&cfg, &topology, &ParallelismProfile::default())
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        print_resolution(&cfg, &resolution);
    }

    // A table the host cannot hold is a planner bug; surface it as an error.
    resolution.table.validate(&topology)?;
    Ok(())
}

/// Layers command-line flags over the loaded configuration.
fn apply_overrides(cfg: &mut PlannerConfig, args: &PlanArgs) -> anyhow::Result<()> {
    if let Some(hint) = &args.hint {
        cfg.performance_hint = PerformanceHint::parse(hint)
            .ok_or_else(|| anyhow::anyhow!("unknown performance hint '{hint}'"))?;
    }
    if args.topology.is_some() {
        cfg.topology = args.topology.clone();
    }
    if args.streams.is_some() {
        cfg.num_streams = args.streams;
    }
    if args.threads.is_some() {
        cfg.inference_num_threads = args.threads;
    }
    if args.requests.is_some() {
        cfg.num_requests = args.requests;
    }
    if args.no_pinning {
        cfg.enable_cpu_pinning = false;
    }
    Ok(())
}

fn print_resolution(cfg: &PlannerConfig, resolution: &Resolution) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              cpu-streams · Stream Plan               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Hint:              {}", cfg.performance_hint.as_str());
    println!("  Mode:              {}", resolution.mode.as_str());
    println!("  Model preference:  {} threads/stream", resolution.model_prefer_threads);
    println!();

    println!(
        "  {:>8} {:>10} {:>8} {:>6}",
        "Streams", "Kind", "Threads", "Node",
    );
    println!("  {}", "-".repeat(36));
    for entry in resolution.table.entries() {
        println!(
            "  {:>8} {:>10} {:>8} {:>6}",
            entry.stream_count,
            entry.core_kind.as_str(),
            entry.threads_per_stream,
            entry.node_id,
        );
    }
    println!();
    println!("  {}", resolution.table.summary());
    println!("  {}", resolution.summary.summary());
}
