// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `cpu-streams profile` command: display a model's operation mix.

use model_profile::{ModelProfile, ParallelismHintProvider};
use std::path::PathBuf;

pub fn execute(model: PathBuf) -> anyhow::Result<()> {
    let profile = ModelProfile::from_file(&model).map_err(|e| {
        anyhow::anyhow!("failed to load model profile from '{}': {e}", model.display())
    })?;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             cpu-streams · Model Profile              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Model: {}", profile.name);
    println!("  Ops:   {}", profile.num_ops());
    println!();

    println!("  {:<18} {:>6} {:>10}", "Kind", "Count", "Scaling");
    println!("  {}", "-".repeat(36));
    for (kind, count) in profile.kind_histogram() {
        let scaling = if kind.is_sequential() { "poor" } else { "good" };
        println!("  {:<18} {:>6} {:>10}", kind.as_str(), count, scaling);
    }
    println!();

    let hints = profile.parallelism_profile();
    println!(
        "  Sequential ops: {} of {} ({:.1}%)",
        hints.sequential_ops,
        hints.total_ops,
        hints.sequential_ratio() * 100.0,
    );
    println!();
    println!("{}", profile.summary());
    Ok(())
}
