// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `cpu-streams topology` command: display the processor type table.
//!
//! Without a topology file (on the command line or in the config), shows
//! the homogeneous fallback built from the OS logical CPU count.

use cpu_topology::ProcessorTypeTable;
use std::path::PathBuf;

pub fn execute(config: Option<PathBuf>, topology: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let mut cfg = super::load_config(config.as_deref())?;
    if topology.is_some() {
        cfg.topology = topology;
    }
    let table = cfg.load_topology()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            cpu-streams · Processor Topology          ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    print_table(&table);
    println!();
    println!("{}", table.summary());
    Ok(())
}

/// Prints one line per row, aggregate first.
pub fn print_table(table: &ProcessorTypeTable) {
    println!(
        "  {:<10} {:>6} {:>6} {:>10} {:>6}",
        "Row", "All", "Main", "Efficient", "Hyper",
    );
    println!("  {}", "-".repeat(42));
    for (i, row) in table.rows().iter().enumerate() {
        let label = if i == 0 {
            "total".to_string()
        } else {
            format!("node {}", i - 1)
        };
        println!(
            "  {:<10} {:>6} {:>6} {:>10} {:>6}",
            label, row.all, row.main, row.efficient, row.hyper,
        );
    }
}
