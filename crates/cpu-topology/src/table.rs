// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The validated processor type table.
//!
//! # File Format
//! TOML (one `[[rows]]` entry per row, aggregate first):
//! ```toml
//! [[rows]]
//! all = 16
//! main = 8
//! efficient = 8
//! hyper = 0
//! ```
//! JSON uses the same shape: `{ "rows": [ { "all": 16, ... } ] }`.

use crate::{CoreKind, ProcessorTypeRow, TopologyError};
use std::path::Path;

/// Ordered, validated description of the host's schedulable CPU threads.
///
/// Row 0 is the aggregate; rows 1..N, when present, are NUMA nodes.
/// Construction goes through [`ProcessorTypeTable::new`] (also used by
/// deserialization), so every instance satisfies the row invariants.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawTable")]
pub struct ProcessorTypeTable {
    rows: Vec<ProcessorTypeRow>,
}

#[derive(serde::Deserialize)]
struct RawTable {
    rows: Vec<ProcessorTypeRow>,
}

impl TryFrom<RawTable> for ProcessorTypeTable {
    type Error = TopologyError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        Self::new(raw.rows)
    }
}

impl ProcessorTypeTable {
    /// Builds a table from rows, aggregate first.
    ///
    /// # Checks
    /// - At least one row.
    /// - Every row satisfies `all == main + efficient + hyper`.
    /// - With more than one row, rows 1..N sum column-wise to row 0.
    pub fn new(rows: Vec<ProcessorTypeRow>) -> Result<Self, TopologyError> {
        if rows.is_empty() {
            return Err(TopologyError::EmptyTable);
        }

        for (i, row) in rows.iter().enumerate() {
            if !row.is_consistent() {
                return Err(TopologyError::InconsistentRow {
                    row: i,
                    all: row.all,
                    parts: row.parts(),
                });
            }
        }

        if rows.len() > 1 {
            let node_sum = rows[1..]
                .iter()
                .try_fold(ProcessorTypeRow::default(), |acc, r| acc.checked_add(*r));
            match node_sum {
                Some(sum) if sum == rows[0] => {}
                Some(sum) => {
                    return Err(TopologyError::NodeSumMismatch {
                        detail: format!("aggregate [{}] vs nodes [{}]", rows[0], sum),
                    });
                }
                None => {
                    return Err(TopologyError::NodeSumMismatch {
                        detail: format!("aggregate [{}] vs nodes overflowing u32", rows[0]),
                    });
                }
            }
        }

        Ok(Self { rows })
    }

    /// Builds a table for a host with a single NUMA node.
    pub fn single_node(row: ProcessorTypeRow) -> Result<Self, TopologyError> {
        Self::new(vec![row])
    }

    /// A single-node table with `threads` performance-core threads and no
    /// efficient cores or hyper-threading.
    pub fn homogeneous(threads: u32) -> Self {
        Self {
            rows: vec![ProcessorTypeRow::new(threads, threads, 0, 0)],
        }
    }

    /// Homogeneous fallback sized from the logical CPU count the OS reports.
    ///
    /// This is not a probe: it knows nothing about core kinds or NUMA
    /// layout and treats every logical CPU as a performance-core thread.
    pub fn from_available_parallelism() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(1);
        tracing::debug!(threads, "using homogeneous topology fallback");
        Self::homogeneous(threads)
    }

    /// Loads a table from a TOML or JSON file (chosen by extension).
    pub fn from_file(path: &Path) -> Result<Self, TopologyError> {
        let content = std::fs::read_to_string(path).map_err(|e| TopologyError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Parses a table from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, TopologyError> {
        toml::from_str(toml_str).map_err(|e| TopologyError::ParseError(e.to_string()))
    }

    /// Parses a table from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        serde_json::from_str(json).map_err(|e| TopologyError::ParseError(e.to_string()))
    }

    /// Serialises the table to TOML.
    pub fn to_toml(&self) -> Result<String, TopologyError> {
        toml::to_string_pretty(self).map_err(|e| TopologyError::ParseError(e.to_string()))
    }

    /// All rows, aggregate first.
    pub fn rows(&self) -> &[ProcessorTypeRow] {
        &self.rows
    }

    /// The system-wide aggregate (row 0).
    pub fn aggregate(&self) -> &ProcessorTypeRow {
        &self.rows[0]
    }

    /// Per-node rows; node `i` is row `i + 1`, or row 0 on single-node hosts.
    pub fn nodes(&self) -> &[ProcessorTypeRow] {
        if self.rows.len() > 1 {
            &self.rows[1..]
        } else {
            &self.rows[..1]
        }
    }

    /// Number of NUMA nodes described.
    pub fn num_nodes(&self) -> usize {
        self.nodes().len()
    }

    /// Returns `true` if the host has efficient cores.
    pub fn is_hybrid(&self) -> bool {
        self.aggregate().count(CoreKind::Efficient) > 0
    }

    /// Total logical threads, hyper-threading siblings included.
    pub fn total_threads(&self) -> u32 {
        self.aggregate().all
    }

    /// Threads available to pinned streams (`main + efficient`).
    pub fn schedulable_threads(&self) -> u32 {
        self.aggregate().schedulable()
    }

    /// Returns a one-line summary suitable for logging or CLI display.
    pub fn summary(&self) -> String {
        let agg = self.aggregate();
        format!(
            "Topology: {} node(s), {} logical threads ({} main, {} efficient, {} hyper), {}",
            self.num_nodes(),
            agg.all,
            agg.main,
            agg.efficient,
            agg.hyper,
            if self.is_hybrid() { "hybrid" } else { "homogeneous" },
        )
    }
}
