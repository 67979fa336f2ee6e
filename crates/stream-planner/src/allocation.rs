// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Stream allocation tables: the output of the table builder.
//!
//! Each [`AllocationEntry`] says "run `stream_count` streams of
//! `threads_per_stream` threads on `core_kind` cores of node `node_id`".
//! The table is the contract between the builder and the config resolver.

use crate::PlannerError;
use cpu_topology::{CoreKind, ProcessorTypeTable};

/// One homogeneous group of streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct AllocationEntry {
    /// Number of streams in this group (≥ 1).
    pub stream_count: u32,
    /// Core kind the streams are pinned to.
    pub core_kind: CoreKind,
    /// Threads used by each stream (≥ 1).
    pub threads_per_stream: u32,
    /// NUMA node id (index into [`ProcessorTypeTable::nodes`]).
    pub node_id: u32,
}

impl AllocationEntry {
    pub fn new(stream_count: u32, core_kind: CoreKind, threads_per_stream: u32, node_id: u32) -> Self {
        Self {
            stream_count,
            core_kind,
            threads_per_stream,
            node_id,
        }
    }

    /// Threads used by the whole group.
    pub fn total_threads(&self) -> u32 {
        self.stream_count * self.threads_per_stream
    }

    fn sort_key(&self) -> (CoreKind, u32) {
        (self.core_kind, self.node_id)
    }
}

/// Ordered list of allocation entries, main before efficient, then by node.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StreamsAllocationTable {
    entries: Vec<AllocationEntry>,
}

impl StreamsAllocationTable {
    /// Builds a table, putting entries in canonical order.
    ///
    /// The sort is stable, so entries sharing a kind and node keep their
    /// relative order.
    pub fn from_entries(mut entries: Vec<AllocationEntry>) -> Self {
        entries.sort_by_key(AllocationEntry::sort_key);
        Self { entries }
    }

    /// The table used when nothing can be allocated: one single-thread
    /// main-core stream on node 0.
    pub fn fallback() -> Self {
        Self {
            entries: vec![AllocationEntry::new(1, CoreKind::Main, 1, 0)],
        }
    }

    pub fn entries(&self) -> &[AllocationEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries pinned to one core kind.
    pub fn entries_of(&self, kind: CoreKind) -> impl Iterator<Item = &AllocationEntry> {
        self.entries.iter().filter(move |e| e.core_kind == kind)
    }

    /// Total number of streams.
    pub fn num_streams(&self) -> u32 {
        self.entries.iter().map(|e| e.stream_count).sum()
    }

    /// Total number of threads.
    pub fn num_threads(&self) -> u32 {
        self.entries.iter().map(AllocationEntry::total_threads).sum()
    }

    /// Threads used on one core kind of one node.
    pub fn threads_for(&self, kind: CoreKind, node_id: u32) -> u32 {
        self.entries_of(kind)
            .filter(|e| e.node_id == node_id)
            .map(AllocationEntry::total_threads)
            .sum()
    }

    /// Checks the table against a topology.
    ///
    /// Checks:
    /// - Table is non-empty.
    /// - Every entry has at least one stream and one thread per stream.
    /// - Entries are ordered by core kind, then node id.
    /// - Every node id exists in the topology.
    /// - No node runs more threads than its `main + efficient` count.
    ///
    /// The per-node check deliberately ignores core kind: a latency-mode
    /// stream spans both kinds of its node. The single-entry fallback is
    /// accepted on any topology.
    pub fn validate(&self, topology: &ProcessorTypeTable) -> Result<(), PlannerError> {
        if self.entries.is_empty() {
            return Err(PlannerError::EmptyTable);
        }
        if *self == Self::fallback() {
            return Ok(());
        }

        let nodes = topology.nodes();
        let mut used = vec![0u32; nodes.len()];
        let mut prev: Option<(CoreKind, u32)> = None;

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.stream_count == 0 {
                return Err(PlannerError::InvalidEntry {
                    index,
                    detail: "stream count is zero".into(),
                });
            }
            if entry.threads_per_stream == 0 {
                return Err(PlannerError::InvalidEntry {
                    index,
                    detail: "threads per stream is zero".into(),
                });
            }

            let key = entry.sort_key();
            if prev.is_some_and(|p| p > key) {
                return Err(PlannerError::OutOfOrder {
                    index,
                    kind: entry.core_kind,
                    node_id: entry.node_id,
                });
            }
            prev = Some(key);

            let slot = used
                .get_mut(entry.node_id as usize)
                .ok_or(PlannerError::UnknownNode {
                    index,
                    node_id: entry.node_id,
                })?;
            *slot += entry.total_threads();
        }

        for (node_id, (row, &used)) in nodes.iter().zip(&used).enumerate() {
            if used > row.schedulable() {
                return Err(PlannerError::OverSubscribed {
                    node_id: node_id as u32,
                    used,
                    available: row.schedulable(),
                });
            }
        }

        Ok(())
    }

    /// Returns a one-line summary, e.g.
    /// `4 streams / 8 threads: [4x1 main@0, 4x1 efficient@0]`.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| {
                format!(
                    "{}x{} {}@{}",
                    e.stream_count, e.threads_per_stream, e.core_kind, e.node_id
                )
            })
            .collect();
        format!(
            "{} streams / {} threads: [{}]",
            self.num_streams(),
            self.num_threads(),
            parts.join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu_topology::ProcessorTypeRow;

    fn hybrid() -> ProcessorTypeTable {
        ProcessorTypeTable::single_node(ProcessorTypeRow::new(8, 4, 4, 0)).unwrap()
    }

    fn sample_table() -> StreamsAllocationTable {
        StreamsAllocationTable::from_entries(vec![
            AllocationEntry::new(4, CoreKind::Efficient, 1, 0),
            AllocationEntry::new(2, CoreKind::Main, 2, 0),
        ])
    }

    #[test]
    fn test_from_entries_sorts() {
        let t = sample_table();
        assert_eq!(t.entries()[0].core_kind, CoreKind::Main);
        assert_eq!(t.entries()[1].core_kind, CoreKind::Efficient);
    }

    #[test]
    fn test_totals() {
        let t = sample_table();
        assert_eq!(t.num_streams(), 6);
        assert_eq!(t.num_threads(), 8);
        assert_eq!(t.threads_for(CoreKind::Main, 0), 4);
        assert_eq!(t.threads_for(CoreKind::Efficient, 0), 4);
        assert_eq!(t.threads_for(CoreKind::Main, 1), 0);
    }

    #[test]
    fn test_validate_ok() {
        sample_table().validate(&hybrid()).unwrap();
    }

    #[test]
    fn test_validate_empty() {
        let t = StreamsAllocationTable::from_entries(vec![]);
        assert!(matches!(t.validate(&hybrid()), Err(PlannerError::EmptyTable)));
    }

    #[test]
    fn test_validate_zero_width() {
        let t = StreamsAllocationTable::from_entries(vec![AllocationEntry::new(
            2,
            CoreKind::Main,
            0,
            0,
        )]);
        assert!(matches!(
            t.validate(&hybrid()),
            Err(PlannerError::InvalidEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_out_of_order() {
        let t = StreamsAllocationTable {
            entries: vec![
                AllocationEntry::new(1, CoreKind::Efficient, 1, 0),
                AllocationEntry::new(1, CoreKind::Main, 1, 0),
            ],
        };
        assert!(matches!(
            t.validate(&hybrid()),
            Err(PlannerError::OutOfOrder { index: 1, .. })
        ));
    }

    #[test]
    fn test_validate_unknown_node() {
        let t = StreamsAllocationTable::from_entries(vec![AllocationEntry::new(
            1,
            CoreKind::Main,
            1,
            3,
        )]);
        assert!(matches!(
            t.validate(&hybrid()),
            Err(PlannerError::UnknownNode { node_id: 3, .. })
        ));
    }

    #[test]
    fn test_validate_over_subscribed() {
        let t = StreamsAllocationTable::from_entries(vec![AllocationEntry::new(
            3,
            CoreKind::Main,
            3,
            0,
        )]);
        assert!(matches!(
            t.validate(&hybrid()),
            Err(PlannerError::OverSubscribed { used: 9, available: 8, .. })
        ));
    }

    #[test]
    fn test_fallback_accepted_on_empty_topology() {
        let empty = ProcessorTypeTable::single_node(ProcessorTypeRow::default()).unwrap();
        StreamsAllocationTable::fallback().validate(&empty).unwrap();
    }

    #[test]
    fn test_summary() {
        let s = sample_table().summary();
        assert!(s.starts_with("6 streams / 8 threads"));
        assert!(s.contains("2x2 main@0"));
        assert!(s.contains("4x1 efficient@0"));
    }
}
