// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The streams table builder.
//!
//! Turns a topology, the user's numeric hints, and the model's preferred
//! threads per stream into a [`StreamsAllocationTable`].
//!
//! # Modes
//!
//! | `streams` hint | Mode | Shape of the table |
//! |---|---|---|
//! | `1` | [`AllocationMode::Latency`] | one wide stream per node |
//! | `0` | [`AllocationMode::Throughput`] | as many narrow streams as fit |
//! | `k > 1` | [`AllocationMode::Explicit`] | `k` streams split by core kind |
//!
//! # Capacity
//!
//! Every mode allocates from the same per-node capacity: the topology's
//! main and efficient threads, trimmed to the `threads` ceiling. The
//! ceiling is spent on main cores first (node by node), then on efficient
//! cores, so a tight ceiling keeps the fastest cores.
//!
//! Hyper-threading siblings are never allocated.
//!
//! # Explicit counts
//!
//! An explicit (or request-capped) stream count is split between main and
//! efficient cores so that the table uses as many of the available threads
//! as an equal width per kind allows. Among equally good splits the one
//! closest to the proportional share wins.

use crate::{AllocationEntry, StreamsAllocationTable};
use cpu_topology::{CoreKind, ProcessorTypeTable};
use std::cmp::Reverse;

/// Numeric hints for the builder; `0` means "unset" in every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StreamHints {
    /// Requested stream count (`0` = auto, `1` = latency).
    pub streams: u32,
    /// Ceiling on total threads.
    pub threads: u32,
    /// Ceiling on total streams (concurrent infer requests).
    pub infer_requests: u32,
}

impl StreamHints {
    /// One stream per node.
    pub fn latency() -> Self {
        Self {
            streams: 1,
            ..Self::default()
        }
    }

    /// As many streams as the hardware supports.
    pub fn throughput() -> Self {
        Self::default()
    }

    pub fn with_streams(mut self, streams: u32) -> Self {
        self.streams = streams;
        self
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_infer_requests(mut self, infer_requests: u32) -> Self {
        self.infer_requests = infer_requests;
        self
    }
}

/// Allocation mode selected by the `streams` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    Latency,
    Throughput,
    Explicit(u32),
}

impl AllocationMode {
    pub fn from_streams(streams: u32) -> Self {
        match streams {
            0 => Self::Throughput,
            1 => Self::Latency,
            k => Self::Explicit(k),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Throughput => "throughput",
            Self::Explicit(_) => "explicit",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct NodeCapacity {
    node_id: u32,
    main: u32,
    efficient: u32,
}

impl NodeCapacity {
    fn count(&self, kind: CoreKind) -> u32 {
        match kind {
            CoreKind::Main => self.main,
            CoreKind::Efficient => self.efficient,
        }
    }

    fn set(&mut self, kind: CoreKind, threads: u32) {
        match kind {
            CoreKind::Main => self.main = threads,
            CoreKind::Efficient => self.efficient = threads,
        }
    }

    fn total(&self) -> u32 {
        self.main + self.efficient
    }
}

/// Per-node threads the builder may hand out.
#[derive(Debug)]
struct Capacity {
    nodes: Vec<NodeCapacity>,
}

impl Capacity {
    fn new(topology: &ProcessorTypeTable, thread_cap: u32) -> Self {
        let mut budget = if thread_cap == 0 { u32::MAX } else { thread_cap };
        let mut nodes: Vec<NodeCapacity> = (0..topology.num_nodes())
            .map(|i| NodeCapacity {
                node_id: i as u32,
                main: 0,
                efficient: 0,
            })
            .collect();

        for kind in CoreKind::ALL {
            for (node, row) in nodes.iter_mut().zip(topology.nodes()) {
                let take = row.count(kind).min(budget);
                node.set(kind, take);
                budget -= take;
            }
        }

        Self { nodes }
    }

    fn total(&self, kind: CoreKind) -> u32 {
        self.nodes.iter().map(|n| n.count(kind)).sum()
    }

    fn total_all(&self) -> u32 {
        self.nodes.iter().map(NodeCapacity::total).sum()
    }

    fn smallest_nonzero(&self, kind: CoreKind) -> Option<u32> {
        self.nodes
            .iter()
            .map(|n| n.count(kind))
            .filter(|&c| c > 0)
            .min()
    }

    fn largest(&self, kind: CoreKind) -> u32 {
        self.nodes.iter().map(|n| n.count(kind)).max().unwrap_or(0)
    }
}

/// Builds stream allocation tables.
///
/// Stateless and infallible: every input yields a table with at least one
/// entry, and no entry has a zero stream count or zero width.
#[derive(Debug, Clone, Default)]
pub struct StreamsTableBuilder;

impl StreamsTableBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the allocation table.
    ///
    /// `model_prefer_threads`, when nonzero, sets the width of main-core
    /// streams in throughput and explicit modes. It is ignored in latency
    /// mode, where each node already runs a single stream.
    pub fn build(
        &self,
        hints: StreamHints,
        model_prefer_threads: u32,
        topology: &ProcessorTypeTable,
    ) -> StreamsAllocationTable {
        let capacity = Capacity::new(topology, hints.threads);
        if capacity.total_all() == 0 {
            tracing::warn!("topology has no schedulable threads, using single-stream fallback");
            return StreamsAllocationTable::fallback();
        }

        let mode = AllocationMode::from_streams(hints.streams);
        let entries = match mode {
            AllocationMode::Latency => latency(&capacity, hints.infer_requests),
            AllocationMode::Throughput => {
                throughput(&capacity, model_prefer_threads, hints.infer_requests)
            }
            AllocationMode::Explicit(k) => {
                explicit(&capacity, k, model_prefer_threads, hints.infer_requests)
            }
        };

        if entries.is_empty() {
            tracing::warn!(mode = mode.as_str(), "no streams allocated, using single-stream fallback");
            return StreamsAllocationTable::fallback();
        }

        let table = StreamsAllocationTable::from_entries(entries);
        tracing::debug!(mode = mode.as_str(), "{}", table.summary());
        table
    }
}

fn latency(capacity: &Capacity, infer_requests: u32) -> Vec<AllocationEntry> {
    let limit = if infer_requests == 0 {
        usize::MAX
    } else {
        infer_requests as usize
    };

    capacity
        .nodes
        .iter()
        .filter(|n| n.total() > 0)
        .take(limit)
        .map(|n| {
            let kind = if n.main > 0 {
                CoreKind::Main
            } else {
                CoreKind::Efficient
            };
            AllocationEntry::new(1, kind, n.total(), n.node_id)
        })
        .collect()
}

fn throughput(capacity: &Capacity, prefer: u32, infer_requests: u32) -> Vec<AllocationEntry> {
    let main_width = match capacity.smallest_nonzero(CoreKind::Main) {
        Some(smallest) if prefer > 0 => prefer.min(smallest),
        _ => 1,
    };

    let mut entries = Vec::new();
    for kind in CoreKind::ALL {
        let width = match kind {
            CoreKind::Main => main_width,
            CoreKind::Efficient => 1,
        };
        for node in &capacity.nodes {
            let streams = node.count(kind) / width;
            if streams > 0 {
                entries.push(AllocationEntry::new(streams, kind, width, node.node_id));
            }
        }
    }

    let total: u32 = entries.iter().map(|e| e.stream_count).sum();
    if infer_requests > 0 && total > infer_requests {
        tracing::debug!(total, infer_requests, "stream count capped by infer requests");
        return explicit(capacity, infer_requests, prefer, infer_requests);
    }
    entries
}

fn explicit(
    capacity: &Capacity,
    requested: u32,
    prefer: u32,
    infer_requests: u32,
) -> Vec<AllocationEntry> {
    let main_avail = capacity.total(CoreKind::Main);
    let eff_avail = capacity.total(CoreKind::Efficient);

    let mut streams = requested;
    if infer_requests > 0 {
        streams = streams.min(infer_requests);
    }
    streams = streams.min(main_avail + eff_avail);

    let main_width =
        (prefer > 0).then(|| prefer.clamp(1, capacity.largest(CoreKind::Main).max(1)));
    let layout = |main_streams: u32| {
        let mut entries = match main_width {
            Some(width) => place(capacity, CoreKind::Main, main_streams, width).0,
            None => place_evenly(capacity, CoreKind::Main, main_streams),
        };
        entries.extend(place_evenly(capacity, CoreKind::Efficient, streams - main_streams));
        entries
    };

    // Every feasible split is scored by threads used. Ties go to the split
    // closest to the proportional share, then to more main streams.
    let (proportional, _) = split_streams(streams, main_avail, eff_avail);
    let lowest = streams.saturating_sub(eff_avail);
    let highest = streams.min(main_avail);
    let best = (lowest..=highest)
        .max_by_key(|&m| {
            let used: u32 = layout(m).iter().map(AllocationEntry::total_threads).sum();
            (used, Reverse(m.abs_diff(proportional)), m)
        })
        .unwrap_or(proportional);

    tracing::debug!(
        requested,
        main_streams = best,
        eff_streams = streams - best,
        "split explicit stream count"
    );
    layout(best)
}

/// Splits `streams` between main and efficient capacity in proportion to
/// their sizes, rounding the main share up. Neither share exceeds its
/// capacity; overflow goes to the other kind.
fn split_streams(streams: u32, main: u32, efficient: u32) -> (u32, u32) {
    if streams == 0 {
        return (0, 0);
    }
    let total = u64::from(main) + u64::from(efficient);
    let main_share = (u64::from(streams) * u64::from(main)).div_ceil(total) as u32;

    let main_streams = main_share.min(main);
    let eff_streams = (streams - main_streams).min(efficient);
    let main_streams = (streams - eff_streams).min(main);
    (main_streams, eff_streams)
}

/// Places up to `streams` streams of `width` threads node by node.
/// Returns the entries and the number of streams placed.
fn place(
    capacity: &Capacity,
    kind: CoreKind,
    streams: u32,
    width: u32,
) -> (Vec<AllocationEntry>, u32) {
    let mut left = streams;
    let mut entries = Vec::new();
    for node in &capacity.nodes {
        if left == 0 {
            break;
        }
        let n = (node.count(kind) / width).min(left);
        if n > 0 {
            entries.push(AllocationEntry::new(n, kind, width, node.node_id));
            left -= n;
        }
    }
    (entries, streams - left)
}

/// Places exactly `streams` streams (which must not exceed the kind's
/// capacity) at the widest width that still fits every node split.
/// No width above `total / streams` can fit, so the search starts there.
fn place_evenly(capacity: &Capacity, kind: CoreKind, streams: u32) -> Vec<AllocationEntry> {
    if streams == 0 {
        return Vec::new();
    }
    let mut width = (capacity.total(kind) / streams).max(1);
    loop {
        let (entries, placed) = place(capacity, kind, streams, width);
        if placed == streams || width == 1 {
            return entries;
        }
        width -= 1;
    }
}
