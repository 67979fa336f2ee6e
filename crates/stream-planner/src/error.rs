// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for allocation table validation.

use cpu_topology::CoreKind;

/// Invariant violations reported by
/// [`StreamsAllocationTable::validate`](crate::StreamsAllocationTable::validate).
///
/// The builder never produces these; they exist so tables obtained from
/// elsewhere (tests, hand-written fixtures, deserialized input) can be
/// checked against a topology.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// The table has no entries.
    #[error("allocation table is empty")]
    EmptyTable,

    /// An entry has a zero stream count or zero threads per stream.
    #[error("entry {index} is invalid: {detail}")]
    InvalidEntry { index: usize, detail: String },

    /// Entries are not ordered main-before-efficient, then by node id.
    #[error("entry {index} ({kind}, node {node_id}) is out of order")]
    OutOfOrder {
        index: usize,
        kind: CoreKind,
        node_id: u32,
    },

    /// An entry refers to a node the topology does not have.
    #[error("entry {index} refers to unknown node {node_id}")]
    UnknownNode { index: usize, node_id: u32 },

    /// A node's streams use more threads than it has.
    #[error("node {node_id} over-subscribed: {used} threads used, {available} available")]
    OverSubscribed {
        node_id: u32,
        used: u32,
        available: u32,
    },
}
