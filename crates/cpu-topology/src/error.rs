// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for topology construction and loading.

/// Errors raised while building or loading a [`crate::ProcessorTypeTable`].
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// The table has no rows at all.
    #[error("processor type table contains no rows")]
    EmptyTable,

    /// A row's `all` column disagrees with the sum of its parts.
    #[error("row {row}: all={all} but main+efficient+hyper={parts}")]
    InconsistentRow { row: usize, all: u32, parts: u32 },

    /// The per-node rows do not add up to the aggregate row.
    #[error("per-node rows do not sum to the aggregate: {detail}")]
    NodeSumMismatch { detail: String },

    /// A topology description file could not be read.
    #[error("failed to read topology file {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// A topology description could not be parsed.
    #[error("failed to parse topology description: {0}")]
    ParseError(String),
}
