// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cpu-topology
//!
//! Describes the CPU resources a host offers to the stream planner.
//!
//! A [`ProcessorTypeTable`] is an ordered list of [`ProcessorTypeRow`]s:
//! - **Row 0** is the system-wide aggregate.
//! - **Rows 1..N** (optional) break the aggregate down per NUMA node and
//!   must sum to row 0.
//!
//! Each row counts logical threads by core kind: performance (`main`),
//! efficient (`efficient`), and hyper-threading siblings (`hyper`).
//!
//! Tables are validated once at construction and are read-only afterwards,
//! so a single table can be shared by reference across any number of
//! planning calls.
//!
//! # Probing
//! This crate does not probe hardware. Tables come from an external probe,
//! from a TOML/JSON description file, or from the homogeneous fallback
//! [`ProcessorTypeTable::from_available_parallelism`].
//!
//! # Example
//! ```
//! use cpu_topology::{CoreKind, ProcessorTypeRow, ProcessorTypeTable};
//!
//! let table = ProcessorTypeTable::single_node(ProcessorTypeRow::new(8, 4, 4, 0)).unwrap();
//! assert!(table.is_hybrid());
//! assert_eq!(table.aggregate().count(CoreKind::Efficient), 4);
//! ```

mod error;
mod row;
mod table;

pub use error::TopologyError;
pub use row::{CoreKind, ProcessorTypeRow};
pub use table::ProcessorTypeTable;
