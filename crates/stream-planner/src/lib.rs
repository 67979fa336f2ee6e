// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # stream-planner
//!
//! Decides how many execution streams a compiled model gets on this host,
//! how many threads each stream uses, and which core kind and NUMA node
//! they are pinned to.
//!
//! # Pipeline
//!
//! ```text
//! StreamsConfigResolver
//!   ├─ ModelPreferenceAnalyzer  (topology + model → preferred threads/stream)
//!   ├─ StreamsTableBuilder      (topology + hints + preference → table)
//!   └─ StreamConfigSummary      (table → executor-facing layout)
//! ```
//!
//! All three stages are pure: no I/O, no threads, no shared mutable state.
//! The planner never fails; degenerate topologies collapse to a single
//! one-thread stream.
//!
//! # Hint Precedence
//! - `infer_requests` is a hard ceiling on the stream count.
//! - `threads` is a hard ceiling on the thread count.
//! - `streams` is a preference clamped to both.
//!
//! # Example
//! ```
//! use cpu_topology::{ProcessorTypeRow, ProcessorTypeTable};
//! use model_profile::{ModelProfile, OpKind};
//! use stream_planner::{StreamsConfig, StreamsConfigResolver};
//!
//! let topology = ProcessorTypeTable::single_node(ProcessorTypeRow::new(8, 4, 4, 0)).unwrap();
//! let model = ModelProfile::from_kinds("cnn", [OpKind::Convolution, OpKind::Eltwise]);
//!
//! let resolver = StreamsConfigResolver::new(&topology);
//! let config = resolver.resolve(1, &model, StreamsConfig::default());
//! assert_eq!(config.streams.unwrap().num_streams, 1);
//! ```

mod allocation;
mod builder;
mod error;
mod preference;
mod resolver;

pub use allocation::{AllocationEntry, StreamsAllocationTable};
pub use builder::{AllocationMode, StreamHints, StreamsTableBuilder};
pub use error::PlannerError;
pub use preference::{ModelPreferenceAnalyzer, PreferenceTuning};
pub use resolver::{Resolution, StreamConfigSummary, StreamsConfig, StreamsConfigResolver};
