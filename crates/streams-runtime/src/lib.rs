// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # streams-runtime
//!
//! Glue between user-facing configuration and the stream planner.
//!
//! - [`PlannerConfig`]: TOML configuration with the named performance hint,
//!   explicit counts, pinning, heuristic tuning, topology file.
//! - [`resolve_streams`] / [`plan_streams`]: apply a config to one
//!   compiled model against a topology.
//!
//! The resolved [`stream_planner::StreamConfigSummary`] is what a
//! thread-pool executor consumes to spawn and pin its stream threads.

mod config;
mod error;
mod planning;

pub use config::{PerformanceHint, PlannerConfig};
pub use error::RuntimeError;
pub use planning::{plan_streams, resolve_streams};
