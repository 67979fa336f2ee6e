// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-profile
//!
//! A read-only view of a compiled model's operation mix, reduced to the
//! signal the stream planner needs: how well the model parallelizes.
//!
//! - [`OpKind`]: coarse operation category with a parallel-scaling class.
//! - [`ModelProfile`]: a named, ordered list of operations, loadable from
//!   a JSON manifest.
//! - [`ParallelismHintProvider`]: the narrow capability the planner
//!   depends on. Any graph representation can implement it; the planner
//!   never walks a concrete graph.
//!
//! # Manifest Format
//! ```json
//! {
//!   "name": "speech-rnnt",
//!   "ops": [
//!     { "name": "encoder.conv0", "op_type": "convolution" },
//!     { "name": "encoder.lstm0", "op_type": "lstm_sequence" }
//!   ]
//! }
//! ```
//!
//! # Example
//! ```
//! use model_profile::{ModelProfile, OpKind, ParallelismHintProvider};
//!
//! let profile = ModelProfile::from_kinds("toy", [OpKind::MatMul, OpKind::Lstm]);
//! let hints = profile.parallelism_profile();
//! assert_eq!(hints.sequential_ops, 1);
//! ```

mod error;
mod hints;
mod op;
mod profile;

pub use error::ProfileError;
pub use hints::{ParallelismHintProvider, ParallelismProfile};
pub use op::{OpKind, ParallelScaling};
pub use profile::{ModelProfile, OpDef};
