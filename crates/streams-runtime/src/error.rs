// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for configuration and input loading.

/// Errors raised while assembling the planner's inputs.
///
/// Stream resolution itself is infallible; everything here happens before
/// the planner runs.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Configuration file or value is invalid.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The topology description could not be loaded.
    #[error("topology error: {0}")]
    TopologyError(#[from] cpu_topology::TopologyError),

    /// The model profile could not be loaded.
    #[error("model profile error: {0}")]
    ProfileError(#[from] model_profile::ProfileError),
}
