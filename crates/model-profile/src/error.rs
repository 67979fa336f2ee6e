// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for model profile loading.

/// Errors that can occur when loading a model profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The manifest file could not be read.
    #[error("failed to read profile manifest: {0}")]
    ReadError(#[from] std::io::Error),

    /// The manifest JSON is malformed.
    #[error("failed to parse profile manifest: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The manifest lists no operations.
    #[error("model profile '{0}' contains no operations")]
    EmptyProfile(String),

    /// Two operations share a name.
    #[error("duplicate operation name '{0}'")]
    DuplicateOp(String),
}
