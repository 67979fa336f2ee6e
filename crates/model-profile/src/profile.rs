// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Model profiles: the ordered operation list of a compiled model.
//!
//! A profile carries operation names and categories only. It never holds
//! weights or tensor data, which keeps it cheap to build from any graph
//! representation.

use crate::{OpKind, ParallelismHintProvider, ParallelismProfile, ProfileError};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// A single operation in the profile.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OpDef {
    /// Operation name (e.g., `"encoder.lstm0"`).
    pub name: String,
    /// Operation category.
    pub kind: OpKind,
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    name: String,
    ops: Vec<ManifestOp>,
}

#[derive(Debug, serde::Deserialize)]
struct ManifestOp {
    name: String,
    op_type: String,
}

/// The operation mix of one compiled model.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ModelProfile {
    /// Human-readable model name.
    pub name: String,
    /// Operations in execution order.
    pub ops: Vec<OpDef>,
}

impl ModelProfile {
    pub fn new(name: impl Into<String>, ops: Vec<OpDef>) -> Self {
        Self {
            name: name.into(),
            ops,
        }
    }

    /// Builds a profile from bare kinds, naming ops `op.0`, `op.1`, ...
    pub fn from_kinds<I>(name: impl Into<String>, kinds: I) -> Self
    where
        I: IntoIterator<Item = OpKind>,
    {
        let ops = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| OpDef {
                name: format!("op.{i}"),
                kind,
            })
            .collect();
        Self::new(name, ops)
    }

    /// Loads a profile from a JSON manifest file.
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses and validates a profile from a JSON manifest string.
    ///
    /// # Checks
    /// - At least one operation.
    /// - No duplicate operation names.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let manifest: Manifest = serde_json::from_str(json)?;

        if manifest.ops.is_empty() {
            return Err(ProfileError::EmptyProfile(manifest.name));
        }

        let mut seen = HashSet::new();
        let mut ops = Vec::with_capacity(manifest.ops.len());
        for op in manifest.ops {
            if !seen.insert(op.name.clone()) {
                return Err(ProfileError::DuplicateOp(op.name));
            }
            let kind = OpKind::from_str_loose(&op.op_type);
            if kind == OpKind::Other {
                tracing::debug!("op '{}' has uncategorized type '{}'", op.name, op.op_type);
            }
            ops.push(OpDef {
                name: op.name,
                kind,
            });
        }

        Ok(Self::new(manifest.name, ops))
    }

    /// Returns the number of operations.
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Iterates over operation kinds in execution order.
    pub fn op_kinds(&self) -> impl Iterator<Item = OpKind> + '_ {
        self.ops.iter().map(|op| op.kind)
    }

    /// Operation counts per kind, sorted by kind label.
    pub fn kind_histogram(&self) -> Vec<(OpKind, usize)> {
        let mut counts: BTreeMap<&'static str, (OpKind, usize)> = BTreeMap::new();
        for kind in self.op_kinds() {
            counts.entry(kind.as_str()).or_insert((kind, 0)).1 += 1;
        }
        counts.into_values().collect()
    }

    /// Returns a summary string describing the profile.
    pub fn summary(&self) -> String {
        let p = self.parallelism_profile();
        format!(
            "Model '{}': {} ops, {} sequential ({:.0}%)",
            self.name,
            p.total_ops,
            p.sequential_ops,
            p.sequential_ratio() * 100.0,
        )
    }
}

impl ParallelismHintProvider for ModelProfile {
    fn parallelism_profile(&self) -> ParallelismProfile {
        ParallelismProfile::from_kinds(self.op_kinds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RNNT: &str = r#"{
        "name": "speech-rnnt",
        "ops": [
            { "name": "enc.conv0", "op_type": "convolution" },
            { "name": "enc.lstm0", "op_type": "lstm_sequence" },
            { "name": "enc.lstm1", "op_type": "LSTMSequence" },
            { "name": "dec.fc", "op_type": "fully_connected" }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let p = ModelProfile::from_json(RNNT).unwrap();
        assert_eq!(p.name, "speech-rnnt");
        assert_eq!(p.num_ops(), 4);
        assert_eq!(p.ops[1].kind, OpKind::Lstm);
        // CamelCase names from other tools are not recognized.
        assert_eq!(p.ops[2].kind, OpKind::Other);
    }

    #[test]
    fn test_parallelism_profile() {
        let p = ModelProfile::from_json(RNNT).unwrap();
        let hints = p.parallelism_profile();
        assert_eq!(hints.total_ops, 4);
        assert_eq!(hints.sequential_ops, 1);
    }

    #[test]
    fn test_empty_rejected() {
        let err = ModelProfile::from_json(r#"{"name": "empty", "ops": []}"#).unwrap_err();
        assert!(matches!(err, ProfileError::EmptyProfile(ref n) if n == "empty"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let json = r#"{"name": "dup", "ops": [
            {"name": "a", "op_type": "conv"},
            {"name": "a", "op_type": "relu"}
        ]}"#;
        assert!(matches!(
            ModelProfile::from_json(json),
            Err(ProfileError::DuplicateOp(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ModelProfile::from_json("{not json"),
            Err(ProfileError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_kinds_and_histogram() {
        let p = ModelProfile::from_kinds(
            "toy",
            [OpKind::MatMul, OpKind::Gru, OpKind::MatMul, OpKind::Softmax],
        );
        assert_eq!(p.ops[2].name, "op.2");
        let hist = p.kind_histogram();
        assert_eq!(
            hist,
            vec![(OpKind::Gru, 1), (OpKind::MatMul, 2), (OpKind::Softmax, 1)]
        );
    }

    #[test]
    fn test_summary() {
        let p = ModelProfile::from_kinds("toy", [OpKind::Lstm, OpKind::Eltwise]);
        let s = p.summary();
        assert!(s.contains("toy"));
        assert!(s.contains("2 ops"));
        assert!(s.contains("50%"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ModelProfile::from_file(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ProfileError::ReadError(_)));
    }
}
