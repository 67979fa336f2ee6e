// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Planner configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! performance_hint = "throughput"
//! num_streams = 4             # overrides performance_hint
//! inference_num_threads = 12
//! num_requests = 2
//! enable_cpu_pinning = true
//! topology = "./topology.toml"   # relative to this file
//!
//! [tuning]
//! sequential_op_ratio = 0.3
//! sequential_threads_per_stream = 1
//! ```

use cpu_topology::ProcessorTypeTable;
use std::path::{Path, PathBuf};
use stream_planner::{PreferenceTuning, StreamsConfig};

/// High-level performance goal, translated into a stream-count hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceHint {
    /// Minimize per-request latency: one stream per node.
    Latency,
    /// Maximize aggregate throughput: as many streams as fit.
    Throughput,
    /// No goal given; behaves like [`PerformanceHint::Latency`].
    #[default]
    Undefined,
}

impl PerformanceHint {
    /// Parses a hint name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "latency" => Some(Self::Latency),
            "throughput" | "tput" => Some(Self::Throughput),
            "undefined" | "none" | "" => Some(Self::Undefined),
            _ => None,
        }
    }

    /// Stream-count hint for the planner (`1` = latency, `0` = auto).
    pub fn stream_hint(&self) -> u32 {
        match self {
            Self::Latency | Self::Undefined => 1,
            Self::Throughput => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Throughput => "throughput",
            Self::Undefined => "undefined",
        }
    }
}

/// Configuration for stream planning.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlannerConfig {
    /// Named performance goal.
    #[serde(default)]
    pub performance_hint: PerformanceHint,
    /// Explicit stream count; takes precedence over `performance_hint`.
    pub num_streams: Option<u32>,
    /// Ceiling on total inference threads.
    pub inference_num_threads: Option<u32>,
    /// Ceiling on concurrent infer requests.
    pub num_requests: Option<u32>,
    /// Whether stream threads are pinned to cores.
    #[serde(default = "default_true")]
    pub enable_cpu_pinning: bool,
    /// Topology description file; the homogeneous fallback is used when unset.
    pub topology: Option<PathBuf>,
    /// Model preference heuristic thresholds.
    #[serde(default)]
    pub tuning: PreferenceTuning,
}

fn default_true() -> bool {
    true
}

impl PlannerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A relative `topology` path is taken relative to the directory of
    /// the config file.
    pub fn from_file(path: &Path) -> Result<Self, super::RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            super::RuntimeError::ConfigError(format!(
                "cannot read config '{}': {e}",
                path.display()
            ))
        })?;
        let mut config = Self::from_toml(&content)?;
        if let Some(dir) = path.parent() {
            config.topology = config
                .topology
                .take()
                .map(|t| if t.is_relative() { dir.join(t) } else { t });
        }
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, super::RuntimeError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| {
            super::RuntimeError::ConfigError(format!("TOML parse error: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, super::RuntimeError> {
        toml::to_string_pretty(self).map_err(|e| {
            super::RuntimeError::ConfigError(format!("TOML serialise error: {e}"))
        })
    }

    /// Rejects tuning values outside their meaningful range.
    pub fn validate(&self) -> Result<(), super::RuntimeError> {
        let ratio = self.tuning.sequential_op_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(super::RuntimeError::ConfigError(format!(
                "tuning.sequential_op_ratio must be within [0, 1], got {ratio}"
            )));
        }
        if self.tuning.sequential_threads_per_stream == 0 {
            return Err(super::RuntimeError::ConfigError(
                "tuning.sequential_threads_per_stream must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Resolves the stream-count hint.
    ///
    /// An explicit `num_streams` wins over `performance_hint`.
    pub fn stream_hint(&self) -> u32 {
        match self.num_streams {
            Some(n) => {
                if self.performance_hint != PerformanceHint::Undefined {
                    tracing::warn!(
                        "num_streams = {n} overrides performance_hint = '{}'",
                        self.performance_hint.as_str(),
                    );
                }
                n
            }
            None => self.performance_hint.stream_hint(),
        }
    }

    /// Builds the planner-facing configuration value.
    pub fn streams_config(&self) -> StreamsConfig {
        StreamsConfig {
            threads: self.inference_num_threads.unwrap_or(0),
            infer_requests: self.num_requests.unwrap_or(0),
            pinning_enabled: self.enable_cpu_pinning,
            tuning: self.tuning,
            streams: None,
        }
    }

    /// Loads the configured topology, or the homogeneous fallback.
    pub fn load_topology(&self) -> Result<ProcessorTypeTable, super::RuntimeError> {
        match &self.topology {
            Some(path) => Ok(ProcessorTypeTable::from_file(path)?),
            None => Ok(ProcessorTypeTable::from_available_parallelism()),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            performance_hint: PerformanceHint::Undefined,
            num_streams: None,
            inference_num_threads: None,
            num_requests: None,
            enable_cpu_pinning: true,
            topology: None,
            tuning: PreferenceTuning::default(),
        }
    }
}
