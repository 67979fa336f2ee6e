// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Stream configuration resolution.
//!
//! The resolver runs the preference analyzer and the table builder, then
//! reduces the allocation table into the compact [`StreamConfigSummary`]
//! a thread-pool executor consumes.
//!
//! Resolution is a pure function of its inputs: the caller passes a
//! [`StreamsConfig`] value in and gets a new one back.

use crate::{
    AllocationMode, ModelPreferenceAnalyzer, PreferenceTuning, StreamHints,
    StreamsAllocationTable, StreamsTableBuilder,
};
use cpu_topology::{CoreKind, ProcessorTypeTable};
use model_profile::ParallelismHintProvider;

/// Executor-facing stream layout.
///
/// Main-core streams are numbered `0..big_core_streams`; efficient-core
/// streams start at `small_core_offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StreamConfigSummary {
    pub num_streams: u32,
    pub num_threads: u32,
    pub big_core_streams: u32,
    pub small_core_streams: u32,
    /// Width of the widest main-core stream.
    pub threads_per_stream_big: u32,
    /// Width of the widest efficient-core stream.
    pub threads_per_stream_small: u32,
    pub small_core_offset: u32,
}

impl StreamConfigSummary {
    /// Reduces an allocation table by core kind.
    pub fn from_table(table: &StreamsAllocationTable) -> Self {
        let mut s = Self::default();
        for entry in table.entries() {
            match entry.core_kind {
                CoreKind::Main => {
                    s.big_core_streams += entry.stream_count;
                    s.threads_per_stream_big =
                        s.threads_per_stream_big.max(entry.threads_per_stream);
                }
                CoreKind::Efficient => {
                    s.small_core_streams += entry.stream_count;
                    s.threads_per_stream_small =
                        s.threads_per_stream_small.max(entry.threads_per_stream);
                }
            }
        }
        s.num_streams = table.num_streams();
        s.num_threads = table.num_threads();
        s.small_core_offset = s.big_core_streams;
        s
    }

    /// Returns a one-line summary for logging.
    pub fn summary(&self) -> String {
        format!(
            "{} streams, {} threads (big: {}x{}, small: {}x{} from #{})",
            self.num_streams,
            self.num_threads,
            self.big_core_streams,
            self.threads_per_stream_big,
            self.small_core_streams,
            self.threads_per_stream_small,
            self.small_core_offset,
        )
    }
}

/// Caller-owned stream configuration.
///
/// Input fields are set by the configuration layer; `streams` is filled in
/// by [`StreamsConfigResolver::resolve`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StreamsConfig {
    /// Ceiling on total threads (`0` = none).
    pub threads: u32,
    /// Ceiling on concurrent infer requests (`0` = none).
    pub infer_requests: u32,
    /// Whether the executor pins stream threads to cores.
    pub pinning_enabled: bool,
    /// Preference heuristic thresholds.
    pub tuning: PreferenceTuning,
    /// Resolved layout, `None` until resolved.
    pub streams: Option<StreamConfigSummary>,
}

impl Default for StreamsConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            infer_requests: 0,
            pinning_enabled: true,
            tuning: PreferenceTuning::default(),
            streams: None,
        }
    }
}

/// Everything computed during one resolution, for diagnostics.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Resolution {
    pub mode: AllocationMode,
    pub model_prefer_threads: u32,
    pub table: StreamsAllocationTable,
    pub summary: StreamConfigSummary,
}

/// Resolves stream layouts against one host topology.
#[derive(Debug, Clone)]
pub struct StreamsConfigResolver<'a> {
    topology: &'a ProcessorTypeTable,
    builder: StreamsTableBuilder,
}

impl<'a> StreamsConfigResolver<'a> {
    pub fn new(topology: &'a ProcessorTypeTable) -> Self {
        Self {
            topology,
            builder: StreamsTableBuilder::new(),
        }
    }

    pub fn topology(&self) -> &ProcessorTypeTable {
        self.topology
    }

    /// Runs analyzer and builder and returns every intermediate result.
    pub fn plan<M>(&self, streams_hint: u32, model: &M, config: &StreamsConfig) -> Resolution
    where
        M: ParallelismHintProvider + ?Sized,
    {
        let analyzer = ModelPreferenceAnalyzer::new(config.tuning);
        let model_prefer_threads = analyzer.preferred_threads(
            streams_hint,
            self.topology,
            model,
            config.pinning_enabled,
        );

        let hints = StreamHints {
            streams: streams_hint,
            threads: config.threads,
            infer_requests: config.infer_requests,
        };
        let table = self.builder.build(hints, model_prefer_threads, self.topology);
        let summary = StreamConfigSummary::from_table(&table);

        let mode = AllocationMode::from_streams(streams_hint);
        tracing::info!(
            mode = mode.as_str(),
            model_prefer_threads,
            "resolved {}",
            summary.summary(),
        );

        Resolution {
            mode,
            model_prefer_threads,
            table,
            summary,
        }
    }

    /// Resolves the layout and returns `config` with `streams` filled in.
    pub fn resolve<M>(&self, streams_hint: u32, model: &M, config: StreamsConfig) -> StreamsConfig
    where
        M: ParallelismHintProvider + ?Sized,
    {
        let resolution = self.plan(streams_hint, model, &config);
        StreamsConfig {
            streams: Some(resolution.summary),
            ..config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AllocationEntry;
    use cpu_topology::ProcessorTypeRow;
    use model_profile::{ModelProfile, OpKind};

    fn hybrid() -> ProcessorTypeTable {
        ProcessorTypeTable::single_node(ProcessorTypeRow::new(8, 4, 4, 0)).unwrap()
    }

    fn cnn() -> ModelProfile {
        ModelProfile::from_kinds("cnn", [OpKind::Convolution, OpKind::Eltwise])
    }

    #[test]
    fn test_summary_from_table() {
        let table = StreamsAllocationTable::from_entries(vec![
            AllocationEntry::new(2, CoreKind::Main, 2, 0),
            AllocationEntry::new(4, CoreKind::Efficient, 1, 0),
        ]);
        let s = StreamConfigSummary::from_table(&table);
        assert_eq!(
            s,
            StreamConfigSummary {
                num_streams: 6,
                num_threads: 8,
                big_core_streams: 2,
                small_core_streams: 4,
                threads_per_stream_big: 2,
                threads_per_stream_small: 1,
                small_core_offset: 2,
            }
        );
    }

    #[test]
    fn test_summary_without_efficient() {
        let table = StreamsAllocationTable::from_entries(vec![AllocationEntry::new(
            1,
            CoreKind::Main,
            8,
            0,
        )]);
        let s = StreamConfigSummary::from_table(&table);
        assert_eq!(s.small_core_streams, 0);
        assert_eq!(s.threads_per_stream_small, 0);
        assert_eq!(s.small_core_offset, 1);
    }

    #[test]
    fn test_resolve_fills_streams() {
        let topo = hybrid();
        let resolver = StreamsConfigResolver::new(&topo);
        let config = resolver.resolve(1, &cnn(), StreamsConfig::default());
        let s = config.streams.unwrap();
        assert_eq!(s.num_streams, 1);
        assert_eq!(s.threads_per_stream_big, 8);
        assert_eq!(s.num_threads, 8);
    }

    #[test]
    fn test_resolve_keeps_inputs() {
        let topo = hybrid();
        let resolver = StreamsConfigResolver::new(&topo);
        let input = StreamsConfig {
            threads: 6,
            infer_requests: 3,
            ..StreamsConfig::default()
        };
        let out = resolver.resolve(0, &cnn(), input.clone());
        assert_eq!(out.threads, 6);
        assert_eq!(out.infer_requests, 3);
        let s = out.streams.unwrap();
        assert!(s.num_streams <= 3);
        assert!(s.num_threads <= 6);
    }

    #[test]
    fn test_plan_reports_preference() {
        let topo = hybrid();
        let resolver = StreamsConfigResolver::new(&topo);
        let r = resolver.plan(2, &cnn(), &StreamsConfig::default());
        assert_eq!(r.mode, AllocationMode::Explicit(2));
        assert_eq!(r.model_prefer_threads, 4);
        assert_eq!(r.summary, StreamConfigSummary::from_table(&r.table));
    }

    #[test]
    fn test_explicit_streams_use_every_thread() {
        let topo = hybrid();
        let resolver = StreamsConfigResolver::new(&topo);
        let config = StreamsConfig {
            threads: 8,
            ..StreamsConfig::default()
        };
        let r = resolver.plan(2, &cnn(), &config);
        assert_eq!(
            r.table.entries(),
            &[
                AllocationEntry::new(1, CoreKind::Main, 4, 0),
                AllocationEntry::new(1, CoreKind::Efficient, 4, 0),
            ]
        );
        assert_eq!(r.summary.num_threads, 8);
    }

    #[test]
    fn test_auto_hint_asks_for_wide_main_stream() {
        let topo = hybrid();
        let resolver = StreamsConfigResolver::new(&topo);
        let r = resolver.plan(0, &cnn(), &StreamsConfig::default());
        assert_eq!(r.model_prefer_threads, 4);
        assert_eq!(
            r.table.entries(),
            &[
                AllocationEntry::new(1, CoreKind::Main, 4, 0),
                AllocationEntry::new(4, CoreKind::Efficient, 1, 0),
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let topo = hybrid();
        let resolver = StreamsConfigResolver::new(&topo);
        let a = resolver.resolve(0, &cnn(), StreamsConfig::default());
        let b = resolver.resolve(0, &cnn(), StreamsConfig::default());
        assert_eq!(a, b);
        // Resolving an already-resolved config gives the same answer.
        let c = resolver.resolve(0, &cnn(), a.clone());
        assert_eq!(a, c);
    }

    #[test]
    fn test_summary_string() {
        let topo = hybrid();
        let resolver = StreamsConfigResolver::new(&topo);
        let s = resolver.plan(1, &cnn(), &StreamsConfig::default()).summary;
        assert!(s.summary().contains("1 streams, 8 threads"));
    }
}
