// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Model-aware preferred threads per stream.
//!
//! On hybrid CPUs a stream that spans many threads can end up waiting on
//! its slowest (efficient-core) thread. Models dominated by recurrent or
//! otherwise sequential operations gain little from wide streams, so for
//! them the analyzer asks for narrow streams instead.

use cpu_topology::{CoreKind, ProcessorTypeTable};
use model_profile::ParallelismHintProvider;

/// Tunable thresholds for the preference heuristic.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreferenceTuning {
    /// Fraction of sequential operations at or above which a model counts
    /// as poorly parallelizable.
    pub sequential_op_ratio: f32,
    /// Threads per stream requested for poorly parallelizable models.
    pub sequential_threads_per_stream: u32,
}

impl Default for PreferenceTuning {
    fn default() -> Self {
        Self {
            sequential_op_ratio: 0.3,
            sequential_threads_per_stream: 1,
        }
    }
}

/// Computes the model's preferred threads per stream.
#[derive(Debug, Clone, Default)]
pub struct ModelPreferenceAnalyzer {
    tuning: PreferenceTuning,
}

impl ModelPreferenceAnalyzer {
    pub fn new(tuning: PreferenceTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &PreferenceTuning {
        &self.tuning
    }

    /// Returns the preferred threads per stream, or `0` for no preference.
    ///
    /// No preference is expressed on homogeneous hosts, when thread pinning
    /// is disabled, or when there are no main cores. Otherwise the main
    /// cores are divided among the main-core share of the target streams
    /// (the builder splits streams in proportion to core counts, main
    /// rounded up); sequential-heavy models are capped at
    /// [`PreferenceTuning::sequential_threads_per_stream`].
    ///
    /// A target of `0` (auto) counts as one stream, so a parallel-friendly
    /// model on a hybrid host asks for a single wide main stream per node
    /// in throughput mode rather than one stream per main core.
    ///
    /// The result never grows as `target_streams` grows.
    pub fn preferred_threads<M>(
        &self,
        target_streams: u32,
        topology: &ProcessorTypeTable,
        model: &M,
        pinning_enabled: bool,
    ) -> u32
    where
        M: ParallelismHintProvider + ?Sized,
    {
        if !topology.is_hybrid() {
            return 0;
        }
        if !pinning_enabled {
            tracing::debug!("thread pinning disabled, no model preference");
            return 0;
        }
        let main = topology.aggregate().count(CoreKind::Main);
        if main == 0 {
            return 0;
        }

        let efficient = topology.aggregate().count(CoreKind::Efficient);
        let main_streams = (u64::from(target_streams.max(1)) * u64::from(main))
            .div_ceil(u64::from(main) + u64::from(efficient))
            .clamp(1, u64::from(main)) as u32;
        let scaled = (main / main_streams).clamp(1, main);

        let profile = model.parallelism_profile();
        let sequential = profile.total_ops > 0
            && profile.sequential_ratio() >= self.tuning.sequential_op_ratio;
        let preferred = if sequential {
            scaled.min(self.tuning.sequential_threads_per_stream.max(1))
        } else {
            scaled
        };

        tracing::debug!(
            target_streams,
            sequential_ratio = profile.sequential_ratio(),
            preferred,
            "model preferred threads per stream",
        );
        preferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu_topology::ProcessorTypeRow;
    use model_profile::{ModelProfile, OpKind, ParallelismProfile};

    fn hybrid() -> ProcessorTypeTable {
        ProcessorTypeTable::single_node(ProcessorTypeRow::new(16, 8, 8, 0)).unwrap()
    }

    fn conv_net() -> ModelProfile {
        ModelProfile::from_kinds(
            "cnn",
            [OpKind::Convolution, OpKind::Eltwise, OpKind::Pooling, OpKind::FullyConnected],
        )
    }

    fn rnn() -> ModelProfile {
        ModelProfile::from_kinds("rnn", [OpKind::Lstm, OpKind::Lstm, OpKind::FullyConnected])
    }

    #[test]
    fn test_homogeneous_has_no_preference() {
        let topo = ProcessorTypeTable::homogeneous(16);
        let a = ModelPreferenceAnalyzer::default();
        assert_eq!(a.preferred_threads(0, &topo, &conv_net(), true), 0);
        assert_eq!(a.preferred_threads(4, &topo, &rnn(), true), 0);
    }

    #[test]
    fn test_pinning_disabled_has_no_preference() {
        let a = ModelPreferenceAnalyzer::default();
        assert_eq!(a.preferred_threads(2, &hybrid(), &conv_net(), false), 0);
    }

    #[test]
    fn test_efficient_only_has_no_preference() {
        let topo = ProcessorTypeTable::single_node(ProcessorTypeRow::new(4, 0, 4, 0)).unwrap();
        let a = ModelPreferenceAnalyzer::default();
        assert_eq!(a.preferred_threads(0, &topo, &conv_net(), true), 0);
    }

    #[test]
    fn test_scaling_with_target_streams() {
        let a = ModelPreferenceAnalyzer::default();
        assert_eq!(a.preferred_threads(0, &hybrid(), &conv_net(), true), 8);
        assert_eq!(a.preferred_threads(1, &hybrid(), &conv_net(), true), 8);
        // Two streams split one main, one efficient.
        assert_eq!(a.preferred_threads(2, &hybrid(), &conv_net(), true), 8);
        assert_eq!(a.preferred_threads(3, &hybrid(), &conv_net(), true), 4);
        assert_eq!(a.preferred_threads(4, &hybrid(), &conv_net(), true), 4);
        assert_eq!(a.preferred_threads(16, &hybrid(), &conv_net(), true), 1);
        assert_eq!(a.preferred_threads(100, &hybrid(), &conv_net(), true), 1);
    }

    #[test]
    fn test_monotonic_in_target_streams() {
        let a = ModelPreferenceAnalyzer::default();
        for model in [conv_net(), rnn()] {
            let mut last = u32::MAX;
            for target in 0..40 {
                let p = a.preferred_threads(target, &hybrid(), &model, true);
                assert!(p <= last, "target {target}: {p} > {last}");
                last = p;
            }
        }
    }

    #[test]
    fn test_sequential_model_prefers_narrow_streams() {
        let a = ModelPreferenceAnalyzer::default();
        assert_eq!(a.preferred_threads(0, &hybrid(), &rnn(), true), 1);
        assert_eq!(a.preferred_threads(2, &hybrid(), &rnn(), true), 1);
    }

    #[test]
    fn test_tuning_threshold_and_width() {
        let a = ModelPreferenceAnalyzer::new(PreferenceTuning {
            sequential_op_ratio: 0.9,
            sequential_threads_per_stream: 2,
        });
        // 2/3 sequential is below the 0.9 threshold.
        assert_eq!(a.preferred_threads(0, &hybrid(), &rnn(), true), 8);

        let all_lstm = ParallelismProfile {
            total_ops: 5,
            sequential_ops: 5,
        };
        assert_eq!(a.preferred_threads(0, &hybrid(), &all_lstm, true), 2);
        // Never wider than the scaled value.
        assert_eq!(a.preferred_threads(16, &hybrid(), &all_lstm, true), 1);
    }

    #[test]
    fn test_empty_model_is_not_sequential() {
        let a = ModelPreferenceAnalyzer::new(PreferenceTuning {
            sequential_op_ratio: 0.0,
            sequential_threads_per_stream: 1,
        });
        let empty = ParallelismProfile::default();
        assert_eq!(a.preferred_threads(0, &hybrid(), &empty, true), 8);
    }

    #[test]
    fn test_tuning_deserialize_defaults() {
        let t: PreferenceTuning = serde_json::from_str(r#"{"sequential_op_ratio": 0.5}"#).unwrap();
        assert_eq!(t.sequential_threads_per_stream, 1);
        assert!((t.sequential_op_ratio - 0.5).abs() < f32::EPSILON);
    }
}
