// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Entry points that apply a [`PlannerConfig`] to one compiled model.

use crate::PlannerConfig;
use cpu_topology::ProcessorTypeTable;
use model_profile::ParallelismHintProvider;
use stream_planner::{Resolution, StreamsConfig, StreamsConfigResolver};

/// Resolves the stream layout for one model and returns the filled-in
/// [`StreamsConfig`].
pub fn resolve_streams<M>(
    config: &PlannerConfig,
    topology: &ProcessorTypeTable,
    model: &M,
) -> StreamsConfig
where
    M: ParallelismHintProvider + ?Sized,
{
    StreamsConfigResolver::new(topology).resolve(config.stream_hint(), model, config.streams_config())
}

/// Like [`resolve_streams`], but returns the full [`Resolution`]
/// (allocation table and model preference included).
pub fn plan_streams<M>(config: &PlannerConfig, topology: &ProcessorTypeTable, model: &M) -> Resolution
where
    M: ParallelismHintProvider + ?Sized,
{
    StreamsConfigResolver::new(topology).plan(config.stream_hint(), model, &config.streams_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PerformanceHint;
    use cpu_topology::ProcessorTypeRow;
    use model_profile::{ModelProfile, OpKind};

    fn hybrid() -> ProcessorTypeTable {
        ProcessorTypeTable::single_node(ProcessorTypeRow::new(8, 4, 4, 0)).unwrap()
    }

    #[test]
    fn test_resolve_latency_hint() {
        let config = PlannerConfig {
            performance_hint: PerformanceHint::Latency,
            ..Default::default()
        };
        let model = ModelProfile::from_kinds("m", [OpKind::MatMul]);
        let out = resolve_streams(&config, &hybrid(), &model);
        let s = out.streams.unwrap();
        assert_eq!(s.num_streams, 1);
        assert_eq!(s.num_threads, 8);
    }

    #[test]
    fn test_plan_matches_resolve() {
        let config = PlannerConfig {
            performance_hint: PerformanceHint::Throughput,
            num_requests: Some(3),
            ..Default::default()
        };
        let model = ModelProfile::from_kinds("m", [OpKind::Gru, OpKind::MatMul]);
        let plan = plan_streams(&config, &hybrid(), &model);
        let resolved = resolve_streams(&config, &hybrid(), &model);
        assert_eq!(resolved.streams, Some(plan.summary));
    }
}
