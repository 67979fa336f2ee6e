// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The parallelism-hint capability consumed by the stream planner.

use crate::OpKind;

/// Counts summarizing how a model's operations scale across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParallelismProfile {
    /// Total number of operations.
    pub total_ops: usize,
    /// Operations with poor parallel scaling (recurrent / sequential).
    pub sequential_ops: usize,
}

impl ParallelismProfile {
    /// Tallies a sequence of operation kinds.
    pub fn from_kinds<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = OpKind>,
    {
        kinds.into_iter().fold(Self::default(), |mut acc, kind| {
            acc.total_ops += 1;
            if kind.is_sequential() {
                acc.sequential_ops += 1;
            }
            acc
        })
    }

    /// Fraction of operations that are sequential, `0.0` for an empty model.
    pub fn sequential_ratio(&self) -> f32 {
        if self.total_ops == 0 {
            return 0.0;
        }
        self.sequential_ops as f32 / self.total_ops as f32
    }
}

/// A read-only source of parallelism hints for one compiled model.
///
/// Implemented by [`crate::ModelProfile`]; other graph representations can
/// implement it directly without depending on the profile type.
pub trait ParallelismHintProvider {
    /// Summarizes the model's operation mix.
    fn parallelism_profile(&self) -> ParallelismProfile;
}

impl<T: ParallelismHintProvider + ?Sized> ParallelismHintProvider for &T {
    fn parallelism_profile(&self) -> ParallelismProfile {
        (**self).parallelism_profile()
    }
}

impl ParallelismHintProvider for ParallelismProfile {
    fn parallelism_profile(&self) -> ParallelismProfile {
        *self
    }
}
