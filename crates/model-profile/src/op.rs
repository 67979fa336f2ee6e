// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operation categories and their parallel-scaling class.

use std::fmt;

/// How well an operation's work spreads across the threads of one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParallelScaling {
    /// Data-parallel work that splits cleanly across threads.
    Good,
    /// Recurrent or otherwise step-by-step work; extra threads mostly wait.
    Poor,
}

/// Coarse category of a compiled-model operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Convolution,
    MatMul,
    FullyConnected,
    Eltwise,
    Pooling,
    Normalization,
    Softmax,
    Gather,
    Reshape,
    /// LSTM cell or sequence.
    Lstm,
    /// GRU cell or sequence.
    Gru,
    /// Vanilla RNN cell or sequence.
    Rnn,
    /// Loop / TensorIterator bodies executed step by step.
    Loop,
    /// Anything not categorized above.
    Other,
}

impl OpKind {
    /// Parses an operation type from a manifest string.
    ///
    /// Accepts snake_case names plus common aliases (`"conv"`, `"gemm"`,
    /// `"lstm_sequence"`, `"tensor_iterator"`, ...). Unrecognized strings
    /// map to [`OpKind::Other`].
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "convolution" | "conv" | "group_convolution" | "deconvolution" => Self::Convolution,
            "matmul" | "mat_mul" | "gemm" => Self::MatMul,
            "fully_connected" | "fc" | "inner_product" | "linear" => Self::FullyConnected,
            "eltwise" | "add" | "multiply" | "relu" | "gelu" | "sigmoid" | "tanh" => Self::Eltwise,
            "pooling" | "max_pool" | "avg_pool" => Self::Pooling,
            "normalization" | "layer_norm" | "batch_norm" | "mvn" => Self::Normalization,
            "softmax" => Self::Softmax,
            "gather" | "embedding" => Self::Gather,
            "reshape" | "transpose" | "concat" | "split" => Self::Reshape,
            "lstm" | "lstm_cell" | "lstm_sequence" => Self::Lstm,
            "gru" | "gru_cell" | "gru_sequence" => Self::Gru,
            "rnn" | "rnn_cell" | "rnn_sequence" => Self::Rnn,
            "loop" | "tensor_iterator" => Self::Loop,
            _ => Self::Other,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Convolution => "convolution",
            Self::MatMul => "matmul",
            Self::FullyConnected => "fully_connected",
            Self::Eltwise => "eltwise",
            Self::Pooling => "pooling",
            Self::Normalization => "normalization",
            Self::Softmax => "softmax",
            Self::Gather => "gather",
            Self::Reshape => "reshape",
            Self::Lstm => "lstm",
            Self::Gru => "gru",
            Self::Rnn => "rnn",
            Self::Loop => "loop",
            Self::Other => "other",
        }
    }

    /// Parallel-scaling class of this operation.
    pub fn scaling(&self) -> ParallelScaling {
        match self {
            Self::Lstm | Self::Gru | Self::Rnn | Self::Loop => ParallelScaling::Poor,
            _ => ParallelScaling::Good,
        }
    }

    /// Returns `true` for recurrent / sequential operations.
    pub fn is_sequential(&self) -> bool {
        self.scaling() == ParallelScaling::Poor
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
