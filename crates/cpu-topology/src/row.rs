// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core kinds and per-row thread counts.

use std::fmt;

/// The kind of physical core a thread runs on.
///
/// Ordered `Main < Efficient`, which is also the order in which the
/// planner allocates and lists them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CoreKind {
    /// Performance core ("big" core).
    Main,
    /// Efficient core ("small" core).
    Efficient,
}

impl CoreKind {
    /// Both kinds in allocation order.
    pub const ALL: [CoreKind; 2] = [CoreKind::Main, CoreKind::Efficient];

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Efficient => "efficient",
        }
    }
}

impl fmt::Display for CoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical thread counts for one row of the processor type table.
///
/// `all` includes the hyper-threading siblings counted in `hyper`, so a
/// well-formed row satisfies `all == main + efficient + hyper`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProcessorTypeRow {
    /// Total logical threads.
    pub all: u32,
    /// Performance-core threads.
    pub main: u32,
    /// Efficient-core threads.
    pub efficient: u32,
    /// Hyper-threading sibling threads.
    #[serde(default)]
    pub hyper: u32,
}

impl ProcessorTypeRow {
    pub fn new(all: u32, main: u32, efficient: u32, hyper: u32) -> Self {
        Self {
            all,
            main,
            efficient,
            hyper,
        }
    }

    /// Returns the thread count for a core kind.
    pub fn count(&self, kind: CoreKind) -> u32 {
        match kind {
            CoreKind::Main => self.main,
            CoreKind::Efficient => self.efficient,
        }
    }

    /// Threads the planner may pin streams to (`main + efficient`).
    pub fn schedulable(&self) -> u32 {
        self.main + self.efficient
    }

    /// Returns `true` if every count is zero.
    pub fn is_empty(&self) -> bool {
        self.all == 0 && self.main == 0 && self.efficient == 0 && self.hyper == 0
    }

    /// Returns `true` if `all` equals the sum of its parts.
    pub fn is_consistent(&self) -> bool {
        self.main
            .checked_add(self.efficient)
            .and_then(|s| s.checked_add(self.hyper))
            == Some(self.all)
    }

    /// Sum of the parts, saturating on overflow.
    pub(crate) fn parts(&self) -> u32 {
        self.main
            .saturating_add(self.efficient)
            .saturating_add(self.hyper)
    }

    /// Column-wise sum of two rows, `None` if any column overflows.
    pub(crate) fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self {
            all: self.all.checked_add(other.all)?,
            main: self.main.checked_add(other.main)?,
            efficient: self.efficient.checked_add(other.efficient)?,
            hyper: self.hyper.checked_add(other.hyper)?,
        })
    }
}

impl fmt::Display for ProcessorTypeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "all={} main={} efficient={} hyper={}",
            self.all, self.main, self.efficient, self.hyper
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_by_kind() {
        let row = ProcessorTypeRow::new(12, 4, 4, 4);
        assert_eq!(row.count(CoreKind::Main), 4);
        assert_eq!(row.count(CoreKind::Efficient), 4);
        assert_eq!(row.schedulable(), 8);
    }

    #[test]
    fn test_consistency() {
        assert!(ProcessorTypeRow::new(8, 4, 4, 0).is_consistent());
        assert!(ProcessorTypeRow::new(24, 8, 8, 8).is_consistent());
        assert!(!ProcessorTypeRow::new(10, 4, 4, 0).is_consistent());
        assert!(!ProcessorTypeRow::new(u32::MAX, u32::MAX, 1, 0).is_consistent());
    }

    #[test]
    fn test_checked_add_overflow() {
        let big = ProcessorTypeRow::new(u32::MAX, u32::MAX, 0, 0);
        assert_eq!(big.checked_add(ProcessorTypeRow::new(1, 1, 0, 0)), None);
        assert_eq!(
            ProcessorTypeRow::new(4, 2, 2, 0).checked_add(ProcessorTypeRow::new(2, 2, 0, 0)),
            Some(ProcessorTypeRow::new(6, 4, 2, 0))
        );
    }

    #[test]
    fn test_empty_row() {
        assert!(ProcessorTypeRow::default().is_empty());
        assert!(ProcessorTypeRow::default().is_consistent());
        assert!(!ProcessorTypeRow::new(1, 1, 0, 0).is_empty());
    }

    #[test]
    fn test_core_kind_order() {
        assert!(CoreKind::Main < CoreKind::Efficient);
        assert_eq!(CoreKind::ALL, [CoreKind::Main, CoreKind::Efficient]);
        assert_eq!(format!("{}", CoreKind::Efficient), "efficient");
    }

    #[test]
    fn test_hyper_defaults_to_zero() {
        let row: ProcessorTypeRow =
            serde_json::from_str(r#"{"all": 4, "main": 4, "efficient": 0}"#).unwrap();
        assert_eq!(row.hyper, 0);
        assert!(row.is_consistent());
    }
}
