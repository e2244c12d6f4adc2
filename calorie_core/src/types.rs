//! Core domain types for the kcal calorie tracker.
//!
//! This module defines:
//! - Logged entries (meals and workouts share one shape)
//! - The entry kind that decides which way an entry moves the balance
//! - The summary snapshot handed to the display layer

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Calorie limit used when none has been stored yet
pub const DEFAULT_CALORIE_LIMIT: u32 = 2000;

// ============================================================================
// Entries
// ============================================================================

/// Which running total an entry affects
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Calories consumed
    Meal,
    /// Calories burned
    Workout,
}

impl EntryKind {
    /// Name of the store collection holding entries of this kind
    pub fn collection_name(self) -> &'static str {
        match self {
            EntryKind::Meal => "meals",
            EntryKind::Workout => "workouts",
        }
    }

    /// Sign applied to the running total when an entry of this kind is added
    pub fn sign(self) -> i64 {
        match self {
            EntryKind::Meal => 1,
            EntryKind::Workout => -1,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Meal => f.write_str("meal"),
            EntryKind::Workout => f.write_str("workout"),
        }
    }
}

/// A named quantity of calories, logged as either a meal or a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub id: Uuid,
    pub name: String,
    pub calories: u32,
}

impl Entry {
    /// Build a new entry with a fresh id.
    ///
    /// The name is trimmed and must not be empty. This is the input boundary:
    /// the ledger accepts entries without checking them again.
    pub fn new(name: impl AsRef<str>, calories: u32) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(Error::Validation("entry name must not be empty".into()));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            calories,
        })
    }

    /// Calories as a signed quantity for balance arithmetic
    pub fn signed_calories(&self, kind: EntryKind) -> i64 {
        kind.sign() * i64::from(self.calories)
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Snapshot of everything the display shows about the balance
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerSummary {
    pub calorie_limit: u32,
    pub total_calories: i64,
    pub consumed: u64,
    pub burned: u64,
    /// `calorie_limit - total_calories`
    pub remaining: i64,
    /// Share of the limit used, clamped to 0..=100
    pub progress_percent: f64,
    /// True once nothing remains (remaining <= 0)
    pub over_limit: bool,
}

impl LedgerSummary {
    pub fn new(calorie_limit: u32, total_calories: i64, consumed: u64, burned: u64) -> Self {
        let remaining = i64::from(calorie_limit) - total_calories;

        let progress_percent = if calorie_limit == 0 {
            if total_calories > 0 {
                100.0
            } else {
                0.0
            }
        } else {
            (total_calories as f64 / f64::from(calorie_limit) * 100.0).clamp(0.0, 100.0)
        };

        Self {
            calorie_limit,
            total_calories,
            consumed,
            burned,
            remaining,
            progress_percent,
            over_limit: remaining <= 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_trims_name() {
        let entry = Entry::new("  Breakfast ", 400).unwrap();
        assert_eq!(entry.name, "Breakfast");
        assert_eq!(entry.calories, 400);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(Entry::new("", 100), Err(Error::Validation(_))));
        assert!(matches!(Entry::new("   ", 100), Err(Error::Validation(_))));
    }

    #[test]
    fn test_new_entries_get_distinct_ids() {
        let a = Entry::new("Lunch", 750).unwrap();
        let b = Entry::new("Lunch", 750).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_signed_calories() {
        let entry = Entry::new("Run", 320).unwrap();
        assert_eq!(entry.signed_calories(EntryKind::Meal), 320);
        assert_eq!(entry.signed_calories(EntryKind::Workout), -320);
    }

    #[test]
    fn test_entry_serializes_with_plain_fields() {
        let entry = Entry::new("Run", 320).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Run");
        assert_eq!(json["calories"], 320);
        assert_eq!(json["id"], entry.id.to_string());
    }

    #[test]
    fn test_summary_under_limit() {
        let summary = LedgerSummary::new(2000, 830, 1150, 320);
        assert_eq!(summary.remaining, 1170);
        assert!(!summary.over_limit);
        assert!((summary.progress_percent - 41.5).abs() < 1e-9);
    }

    #[test]
    fn test_summary_over_limit_clamps_progress() {
        let summary = LedgerSummary::new(2000, 2600, 2600, 0);
        assert_eq!(summary.remaining, -600);
        assert!(summary.over_limit);
        assert_eq!(summary.progress_percent, 100.0);
    }

    #[test]
    fn test_summary_exactly_at_limit_is_over() {
        let summary = LedgerSummary::new(1500, 1500, 1500, 0);
        assert_eq!(summary.remaining, 0);
        assert!(summary.over_limit);
    }

    #[test]
    fn test_summary_negative_total() {
        let summary = LedgerSummary::new(2000, -300, 0, 300);
        assert_eq!(summary.remaining, 2300);
        assert_eq!(summary.progress_percent, 0.0);
    }

    #[test]
    fn test_summary_zero_limit() {
        assert_eq!(LedgerSummary::new(0, 0, 0, 0).progress_percent, 0.0);
        assert_eq!(LedgerSummary::new(0, 10, 10, 0).progress_percent, 100.0);
    }
}
