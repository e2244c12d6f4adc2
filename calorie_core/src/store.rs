//! Durable store contract for the ledger.
//!
//! The ledger keeps an in-memory cache only; the store is the source of truth
//! across restarts. Two scalars and two entry collections are persisted.

use crate::{Entry, EntryKind, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scalar values held by the store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    CalorieLimit,
    TotalCalories,
}

impl ScalarKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKey::CalorieLimit => "calorie_limit",
            ScalarKey::TotalCalories => "total_calories",
        }
    }
}

/// Key-value persistence that outlives a single session
pub trait DurableStore {
    /// Read a scalar; `None` means never set (the caller picks the default)
    fn get(&self, key: ScalarKey) -> Option<i64>;

    fn set(&mut self, key: ScalarKey, value: i64) -> Result<()>;

    /// All entries of a collection in insertion order
    fn collection(&self, kind: EntryKind) -> Vec<Entry>;

    /// Append an entry and store the new running total in one write
    fn append(&mut self, kind: EntryKind, entry: &Entry, total: i64) -> Result<()>;

    /// Remove an entry by id and store the new running total in one write
    ///
    /// Only the first entry with that id is removed. Unknown ids leave the
    /// collection alone but still store `total`.
    fn remove(&mut self, kind: EntryKind, id: Uuid, total: i64) -> Result<()>;

    /// Drop the running total and both collections. The calorie limit survives.
    fn clear_all(&mut self) -> Result<()>;
}

/// The persisted document shared by the store implementations
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorie_limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<i64>,

    #[serde(default)]
    pub meals: Vec<Entry>,

    #[serde(default)]
    pub workouts: Vec<Entry>,
}

impl StoreDocument {
    pub fn scalar(&self, key: ScalarKey) -> Option<i64> {
        match key {
            ScalarKey::CalorieLimit => self.calorie_limit,
            ScalarKey::TotalCalories => self.total_calories,
        }
    }

    pub fn set_scalar(&mut self, key: ScalarKey, value: i64) {
        match key {
            ScalarKey::CalorieLimit => self.calorie_limit = Some(value),
            ScalarKey::TotalCalories => self.total_calories = Some(value),
        }
    }

    pub fn entries(&self, kind: EntryKind) -> &[Entry] {
        match kind {
            EntryKind::Meal => &self.meals,
            EntryKind::Workout => &self.workouts,
        }
    }

    pub fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<Entry> {
        match kind {
            EntryKind::Meal => &mut self.meals,
            EntryKind::Workout => &mut self.workouts,
        }
    }

    /// Remove the first entry with `id`, returning it
    pub fn remove_entry(&mut self, kind: EntryKind, id: Uuid) -> Option<Entry> {
        let entries = self.entries_mut(kind);
        let index = entries.iter().position(|e| e.id == id)?;
        Some(entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.total_calories = None;
        self.meals.clear();
        self.workouts.clear();
    }
}

/// In-process store; nothing survives the process
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    document: StoreDocument,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document, as if rehydrating a previous session
    pub fn from_document(document: StoreDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &StoreDocument {
        &self.document
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: ScalarKey) -> Option<i64> {
        self.document.scalar(key)
    }

    fn set(&mut self, key: ScalarKey, value: i64) -> Result<()> {
        self.document.set_scalar(key, value);
        Ok(())
    }

    fn collection(&self, kind: EntryKind) -> Vec<Entry> {
        self.document.entries(kind).to_vec()
    }

    fn append(&mut self, kind: EntryKind, entry: &Entry, total: i64) -> Result<()> {
        self.document.entries_mut(kind).push(entry.clone());
        self.document.set_scalar(ScalarKey::TotalCalories, total);
        Ok(())
    }

    fn remove(&mut self, kind: EntryKind, id: Uuid, total: i64) -> Result<()> {
        self.document.remove_entry(kind, id);
        self.document.set_scalar(ScalarKey::TotalCalories, total);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.document.clear();
        Ok(())
    }
}
