//! The calorie ledger: logged meals and workouts plus the running balance.
//!
//! The ledger is an in-memory cache over a [`DurableStore`]. Every mutation is
//! a single store write (an entry change travels with its new total), applied
//! to the cache only after the write succeeds, so the two never disagree
//! after a failed write.
//!
//! The running total is maintained incrementally but always equals
//! `sum(meal calories) - sum(workout calories)`.

use crate::store::{DurableStore, ScalarKey};
use crate::{Entry, EntryKind, LedgerSummary, Result, DEFAULT_CALORIE_LIMIT};
use uuid::Uuid;

/// Owner of the calorie limit, running total and entry lists
#[derive(Debug)]
pub struct Ledger<S: DurableStore> {
    store: S,
    calorie_limit: u32,
    total_calories: i64,
    meals: Vec<Entry>,
    workouts: Vec<Entry>,
}

impl<S: DurableStore> Ledger<S> {
    /// Rehydrate a ledger from the store, defaulting the limit to 2000
    pub fn open(store: S) -> Result<Self> {
        Self::open_with_default_limit(store, DEFAULT_CALORIE_LIMIT)
    }

    /// Rehydrate a ledger from the store
    ///
    /// `default_limit` applies only when the store holds no limit yet. A stored
    /// total that does not match the stored entries is replaced by the
    /// recomputed sum (and written back).
    pub fn open_with_default_limit(mut store: S, default_limit: u32) -> Result<Self> {
        let calorie_limit = match store.get(ScalarKey::CalorieLimit) {
            Some(raw) => u32::try_from(raw).unwrap_or_else(|_| {
                tracing::warn!(
                    "Stored calorie limit {} is out of range, using {}",
                    raw,
                    default_limit
                );
                default_limit
            }),
            None => default_limit,
        };

        let meals = store.collection(EntryKind::Meal);
        let workouts = store.collection(EntryKind::Workout);

        let expected = sum_calories(&meals) as i64 - sum_calories(&workouts) as i64;
        let stored = store.get(ScalarKey::TotalCalories);
        let total_calories = match stored {
            Some(total) if total == expected => total,
            None if expected == 0 => 0,
            _ => {
                tracing::warn!(
                    "Stored total {:?} does not match logged entries ({}), recomputing",
                    stored,
                    expected
                );
                store.set(ScalarKey::TotalCalories, expected)?;
                expected
            }
        };

        tracing::info!(
            "Opened ledger: {} meals, {} workouts, total {}, limit {}",
            meals.len(),
            workouts.len(),
            total_calories,
            calorie_limit
        );

        Ok(Self {
            store,
            calorie_limit,
            total_calories,
            meals,
            workouts,
        })
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Log a meal; the total goes up by its calories
    ///
    /// Returns the stored entry so the caller can display just the new item.
    pub fn add_meal(&mut self, meal: Entry) -> Result<&Entry> {
        self.add(EntryKind::Meal, meal)
    }

    /// Remove a meal by id; the total goes back down
    ///
    /// An unknown id is a no-op and returns `None`.
    pub fn remove_meal(&mut self, id: Uuid) -> Result<Option<Entry>> {
        self.remove(EntryKind::Meal, id)
    }

    /// Log a workout; the total goes down by its calories
    pub fn add_workout(&mut self, workout: Entry) -> Result<&Entry> {
        self.add(EntryKind::Workout, workout)
    }

    /// Remove a workout by id; the total goes back up
    pub fn remove_workout(&mut self, id: Uuid) -> Result<Option<Entry>> {
        self.remove(EntryKind::Workout, id)
    }

    /// Log an entry of either kind
    pub fn add(&mut self, kind: EntryKind, entry: Entry) -> Result<&Entry> {
        let total = self.total_calories + entry.signed_calories(kind);

        self.store.append(kind, &entry, total)?;

        tracing::debug!(
            "Added {} '{}' ({} kcal), total now {}",
            kind,
            entry.name,
            entry.calories,
            total
        );

        self.total_calories = total;
        let entries = self.entries_mut(kind);
        entries.push(entry);
        Ok(&entries[entries.len() - 1])
    }

    /// Remove an entry of either kind
    pub fn remove(&mut self, kind: EntryKind, id: Uuid) -> Result<Option<Entry>> {
        let Some(index) = self.entries(kind).iter().position(|e| e.id == id) else {
            tracing::debug!("No {} with id {}, nothing to remove", kind, id);
            return Ok(None);
        };

        let total = self.total_calories - self.entries(kind)[index].signed_calories(kind);

        self.store.remove(kind, id, total)?;

        self.total_calories = total;
        let removed = self.entries_mut(kind).remove(index);
        tracing::debug!(
            "Removed {} '{}' ({} kcal), total now {}",
            kind,
            removed.name,
            removed.calories,
            total
        );
        Ok(Some(removed))
    }

    /// Replace the daily calorie limit
    pub fn set_limit(&mut self, limit: u32) -> Result<()> {
        self.store.set(ScalarKey::CalorieLimit, i64::from(limit))?;
        self.calorie_limit = limit;
        tracing::info!("Calorie limit set to {}", limit);
        Ok(())
    }

    /// Drop every logged entry and zero the total. The limit is kept.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear_all()?;
        self.total_calories = 0;
        self.meals.clear();
        self.workouts.clear();
        tracing::info!("Ledger reset");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// All meals, then all workouts, in the order they were logged
    pub fn load_items(&self) -> impl Iterator<Item = (EntryKind, &Entry)> + '_ {
        self.meals
            .iter()
            .map(|e| (EntryKind::Meal, e))
            .chain(self.workouts.iter().map(|e| (EntryKind::Workout, e)))
    }

    /// Entries of one kind whose name contains `text`, ignoring case
    pub fn filter(&self, kind: EntryKind, text: &str) -> Vec<&Entry> {
        let needle = text.to_lowercase();
        self.entries(kind)
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn entries(&self, kind: EntryKind) -> &[Entry] {
        match kind {
            EntryKind::Meal => &self.meals,
            EntryKind::Workout => &self.workouts,
        }
    }

    fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<Entry> {
        match kind {
            EntryKind::Meal => &mut self.meals,
            EntryKind::Workout => &mut self.workouts,
        }
    }

    pub fn meals(&self) -> &[Entry] {
        &self.meals
    }

    pub fn workouts(&self) -> &[Entry] {
        &self.workouts
    }

    pub fn calorie_limit(&self) -> u32 {
        self.calorie_limit
    }

    pub fn total_calories(&self) -> i64 {
        self.total_calories
    }

    /// Sum of meal calories
    pub fn consumed(&self) -> u64 {
        sum_calories(&self.meals)
    }

    /// Sum of workout calories
    pub fn burned(&self) -> u64 {
        sum_calories(&self.workouts)
    }

    /// `calorie_limit - total_calories`; zero or below means over the limit
    pub fn remaining(&self) -> i64 {
        i64::from(self.calorie_limit) - self.total_calories
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary::new(
            self.calorie_limit,
            self.total_calories,
            self.consumed(),
            self.burned(),
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn sum_calories(entries: &[Entry]) -> u64 {
    entries.iter().map(|e| u64::from(e.calories)).sum()
}
