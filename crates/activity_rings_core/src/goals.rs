//! Per-category daily goals: defaults, slider ranges, quantization, and
//! write-through persistence.

use crate::snapshot::CategoryMap;
use crate::{Category, PersistenceError};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Built-in goal per category, used while no stored value exists.
fn default_goal(category: Category) -> u32 {
    match category {
        Category::Energy => 150,
        Category::Steps => 5_000,
        Category::Distance => 2,
    }
}

/// Allowed slider range per category, inclusive.
fn goal_range(category: Category) -> (u32, u32) {
    match category {
        Category::Energy => (1, 500),
        Category::Steps => (1, 20_000),
        Category::Distance => (1, 10),
    }
}

/// Quantization step per category. Every stored goal is a multiple of this
/// unless rounding would drop below the range floor.
fn goal_step(category: Category) -> u32 {
    match category {
        Category::Energy => 10,
        Category::Steps => 1_000,
        Category::Distance => 1,
    }
}

/// Clamp into the slider range, round to the category step, and raise back
/// to the floor when rounding lands below it.
fn quantize(category: Category, value: u32) -> u32 {
    let (min, max) = goal_range(category);
    let step = goal_step(category);
    let clamped = value.clamp(min, max);
    let rounded = ((clamped + step / 2) / step) * step;
    rounded.clamp(min, max)
}

/// Storage backend for goal values, keyed by category.
pub trait GoalPersistence: Send + Sync {
    fn load(&self, category: Category) -> Result<Option<u32>, PersistenceError>;
    fn save(&self, category: Category, value: u32) -> Result<(), PersistenceError>;
}

/// Goal persistence in a JSON key-value file, the process-wide settings
/// store.
pub struct JsonFileGoals {
    path: PathBuf,
}

impl JsonFileGoals {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Result<BTreeMap<Category, u32>, PersistenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl GoalPersistence for JsonFileGoals {
    fn load(&self, category: Category) -> Result<Option<u32>, PersistenceError> {
        Ok(self.read_map()?.get(&category).copied())
    }

    fn save(&self, category: Category, value: u32) -> Result<(), PersistenceError> {
        // A corrupt settings file must not wedge goal edits; start over from
        // an empty map and rewrite it whole.
        let mut map = self.read_map().unwrap_or_default();
        map.insert(category, value);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Volatile goal persistence for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryGoals {
    values: Mutex<BTreeMap<Category, u32>>,
}

impl InMemoryGoals {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GoalPersistence for InMemoryGoals {
    fn load(&self, category: Category) -> Result<Option<u32>, PersistenceError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(&category).copied())
    }

    fn save(&self, category: Category, value: u32) -> Result<(), PersistenceError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(category, value);
        Ok(())
    }
}

/// Per-category goal values with defaults, validation, and write-through
/// persistence.
///
/// Loaded once at startup. The in-memory value stays authoritative for the
/// session even when the backing store misbehaves.
pub struct GoalStore {
    persistence: Box<dyn GoalPersistence>,
    stored: CategoryMap<Option<u32>>,
}

impl GoalStore {
    /// Load goals from `persistence`. A category that fails to load falls
    /// back to "no stored value" and its built-in default.
    pub fn load(persistence: Box<dyn GoalPersistence>) -> Self {
        let stored = CategoryMap::from_fn(|category| match persistence.load(category) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(%category, error = %e, "failed to load stored goal; using default");
                None
            }
        });
        Self { persistence, stored }
    }

    /// Store held entirely in memory, mostly for tests and demos.
    pub fn ephemeral() -> Self {
        Self::load(Box::new(InMemoryGoals::new()))
    }

    /// The raw stored value, 0 when nothing is stored.
    pub fn raw_goal(&self, category: Category) -> u32 {
        self.stored[category].unwrap_or(0)
    }

    /// The goal progress is measured against: the stored value when
    /// positive, else the category's built-in default. Always >= 1.
    pub fn effective_goal(&self, category: Category) -> u32 {
        match self.stored[category] {
            Some(v) if v > 0 => v,
            _ => default_goal(category),
        }
    }

    /// Clamp `value` into the category's slider range, quantize it to the
    /// category step, store it, and write it through to persistence. Returns
    /// the value actually stored.
    ///
    /// A persistence failure keeps the in-memory update and is surfaced as a
    /// warning; it never aborts the edit.
    pub fn set_goal(&mut self, category: Category, value: u32) -> u32 {
        let quantized = quantize(category, value);
        self.stored.set(category, Some(quantized));
        if let Err(e) = self.persistence.save(category, quantized) {
            metrics::counter!("activity_goal_save_failures").increment(1);
            tracing::warn!(%category, error = %e, "goal persisted in memory only");
        }
        quantized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReadOnlyStore;

    impl GoalPersistence for ReadOnlyStore {
        fn load(&self, _category: Category) -> Result<Option<u32>, PersistenceError> {
            Ok(None)
        }

        fn save(&self, _category: Category, _value: u32) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "settings store is read-only",
            )))
        }
    }

    #[test]
    fn defaults_apply_while_nothing_is_stored() {
        let store = GoalStore::ephemeral();
        assert_eq!(store.effective_goal(Category::Energy), 150);
        assert_eq!(store.effective_goal(Category::Steps), 5_000);
        assert_eq!(store.effective_goal(Category::Distance), 2);
        assert_eq!(store.raw_goal(Category::Steps), 0);
    }

    #[test]
    fn steps_quantize_to_nearest_thousand() {
        let mut store = GoalStore::ephemeral();
        assert_eq!(store.set_goal(Category::Steps, 4_321), 4_000);
        assert_eq!(store.effective_goal(Category::Steps), 4_000);
        assert_eq!(store.raw_goal(Category::Steps), 4_000);
    }

    #[test]
    fn energy_clamps_to_the_slider_range() {
        let mut store = GoalStore::ephemeral();
        assert_eq!(store.set_goal(Category::Energy, 9_999), 500);
        assert_eq!(store.set_goal(Category::Energy, 0), 1);
        assert_eq!(store.effective_goal(Category::Energy), 1);
    }

    #[test]
    fn energy_rounds_to_nearest_ten() {
        let mut store = GoalStore::ephemeral();
        assert_eq!(store.set_goal(Category::Energy, 155), 160);
        assert_eq!(store.set_goal(Category::Energy, 154), 150);
    }

    #[test]
    fn distance_quantizes_to_whole_miles() {
        let mut store = GoalStore::ephemeral();
        assert_eq!(store.set_goal(Category::Distance, 7), 7);
        assert_eq!(store.set_goal(Category::Distance, 99), 10);
    }

    #[test]
    fn quantization_applies_on_every_update() {
        let mut store = GoalStore::ephemeral();
        store.set_goal(Category::Steps, 12_000);
        assert_eq!(store.set_goal(Category::Steps, 12_499), 12_000);
        assert_eq!(store.set_goal(Category::Steps, 12_501), 13_000);
    }

    #[test]
    fn save_failure_keeps_the_in_memory_value() {
        let mut store = GoalStore::load(Box::new(ReadOnlyStore));
        assert_eq!(store.set_goal(Category::Steps, 8_000), 8_000);
        assert_eq!(store.effective_goal(Category::Steps), 8_000);
    }

    #[test]
    fn goals_survive_a_reload_from_the_same_backend() {
        let backend = std::sync::Arc::new(InMemoryGoals::new());

        struct Shared(std::sync::Arc<InMemoryGoals>);
        impl GoalPersistence for Shared {
            fn load(&self, c: Category) -> Result<Option<u32>, PersistenceError> {
                self.0.load(c)
            }
            fn save(&self, c: Category, v: u32) -> Result<(), PersistenceError> {
                self.0.save(c, v)
            }
        }

        let mut store = GoalStore::load(Box::new(Shared(backend.clone())));
        store.set_goal(Category::Distance, 5);

        let reloaded = GoalStore::load(Box::new(Shared(backend)));
        assert_eq!(reloaded.effective_goal(Category::Distance), 5);
    }
}
