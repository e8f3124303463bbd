//! Per-day snapshot state, keyed by category.

use crate::Category;
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Total mapping from [`Category`] to a value.
///
/// Fixed-size by construction, so indexing never fails and call sites never
/// need a per-variant branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryMap<T>([T; 3]);

impl<T> CategoryMap<T> {
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self(Category::ALL.map(&mut f))
    }

    pub fn get(&self, category: Category) -> &T {
        &self.0[Self::slot(category)]
    }

    pub fn get_mut(&mut self, category: Category) -> &mut T {
        &mut self.0[Self::slot(category)]
    }

    pub fn set(&mut self, category: Category, value: T) {
        self.0[Self::slot(category)] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.iter().copied().zip(self.0.iter())
    }

    fn slot(category: Category) -> usize {
        match category {
            Category::Energy => 0,
            Category::Steps => 1,
            Category::Distance => 2,
        }
    }
}

impl<T: Clone> CategoryMap<T> {
    pub fn filled(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T: Default> Default for CategoryMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> std::ops::Index<Category> for CategoryMap<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        self.get(category)
    }
}

impl<T> std::ops::IndexMut<Category> for CategoryMap<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        self.get_mut(category)
    }
}

// Serialized as a keyed object, not a bare array, so consumers are not
// coupled to slot order.
impl<T: Serialize> Serialize for CategoryMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, value) in self.iter() {
            map.serialize_entry(&category, value)?;
        }
        map.end()
    }
}

/// Per-category totals for one calendar day.
///
/// Built whole by the aggregator and replaced wholesale, never patched in
/// place, so readers always see one day's data consistently.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivitySnapshot {
    pub day: NaiveDate,
    /// Non-negative totals in each category's canonical unit.
    pub totals: CategoryMap<f64>,
    /// `false` where the provider could not answer. A `false` slot's 0.0
    /// total means "unknown", not "no activity".
    pub availability: CategoryMap<bool>,
}

impl ActivitySnapshot {
    /// Zeroed snapshot for `day` with every category marked available.
    pub fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            totals: CategoryMap::default(),
            availability: CategoryMap::filled(true),
        }
    }

    /// Snapshot for a day on which the health capability was absent
    /// entirely.
    pub fn unavailable(day: NaiveDate) -> Self {
        Self {
            day,
            totals: CategoryMap::default(),
            availability: CategoryMap::filled(false),
        }
    }

    pub fn total(&self, category: Category) -> f64 {
        *self.totals.get(category)
    }

    pub fn is_available(&self, category: Category) -> bool {
        *self.availability.get(category)
    }

    /// True when no category could be served, so the display can distinguish
    /// "no data source" from a genuinely inactive day.
    pub fn data_unavailable(&self) -> bool {
        Category::ALL.iter().all(|&c| !self.is_available(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn indexing_is_total_over_categories() {
        let mut map = CategoryMap::<f64>::default();
        for category in Category::ALL {
            map[category] = 1.0;
        }
        assert_eq!(map[Category::Energy], 1.0);
        assert_eq!(map[Category::Steps], 1.0);
        assert_eq!(map[Category::Distance], 1.0);
    }

    #[test]
    fn iter_follows_display_order() {
        let map = CategoryMap::from_fn(|c| c.label());
        let order: Vec<Category> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn serializes_as_keyed_object() {
        let mut map = CategoryMap::<u32>::default();
        map[Category::Steps] = 5000;
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["steps"], 5000);
        assert_eq!(json["energy"], 0);
    }

    #[test]
    fn unavailable_snapshot_is_not_a_zero_activity_day() {
        let missing = ActivitySnapshot::unavailable(day());
        let idle = ActivitySnapshot::empty(day());

        assert!(missing.data_unavailable());
        assert!(!idle.data_unavailable());
        assert_eq!(missing.total(Category::Steps), idle.total(Category::Steps));
        assert_ne!(
            missing.is_available(Category::Steps),
            idle.is_available(Category::Steps)
        );
    }

    #[test]
    fn single_missing_category_does_not_flag_the_whole_snapshot() {
        let mut snapshot = ActivitySnapshot::empty(day());
        snapshot.availability.set(Category::Steps, false);

        assert!(!snapshot.data_unavailable());
        assert!(!snapshot.is_available(Category::Steps));
        assert!(snapshot.is_available(Category::Energy));
    }
}
