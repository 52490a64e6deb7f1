//! The in-memory collection store and its pending-change log.
//!
//! [`Collection`] is the single authoritative owner of every [`Set`]. Each
//! mutating operation that storage cannot infer from the sets alone (marks
//! and deletes) is recorded in the [`ChangeLog`], which the storage layer
//! drains after flushing it.
//!
//! Inserts are not logged: the reconciler discovers new sets and figures by
//! comparing the collection with what storage already holds.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::figure::Figure;
use crate::key::SetKey;
use crate::set::Set;

/// Edits made in memory that have not been written to storage yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeLog {
    marked_figures: Vec<String>,
    deleted_figures: Vec<String>,
    /// Full sets, captured before removal so their rows can still be found.
    deleted_sets: Vec<Set>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marked_figures(&self) -> &[String] {
        &self.marked_figures
    }

    pub fn deleted_figures(&self) -> &[String] {
        &self.deleted_figures
    }

    pub fn deleted_sets(&self) -> &[Set] {
        &self.deleted_sets
    }

    /// Returns true if nothing is waiting to be flushed.
    pub fn is_empty(&self) -> bool {
        self.marked_figures.is_empty()
            && self.deleted_figures.is_empty()
            && self.deleted_sets.is_empty()
    }

    pub fn clear_marked_figures(&mut self) {
        self.marked_figures.clear();
    }

    pub fn clear_deleted_figures(&mut self) {
        self.deleted_figures.clear();
    }

    pub fn clear_deleted_sets(&mut self) {
        self.deleted_sets.clear();
    }

    /// Drops pending set deletions whose key matches `key`.
    pub fn forget_deleted_set(&mut self, key: &SetKey) {
        self.deleted_sets.retain(|set| &set.key() != key);
    }

    /// Drops pending figure deletions for `name`.
    pub fn forget_deleted_figure(&mut self, name: &str) {
        self.deleted_figures.retain(|n| n != name);
    }
}

/// Keyed mapping of sets plus the log of unsaved marks and deletes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    sets: IndexMap<SetKey, Set>,
    changes: ChangeLog,
}

impl Collection {
    /// Creates an empty collection with an empty change log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from sets that already match storage.
    ///
    /// Nothing is logged; later sets overwrite earlier ones with the same key.
    pub fn from_sets(sets: impl IntoIterator<Item = Set>) -> Self {
        Collection {
            sets: sets.into_iter().map(|set| (set.key(), set)).collect(),
            changes: ChangeLog::new(),
        }
    }

    /// Key generator, identical to [`SetKey::new`].
    pub fn key_for(brand: &str, series_name: &str) -> SetKey {
        SetKey::new(brand, series_name)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn contains_key(&self, key: &SetKey) -> bool {
        self.sets.contains_key(key)
    }

    /// Iterates sets in insertion order.
    pub fn sets(&self) -> impl Iterator<Item = &Set> {
        self.sets.values()
    }

    pub fn changes(&self) -> &ChangeLog {
        &self.changes
    }

    pub fn changes_mut(&mut self) -> &mut ChangeLog {
        &mut self.changes
    }

    /// Inserts `set` under its key, overwriting any set already stored there.
    ///
    /// An overwritten set is logged as deleted so storage drops its rows too.
    pub fn add_set(&mut self, set: Set) -> SetKey {
        let key = set.key();
        if let Some(replaced) = self.sets.insert(key.clone(), set) {
            self.changes.deleted_sets.push(replaced);
        }
        key
    }

    /// Builds a set from its fields and inserts it like [`Collection::add_set`].
    pub fn add_set_from_fields(&mut self, brand: &str, series_name: &str, price: f64) -> SetKey {
        self.add_set(Set::new(brand, series_name, price))
    }

    /// Adds `figure` to the set stored under `key`.
    pub fn add_figure_to_set(&mut self, key: &SetKey, figure: Figure) -> Result<(), CoreError> {
        self.set_by_key_mut(key)?.add_figure(figure)
    }

    pub fn get_set(&self, brand: &str, series_name: &str) -> Result<&Set, CoreError> {
        self.sets
            .get(&SetKey::new(brand, series_name))
            .ok_or_else(|| set_not_found(brand, series_name))
    }

    /// Mutable access to a stored set.
    ///
    /// The borrow ends before the next collection call. Edits made through it
    /// are not logged: marks and deletes should go through
    /// [`Collection::mark_figure_in_set`] and [`Collection::delete_figure_in_set`].
    pub fn get_set_mut(&mut self, brand: &str, series_name: &str) -> Result<&mut Set, CoreError> {
        self.sets
            .get_mut(&SetKey::new(brand, series_name))
            .ok_or_else(|| set_not_found(brand, series_name))
    }

    /// Non-failing lookup by key.
    pub fn find_set(&self, key: &SetKey) -> Option<&Set> {
        self.sets.get(key)
    }

    /// Removes a set and records it for deletion from storage.
    pub fn delete_set(&mut self, brand: &str, series_name: &str) -> Result<(), CoreError> {
        let removed = self
            .sets
            .shift_remove(&SetKey::new(brand, series_name))
            .ok_or_else(|| set_not_found(brand, series_name))?;
        self.changes.deleted_sets.push(removed);
        Ok(())
    }

    /// Marks a figure collected and records the mark for storage.
    pub fn mark_figure_in_set(&mut self, key: &SetKey, name: &str) -> Result<(), CoreError> {
        self.set_by_key_mut(key)?.mark_figure_collected(name)?;
        self.changes.marked_figures.push(name.to_string());
        Ok(())
    }

    /// Deletes a figure and records the delete for storage.
    pub fn delete_figure_in_set(&mut self, key: &SetKey, name: &str) -> Result<(), CoreError> {
        self.set_by_key_mut(key)?.delete_figure(name)?;
        self.changes.deleted_figures.push(name.to_string());
        Ok(())
    }

    /// Returns true if any stored set holds a figure called `name`.
    pub fn contains_figure(&self, name: &str) -> bool {
        self.sets.values().any(|set| set.find_figure(name).is_some())
    }

    fn set_by_key_mut(&mut self, key: &SetKey) -> Result<&mut Set, CoreError> {
        self.sets
            .get_mut(key)
            .ok_or_else(|| CoreError::SetKeyNotFound { key: key.clone() })
    }
}

fn set_not_found(brand: &str, series_name: &str) -> CoreError {
    CoreError::SetNotFound {
        brand: brand.to_string(),
        series: series_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_set() -> (Collection, SetKey) {
        let mut collection = Collection::new();
        let key = collection.add_set(Set::new("Brand", "Series Name", 0.0));
        (collection, key)
    }

    #[test]
    fn new_collection_has_empty_change_log() {
        let collection = Collection::new();
        assert!(collection.is_empty());
        assert!(collection.changes().marked_figures().is_empty());
        assert!(collection.changes().deleted_figures().is_empty());
        assert!(collection.changes().deleted_sets().is_empty());
        assert!(collection.changes().is_empty());
    }

    #[test]
    fn add_set_stores_under_generated_key() {
        let (collection, key) = tracker_with_set();
        assert_eq!(key.as_str(), "BRAND_SERIES NAME");
        assert_eq!(collection.len(), 1);
        let set = collection.find_set(&key).unwrap();
        assert_eq!(set.brand(), "Brand");
        assert_eq!(set.series_name(), "Series Name");
        assert_eq!(set.price(), 0.0);
    }

    #[test]
    fn add_set_from_fields_builds_set() {
        let mut collection = Collection::new();
        let key = collection.add_set_from_fields("Brand", "Series Name", 12.0);
        assert_eq!(key, Collection::key_for("brand", "series name"));
        assert_eq!(collection.find_set(&key).unwrap().price(), 12.0);
    }

    #[test]
    fn overwriting_a_set_logs_the_replaced_one() {
        let (mut collection, key) = tracker_with_set();
        collection.add_set(Set::new("BRAND", "series name", 5.0));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.find_set(&key).unwrap().price(), 5.0);
        assert_eq!(collection.changes().deleted_sets().len(), 1);
        assert_eq!(collection.changes().deleted_sets()[0].brand(), "Brand");
    }

    #[test]
    fn get_set_is_case_insensitive() {
        let (collection, _) = tracker_with_set();
        let set = collection.get_set("brand", "series name").unwrap();
        assert_eq!(set.brand(), "Brand");
    }

    #[test]
    fn get_missing_set_names_brand_and_series() {
        let collection = Collection::new();
        let err = collection.get_set("Doesnt", "Exist").unwrap_err();
        assert_eq!(err.to_string(), "set with name Exist and brand Doesnt does not exist");
    }

    #[test]
    fn get_set_mut_edits_are_visible() {
        let (mut collection, key) = tracker_with_set();
        collection
            .get_set_mut("Brand", "Series Name")
            .unwrap()
            .change_price(42.0);
        assert_eq!(collection.find_set(&key).unwrap().price(), 42.0);
    }

    #[test]
    fn add_figure_to_set_by_key() {
        let (mut collection, key) = tracker_with_set();
        collection
            .add_figure_to_set(&key, Figure::new("name", 0.5, true, false))
            .unwrap();
        let set = collection.find_set(&key).unwrap();
        assert_eq!(set.find_figure("name").unwrap().name(), "name");
        assert!(collection.contains_figure("name"));
    }

    #[test]
    fn add_figure_to_missing_key_fails() {
        let mut collection = Collection::new();
        let key = SetKey::new("No", "Set");
        let err = collection
            .add_figure_to_set(&key, Figure::new("name", 0.5, true, false))
            .unwrap_err();
        assert_eq!(err, CoreError::SetKeyNotFound { key });
    }

    #[test]
    fn mark_figure_in_set_logs_name() {
        let (mut collection, key) = tracker_with_set();
        collection
            .add_figure_to_set(&key, Figure::new("name", 0.5, false, false))
            .unwrap();
        collection.mark_figure_in_set(&key, "name").unwrap();

        assert!(collection.find_set(&key).unwrap().find_figure("name").unwrap().is_collected());
        assert_eq!(collection.changes().marked_figures(), ["name".to_string()]);
    }

    #[test]
    fn failed_mark_is_not_logged() {
        let (mut collection, key) = tracker_with_set();
        assert!(collection.mark_figure_in_set(&key, "ghost").is_err());
        assert!(collection.changes().marked_figures().is_empty());
    }

    #[test]
    fn delete_figure_in_set_logs_name() {
        let (mut collection, key) = tracker_with_set();
        collection
            .add_figure_to_set(&key, Figure::new("name", 0.5, false, false))
            .unwrap();
        collection.delete_figure_in_set(&key, "name").unwrap();

        assert!(collection.find_set(&key).unwrap().find_figure("name").is_none());
        assert_eq!(collection.changes().deleted_figures(), ["name".to_string()]);

        let err = collection.delete_figure_in_set(&key, "name").unwrap_err();
        assert_eq!(err.to_string(), "figure name does not exist in Brand Series Name");
    }

    #[test]
    fn delete_set_captures_removed_set() {
        let (mut collection, _) = tracker_with_set();
        collection.delete_set("brand", "series name").unwrap();

        assert!(collection.is_empty());
        assert_eq!(collection.changes().deleted_sets().len(), 1);
        assert_eq!(collection.changes().deleted_sets()[0].series_name(), "Series Name");
        assert!(collection.get_set("brand", "series name").is_err());
    }

    #[test]
    fn delete_missing_set_fails() {
        let mut collection = Collection::new();
        let err = collection.delete_set("Doesnt", "Exist").unwrap_err();
        assert_eq!(
            err,
            CoreError::SetNotFound {
                brand: "Doesnt".into(),
                series: "Exist".into(),
            }
        );
        assert!(collection.changes().is_empty());
    }

    #[test]
    fn from_sets_does_not_log() {
        let collection = Collection::from_sets(vec![
            Set::new("A", "One", 1.0),
            Set::new("B", "Two", 2.0),
        ]);
        assert_eq!(collection.len(), 2);
        assert!(collection.changes().is_empty());
    }

    #[test]
    fn forget_helpers_drop_matching_entries() {
        let (mut collection, key) = tracker_with_set();
        collection
            .add_figure_to_set(&key, Figure::new("a", 0.5, false, false))
            .unwrap();
        collection.delete_figure_in_set(&key, "a").unwrap();
        collection.delete_set("Brand", "Series Name").unwrap();

        let changes = collection.changes_mut();
        changes.forget_deleted_figure("a");
        changes.forget_deleted_set(&key);
        assert!(changes.is_empty());
    }
}
