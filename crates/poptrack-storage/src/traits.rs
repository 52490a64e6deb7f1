//! The [`CollectionStore`] trait defining the persistence gateway contract.
//!
//! Every method maps to a single row-level read or write. Reconciliation in
//! [`crate::sync`] is written purely against this trait, so the SQLite and
//! in-memory backends are swappable without touching it.
//!
//! Listing methods fail with [`StorageError::EmptyStore`] or
//! [`StorageError::NoFigures`] when there is nothing to return; callers that
//! treat an empty store as normal translate those into empty results.

use poptrack_core::Figure;

use crate::error::StorageError;
use crate::types::{FigureRecord, SetRecord};

/// The storage contract for sets and figures.
///
/// The trait is synchronous: one logical session issues one call at a time.
pub trait CollectionStore {
    // -------------------------------------------------------------------
    // Existence queries
    // -------------------------------------------------------------------

    /// Returns true if a set row exists for `brand` and `series`.
    fn set_exists(&self, brand: &str, series: &str) -> Result<bool, StorageError>;

    /// Returns true if a figure row named `name` exists.
    fn figure_exists(&self, name: &str) -> Result<bool, StorageError>;

    // -------------------------------------------------------------------
    // Set rows
    // -------------------------------------------------------------------

    /// Inserts a set row. Fails with [`StorageError::DuplicateSet`] if the
    /// (brand, series) pair is already stored.
    fn insert_set(&mut self, brand: &str, series: &str, price: f64) -> Result<(), StorageError>;

    /// Retrieves a set row.
    fn get_set(&self, brand: &str, series: &str) -> Result<SetRecord, StorageError>;

    /// Like [`CollectionStore::get_set`], but an absent row is `Ok(None)`.
    fn try_get_set(&self, brand: &str, series: &str) -> Result<Option<SetRecord>, StorageError> {
        match self.get_set(brand, series) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Overwrites the price of an existing set row.
    fn update_set_price(&mut self, brand: &str, series: &str, price: f64)
        -> Result<(), StorageError>;

    /// Deletes a set row together with its figures.
    fn delete_set(&mut self, brand: &str, series: &str) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Figure rows
    // -------------------------------------------------------------------

    /// Inserts a figure row belonging to the given set.
    fn insert_figure(&mut self, brand: &str, series: &str, figure: &Figure)
        -> Result<(), StorageError>;

    /// Retrieves a figure row by name.
    fn get_figure(&self, name: &str) -> Result<FigureRecord, StorageError>;

    /// Like [`CollectionStore::get_figure`], but an absent row is `Ok(None)`.
    fn try_get_figure(&self, name: &str) -> Result<Option<FigureRecord>, StorageError> {
        match self.get_figure(name) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Deletes a figure row by name.
    fn delete_figure(&mut self, name: &str) -> Result<(), StorageError>;

    /// Sets the collected flag of a figure row.
    fn mark_figure_collected(&mut self, name: &str) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Listings
    // -------------------------------------------------------------------

    /// Lists every set row.
    fn list_all_sets(&self) -> Result<Vec<SetRecord>, StorageError>;

    /// Lists the figures of one set in insertion order.
    fn list_figures_for_set(&self, brand: &str, series: &str)
        -> Result<Vec<Figure>, StorageError>;
}
