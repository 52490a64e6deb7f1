//! In-memory implementation of [`CollectionStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and for sessions that
//! don't need a database file. It follows the SQLite backend's rules:
//! brand and series match ASCII-case-insensitively (like `COLLATE NOCASE`),
//! figure names are globally unique, deleting a set cascades to its figures,
//! and empty listings fail the same way.

use indexmap::IndexMap;

use poptrack_core::Figure;

use crate::error::StorageError;
use crate::traits::CollectionStore;
use crate::types::{FigureRecord, SetRecord};

/// In-memory implementation of [`CollectionStore`].
///
/// Rows live in insertion-ordered maps so listings come back in the order
/// they were written, like SQLite's rowid order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    sets: IndexMap<RowKey, SetRecord>,
    figures: IndexMap<String, FigureRecord>,
}

/// Set rows are keyed by brand and series folded to ASCII lowercase.
type RowKey = (String, String);

fn row_key(brand: &str, series: &str) -> RowKey {
    (brand.to_ascii_lowercase(), series.to_ascii_lowercase())
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn set_not_found(brand: &str, series: &str) -> StorageError {
        StorageError::SetNotFound {
            brand: brand.to_string(),
            series: series.to_string(),
        }
    }

    fn figure_not_found(name: &str) -> StorageError {
        StorageError::FigureNotFound {
            name: name.to_string(),
        }
    }
}

impl CollectionStore for InMemoryStore {
    fn set_exists(&self, brand: &str, series: &str) -> Result<bool, StorageError> {
        Ok(self.sets.contains_key(&row_key(brand, series)))
    }

    fn figure_exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.figures.contains_key(name))
    }

    fn insert_set(&mut self, brand: &str, series: &str, price: f64) -> Result<(), StorageError> {
        let key = row_key(brand, series);
        if self.sets.contains_key(&key) {
            return Err(StorageError::DuplicateSet {
                brand: brand.to_string(),
                series: series.to_string(),
            });
        }
        self.sets.insert(
            key,
            SetRecord {
                brand: brand.to_string(),
                series_name: series.to_string(),
                price,
            },
        );
        Ok(())
    }

    fn get_set(&self, brand: &str, series: &str) -> Result<SetRecord, StorageError> {
        self.sets
            .get(&row_key(brand, series))
            .cloned()
            .ok_or_else(|| Self::set_not_found(brand, series))
    }

    fn update_set_price(
        &mut self,
        brand: &str,
        series: &str,
        price: f64,
    ) -> Result<(), StorageError> {
        let record = self
            .sets
            .get_mut(&row_key(brand, series))
            .ok_or_else(|| Self::set_not_found(brand, series))?;
        record.price = price;
        Ok(())
    }

    fn delete_set(&mut self, brand: &str, series: &str) -> Result<(), StorageError> {
        if self.sets.shift_remove(&row_key(brand, series)).is_none() {
            return Err(Self::set_not_found(brand, series));
        }
        self.figures.retain(|_, record| !record.belongs_to(brand, series));
        Ok(())
    }

    fn insert_figure(
        &mut self,
        brand: &str,
        series: &str,
        figure: &Figure,
    ) -> Result<(), StorageError> {
        let set = self
            .sets
            .get(&row_key(brand, series))
            .ok_or_else(|| Self::set_not_found(brand, series))?;
        if self.figures.contains_key(figure.name()) {
            return Err(StorageError::DuplicateFigure {
                name: figure.name().to_string(),
            });
        }
        let record = FigureRecord {
            brand: set.brand.clone(),
            series_name: set.series_name.clone(),
            figure: figure.clone(),
        };
        self.figures.insert(figure.name().to_string(), record);
        Ok(())
    }

    fn get_figure(&self, name: &str) -> Result<FigureRecord, StorageError> {
        self.figures
            .get(name)
            .cloned()
            .ok_or_else(|| Self::figure_not_found(name))
    }

    fn delete_figure(&mut self, name: &str) -> Result<(), StorageError> {
        self.figures
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| Self::figure_not_found(name))
    }

    fn mark_figure_collected(&mut self, name: &str) -> Result<(), StorageError> {
        let record = self
            .figures
            .get_mut(name)
            .ok_or_else(|| Self::figure_not_found(name))?;
        record.figure.mark_collected();
        Ok(())
    }

    fn list_all_sets(&self) -> Result<Vec<SetRecord>, StorageError> {
        if self.sets.is_empty() {
            return Err(StorageError::EmptyStore);
        }
        Ok(self.sets.values().cloned().collect())
    }

    fn list_figures_for_set(
        &self,
        brand: &str,
        series: &str,
    ) -> Result<Vec<Figure>, StorageError> {
        let figures: Vec<Figure> = self
            .figures
            .values()
            .filter(|record| record.belongs_to(brand, series))
            .map(|record| record.figure.clone())
            .collect();
        if figures.is_empty() {
            return Err(StorageError::NoFigures {
                brand: brand.to_string(),
                series: series.to_string(),
            });
        }
        Ok(figures)
    }
}
