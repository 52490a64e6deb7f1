//! Storage error types for poptrack-storage.
//!
//! [`StorageError`] covers every failure mode of a gateway backend:
//! missing rows, key collisions, empty listings, and SQLite or migration
//! failures. Reconciliation uses [`StorageError::is_not_found`] and
//! [`StorageError::is_empty_result`] to tell expected absences apart from
//! real failures.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No set row exists for the brand and series.
    #[error("set {brand} {series} does not exist in database")]
    SetNotFound { brand: String, series: String },

    /// No figure row exists with this name.
    #[error("figure {name} does not exist in database")]
    FigureNotFound { name: String },

    /// A set row with the same brand and series already exists.
    #[error("set {brand} {series} already exists")]
    DuplicateSet { brand: String, series: String },

    /// A figure row with the same name already exists.
    #[error("figure {name} already exists")]
    DuplicateFigure { name: String },

    /// The store holds no sets at all.
    #[error("no sets stored in database")]
    EmptyStore,

    /// The set exists but has no figure rows.
    #[error("set {brand} {series} has no figures in database")]
    NoFigures { brand: String, series: String },

    /// SQLite reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// Stored data violates an expected invariant.
    #[error("integrity error: {reason}")]
    Integrity { reason: String },
}

impl StorageError {
    /// True for lookups that failed because the row is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::SetNotFound { .. } | StorageError::FigureNotFound { .. }
        )
    }

    /// True for listings that failed only because there was nothing to list.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, StorageError::EmptyStore | StorageError::NoFigures { .. })
    }
}
