//! Core error types for poptrack-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! every invalid operation on the entity model and the collection store.
//! Invalid prices are deliberately absent: they are ignored, not raised.

use thiserror::Error;

use crate::key::SetKey;

/// Core errors produced by the poptrack-core crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A figure with this name is already part of the set.
    #[error("figure {name} already exists in {brand} {series}")]
    DuplicateFigure {
        name: String,
        brand: String,
        series: String,
    },

    /// The named figure is not part of the set.
    #[error("figure {name} does not exist in {brand} {series}")]
    FigureNotFound {
        name: String,
        brand: String,
        series: String,
    },

    /// No set is stored for the given brand and series.
    #[error("set with name {series} and brand {brand} does not exist")]
    SetNotFound { brand: String, series: String },

    /// No set is stored under the given collection key.
    #[error("no set stored under key {key}")]
    SetKeyNotFound { key: SetKey },
}
