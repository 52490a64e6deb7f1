//! Row shapes returned by the gateway.
//!
//! Figures travel as [`poptrack_core::Figure`] directly; these types only
//! add what a row carries beyond the entity itself.

use serde::{Deserialize, Serialize};

use poptrack_core::{Figure, Set};

/// A row of the sets table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub brand: String,
    pub series_name: String,
    pub price: f64,
}

impl SetRecord {
    pub fn from_set(set: &Set) -> Self {
        SetRecord {
            brand: set.brand().to_string(),
            series_name: set.series_name().to_string(),
            price: set.price(),
        }
    }

    /// Builds an empty in-memory set from this row.
    pub fn to_set(&self) -> Set {
        Set::new(self.brand.clone(), self.series_name.clone(), self.price)
    }
}

/// A row of the figures table: the figure plus the set it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRecord {
    pub brand: String,
    pub series_name: String,
    pub figure: Figure,
}

impl FigureRecord {
    /// True if this row belongs to the set `(brand, series)`.
    ///
    /// Compares ASCII-case-insensitively, the same way the `NOCASE` columns do.
    pub fn belongs_to(&self, brand: &str, series: &str) -> bool {
        self.brand.eq_ignore_ascii_case(brand) && self.series_name.eq_ignore_ascii_case(series)
    }
}

/// Counts of what a single `save_all` wrote.
///
/// `skipped` counts pending marks and deletes that targeted rows storage
/// never had.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    pub sets_inserted: usize,
    pub figures_inserted: usize,
    pub prices_updated: usize,
    pub marks_flushed: usize,
    pub sets_deleted: usize,
    pub figures_deleted: usize,
    pub skipped: usize,
}

impl SaveReport {
    /// Returns true if the save wrote nothing.
    pub fn is_noop(&self) -> bool {
        self.sets_inserted == 0
            && self.figures_inserted == 0
            && self.prices_updated == 0
            && self.marks_flushed == 0
            && self.sets_deleted == 0
            && self.figures_deleted == 0
    }
}
