//! Collection keys for sets.
//!
//! A set is identified by its brand plus series name. [`SetKey`] folds both
//! to upper case and joins them with `_`, so `("Dimoo", "Vacation")` and
//! `("DIMOO", "vacation")` address the same entry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Case-folded `BRAND_SERIES` key under which a set is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SetKey(String);

impl SetKey {
    /// Builds the key for a brand and series name.
    pub fn new(brand: &str, series_name: &str) -> Self {
        SetKey(format!("{}_{}", brand, series_name).to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_has_brand_series_format() {
        let key = SetKey::new("Brand", "Series Name");
        assert_eq!(key.as_str(), "BRAND_SERIES NAME");
    }

    #[test]
    fn key_ignores_input_casing() {
        assert_eq!(SetKey::new("dimoo", "vacation"), SetKey::new("DIMOO", "Vacation"));
        assert_eq!(SetKey::new("Skullpanda", "x"), SetKey::new("SKULLPANDA", "X"));
    }

    #[test]
    fn distinct_sets_get_distinct_keys() {
        assert_ne!(SetKey::new("DIMOO", "Vacation"), SetKey::new("DIMOO", "Holiday"));
    }

    #[test]
    fn display_prints_inner_key() {
        assert_eq!(SetKey::new("a", "b").to_string(), "A_B");
    }
}
