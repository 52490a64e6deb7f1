//! Blind-box sets and their figures.
//!
//! A [`Set`] exclusively owns its [`Figure`]s in insertion order. Figure
//! names are unique within a set; every lookup, mark and delete goes through
//! the owning set so mutations land on the stored figure, not a copy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::figure::Figure;
use crate::key::SetKey;

/// A named, priced product line of blind-box figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    brand: String,
    series_name: String,
    price: f64,
    figures: Vec<Figure>,
}

impl Set {
    /// Creates an empty set. An invalid `price` leaves the price at 0.0.
    pub fn new(brand: impl Into<String>, series_name: impl Into<String>, price: f64) -> Self {
        let mut set = Set {
            brand: brand.into(),
            series_name: series_name.into(),
            price: 0.0,
            figures: Vec::new(),
        };
        set.change_price(price);
        set
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn series_name(&self) -> &str {
        &self.series_name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    /// The collection key derived from brand and series.
    pub fn key(&self) -> SetKey {
        SetKey::new(&self.brand, &self.series_name)
    }

    /// Updates the price if `new_price` is a finite number >= 0.
    ///
    /// Anything else is ignored and the previous price is kept.
    pub fn change_price(&mut self, new_price: f64) {
        if new_price.is_finite() && new_price >= 0.0 {
            self.price = new_price;
        }
    }

    /// Parses `input` as a price and applies it; unparsable text is a no-op.
    pub fn change_price_text(&mut self, input: &str) {
        if let Ok(price) = input.trim().parse::<f64>() {
            self.change_price(price);
        }
    }

    pub fn figure_count(&self) -> usize {
        self.figures.len()
    }

    /// Appends a figure, rejecting a name already present in the set.
    pub fn add_figure(&mut self, figure: Figure) -> Result<(), CoreError> {
        if self.find_figure(figure.name()).is_some() {
            return Err(CoreError::DuplicateFigure {
                name: figure.name().to_string(),
                brand: self.brand.clone(),
                series: self.series_name.clone(),
            });
        }
        self.figures.push(figure);
        Ok(())
    }

    /// Removes and returns the named figure.
    pub fn delete_figure(&mut self, name: &str) -> Result<Figure, CoreError> {
        let index = self
            .figures
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| self.figure_not_found(name))?;
        Ok(self.figures.remove(index))
    }

    /// Non-failing lookup, for callers that only need to branch on existence.
    pub fn find_figure(&self, name: &str) -> Option<&Figure> {
        self.figures.iter().find(|f| f.name() == name)
    }

    /// Marks the named figure as collected in place.
    pub fn mark_figure_collected(&mut self, name: &str) -> Result<(), CoreError> {
        match self.figures.iter_mut().find(|f| f.name() == name) {
            Some(figure) => {
                figure.mark_collected();
                Ok(())
            }
            None => Err(self.figure_not_found(name)),
        }
    }

    /// One figure name per line, or `"No figures"` for an empty set.
    pub fn figure_listing(&self) -> String {
        if self.figures.is_empty() {
            return "No figures".to_string();
        }
        self.figures
            .iter()
            .map(Figure::name)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn figure_not_found(&self, name: &str) -> CoreError {
        CoreError::FigureNotFound {
            name: name.to_string(),
            brand: self.brand.clone(),
            series: self.series_name.clone(),
        }
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Brand: {}\nSeries: {}\nNumber of Figures: {}\nPrice: {:?} dollars",
            self.brand,
            self.series_name,
            self.figures.len(),
            self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_set() -> Set {
        Set::new("test", "test", 0.0)
    }

    #[test]
    fn new_set_has_no_figures() {
        let set = test_set();
        assert_eq!(set.figure_count(), 0);
        assert!(set.figures().is_empty());
    }

    #[test]
    fn constructor_applies_valid_price() {
        assert_eq!(Set::new("test", "test", 59.9).price(), 59.9);
        assert_eq!(Set::new("test", "test", 0.0).price(), 0.0);
    }

    #[test]
    fn constructor_with_invalid_price_defaults_to_zero() {
        assert_eq!(Set::new("test", "test", -10.0).price(), 0.0);
        assert_eq!(Set::new("test", "test", f64::NAN).price(), 0.0);
        assert_eq!(Set::new("test", "test", f64::INFINITY).price(), 0.0);
    }

    #[test]
    fn invalid_price_changes_are_ignored() {
        let mut set = Set::new("test", "test", 20.0);
        set.change_price(-5.0);
        assert_eq!(set.price(), 20.0);
        set.change_price_text("abc");
        assert_eq!(set.price(), 20.0);
        set.change_price_text(" 12.5 ");
        assert_eq!(set.price(), 12.5);
        set.change_price(15.0);
        assert_eq!(set.price(), 15.0);
    }

    #[test]
    fn adding_figures_preserves_order() {
        let mut set = test_set();
        set.add_figure(Figure::new("Foo", 0.5, false, false)).unwrap();
        set.add_figure(Figure::new("Bar", 0.5, true, false)).unwrap();
        let names: Vec<_> = set.figures().iter().map(Figure::name).collect();
        assert_eq!(names, vec!["Foo", "Bar"]);
    }

    #[test]
    fn duplicate_figure_is_rejected() {
        let mut set = test_set();
        set.add_figure(Figure::new("Foo", 0.5, false, false)).unwrap();
        let err = set
            .add_figure(Figure::new("Foo", 0.25, true, true))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::DuplicateFigure {
                name: "Foo".into(),
                brand: "test".into(),
                series: "test".into(),
            }
        );
        assert_eq!(err.to_string(), "figure Foo already exists in test test");
        assert_eq!(set.figure_count(), 1);
    }

    #[test]
    fn find_figure_returns_none_when_absent() {
        let mut set = test_set();
        set.add_figure(Figure::new("Foo", 0.5, false, false)).unwrap();
        assert_eq!(set.find_figure("Foo").map(Figure::name), Some("Foo"));
        assert!(set.find_figure("Bar").is_none());
    }

    #[test]
    fn mark_figure_collected_mutates_stored_figure() {
        let mut set = test_set();
        set.add_figure(Figure::new("Foo", 0.5, false, false)).unwrap();
        set.mark_figure_collected("Foo").unwrap();
        assert!(set.find_figure("Foo").unwrap().is_collected());
    }

    #[test]
    fn mark_missing_figure_fails() {
        let mut set = test_set();
        set.add_figure(Figure::new("Foo", 0.5, false, false)).unwrap();
        let err = set.mark_figure_collected("Bar").unwrap_err();
        assert!(matches!(err, CoreError::FigureNotFound { ref name, .. } if name == "Bar"));
    }

    #[test]
    fn delete_figure_removes_only_that_figure() {
        let mut set = test_set();
        set.add_figure(Figure::new("Foo", 0.5, false, false)).unwrap();
        set.add_figure(Figure::new("Bar", 0.5, false, false)).unwrap();
        let removed = set.delete_figure("Foo").unwrap();
        assert_eq!(removed.name(), "Foo");
        assert!(set.find_figure("Foo").is_none());
        assert!(set.find_figure("Bar").is_some());
    }

    #[test]
    fn delete_missing_figure_fails() {
        let mut set = test_set();
        let err = set.delete_figure("Bar").unwrap_err();
        assert_eq!(err.to_string(), "figure Bar does not exist in test test");
    }

    #[test]
    fn display_summarizes_set() {
        assert_eq!(
            test_set().to_string(),
            "Brand: test\nSeries: test\nNumber of Figures: 0\nPrice: 0.0 dollars"
        );
    }

    #[test]
    fn figure_listing_handles_empty_and_populated_sets() {
        let mut set = test_set();
        assert_eq!(set.figure_listing(), "No figures");
        set.add_figure(Figure::new("Foo", 0.1, false, false)).unwrap();
        set.add_figure(Figure::new("Bar", 0.1, true, false)).unwrap();
        assert_eq!(set.figure_listing(), "Foo\nBar");
    }

    #[test]
    fn key_is_case_folded() {
        assert_eq!(Set::new("Brand", "Series Name", 0.0).key().as_str(), "BRAND_SERIES NAME");
    }
}
