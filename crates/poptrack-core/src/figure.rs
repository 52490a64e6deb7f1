//! A single collectible figure from a blind-box set.
//!
//! [`Figure`] carries a draw probability, a collected flag and a secret flag.
//! The probability is expected to lie in `(0, 1)` but is not checked here;
//! callers that care validate it themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An individual figure owned by exactly one [`Set`](crate::set::Set).
///
/// Equality is structural over all four fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    name: String,
    probability: f64,
    is_collected: bool,
    is_secret: bool,
}

impl Figure {
    /// Creates a figure. `is_secret` cannot change afterwards.
    pub fn new(name: impl Into<String>, probability: f64, is_collected: bool, is_secret: bool) -> Self {
        Figure {
            name: name.into(),
            probability,
            is_collected,
            is_secret,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn is_collected(&self) -> bool {
        self.is_collected
    }

    pub fn is_secret(&self) -> bool {
        self.is_secret
    }

    /// Flags the figure as owned by the collector.
    pub fn mark_collected(&mut self) {
        self.is_collected = true;
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\nProbability: {:?}\nCollected: {}\nSecret: {}",
            self.name, self.probability, self.is_collected, self.is_secret
        )
    }
}
