//! Rating value object and extraction from generated text.
//!
//! Generated ratings arrive as free-form text. [`parse_rating`] pulls the
//! first numeric token out of it and fails when there is none; it never
//! substitutes a default score. Range checking is done by [`Rating::new`],
//! which rejects instead of clamping.

use crate::core::error::GameError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d+(?:\.\d+)?").expect("rating pattern is a valid regex")
});

/// A score in `[0, 10]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    /// Validate a raw value for `participant`
    pub fn new(participant: &str, value: f64) -> Result<Self, GameError> {
        if !value.is_finite() {
            return Err(GameError::InvalidRating {
                participant: participant.to_string(),
                detail: format!("{} is not a finite number", value),
            });
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(GameError::InvalidRating {
                participant: participant.to_string(),
                detail: format!("{} is outside {}-{}", value, Self::MIN, Self::MAX),
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract the first integer or decimal number from generated text.
///
/// # Examples
///
/// ```
/// use spotlight_domain::parse_rating;
///
/// assert_eq!(parse_rating("8").unwrap(), 8.0);
/// assert_eq!(parse_rating("I'd give that a 7.5/10!").unwrap(), 7.5);
/// assert!(parse_rating("Absolutely smitten").is_err());
/// ```
pub fn parse_rating(text: &str) -> Result<f64, GameError> {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| GameError::UnparsableRating(text.to_string()))
}
