//! Input-boundary validation for seed values.
//!
//! Every seed that reaches a [`Schema`](crate::sweep::Schema) from untrusted text
//! passes through [`validate_positive_float`]. Schema construction itself does
//! no checking.
//!
//! The accepted domain is `[0.0, +inf)`. Zero is accepted even though the
//! validator is called "positive".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;

/// Parse `argument` as a float in the non-negative domain.
///
/// Surrounding whitespace is ignored. The parsed value is returned unchanged.
///
/// # Errors
/// - [`ArgumentError::InvalidFormat`] if the text is not a float
/// - [`ArgumentError::OutOfDomain`] if the value is negative (or NaN)
///
/// # Example
/// ```
/// use seedsweep_core::validate_positive_float;
///
/// assert_eq!(validate_positive_float("0.25"), Ok(0.25));
/// assert!(validate_positive_float("-1.5").is_err());
/// ```
pub fn validate_positive_float(argument: &str) -> Result<f64, ArgumentError> {
    let value: f64 = argument
        .trim()
        .parse()
        .map_err(|_| ArgumentError::InvalidFormat(argument.to_string()))?;

    if value.is_nan() || value < 0.0 {
        return Err(ArgumentError::OutOfDomain(argument.to_string()));
    }

    Ok(value)
}

/// A mesh seed (target element size) that has passed validation.
///
/// Immutable once created; downstream code never re-checks it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Seed(f64);

impl Seed {
    /// Wrap `value`, rejecting negatives and NaN.
    pub fn new(value: f64) -> Result<Self, ArgumentError> {
        Self::try_from(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Seed {
    type Error = ArgumentError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value >= 0.0 {
            Ok(Seed(value))
        } else {
            Err(ArgumentError::OutOfDomain(value.to_string()))
        }
    }
}

impl FromStr for Seed {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_positive_float(s).map(Seed)
    }
}

impl From<Seed> for f64 {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Seed::try_from(value).map_err(serde::de::Error::custom)
    }
}
