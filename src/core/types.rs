use serde::{Deserialize, Deserializer, Serialize};

use super::WeatherError;

/// A number in `[0, 1]` describing a position within a distribution.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Fraction(f64);

impl Fraction {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// Creates a fraction, failing for NaN or values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, WeatherError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(WeatherError::InvalidValue(format!(
                "fraction must be in [0, 1], got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Callers guarantee `value` is within `[0, 1]`.
    pub(crate) const fn from_unit_interval(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Probability of an event, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Probability(f64);

impl Probability {
    /// Creates a probability, failing for NaN or values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, WeatherError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(WeatherError::InvalidValue(format!(
                "probability must be in [0, 1], got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Probability of the complementary event.
    pub fn complement(self) -> Self {
        Self(1.0 - self.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Fraction> for Probability {
    fn from(fraction: Fraction) -> Self {
        Self(fraction.0)
    }
}

impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
