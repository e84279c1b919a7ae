use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};

use super::TempUnits;
use crate::core::WeatherError;

/// A finite temperature tagged with its units.
///
/// Magnitudes are bounded by [`Temp::MAX_MAGNITUDE`], so unit conversions and sums of
/// temperatures stay finite.
///
/// Equality is strict: `20C` and `68F` are different values even though they are the
/// same physical temperature. Use [`Temp::compare`] for a unit-independent ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Temp {
    value: f64,
    units: TempUnits,
}

impl Temp {
    /// Largest accepted magnitude, in any units.
    pub const MAX_MAGNITUDE: f64 = 1e100;

    /// Creates a temperature, failing if `value` is NaN, infinite or beyond
    /// [`Temp::MAX_MAGNITUDE`].
    pub fn new(value: f64, units: TempUnits) -> Result<Self, WeatherError> {
        if !value.is_finite() || value.abs() > Self::MAX_MAGNITUDE {
            return Err(WeatherError::InvalidValue(format!(
                "temperature must be finite and at most {:e} in magnitude, got {value}{}",
                Self::MAX_MAGNITUDE,
                units.short_code()
            )));
        }
        Ok(Self { value, units })
    }

    pub fn kelvin(value: f64) -> Result<Self, WeatherError> {
        Self::new(value, TempUnits::Kelvin)
    }

    pub fn celsius(value: f64) -> Result<Self, WeatherError> {
        Self::new(value, TempUnits::Celsius)
    }

    pub fn fahrenheit(value: f64) -> Result<Self, WeatherError> {
        Self::new(value, TempUnits::Fahrenheit)
    }

    /// Zero in the given units.
    pub const fn zero(units: TempUnits) -> Self {
        Self { value: 0.0, units }
    }

    /// Callers guarantee `value` is finite.
    ///
    /// Values derived from bounded temperatures (conversions, sums, means) qualify.
    pub(crate) const fn from_raw(value: f64, units: TempUnits) -> Self {
        Self { value, units }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn units(&self) -> TempUnits {
        self.units
    }

    /// Converts to the supplied units.
    pub fn to(&self, units: TempUnits) -> Self {
        Self::from_raw(units.convert(self.value, self.units), units)
    }

    pub fn to_kelvin(&self) -> Self {
        self.to(TempUnits::Kelvin)
    }

    pub fn to_celsius(&self) -> Self {
        self.to(TempUnits::Celsius)
    }

    pub fn to_fahrenheit(&self) -> Self {
        self.to(TempUnits::Fahrenheit)
    }

    /// Converts to the units of `other`.
    pub fn to_units_of(&self, other: &Temp) -> Self {
        self.to(other.units)
    }

    /// Adds `other`, converted into these units.
    pub fn plus(&self, other: &Temp) -> Result<Self, WeatherError> {
        Self::new(self.value + other.to(self.units).value, self.units)
    }

    /// Subtracts `other`, converted into these units.
    pub fn minus(&self, other: &Temp) -> Result<Self, WeatherError> {
        Self::new(self.value - other.to(self.units).value, self.units)
    }

    /// Divides by a scalar, keeping these units.
    pub fn divide_by(&self, scalar: f64) -> Result<Self, WeatherError> {
        if scalar == 0.0 {
            return Err(WeatherError::DivideByZero);
        }
        Self::new(self.value / scalar, self.units)
    }

    /// Rounds half away from zero to `places` decimals.
    ///
    /// Precision beyond what an `f64` can represent leaves the value unchanged.
    pub fn round(&self, places: u32) -> Self {
        let Ok(exponent) = i32::try_from(places) else {
            return *self;
        };
        let factor = 10_f64.powi(exponent);
        let scaled = self.value * factor;
        if !scaled.is_finite() {
            return *self;
        }
        Self::from_raw(scaled.round() / factor, self.units)
    }

    /// Orders temperatures by their Kelvin value, regardless of units.
    pub fn compare(&self, other: &Temp) -> Ordering {
        self.to_kelvin().value.total_cmp(&other.to_kelvin().value)
    }
}

impl<'de> Deserialize<'de> for Temp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            value: f64,
            units: TempUnits,
        }

        let Repr { value, units } = Repr::deserialize(deserializer)?;
        Self::new(value, units).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Temp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.units.short_code())
    }
}
