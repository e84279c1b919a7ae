use serde::{Deserialize, Deserializer, Serialize};

use super::{Temp, TempUnits};
use crate::core::{Fraction, Probability, WeatherError};

/// Sorted collection of temperatures answering quantile and threshold queries.
///
/// Values are converted into the units of the first temperature supplied (Kelvin when
/// empty) and kept in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempBag {
    values: Vec<f64>,
    units: TempUnits,
}

impl TempBag {
    pub fn empty() -> Self {
        Self {
            values: Vec::new(),
            units: TempUnits::Kelvin,
        }
    }

    pub fn of<I>(temps: I) -> Self
    where
        I: IntoIterator<Item = Temp>,
    {
        let mut temps = temps.into_iter().peekable();
        let units = temps
            .peek()
            .map_or(TempUnits::Kelvin, |temp| temp.units());
        let mut values: Vec<f64> = temps.map(|temp| temp.to(units).value()).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        Self { values, units }
    }

    /// Bag of `n` temperatures drawn from `generator`.
    pub fn generate<F>(n: usize, mut generator: F) -> Self
    where
        F: FnMut() -> Temp,
    {
        Self::of((0..n).map(|_| generator()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn units(&self) -> TempUnits {
        self.units
    }

    /// Sorted raw magnitudes in [`TempBag::units`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn to(&self, units: TempUnits) -> Self {
        // Every conversion is increasing, so order is preserved.
        Self {
            values: self
                .values
                .iter()
                .map(|&value| units.convert(value, self.units))
                .collect(),
            units,
        }
    }

    /// Fraction of the bag strictly below `temp`.
    ///
    /// Ties resolve to the first equal element, so the minimum maps to zero and
    /// anything above the maximum maps to one.
    pub fn quantile_of(&self, temp: &Temp) -> Result<Fraction, WeatherError> {
        self.require_values("quantile_of")?;
        let value = temp.to(self.units).value();
        let index = self.values.partition_point(|&v| v < value);
        Ok(Fraction::from_unit_interval(
            index as f64 / self.len() as f64,
        ))
    }

    /// Linearly interpolated order statistic at `quantile`.
    pub fn quantile(&self, quantile: Fraction) -> Result<Temp, WeatherError> {
        self.require_values("quantile")?;
        let last = self.len() - 1;
        let rank = quantile.value() * last as f64;
        let value = if rank >= last as f64 {
            self.values[last]
        } else {
            let lo = rank.floor() as usize;
            let w = rank - lo as f64;
            self.values[lo] + w * (self.values[lo + 1] - self.values[lo])
        };
        Ok(Temp::from_raw(value, self.units))
    }

    /// Evaluates [`TempBag::quantile`] at each requested level, in request order.
    pub fn quantiles<I>(&self, quantiles: I) -> Result<Vec<(Fraction, Temp)>, WeatherError>
    where
        I: IntoIterator<Item = Fraction>,
    {
        quantiles
            .into_iter()
            .map(|q| self.quantile(q).map(|temp| (q, temp)))
            .collect()
    }

    /// Probability of drawing a temperature at or above `temp`.
    pub fn p_more_than_or_equal_to(&self, temp: &Temp) -> Result<Probability, WeatherError> {
        Ok(Probability::from(self.quantile_of(temp)?).complement())
    }

    pub fn sum(&self) -> Temp {
        Temp::from_raw(self.values.iter().sum(), self.units)
    }

    pub fn mean(&self) -> Option<Temp> {
        if self.is_empty() {
            return None;
        }
        Some(Temp::from_raw(
            self.values.iter().sum::<f64>() / self.len() as f64,
            self.units,
        ))
    }

    /// Midpoint of the minimum and maximum.
    pub fn mid(&self) -> Option<Temp> {
        let lo = self.values.first()?;
        let hi = self.values.last()?;
        Some(Temp::from_raw(lo + (hi - lo) / 2.0, self.units))
    }

    pub fn min(&self) -> Option<Temp> {
        self.values
            .first()
            .map(|&value| Temp::from_raw(value, self.units))
    }

    pub fn max(&self) -> Option<Temp> {
        self.values
            .last()
            .map(|&value| Temp::from_raw(value, self.units))
    }

    fn require_values(&self, operation: &str) -> Result<(), WeatherError> {
        if self.is_empty() {
            return Err(WeatherError::EmptyInput(format!(
                "{operation} requires a non-empty bag"
            )));
        }
        Ok(())
    }
}

impl Default for TempBag {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Temp> for TempBag {
    fn from_iter<I: IntoIterator<Item = Temp>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl<'de> Deserialize<'de> for TempBag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            values: Vec<f64>,
            units: TempUnits,
        }

        let Repr { mut values, units } = Repr::deserialize(deserializer)?;
        for &value in &values {
            Temp::new(value, units).map_err(serde::de::Error::custom)?;
        }
        values.sort_by(|a, b| a.total_cmp(b));
        Ok(Self { values, units })
    }
}
