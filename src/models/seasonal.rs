//! Seasonal mean curve `A + B t + C sin(w t + theta)`, fitted by ordinary least squares.
//!
//! `t` counts days from the first observation (which has `t = 1`) and `w = 2 pi / 365`.
//! The regression is linear in `[1, t, sin(w t), cos(w t)]`; amplitude and phase are
//! recovered from the last two coefficients.

use std::f64::consts::PI;

use chrono::NaiveDate;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use super::{TempPredictor, TempTrainer};
use crate::core::WeatherError;
use crate::temp::{Temp, TempSeries, TempUnits};
use crate::time::DateRange;

const W: f64 = 2.0 * PI / 365.0;

/// Coefficients of a fitted seasonal mean curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalMeanParams {
    /// Date with `t = 1`.
    pub origin: NaiveDate,
    /// Level.
    pub a: f64,
    /// Linear trend per day.
    pub b: f64,
    /// Seasonal amplitude.
    pub c: f64,
    /// Phase in `(-2 pi, 0]`.
    pub theta: f64,
    pub units: TempUnits,
}

impl SeasonalMeanParams {
    pub fn validate(&self) -> Result<(), WeatherError> {
        for (name, value) in [("a", self.a), ("b", self.b), ("c", self.c), ("theta", self.theta)] {
            if !value.is_finite() {
                return Err(WeatherError::InvalidParameter(format!(
                    "seasonal mean {name} must be finite, got {value}"
                )));
            }
        }
        if self.c < 0.0 {
            return Err(WeatherError::InvalidParameter(format!(
                "seasonal amplitude must be >= 0, got {}",
                self.c
            )));
        }
        Ok(())
    }

    fn t(&self, date: NaiveDate) -> f64 {
        ((date - self.origin).num_days() + 1) as f64
    }

    fn value(&self, t: f64) -> f64 {
        self.a + self.b * t + self.c * (W * t + self.theta).sin()
    }
}

/// Deterministic seasonal mean predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonalMean {
    params: SeasonalMeanParams,
}

impl SeasonalMean {
    pub fn new(params: SeasonalMeanParams) -> Result<Self, WeatherError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SeasonalMeanParams {
        &self.params
    }

    /// Expected temperature on `date`, absent where the curve leaves the representable
    /// temperature range.
    pub fn value_at(&self, date: NaiveDate) -> Option<Temp> {
        Temp::new(self.params.value(self.params.t(date)), self.params.units).ok()
    }
}

impl<'de> Deserialize<'de> for SeasonalMean {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            params: SeasonalMeanParams,
        }

        let Repr { params } = Repr::deserialize(deserializer)?;
        Self::new(params).map_err(serde::de::Error::custom)
    }
}

impl TempPredictor for SeasonalMean {
    fn predict(&self, range: &DateRange) -> TempSeries {
        TempSeries::over_range(range, |date| self.value_at(date))
    }
}

/// Fits a [`SeasonalMean`] to an observed series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlatonMean;

impl AlatonMean {
    /// Least-squares coefficients for `observed`, in its units.
    pub fn fit(&self, observed: &TempSeries) -> Result<SeasonalMeanParams, WeatherError> {
        let origin = observed.start_date().ok_or_else(|| {
            WeatherError::EmptyInput("seasonal mean requires at least one observation".to_string())
        })?;
        if observed.len() < 4 {
            return Err(WeatherError::Numerical(format!(
                "seasonal regression needs at least 4 observed days, got {}",
                observed.len()
            )));
        }
        let ts: Vec<f64> = observed
            .keys()
            .iter()
            .map(|&date| ((date - origin).num_days() + 1) as f64)
            .collect();
        let a = DMatrix::from_fn(ts.len(), 4, |i, j| match j {
            0 => 1.0,
            1 => ts[i],
            2 => (W * ts[i]).sin(),
            _ => (W * ts[i]).cos(),
        });
        let y = DVector::from_column_slice(observed.values());
        let coefficients = solve_least_squares(&a, &y)
            .filter(|x| x.iter().all(|v| v.is_finite()))
            .ok_or_else(|| {
                WeatherError::Numerical(format!(
                    "seasonal regression over {} observations is singular",
                    observed.len()
                ))
            })?;

        let (a2, a3) = (coefficients[2], coefficients[3]);
        let mut theta = a3.atan2(a2);
        if theta > 0.0 {
            theta -= 2.0 * PI;
        }
        let params = SeasonalMeanParams {
            origin,
            a: coefficients[0],
            b: coefficients[1],
            c: a2.hypot(a3),
            theta,
            units: observed.units(),
        };
        info!(
            observations = observed.len(),
            units = %params.units,
            a = params.a,
            b = params.b,
            c = params.c,
            theta = params.theta,
            "fitted seasonal mean"
        );
        Ok(params)
    }
}

impl TempTrainer for AlatonMean {
    type Predictor = SeasonalMean;

    fn train(&self, observed: &TempSeries) -> Result<SeasonalMean, WeatherError> {
        SeasonalMean::new(self.fit(observed)?)
    }
}

fn solve_least_squares(a: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let at = a.transpose();
    let ata = &at * a;
    let aty = at * y;
    ata.lu().solve(&aty)
}
