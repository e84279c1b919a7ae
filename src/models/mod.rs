//! Temperature predictors and the trainers that calibrate them.
//!
//! A [`TempTrainer`] fits a model to an observed [`TempSeries`] and returns a
//! [`TempPredictor`], which produces a daily series over any requested [`DateRange`].
//! Deterministic predictors ([`Constant`], [`SeasonalMean`]) return expected values;
//! [`OrnsteinUhlenbeck`] wraps one of them and simulates mean-reverting paths around it.
//! [`ALATON`] chains the two: a seasonal mean fit plus monthly volatilities and a
//! mean-reversion rate estimated from the residuals.

pub mod alaton;
pub mod ornstein_uhlenbeck;
pub mod seasonal;

use std::sync::Arc;

use chrono::NaiveDate;

pub use alaton::{Alaton, AlatonParams};
pub use ornstein_uhlenbeck::{OrnsteinUhlenbeck, SigmaFn};
pub use seasonal::{AlatonMean, SeasonalMean, SeasonalMeanParams};

use crate::core::WeatherError;
use crate::temp::{Temp, TempSeries};
use crate::time::DateRange;

/// Trainer predicting the observed mean for every day.
pub const MEAN: MeanTrainer = MeanTrainer;

/// Trainer fitting the trend-plus-sinusoid mean curve.
pub const ALATON_MEAN: AlatonMean = AlatonMean;

/// Trainer fitting the full mean-reverting model.
pub const ALATON: Alaton = Alaton;

/// Produces temperatures for a range of dates.
pub trait TempPredictor {
    /// One entry per day of `range`.
    fn predict(&self, range: &DateRange) -> TempSeries;

    /// Predicts over `[start, end)`.
    fn predict_between(&self, start: NaiveDate, end: NaiveDate) -> Result<TempSeries, WeatherError> {
        Ok(self.predict(&DateRange::new(start, end)?))
    }
}

/// Calibrates a predictor from observed temperatures.
pub trait TempTrainer {
    type Predictor: TempPredictor;

    fn train(&self, observed: &TempSeries) -> Result<Self::Predictor, WeatherError>;
}

impl<P: TempPredictor + ?Sized> TempPredictor for &P {
    fn predict(&self, range: &DateRange) -> TempSeries {
        (**self).predict(range)
    }
}

impl<P: TempPredictor + ?Sized> TempPredictor for Box<P> {
    fn predict(&self, range: &DateRange) -> TempSeries {
        (**self).predict(range)
    }
}

impl<P: TempPredictor + ?Sized> TempPredictor for Arc<P> {
    fn predict(&self, range: &DateRange) -> TempSeries {
        (**self).predict(range)
    }
}

/// Predicts the same temperature on every day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    temp: Temp,
}

impl Constant {
    pub fn new(temp: Temp) -> Self {
        Self { temp }
    }

    pub fn temp(&self) -> Temp {
        self.temp
    }
}

impl TempPredictor for Constant {
    fn predict(&self, range: &DateRange) -> TempSeries {
        TempSeries::over_range(range, |_| Some(self.temp))
    }
}

/// Trains a [`Constant`] predictor at the observed mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeanTrainer;

impl TempTrainer for MeanTrainer {
    type Predictor = Constant;

    fn train(&self, observed: &TempSeries) -> Result<Constant, WeatherError> {
        observed
            .mean()
            .map(Constant::new)
            .ok_or_else(|| WeatherError::EmptyInput("mean requires at least one observation".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn f(value: f64) -> Temp {
        Temp::fahrenheit(value).unwrap()
    }

    #[test]
    fn constant_fills_every_day() {
        let predictor = Constant::new(f(50.0));
        let series = predictor.predict_between(d("2020-02-27"), d("2020-03-02")).unwrap();
        assert_eq!(series.len(), 4);
        assert!(series.temps().all(|temp| temp == f(50.0)));
        assert_eq!(series.start_date(), Some(d("2020-02-27")));
        assert_eq!(series.end_date(), Some(d("2020-03-01")));
    }

    #[test]
    fn predict_between_rejects_inverted_range() {
        let predictor = Constant::new(f(50.0));
        assert!(matches!(
            predictor.predict_between(d("2020-01-02"), d("2020-01-01")),
            Err(WeatherError::InvalidValue(_))
        ));
    }

    #[test]
    fn mean_trainer_predicts_observed_mean() {
        let observed = TempSeries::from_samples([(d("2020-01-01"), f(40.0)), (d("2020-01-02"), f(41.0))]);
        let predictor = MEAN.train(&observed).unwrap();
        let range = DateRange::year(2021).unwrap();
        let series = predictor.predict(&range);
        assert_eq!(series.len(), 365);
        assert_eq!(series.first().map(|(_, temp)| temp), Some(f(40.5)));
    }

    #[test]
    fn mean_trainer_rejects_empty_series() {
        assert!(matches!(
            MEAN.train(&TempSeries::empty()),
            Err(WeatherError::EmptyInput(_))
        ));
    }

    #[test]
    fn predictors_work_behind_pointers() {
        let range = DateRange::year_month(2020, 2).unwrap();
        let boxed: Box<dyn TempPredictor> = Box::new(Constant::new(f(1.0)));
        let shared = Arc::new(Constant::new(f(1.0)));
        assert_eq!(boxed.predict(&range), shared.predict(&range));
        assert_eq!((&shared).predict(&range).len(), 29);
    }
}
