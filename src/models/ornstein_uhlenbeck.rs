//! Discrete mean-reverting paths around a deterministic predictor.
//!
//! Each day the path moves a fraction `alpha` of the way back to the previous day's mean
//! and receives a Gaussian shock scaled by `sigma(date)`:
//!
//! `x_i = x_{i-1} + alpha (m_{i-1} - x_{i-1}) + sigma(d_{i-1}) z_i`
//!
//! The path starts on the mean one day before the requested range, so the first
//! simulated day already carries one shock.

use std::sync::{Arc, Mutex};

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use super::TempPredictor;
use crate::core::WeatherError;
use crate::temp::{Temp, TempSeries, TempUnits};
use crate::time::DateRange;

/// Volatility per date, as a temperature difference.
pub type SigmaFn = Arc<dyn Fn(NaiveDate) -> Temp + Send + Sync>;

/// Simulates Ornstein-Uhlenbeck paths that revert to `delegate`'s prediction.
///
/// The embedded generator sits behind a mutex, so concurrent [`TempPredictor::predict`]
/// calls serialize and every call consumes generator state. Use
/// [`OrnsteinUhlenbeck::predict_with`] to drive a path from a caller-owned generator.
pub struct OrnsteinUhlenbeck<P> {
    delegate: P,
    alpha: f64,
    sigma: SigmaFn,
    rng: Mutex<StdRng>,
}

impl<P: TempPredictor> OrnsteinUhlenbeck<P> {
    /// Paths that follow `delegate` exactly: `alpha = 1`, zero volatility, OS-seeded generator.
    pub fn on(delegate: P) -> Self {
        let zero = Temp::zero(TempUnits::Kelvin);
        Self {
            delegate,
            alpha: 1.0,
            sigma: Arc::new(move |_| zero),
            rng: Mutex::new(StdRng::seed_from_u64(rand::rng().random::<u64>())),
        }
    }

    /// Sets the mean-reversion rate; must lie in `[0, 1]`.
    pub fn alpha(mut self, alpha: f64) -> Result<Self, WeatherError> {
        if alpha.is_nan() || !(0.0..=1.0).contains(&alpha) {
            return Err(WeatherError::InvalidParameter(format!(
                "mean reversion alpha must be in [0, 1], got {alpha}"
            )));
        }
        self.alpha = alpha;
        Ok(self)
    }

    /// Constant volatility.
    pub fn sigma(self, sigma: Temp) -> Self {
        self.sigma_fn(move |_| sigma)
    }

    /// Time-varying volatility.
    pub fn sigma_fn<F>(mut self, sigma: F) -> Self
    where
        F: Fn(NaiveDate) -> Temp + Send + Sync + 'static,
    {
        self.sigma = Arc::new(sigma);
        self
    }

    /// Piecewise-constant volatility by calendar month, January first.
    pub fn monthly_sigma(self, sigmas: [Temp; 12]) -> Self {
        self.sigma_fn(move |date| sigmas[date.month0() as usize])
    }

    /// Reseeds the embedded generator.
    pub fn seed(self, seed: u64) -> Self {
        self.rng(StdRng::seed_from_u64(seed))
    }

    /// Replaces the embedded generator.
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn delegate(&self) -> &P {
        &self.delegate
    }

    pub fn mean_reversion(&self) -> f64 {
        self.alpha
    }

    /// Volatility applied to the shock following `date`.
    pub fn sigma_at(&self, date: NaiveDate) -> Temp {
        (self.sigma)(date)
    }

    /// Simulates one path drawing shocks from `rng`.
    pub fn predict_with<R: Rng + ?Sized>(&self, range: &DateRange, rng: &mut R) -> TempSeries {
        let shocks = std::iter::repeat_with(|| -> f64 { StandardNormal.sample(&mut *rng) });
        self.simulate(range, shocks)
    }

    /// Simulates one path from pre-drawn standard normal shocks, one per day of `range`.
    pub fn predict_from_normals(
        &self,
        range: &DateRange,
        normals: &[f64],
    ) -> Result<TempSeries, WeatherError> {
        if normals.len() < range.len() {
            return Err(WeatherError::InvalidValue(format!(
                "{} shocks supplied for {} days",
                normals.len(),
                range.len()
            )));
        }
        Ok(self.simulate(range, normals.iter().copied()))
    }

    /// Steps the path once per day of `range`, consuming one shock per step.
    fn simulate<I>(&self, range: &DateRange, shocks: I) -> TempSeries
    where
        I: IntoIterator<Item = f64>,
    {
        let Ok(extended) = range.offset_start(-1) else {
            return TempSeries::empty();
        };
        let mean = self.delegate.predict(&extended);
        let units = mean.units();
        let dates = mean.keys();
        let means = mean.values();
        if dates.len() < 2 {
            return TempSeries::empty();
        }

        let mut path = Vec::with_capacity(dates.len());
        path.push(means[0]);
        for (i, shock) in (1..dates.len()).zip(shocks) {
            let sigma = self.sigma_at(dates[i - 1]);
            // Sigma is a temperature difference: convert the degree size, not the zero point.
            let noise = units.convert_interval(sigma.value(), sigma.units()) * shock;
            let previous = path[i - 1];
            path.push(previous + self.alpha * (means[i - 1] - previous) + noise);
        }

        TempSeries::from_entries(
            dates[1..]
                .iter()
                .zip(&path[1..])
                .filter_map(|(&date, &value)| Temp::new(value, units).ok().map(|t| (date, t))),
        )
    }
}

impl<P: TempPredictor> TempPredictor for OrnsteinUhlenbeck<P> {
    fn predict(&self, range: &DateRange) -> TempSeries {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.predict_with(range, &mut *rng)
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for OrnsteinUhlenbeck<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrnsteinUhlenbeck")
            .field("delegate", &self.delegate)
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}
