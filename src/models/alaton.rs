//! Alaton, Djehiche and Stillberger temperature model.
//!
//! Daily temperatures follow a discretized Ornstein-Uhlenbeck process around a
//! [`SeasonalMean`] curve, with one volatility per calendar month. Calibration:
//!
//! 1. fit the seasonal mean by least squares;
//! 2. estimate each month's variance as the quadratic variation per (month, year),
//!    averaged across years;
//! 3. estimate the mean-reversion rate from lagged residuals,
//!    `alpha = -ln(sum z_{i-1} r_i / sum z_{i-1} r_{i-1})` with `z = r / variance`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AlatonMean, OrnsteinUhlenbeck, SeasonalMean, SeasonalMeanParams, TempTrainer};
use crate::core::WeatherError;
use crate::temp::{Temp, TempSeries};
use crate::time::{MONTHS, month_of};

/// Calibrated parameters of the Alaton model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlatonParams {
    pub mean: SeasonalMeanParams,
    /// Daily mean-reversion rate in `[0, 1]`.
    pub alpha: f64,
    /// Volatility per calendar month, January first.
    pub sigmas: [Temp; 12],
}

impl AlatonParams {
    /// Simulator for these parameters, seeded from the OS.
    pub fn predictor(&self) -> Result<OrnsteinUhlenbeck<SeasonalMean>, WeatherError> {
        Ok(OrnsteinUhlenbeck::on(SeasonalMean::new(self.mean)?)
            .alpha(self.alpha)?
            .monthly_sigma(self.sigmas))
    }
}

/// Trains the Alaton model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alaton;

impl Alaton {
    /// Estimates the model parameters from `observed`.
    pub fn fit(&self, observed: &TempSeries) -> Result<AlatonParams, WeatherError> {
        if observed.is_empty() {
            return Err(WeatherError::EmptyInput(
                "alaton requires at least one observation".to_string(),
            ));
        }
        let observed = observed.sort_keys();
        let mean = AlatonMean.train(&observed)?;

        let monthly = qvar_by_month(&observed);
        let mut qvars = [0.0; 12];
        for (month0, qvar) in monthly.iter().enumerate() {
            qvars[month0] = qvar.ok_or_else(|| {
                WeatherError::InvalidValue(format!(
                    "no variance estimate for {}",
                    MONTHS[month0].name()
                ))
            })?;
        }
        debug!(?qvars, "monthly quadratic variation");

        let alpha = estimate_alpha(&observed, &mean, &qvars)?;
        let units = observed.units();
        let mut sigmas = [Temp::zero(units); 12];
        for (sigma, qvar) in sigmas.iter_mut().zip(qvars) {
            *sigma = Temp::new(qvar.sqrt(), units)?;
        }
        info!(
            observations = observed.len(),
            alpha,
            sigmas = ?sigmas.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "estimated mean reversion and monthly volatility"
        );

        Ok(AlatonParams {
            mean: *mean.params(),
            alpha,
            sigmas,
        })
    }
}

impl TempTrainer for Alaton {
    type Predictor = OrnsteinUhlenbeck<SeasonalMean>;

    fn train(&self, observed: &TempSeries) -> Result<Self::Predictor, WeatherError> {
        self.fit(observed)?.predictor()
    }
}

/// Mean over years of each (month, year) quadratic variation, indexed by `month0`.
fn qvar_by_month(observed: &TempSeries) -> [Option<f64>; 12] {
    let by_month = observed.group_by_month().reduce(|month| {
        month
            .group_by_year()
            .reduce(|year| year.qvar())
            .mean()
    });
    let mut qvars = [None; 12];
    for (month, qvar) in by_month.iter() {
        qvars[month.number_from_month() as usize - 1] = Some(qvar.value());
    }
    qvars
}

fn estimate_alpha(
    observed: &TempSeries,
    mean: &SeasonalMean,
    qvars: &[f64; 12],
) -> Result<f64, WeatherError> {
    let residuals = observed
        .iter()
        .map(|(&date, temp)| {
            mean.value_at(date)
                .map(|expected| temp.value() - expected.value())
                .ok_or_else(|| {
                    WeatherError::Numerical(format!("seasonal mean is out of range on {date}"))
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, pair) in observed.keys().windows(2).enumerate() {
        let z = residuals[i] / qvars[month_of(pair[0]).number_from_month() as usize - 1];
        if !z.is_finite() {
            continue;
        }
        numerator += z * residuals[i + 1];
        denominator += z * residuals[i];
    }

    let alpha = -(numerator / denominator).ln();
    if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
        return Err(WeatherError::InvalidParameter(format!(
            "estimated mean reversion {alpha} is outside [0, 1]"
        )));
    }
    Ok(alpha)
}
