use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use openferric_weather::index::{HDD_65, TempIndexer};
use openferric_weather::models::{
    ALATON, ALATON_MEAN, MEAN, OrnsteinUhlenbeck, SeasonalMean, SeasonalMeanParams,
    TempPredictor, TempTrainer,
};
use openferric_weather::temp::{Temp, TempSeries, TempUnits};
use openferric_weather::time::DateRange;

const TRUE_ALPHA: f64 = 0.25;
const TRUE_SIGMAS: [f64; 12] = [6.0, 6.0, 5.0, 4.0, 3.0, 3.0, 3.0, 3.0, 4.0, 5.0, 5.0, 6.0];

fn origin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()
}

fn true_mean() -> SeasonalMean {
    SeasonalMean::new(SeasonalMeanParams {
        origin: origin(),
        a: 52.0,
        b: 0.0005,
        c: 18.0,
        theta: -2.0,
        units: TempUnits::Fahrenheit,
    })
    .unwrap()
}

/// Eight years of daily observations drawn from a known model.
fn synthetic_history() -> TempSeries {
    let sigmas = TRUE_SIGMAS.map(|s| Temp::fahrenheit(s).unwrap());
    let generator = OrnsteinUhlenbeck::on(true_mean())
        .alpha(TRUE_ALPHA)
        .unwrap()
        .monthly_sigma(sigmas)
        .seed(2024);
    let range = DateRange::new(origin(), NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()).unwrap();
    generator.predict(&range)
}

#[test]
fn seasonal_mean_is_recovered_from_noisy_history() {
    let observed = synthetic_history();
    let params = ALATON_MEAN.fit(&observed).unwrap();

    assert_eq!(params.origin, origin());
    assert_eq!(params.units, TempUnits::Fahrenheit);
    assert_abs_diff_eq!(params.a, 52.0, epsilon = 3.0);
    assert_abs_diff_eq!(params.b, 0.0005, epsilon = 2e-3);
    assert_abs_diff_eq!(params.c, 18.0, epsilon = 2.0);
    // The simulated path trails its mean by a few days, shifting the phase slightly.
    assert_abs_diff_eq!(params.theta, -2.0, epsilon = 0.2);
}

#[test]
fn alaton_recovers_reversion_and_monthly_volatility() {
    let observed = synthetic_history();
    let params = ALATON.fit(&observed).unwrap();

    assert!((0.0..=1.0).contains(&params.alpha));
    // The lag-one estimator reports -ln(1 - alpha) for the discrete recursion.
    assert_abs_diff_eq!(params.alpha, -(1.0 - TRUE_ALPHA).ln(), epsilon = 0.08);

    for (estimated, truth) in params.sigmas.iter().zip(TRUE_SIGMAS) {
        assert_eq!(estimated.units(), TempUnits::Fahrenheit);
        let ratio = estimated.value() / truth;
        assert!(
            (0.85..1.35).contains(&ratio),
            "sigma {estimated} too far from {truth}F"
        );
    }
    assert!(params.sigmas[0].value() > params.sigmas[6].value());
}

#[test]
fn fitting_is_deterministic() {
    let observed = synthetic_history();
    assert_eq!(ALATON.fit(&observed).unwrap(), ALATON.fit(&observed).unwrap());
}

#[test]
fn trained_model_forecasts_a_future_year() {
    let observed = synthetic_history();
    let model = ALATON.train(&observed).unwrap().seed(5);
    let year = DateRange::year(2020).unwrap();

    let path = model.predict(&year);
    assert_eq!(path.len(), 366);
    assert_eq!(path.units(), TempUnits::Fahrenheit);

    let mean = model.delegate().predict(&year);
    let hdd = HDD_65.index_for(&path);
    let expected_hdd = HDD_65.index_for(&mean);
    assert!(hdd.value() > 0.0);
    assert_abs_diff_eq!(hdd.value(), expected_hdd.value(), epsilon = 0.25 * expected_hdd.value());
}

#[test]
fn repeated_forecasts_differ_but_reseeding_reproduces() {
    let observed = synthetic_history();
    let model = ALATON.train(&observed).unwrap();
    let year = DateRange::year(2020).unwrap();

    let first = model.predict(&year).index_with(&HDD_65);
    let second = model.predict(&year).index_with(&HDD_65);
    assert_ne!(first, second);

    let a = ALATON.train(&observed).unwrap().seed(99).predict(&year);
    let b = ALATON.train(&observed).unwrap().seed(99).predict(&year);
    assert_eq!(a, b);
}

#[test]
fn mean_trainer_is_a_flat_forecast() {
    let observed = synthetic_history();
    let mean = observed.mean().unwrap();
    let forecast = MEAN.train(&observed).unwrap().predict(&DateRange::year(2020).unwrap());
    assert!(forecast.temps().all(|temp| temp == mean));
}

#[test]
fn sparse_history_still_calibrates() {
    let observed = synthetic_history();
    // Drop every fifth day.
    let sparse = observed.filter(|date, _| (*date - origin()).num_days() % 5 != 4);
    assert!(sparse.len() < observed.len());
    let params = ALATON.fit(&sparse).unwrap();
    assert!((0.0..=1.0).contains(&params.alpha));
    assert_abs_diff_eq!(params.mean.c, 18.0, epsilon = 2.5);
}
