//! OpenFerric Weather analyzes daily temperature observations and produces calibrated
//! stochastic forecasts for pricing weather-linked contracts such as heating-degree-day
//! swaps and options.
//!
//! The crate combines units-aware temperature containers, an empirical distribution for
//! quantile and threshold queries, degree-day indices, a seasonal-mean regression, and the
//! Alaton mean-reverting model with a Monte Carlo driver for index distributions.
//!
//! References used across modules include:
//! - Alaton, Djehiche and Stillberger (2002), *On Modelling and Pricing Weather Derivatives*.
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 35 for degree-day
//!   conventions.
//!
//! Numerical considerations:
//! - Temperatures are finite `f64` magnitudes; construction rejects NaN and infinities.
//! - The seasonal fit solves the normal equations and needs at least four observed days.
//! - Simulation is reproducible from explicit seeds; an OS-seeded generator is the default.
//!
//! # Quick Start
//! Heating degree days over three days:
//! ```rust
//! use chrono::NaiveDate;
//! use openferric_weather::index::HDD_65;
//! use openferric_weather::temp::{Temp, TempSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
//! let series = TempSeries::from_samples(
//!     start
//!         .iter_days()
//!         .zip([66.0, 62.0, 60.0].map(|v| Temp::fahrenheit(v).unwrap())),
//! );
//! assert_eq!(series.index_with(&HDD_65), Temp::fahrenheit(8.0).unwrap());
//! ```
//!
//! Quantiles of a distribution:
//! ```rust
//! use openferric_weather::core::Fraction;
//! use openferric_weather::temp::{Temp, TempBag};
//!
//! let bag = TempBag::of([1.0, 2.0, 3.0, 4.0, 5.0].map(|v| Temp::celsius(v).unwrap()));
//! assert_eq!(bag.quantile_of(&Temp::celsius(3.0).unwrap()).unwrap().value(), 0.4);
//! assert_eq!(
//!     bag.quantile(Fraction::new(0.5).unwrap()).unwrap(),
//!     Temp::celsius(3.0).unwrap()
//! );
//! ```
//!
//! Simulate a mean-reverting path from pre-drawn shocks:
//! ```rust
//! use chrono::NaiveDate;
//! use openferric_weather::models::{Constant, OrnsteinUhlenbeck};
//! use openferric_weather::temp::Temp;
//! use openferric_weather::time::DateRange;
//!
//! let model = OrnsteinUhlenbeck::on(Constant::new(Temp::celsius(0.0).unwrap()))
//!     .alpha(0.5)
//!     .unwrap()
//!     .sigma(Temp::celsius(1.0).unwrap());
//! let range = DateRange::new(
//!     NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
//! )
//! .unwrap();
//! let path = model.predict_from_normals(&range, &[0.8, -0.9]).unwrap().round(2);
//! assert_eq!(path.values(), &[0.8, -0.5]);
//! ```

pub mod core;
pub mod index;
pub mod mc;
pub mod models;
pub mod temp;
pub mod time;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::index::*;
    pub use crate::mc::*;
    pub use crate::models::*;
    pub use crate::temp::*;
    pub use crate::time::*;
}
