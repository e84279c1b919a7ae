//! Temperature values and containers.
//!
//! [`Temp`] is a finite magnitude tagged with [`TempUnits`]. [`TempVector`] keeps keyed,
//! ordered temperatures in a single unit; [`TempSeries`] is its date-keyed form.
//! [`TempBag`] is a sorted snapshot used for quantile and threshold queries.

pub mod bag;
pub mod series;
pub mod units;
pub mod value;
pub mod vector;

pub use bag::TempBag;
pub use series::TempSeries;
pub use units::TempUnits;
pub use value::Temp;
pub use vector::{Grouping, TempVector};
