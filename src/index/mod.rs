//! Module `index`.
//!
//! Degree-day indices computed from temperature series, the underlyings of heating and
//! cooling weather contracts.
//!
//! Key types and purpose: [`TempIndexer`] maps a [`TempSeries`] to a single temperature;
//! [`Hdd`] and [`Cdd`] are the standard heating and cooling degree-day indices.

pub mod degree_day;

pub use degree_day::{CDD_65, Cdd, HDD_65, Hdd};

use crate::temp::{Temp, TempSeries};

/// Reduces a temperature series to a single index value.
pub trait TempIndexer {
    fn index_for(&self, series: &TempSeries) -> Temp;
}

impl<I: TempIndexer + ?Sized> TempIndexer for &I {
    fn index_for(&self, series: &TempSeries) -> Temp {
        (**self).index_for(series)
    }
}

impl<I: TempIndexer + ?Sized> TempIndexer for Box<I> {
    fn index_for(&self, series: &TempSeries) -> Temp {
        (**self).index_for(series)
    }
}
