use serde::{Deserialize, Serialize};

use super::TempIndexer;
use crate::temp::{Temp, TempSeries, TempUnits};

/// Heating degree days against a 65°F reference.
pub const HDD_65: Hdd = Hdd::new(Temp::from_raw(65.0, TempUnits::Fahrenheit));

/// Cooling degree days against a 65°F reference.
pub const CDD_65: Cdd = Cdd::new(Temp::from_raw(65.0, TempUnits::Fahrenheit));

/// Daily HDD contribution.
fn hdd_day(temperature: f64, reference: f64) -> f64 {
    (reference - temperature).max(0.0)
}

/// Daily CDD contribution.
fn cdd_day(temperature: f64, reference: f64) -> f64 {
    (temperature - reference).max(0.0)
}

fn cumulative(series: &TempSeries, reference: &Temp, day: fn(f64, f64) -> f64) -> Temp {
    let units = reference.units();
    let base = reference.value();
    let total = series
        .temps()
        .map(|temp| day(temp.to(units).value(), base))
        .sum();
    Temp::from_raw(total, units)
}

/// Heating degree days: `sum max(reference - temp, 0)` in the reference's units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hdd {
    reference: Temp,
}

impl Hdd {
    pub const fn new(reference: Temp) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> Temp {
        self.reference
    }
}

impl TempIndexer for Hdd {
    fn index_for(&self, series: &TempSeries) -> Temp {
        cumulative(series, &self.reference, hdd_day)
    }
}

/// Cooling degree days: `sum max(temp - reference, 0)` in the reference's units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cdd {
    reference: Temp,
}

impl Cdd {
    pub const fn new(reference: Temp) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> Temp {
        self.reference
    }
}

impl TempIndexer for Cdd {
    fn index_for(&self, series: &TempSeries) -> Temp {
        cumulative(series, &self.reference, cdd_day)
    }
}
