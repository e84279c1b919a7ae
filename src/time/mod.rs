//! Calendar helpers: half-open date ranges and month lookup.
//!
//! [`DateRange`] is the unit of work for predictors: a forecast is always requested over
//! `[start, end)` and returned as one entry per calendar day.

use chrono::{Datelike, Month, NaiveDate, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::WeatherError;

/// Calendar months in `month0` order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Calendar month of a date.
pub fn month_of(date: NaiveDate) -> Month {
    MONTHS[date.month0() as usize]
}

/// Consecutive calendar days `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range; `start == end` is the empty range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WeatherError> {
        if start > end {
            return Err(WeatherError::InvalidValue(format!(
                "range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range spanning one calendar year.
    pub fn year(year: i32) -> Result<Self, WeatherError> {
        let start = ymd(year, 1, 1)?;
        let end = ymd(year + 1, 1, 1)?;
        Self::new(start, end)
    }

    /// Range spanning one calendar month (`month` is 1-based).
    pub fn year_month(year: i32, month: u32) -> Result<Self, WeatherError> {
        let start = ymd(year, month, 1)?;
        let end = if month == 12 {
            ymd(year + 1, 1, 1)?
        } else {
            ymd(year, month + 1, 1)?
        };
        Self::new(start, end)
    }

    /// First date (inclusive).
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// End date (exclusive).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Date at `index` days after the start, if inside the range.
    pub fn get(&self, index: usize) -> Option<NaiveDate> {
        if index >= self.len() {
            return None;
        }
        self.start.checked_add_signed(TimeDelta::days(index as i64))
    }

    /// Every date of the range in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.len())
    }

    /// Shifts the start by `days` (negative extends the range backwards).
    pub fn offset_start(&self, days: i64) -> Result<Self, WeatherError> {
        let start = shift(self.start, days)?;
        Self::new(start, self.end)
    }

    /// Shifts the end by `days`.
    pub fn offset_end(&self, days: i64) -> Result<Self, WeatherError> {
        let end = shift(self.end, days)?;
        Self::new(self.start, end)
    }

    pub fn with_start(&self, start: NaiveDate) -> Result<Self, WeatherError> {
        Self::new(start, self.end)
    }

    pub fn with_end(&self, end: NaiveDate) -> Result<Self, WeatherError> {
        Self::new(self.start, end)
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            start: NaiveDate,
            end: NaiveDate,
        }

        let Repr { start, end } = Repr::deserialize(deserializer)?;
        Self::new(start, end).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}->{})", self.start, self.end)
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, WeatherError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| WeatherError::InvalidValue(format!("invalid date {year}-{month}-{day}")))
}

fn shift(date: NaiveDate, days: i64) -> Result<NaiveDate, WeatherError> {
    date.checked_add_signed(TimeDelta::days(days))
        .ok_or_else(|| WeatherError::InvalidValue(format!("{date} shifted by {days} days overflows")))
}
