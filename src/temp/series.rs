use chrono::{Datelike, Days, Month, NaiveDate};

use super::{Grouping, Temp, TempVector};
use crate::index::TempIndexer;
use crate::time::{DateRange, month_of};

/// Daily temperatures keyed by calendar date. Gaps are allowed.
pub type TempSeries = TempVector<NaiveDate>;

impl TempVector<NaiveDate> {
    /// Builds a series ordered by date; for a repeated date the latest sample wins.
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Temp)>,
    {
        Self::from_entries(samples).sort_keys()
    }

    /// Evaluates `temp` on every day of `range`, skipping days it returns `None` for.
    pub fn over_range<F>(range: &DateRange, mut temp: F) -> Self
    where
        F: FnMut(NaiveDate) -> Option<Temp>,
    {
        Self::from_optional(range.iter().map(|date| (date, temp(date))))
    }

    /// Earliest observed date.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.keys().iter().min().copied()
    }

    /// Latest observed date.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.keys().iter().max().copied()
    }

    /// Range covering every observed date, absent for an empty series.
    pub fn dates(&self) -> Option<DateRange> {
        let start = self.start_date()?;
        let end = self.end_date()?.checked_add_days(Days::new(1))?;
        DateRange::new(start, end).ok()
    }

    /// Entries strictly before `date`.
    pub fn head(&self, date: NaiveDate) -> Self {
        self.filter(|&key, _| key < date)
    }

    /// Entries falling inside `range`.
    pub fn sub_series(&self, range: &DateRange) -> Self {
        self.filter(|&key, _| range.contains(key))
    }

    pub fn group_by_year(&self) -> Grouping<i32, NaiveDate> {
        self.group_by(|date| date.year())
    }

    pub fn group_by_month(&self) -> Grouping<Month, NaiveDate> {
        self.group_by(|&date| month_of(date))
    }

    /// Applies a degree-day style index to the whole series.
    pub fn index_with<I: TempIndexer + ?Sized>(&self, indexer: &I) -> Temp {
        indexer.index_for(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::HDD_65;
    use crate::temp::TempUnits;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn f(value: f64) -> Temp {
        Temp::fahrenheit(value).unwrap()
    }

    #[test]
    fn from_samples_orders_by_date() {
        let series = TempSeries::from_samples([
            (d("2012-01-03"), f(61.0)),
            (d("2012-01-01"), f(66.0)),
            (d("2012-01-02"), f(62.0)),
            (d("2012-01-01"), f(67.0)),
        ]);
        assert_eq!(
            series.keys(),
            &[d("2012-01-01"), d("2012-01-02"), d("2012-01-03")]
        );
        assert_eq!(series.get_key(&d("2012-01-01")), Some(f(67.0)));
    }

    #[test]
    fn sum_and_mean_of_two_days() {
        let series = TempSeries::from_samples([(d("2012-01-01"), f(40.0)), (d("2012-01-02"), f(41.0))]);
        assert_eq!(series.sum(), f(81.0));
        assert_eq!(series.mean(), Some(f(40.5)));
    }

    #[test]
    fn empty_series_sums_to_zero_kelvin() {
        let series = TempSeries::empty();
        assert_eq!(series.sum(), Temp::zero(TempUnits::Kelvin));
        assert_eq!(series.dates(), None);
        assert_eq!(series.start_date(), None);
    }

    #[test]
    fn qvar_over_days() {
        let series = TempSeries::from_samples([
            (d("2012-01-01"), f(40.0)),
            (d("2012-01-02"), f(42.0)),
            (d("2012-01-03"), f(44.0)),
            (d("2012-01-04"), f(44.0)),
        ]);
        assert_eq!(series.qvar(), Some(f(2.0)));
    }

    #[test]
    fn dates_span_sparse_observations() {
        let series = TempSeries::from_samples([(d("2012-01-05"), f(1.0)), (d("2012-01-01"), f(2.0))]);
        let range = series.dates().unwrap();
        assert_eq!(range.start(), d("2012-01-01"));
        assert_eq!(range.end(), d("2012-01-06"));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn over_range_skips_missing_days() {
        let range = DateRange::new(d("2020-01-01"), d("2020-01-05")).unwrap();
        let series = TempSeries::over_range(&range, |date| {
            (date.day() % 2 == 1).then(|| f(f64::from(date.day())))
        });
        assert_eq!(series.keys(), &[d("2020-01-01"), d("2020-01-03")]);
        assert_eq!(series.get_key(&d("2020-01-03")), Some(f(3.0)));
    }

    #[test]
    fn head_and_sub_series() {
        let range = DateRange::new(d("2020-01-01"), d("2020-01-06")).unwrap();
        let series = TempSeries::over_range(&range, |date| Some(f(f64::from(date.day()))));

        let head = series.head(d("2020-01-03"));
        assert_eq!(head.keys(), &[d("2020-01-01"), d("2020-01-02")]);

        let window = DateRange::new(d("2020-01-02"), d("2020-01-04")).unwrap();
        let sub = series.sub_series(&window);
        assert_eq!(sub.keys(), &[d("2020-01-02"), d("2020-01-03")]);
        assert!(series.sub_series(&DateRange::year(2019).unwrap()).is_empty());
    }

    #[test]
    fn group_by_year_and_month() {
        let series = TempSeries::from_samples([
            (d("2011-12-31"), f(30.0)),
            (d("2012-01-01"), f(31.0)),
            (d("2012-01-02"), f(32.0)),
            (d("2012-12-01"), f(33.0)),
        ]);

        let years = series.group_by_year();
        assert_eq!(years.keys().copied().collect::<Vec<_>>(), vec![2011, 2012]);
        assert_eq!(years.get(&2012).unwrap().len(), 3);

        let months = series.group_by_month();
        assert_eq!(
            months.keys().copied().collect::<Vec<_>>(),
            vec![Month::December, Month::January]
        );
        assert_eq!(months.get(&Month::December).unwrap().len(), 2);

        let yearly_mean = years.reduce(|group| group.mean());
        assert_eq!(yearly_mean.get_key(&2011), Some(f(30.0)));
        assert_eq!(yearly_mean.get_key(&2012), Some(f(32.0)));
    }

    #[test]
    fn index_with_delegates_to_indexer() {
        let series = TempSeries::from_samples([
            (d("2012-01-01"), f(66.0)),
            (d("2012-01-02"), f(62.0)),
            (d("2012-01-03"), f(60.0)),
        ]);
        assert_eq!(series.index_with(&HDD_65), f(8.0));
    }
}
