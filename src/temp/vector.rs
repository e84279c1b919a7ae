use std::collections::HashSet;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Temp, TempBag, TempUnits};
use crate::core::WeatherError;

/// Keyed, ordered list of temperatures sharing one unit.
///
/// Keys are unique. Values are stored as raw magnitudes in [`TempVector::units`]; every
/// temperature handed to a constructor is converted into the units of the first one
/// (Kelvin for an empty vector).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempVector<K> {
    keys: Vec<K>,
    values: Vec<f64>,
    units: TempUnits,
}

impl<K> TempVector<K> {
    /// Vector with no entries, in Kelvin.
    pub fn empty() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            units: TempUnits::Kelvin,
        }
    }

    /// Callers guarantee unique keys, equal lengths and finite values.
    pub(crate) fn from_parts(keys: Vec<K>, values: Vec<f64>, units: TempUnits) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self {
            keys,
            values,
            units,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Units shared by every entry.
    pub fn units(&self) -> TempUnits {
        self.units
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Raw magnitudes in [`TempVector::units`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<(&K, Temp)> {
        let key = self.keys.get(index)?;
        Some((key, self.temp_at(index)))
    }

    pub fn first(&self) -> Option<(&K, Temp)> {
        self.get(0)
    }

    pub fn last(&self) -> Option<(&K, Temp)> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, Temp)> + '_ {
        self.keys
            .iter()
            .zip(self.values.iter())
            .map(|(key, &value)| (key, Temp::from_raw(value, self.units)))
    }

    pub fn temps(&self) -> impl Iterator<Item = Temp> + '_ {
        self.values
            .iter()
            .map(|&value| Temp::from_raw(value, self.units))
    }

    /// Sum of all entries; zero in these units when empty.
    pub fn sum(&self) -> Temp {
        Temp::from_raw(self.values.iter().sum(), self.units)
    }

    /// Arithmetic mean, absent when empty.
    pub fn mean(&self) -> Option<Temp> {
        if self.is_empty() {
            return None;
        }
        Some(Temp::from_raw(
            self.values.iter().sum::<f64>() / self.len() as f64,
            self.units,
        ))
    }

    /// Quadratic variation `sum_i (x_i - x_{i-1})^2 / n` over consecutive entries.
    ///
    /// The sum is divided by the number of entries, giving a per-step variance estimate.
    /// Absent with fewer than two entries.
    pub fn qvar(&self) -> Option<Temp> {
        if self.len() < 2 {
            return None;
        }
        let sum: f64 = self
            .values
            .windows(2)
            .map(|w| (w[1] - w[0]).powi(2))
            .sum();
        Some(Temp::from_raw(sum / self.len() as f64, self.units))
    }

    /// Sorted snapshot of the temperatures.
    pub fn distribution(&self) -> TempBag {
        TempBag::of(self.temps())
    }

    fn temp_at(&self, index: usize) -> Temp {
        Temp::from_raw(self.values[index], self.units)
    }
}

impl<K: Clone> TempVector<K> {
    /// Converts every entry to `units`.
    pub fn to(&self, units: TempUnits) -> Self {
        if self.units == units {
            return self.clone();
        }
        let values = self
            .values
            .iter()
            .map(|&value| units.convert(value, self.units))
            .collect();
        Self::from_parts(self.keys.clone(), values, units)
    }

    /// Transforms each entry; results are converted back into these units.
    pub fn map<F>(&self, mut transform: F) -> Self
    where
        F: FnMut(&K, Temp) -> Temp,
    {
        let values = self
            .iter()
            .map(|(key, temp)| transform(key, temp).to(self.units).value())
            .collect();
        Self::from_parts(self.keys.clone(), values, self.units)
    }

    /// Entries matching `predicate`, keeping their relative order.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&K, Temp) -> bool,
    {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        for (key, temp) in self.iter() {
            if predicate(key, temp) {
                keys.push(key.clone());
                values.push(temp.value());
            }
        }
        Self::from_parts(keys, values, self.units)
    }

    /// Rounds every entry to `places` decimals.
    pub fn round(&self, places: u32) -> Self {
        let values = self.temps().map(|temp| temp.round(places).value()).collect();
        Self::from_parts(self.keys.clone(), values, self.units)
    }

    /// Partitions entries by `key_fn`, preserving their relative order.
    ///
    /// Groups are listed in order of first appearance.
    pub fn group_by<G, F>(&self, mut key_fn: F) -> Grouping<G, K>
    where
        G: Eq + Hash,
        F: FnMut(&K) -> G,
    {
        let mut groups: IndexMap<G, (Vec<K>, Vec<f64>)> = IndexMap::new();
        for (key, &value) in self.keys.iter().zip(self.values.iter()) {
            let (keys, values) = groups.entry(key_fn(key)).or_default();
            keys.push(key.clone());
            values.push(value);
        }
        Grouping {
            groups: groups
                .into_iter()
                .map(|(group, (keys, values))| (group, Self::from_parts(keys, values, self.units)))
                .collect(),
        }
    }
}

impl<K: PartialEq> TempVector<K> {
    /// Temperature recorded for `key`.
    pub fn get_key(&self, key: &K) -> Option<Temp> {
        let index = self.keys.iter().position(|k| k == key)?;
        Some(self.temp_at(index))
    }
}

impl<K: PartialEq + Clone> TempVector<K> {
    /// Element-wise `self - other`, in these units.
    ///
    /// Both vectors must hold exactly the same keys in the same order.
    pub fn minus(&self, other: &TempVector<K>) -> Result<Self, WeatherError> {
        if self.keys != other.keys {
            let position = self
                .keys
                .iter()
                .zip(other.keys.iter())
                .position(|(a, b)| a != b)
                .unwrap_or(self.len().min(other.len()));
            return Err(WeatherError::KeyMismatch(format!(
                "vectors of length {} and {} differ at position {position}",
                self.len(),
                other.len()
            )));
        }
        let other = other.to(self.units);
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self::from_parts(self.keys.clone(), values, self.units))
    }
}

impl<K: Ord + Clone> TempVector<K> {
    /// Entries ordered by key.
    pub fn sort_keys(&self) -> Self {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.keys[a].cmp(&self.keys[b]));
        let keys = order.iter().map(|&i| self.keys[i].clone()).collect();
        let values = order.iter().map(|&i| self.values[i]).collect();
        Self::from_parts(keys, values, self.units)
    }
}

impl<K: Eq + Hash> TempVector<K> {
    /// Builds a vector from `(key, temp)` entries.
    ///
    /// Entries keep first-insertion order; for a repeated key the latest temperature wins.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Temp)>,
    {
        let map: IndexMap<K, Temp> = entries.into_iter().collect();
        let units = map
            .values()
            .next()
            .map_or(TempUnits::Kelvin, |temp| temp.units());
        let mut keys = Vec::with_capacity(map.len());
        let mut values = Vec::with_capacity(map.len());
        for (key, temp) in map {
            keys.push(key);
            values.push(temp.to(units).value());
        }
        Self::from_parts(keys, values, units)
    }

    /// Like [`TempVector::from_entries`], silently dropping absent temperatures.
    pub fn from_optional<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<Temp>)>,
    {
        Self::from_entries(
            entries
                .into_iter()
                .filter_map(|(key, temp)| temp.map(|t| (key, t))),
        )
    }
}

impl<K: Eq + Hash> TempVector<K> {
    /// Rebuilds a vector from its stored columns, rejecting anything `from_entries`
    /// could not have produced.
    fn from_columns(keys: Vec<K>, values: Vec<f64>, units: TempUnits) -> Result<Self, WeatherError> {
        if keys.len() != values.len() {
            return Err(WeatherError::InvalidValue(format!(
                "{} keys for {} values",
                keys.len(),
                values.len()
            )));
        }
        let duplicate = {
            let mut seen = HashSet::with_capacity(keys.len());
            keys.iter().position(|key| !seen.insert(key))
        };
        if let Some(position) = duplicate {
            return Err(WeatherError::InvalidValue(format!(
                "duplicate key at position {position}"
            )));
        }
        for &value in &values {
            Temp::new(value, units)?;
        }
        Ok(Self::from_parts(keys, values, units))
    }
}

impl<'de, K> Deserialize<'de> for TempVector<K>
where
    K: Deserialize<'de> + Eq + Hash,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr<K> {
            keys: Vec<K>,
            values: Vec<f64>,
            units: TempUnits,
        }

        let Repr { keys, values, units } = Repr::deserialize(deserializer)?;
        Self::from_columns(keys, values, units).map_err(serde::de::Error::custom)
    }
}

impl<K: Eq + Hash> FromIterator<(K, Temp)> for TempVector<K> {
    fn from_iter<I: IntoIterator<Item = (K, Temp)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<K> Default for TempVector<K> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Sub-vectors of a [`TempVector`] keyed by a derived group key.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping<G, K> {
    groups: Vec<(G, TempVector<K>)>,
}

impl<G, K> Grouping<G, K> {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &G> + '_ {
        self.groups.iter().map(|(group, _)| group)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&G, &TempVector<K>)> + '_ {
        self.groups.iter().map(|(group, vector)| (group, vector))
    }
}

impl<G: PartialEq, K> Grouping<G, K> {
    pub fn get(&self, group: &G) -> Option<&TempVector<K>> {
        self.groups
            .iter()
            .find(|(g, _)| g == group)
            .map(|(_, vector)| vector)
    }
}

impl<G: Eq + Hash + Clone, K> Grouping<G, K> {
    /// Reduces each group to one temperature; groups reducing to `None` are excluded.
    pub fn reduce<F>(&self, mut reducer: F) -> TempVector<G>
    where
        F: FnMut(&TempVector<K>) -> Option<Temp>,
    {
        TempVector::from_optional(
            self.groups
                .iter()
                .map(|(group, vector)| (group.clone(), reducer(vector))),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn f(value: f64) -> Temp {
        Temp::fahrenheit(value).unwrap()
    }

    fn c(value: f64) -> Temp {
        Temp::celsius(value).unwrap()
    }

    #[test]
    fn aggregates_of_extreme_values_stay_finite() {
        let hot = Temp::kelvin(Temp::MAX_MAGNITUDE).unwrap();
        let vector: TempVector<u32> = (0..1000).map(|i| (i, hot)).collect();
        assert!(vector.sum().value().is_finite());
        assert!(vector.mean().unwrap().value().is_finite());

        let fahrenheit = vector.to(TempUnits::Fahrenheit);
        assert!(fahrenheit.sum().value().is_finite());
        assert!(fahrenheit.qvar().unwrap().value().is_finite());
    }

    #[test]
    fn duplicate_keys_keep_latest_value() {
        let vector = TempVector::from_entries([(1, f(40.0)), (1, f(41.0))]);
        assert_eq!(vector.len(), 1);
        assert_eq!(vector.get(0), Some((&1, f(41.0))));
    }

    #[test]
    fn mixed_units_convert_to_first() {
        let vector = TempVector::from_entries([(1, c(6.0)), (2, f(41.0))]);
        assert_eq!(vector.units(), TempUnits::Celsius);
        assert_relative_eq!(vector.values()[1], 5.0, epsilon = 1e-10);
    }

    #[test]
    fn absent_temperatures_are_dropped() {
        let vector = TempVector::from_optional([(1, Some(f(1.0))), (2, None), (3, Some(f(3.0)))]);
        assert_eq!(vector.keys(), &[1, 3]);
    }

    #[test]
    fn empty_vector_statistics() {
        let vector = TempVector::<u32>::empty();
        assert_eq!(vector.sum(), Temp::zero(TempUnits::Kelvin));
        assert_eq!(vector.mean(), None);
        assert_eq!(vector.qvar(), None);
        assert!(vector.last().is_none());
    }

    #[test]
    fn sum_and_mean() {
        let vector = TempVector::from_entries([(1, f(40.0)), (2, f(41.0))]);
        assert_eq!(vector.sum(), f(81.0));
        assert_eq!(vector.mean(), Some(f(40.5)));
    }

    #[test]
    fn qvar_is_mean_of_squared_steps() {
        let vector =
            TempVector::from_entries([(1, f(40.0)), (2, f(42.0)), (3, f(44.0)), (4, f(44.0))]);
        assert_eq!(vector.qvar(), Some(f(2.0)));

        let single = TempVector::from_entries([(1, f(40.0))]);
        assert_eq!(single.qvar(), None);
    }

    #[test]
    fn map_keeps_keys_and_units() {
        let raw = TempVector::from_entries([(1, f(66.0)), (2, f(62.0))]);
        let mapped = raw.map(|_, temp| temp.plus(&f(1.0)).unwrap());
        assert_eq!(mapped, TempVector::from_entries([(1, f(67.0)), (2, f(63.0))]));

        let kelvin = raw.map(|_, temp| temp.to_kelvin());
        assert_eq!(kelvin.units(), TempUnits::Fahrenheit);
        assert_relative_eq!(kelvin.values()[0], 66.0, epsilon = 1e-10);
    }

    #[test]
    fn filter_keeps_order() {
        let vector = TempVector::from_entries([(3, f(1.0)), (1, f(5.0)), (2, f(7.0))]);
        let warm = vector.filter(|_, temp| temp.value() > 2.0);
        assert_eq!(warm.keys(), &[1, 2]);
    }

    #[test]
    fn minus_requires_identical_keys() {
        let x = TempVector::from_entries([(1, f(4.0))]);
        let y = TempVector::from_entries([(1, f(3.0)), (2, f(2.0))]);
        assert!(matches!(x.minus(&y), Err(WeatherError::KeyMismatch(_))));

        let reordered = TempVector::from_entries([(2, f(3.0)), (1, f(2.0))]);
        let z = TempVector::from_entries([(1, f(4.0)), (2, f(5.0))]);
        assert!(z.minus(&reordered).is_err());
    }

    #[test]
    fn minus_subtracts_in_left_units() {
        let x = TempVector::from_entries([(1, f(4.0)), (2, f(5.0))]);
        let y = TempVector::from_entries([(1, f(3.0)), (2, f(2.0))]);
        assert_eq!(
            x.minus(&y).unwrap(),
            TempVector::from_entries([(1, f(1.0)), (2, f(3.0))])
        );
    }

    #[test]
    fn sort_keys_orders_entries() {
        let vector = TempVector::from_entries([(2, f(62.0)), (3, f(61.0)), (1, f(66.0))]);
        let sorted = vector.sort_keys();
        assert_eq!(sorted.keys(), &[1, 2, 3]);
        assert_eq!(sorted.get_key(&1), Some(f(66.0)));
        assert_eq!(sorted.sort_keys(), sorted);
    }

    #[test]
    fn group_by_preserves_order_and_reduces() {
        let vector = TempVector::from_entries([
            (11, f(1.0)),
            (12, f(2.0)),
            (21, f(4.0)),
            (13, f(8.0)),
        ]);
        let groups = vector.group_by(|key| key / 10);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(groups.get(&1).unwrap().keys(), &[11, 12, 13]);

        let sums = groups.reduce(|group| Some(group.sum()));
        assert_eq!(sums, TempVector::from_entries([(1, f(11.0)), (2, f(4.0))]));

        let qvars = groups.reduce(|group| group.qvar());
        assert_eq!(qvars.keys(), &[1]);
    }

    #[test]
    fn group_by_on_empty_is_empty() {
        let groups = TempVector::<u32>::empty().group_by(|key| key % 2);
        assert!(groups.is_empty());
        assert!(groups.reduce(|group| Some(group.sum())).is_empty());
    }

    #[test]
    fn round_applies_to_every_entry() {
        let vector = TempVector::from_entries([(1, c(0.126)), (2, c(-1.004))]);
        assert_eq!(
            vector.round(2),
            TempVector::from_entries([(1, c(0.13)), (2, c(-1.0))])
        );
    }
}
