use std::collections::HashMap;

use formats::normalize::NormalizedDataset;
use tracing::debug;

/// Country code → per-capita total for a single year.
///
/// Countries with no usable value are absent rather than stored as NaN, so
/// `get` answering `None` is the only "no data" signal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YearIndex {
    year: i32,
    values: HashMap<String, f64>,
}

impl YearIndex {
    pub fn build(dataset: &NormalizedDataset, year: i32) -> Self {
        let records = dataset.records_for(year);
        let mut values = HashMap::with_capacity(records.len());
        for record in records.iter().filter(|r| r.has_total()) {
            // Duplicate codes within a year: last row wins.
            values.insert(record.country_code.clone(), record.total);
        }
        debug!(year, countries = values.len(), "built year index");
        Self { year, values }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn get(&self, country_code: &str) -> Option<f64> {
        self.values.get(country_code).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

pub fn index_for(dataset: &NormalizedDataset, year: i32) -> YearIndex {
    YearIndex::build(dataset, year)
}

#[cfg(test)]
mod tests {
    use super::{YearIndex, index_for};
    use formats::emissions::{Breakdown, EmissionRecord, EmissionTable};
    use formats::normalize::{DEFAULT_MIN_YEAR, NormalizedDataset};

    fn sample() -> NormalizedDataset {
        let payload = include_str!("../../apps/viewer_web/assets/data/sample_percapita.csv");
        let table = EmissionTable::from_csv_str(payload).expect("parse table");
        NormalizedDataset::normalize(table.records, DEFAULT_MIN_YEAR).expect("normalize")
    }

    fn record(code: &str, year: i32, total: f64) -> EmissionRecord {
        EmissionRecord {
            country_code: code.to_string(),
            country: String::new(),
            year,
            total,
            breakdown: Breakdown::no_data(),
        }
    }

    #[test]
    fn every_year_index_is_nan_free_and_keyed_by_that_years_codes() {
        let data = sample();
        for &year in data.years().as_slice() {
            let index = index_for(&data, year);
            assert_eq!(index.year(), year);
            for (code, value) in index.iter() {
                assert!(!value.is_nan());
                assert!(data.records_for(year).iter().any(|r| r.country_code == code));
            }
        }
    }

    #[test]
    fn gaps_are_absent_not_sentinels() {
        let data = sample();
        let index = index_for(&data, 1901);
        assert_eq!(index.get("FRA"), Some(2.7));
        assert_eq!(index.get("AFG"), None);
        assert_eq!(index.get("QAT"), None);
        assert_eq!(index.len(), 1);

        let latest = index_for(&data, 1903);
        assert_eq!(latest.get("AFG"), None);
        assert_eq!(latest.get("QAT"), Some(50.0));
    }

    #[test]
    fn unknown_year_gives_empty_index() {
        let data = sample();
        let index = index_for(&data, 1850);
        assert!(index.is_empty());
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let data = sample();
        assert_eq!(index_for(&data, 1902), index_for(&data, 1902));
    }

    #[test]
    fn duplicate_codes_keep_the_last_row() {
        let data = NormalizedDataset::normalize(
            vec![record("USA", 2000, 20.0), record("USA", 2000, 19.5)],
            DEFAULT_MIN_YEAR,
        )
        .expect("normalize");
        assert_eq!(YearIndex::build(&data, 2000).get("USA"), Some(19.5));
    }
}
