use std::collections::BTreeMap;

use tracing::info;

use crate::emissions::EmissionRecord;

/// Earliest year kept by default; older rows are sparse and mostly empty.
pub const DEFAULT_MIN_YEAR: i32 = 1900;

/// Ascending, de-duplicated years present in the normalized data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YearSet {
    years: Vec<i32>,
}

impl YearSet {
    pub fn from_years(years: impl IntoIterator<Item = i32>) -> Self {
        let mut years: Vec<i32> = years.into_iter().collect();
        years.sort_unstable();
        years.dedup();
        Self { years }
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn first(&self) -> Option<i32> {
        self.years.first().copied()
    }

    /// Default selection.
    pub fn latest(&self) -> Option<i32> {
        self.years.last().copied()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.binary_search(&year).is_ok()
    }

    /// Closest member to `year`; ties go to the later year.
    pub fn nearest(&self, year: i32) -> Option<i32> {
        match self.years.binary_search(&year) {
            Ok(i) => Some(self.years[i]),
            Err(i) => {
                let below = i.checked_sub(1).and_then(|j| self.years.get(j)).copied();
                let above = self.years.get(i).copied();
                match (below, above) {
                    (Some(b), Some(a)) => {
                        if (year as i64 - b as i64) < (a as i64 - year as i64) {
                            Some(b)
                        } else {
                            Some(a)
                        }
                    }
                    (b, a) => b.or(a),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoDataError {
    pub min_year: i32,
    pub raw_records: usize,
}

impl std::fmt::Display for NoDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "no records from year {} onwards ({} raw records)",
            self.min_year, self.raw_records
        )
    }
}

impl std::error::Error for NoDataError {}

/// Emissions records restricted to the supported year range, grouped by year.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDataset {
    years: YearSet,
    by_year: BTreeMap<i32, Vec<EmissionRecord>>,
}

impl NormalizedDataset {
    pub fn normalize(records: Vec<EmissionRecord>, min_year: i32) -> Result<Self, NoDataError> {
        let raw_records = records.len();
        let mut by_year: BTreeMap<i32, Vec<EmissionRecord>> = BTreeMap::new();
        for record in records {
            if record.year >= min_year {
                by_year.entry(record.year).or_default().push(record);
            }
        }

        let years = YearSet::from_years(by_year.keys().copied());
        let (Some(first), Some(latest)) = (years.first(), years.latest()) else {
            return Err(NoDataError {
                min_year,
                raw_records,
            });
        };

        let retained: usize = by_year.values().map(Vec::len).sum();
        info!("filtered rows (from {min_year}): {retained} of {raw_records}");
        info!("year range (filtered): {first} to {latest}");

        Ok(Self { years, by_year })
    }

    pub fn years(&self) -> &YearSet {
        &self.years
    }

    /// Records for one year; empty for years outside the set.
    pub fn records_for(&self, year: i32) -> &[EmissionRecord] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn records(&self) -> impl Iterator<Item = &EmissionRecord> {
        self.by_year.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_year.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }

    /// Every retained total that is not NaN, across all years.
    pub fn finite_totals(&self) -> Vec<f64> {
        self.records()
            .filter(|r| r.has_total())
            .map(|r| r.total)
            .collect()
    }
}
