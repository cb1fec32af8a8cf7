use std::io::Read;

use tracing::debug;

pub const COL_COUNTRY: &str = "Country";
pub const COL_CODE: &str = "ISO 3166-1 alpha-3";
pub const COL_YEAR: &str = "Year";
pub const COL_TOTAL: &str = "Total";

/// Per-source emissions, tonnes CO₂ per person. NaN means no data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakdown {
    pub coal: f64,
    pub oil: f64,
    pub gas: f64,
    pub cement: f64,
    pub flaring: f64,
    pub other: f64,
}

impl Breakdown {
    pub const COLUMNS: [&'static str; 6] = ["Coal", "Oil", "Gas", "Cement", "Flaring", "Other"];

    pub fn no_data() -> Self {
        Self::from_array([f64::NAN; 6])
    }

    fn from_array(v: [f64; 6]) -> Self {
        Self {
            coal: v[0],
            oil: v[1],
            gas: v[2],
            cement: v[3],
            flaring: v[4],
            other: v[5],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmissionRecord {
    /// ISO 3166-1 alpha-3, the join key against feature ids.
    pub country_code: String,
    pub country: String,
    pub year: i32,
    /// Per-capita total; NaN when the cell is empty or not a number.
    pub total: f64,
    pub breakdown: Breakdown,
}

impl EmissionRecord {
    pub fn has_total(&self) -> bool {
        !self.total.is_nan()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmissionTable {
    pub records: Vec<EmissionRecord>,
    /// Data rows that could not become a record: the year is missing or not
    /// an integer. A blank code still yields a record; its total takes part
    /// in the color domain even though no shape can match it.
    pub skipped_rows: usize,
}

#[derive(Debug)]
pub enum TableError {
    Csv(csv::Error),
    MissingColumn { name: &'static str },
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::Csv(e) => write!(f, "CSV error: {e}"),
            TableError::MissingColumn { name } => write!(f, "missing required column {name:?}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Csv(e) => Some(e),
            TableError::MissingColumn { .. } => None,
        }
    }
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        TableError::Csv(e)
    }
}

struct Columns {
    code: usize,
    year: usize,
    total: usize,
    country: Option<usize>,
    breakdown: [Option<usize>; 6],
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, TableError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let required = |name: &'static str| find(name).ok_or(TableError::MissingColumn { name });

        Ok(Self {
            code: required(COL_CODE)?,
            year: required(COL_YEAR)?,
            total: required(COL_TOTAL)?,
            country: find(COL_COUNTRY),
            breakdown: Breakdown::COLUMNS.map(find),
        })
    }
}

impl EmissionTable {
    pub fn from_csv_str(payload: &str) -> Result<Self, TableError> {
        Self::from_csv_reader(payload.as_bytes())
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let columns = Columns::resolve(rdr.headers()?)?;

        let mut records = Vec::new();
        let mut skipped_rows = 0;
        for row in rdr.records() {
            let row = row?;
            let cell = |idx: usize| row.get(idx).unwrap_or("");

            let code = cell(columns.code);
            let Some(year) = parse_year(cell(columns.year)) else {
                skipped_rows += 1;
                continue;
            };

            let breakdown = Breakdown::from_array(
                columns
                    .breakdown
                    .map(|idx| idx.map(|i| parse_number(cell(i))).unwrap_or(f64::NAN)),
            );
            records.push(EmissionRecord {
                country_code: code.to_string(),
                country: columns.country.map(cell).unwrap_or_default().to_string(),
                year,
                total: parse_number(cell(columns.total)),
                breakdown,
            });
        }

        debug!(
            rows = records.len(),
            skipped = skipped_rows,
            "parsed emissions table"
        );
        Ok(Self {
            records,
            skipped_rows,
        })
    }
}

/// Numeric cell → f64. Empty, non-numeric and non-finite cells become NaN.
pub fn parse_number(cell: &str) -> f64 {
    let cell = cell.trim();
    if cell.is_empty() {
        return f64::NAN;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

fn parse_year(cell: &str) -> Option<i32> {
    let v = parse_number(cell);
    if v.is_nan() || v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}

#[cfg(test)]
mod tests {
    use super::{EmissionTable, TableError, parse_number, parse_year};

    #[test]
    fn parses_sample_table() {
        let payload = include_str!("../../apps/viewer_web/assets/data/sample_percapita.csv");
        let table = EmissionTable::from_csv_str(payload).expect("parse table");
        assert_eq!(table.records.len(), 13);
        assert_eq!(table.skipped_rows, 0);

        let fra_1900 = &table.records[4];
        assert_eq!(fra_1900.country_code, "FRA");
        assert_eq!(fra_1900.country, "France");
        assert_eq!(fra_1900.year, 1900);
        assert_eq!(fra_1900.total, 2.5);
        assert_eq!(fra_1900.breakdown.coal, 2.3);
        assert!(fra_1900.breakdown.other.is_nan());
    }

    #[test]
    fn blank_and_text_cells_become_nan() {
        let payload = include_str!("../../apps/viewer_web/assets/data/sample_percapita.csv");
        let table = EmissionTable::from_csv_str(payload).expect("parse table");
        let afg_1901 = &table.records[2];
        assert!(!afg_1901.has_total());
        let qat_1901 = &table.records[9];
        assert_eq!(qat_1901.country_code, "QAT");
        assert!(qat_1901.total.is_nan());
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let table = EmissionTable::from_csv_str("ISO 3166-1 alpha-3,Year,Total\nUSA,2021,14.9\n")
            .expect("parse table");
        let rec = &table.records[0];
        assert_eq!(rec.country, "");
        assert_eq!(rec.total, 14.9);
        assert!(rec.breakdown.gas.is_nan());
    }

    #[test]
    fn only_rows_without_an_integral_year_are_skipped() {
        let payload = "ISO 3166-1 alpha-3,Year,Total\n,2000,1.0\nUSA,two thousand,1.0\nUSA,2000.5,1.0\nUSA,2000,1.0\n";
        let table = EmissionTable::from_csv_str(payload).expect("parse table");
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.skipped_rows, 2);
        assert_eq!(table.records[0].country_code, "");
        assert_eq!(table.records[0].total, 1.0);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = EmissionTable::from_csv_str("Country,Year,Total\nFrance,2000,5.0\n")
            .expect_err("code column is required");
        match err {
            TableError::MissingColumn { name } => assert_eq!(name, "ISO 3166-1 alpha-3"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_rows_are_an_error() {
        let err = EmissionTable::from_csv_str("ISO 3166-1 alpha-3,Year,Total\nUSA,2000\n")
            .expect_err("ragged row");
        assert!(matches!(err, TableError::Csv(_)));
    }

    #[test]
    fn number_parsing_rules() {
        assert_eq!(parse_number(" 1.5 "), 1.5);
        assert!(parse_number("").is_nan());
        assert!(parse_number("n/a").is_nan());
        assert!(parse_number("inf").is_nan());
        assert_eq!(parse_year("1900"), Some(1900));
        assert_eq!(parse_year("1900.0"), Some(1900));
        assert_eq!(parse_year("1900.5"), None);
    }
}
