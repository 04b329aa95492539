//! CSV price table loader.
//!
//! Expects a header row `date,<asset>,<asset>...` followed by one row per
//! date. Dates are ISO `YYYY-MM-DD`; every cell must hold a price.

use crate::error::LabError;
use chrono::NaiveDate;
use finrisk_core::types::{PriceSeries, PriceTable};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load an aligned price table from a CSV file.
pub fn load_price_table(path: &Path) -> Result<PriceTable, LabError> {
    let file = File::open(path)
        .map_err(|e| LabError::data_load(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "reading price table");
    read_price_table(file)
}

/// Read an aligned price table from any CSV source.
pub fn read_price_table<R: Read>(source: R) -> Result<PriceTable, LabError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    match headers.get(0) {
        Some(first) if first.eq_ignore_ascii_case("date") => {}
        _ => {
            return Err(LabError::data_load(
                "price table must start with a 'date' column",
            ))
        }
    }
    let assets: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    if assets.is_empty() {
        return Err(LabError::data_load("price table has no asset columns"));
    }

    let mut dates = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); assets.len()];

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = row + 2;

        let raw_date = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
            LabError::data_load(format!("line {}: invalid date '{}': {}", line, raw_date, e))
        })?;
        dates.push(date);

        for (column, (asset, cell)) in columns
            .iter_mut()
            .zip(assets.iter().zip(record.iter().skip(1)))
        {
            let price = cell.parse::<f64>().map_err(|e| {
                LabError::data_load(format!(
                    "line {}: invalid price '{}' for {}: {}",
                    line, cell, asset, e
                ))
            })?;
            column.push(price);
        }
    }

    let series = assets
        .into_iter()
        .zip(columns)
        .map(|(asset, prices)| PriceSeries::new(asset, dates.clone(), prices))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PriceTable::new(series)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finrisk_core::types::RiskError;
    use std::io::Write;

    #[test]
    fn test_read_price_table() {
        let csv = "date,A,B\n2024-01-01,100,50\n2024-01-02,90,51\n2024-01-03,95,49.5\n";
        let table = read_price_table(csv.as_bytes()).unwrap();

        assert_eq!(table.n_assets(), 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("A").unwrap().prices(), &[100.0, 90.0, 95.0]);
        assert_eq!(
            table.dates()[2],
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let csv = "date, A , B\n2024-01-01, 100 , 50\n2024-01-02, 101 , 51\n";
        let table = read_price_table(csv.as_bytes()).unwrap();
        assert!(table.get("A").is_some());
        assert_eq!(table.get("B").unwrap().prices(), &[50.0, 51.0]);
    }

    #[test]
    fn test_missing_date_column() {
        let csv = "A,B\n100,50\n";
        let err = read_price_table(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn test_invalid_price_names_line_and_asset() {
        let csv = "date,A,B\n2024-01-01,100,50\n2024-01-02,n/a,51\n";
        let err = read_price_table(csv.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains('A'));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let csv = "date,A,B\n2024-01-01,100,50\n2024-01-02,101\n";
        assert!(matches!(
            read_price_table(csv.as_bytes()),
            Err(LabError::Csv(_))
        ));
    }

    #[test]
    fn test_non_positive_price_is_engine_error() {
        let csv = "date,A\n2024-01-01,100\n2024-01-02,0\n";
        assert!(matches!(
            read_price_table(csv.as_bytes()),
            Err(LabError::Risk(RiskError::InvalidSeries(_)))
        ));
    }

    #[test]
    fn test_unordered_dates_are_engine_error() {
        let csv = "date,A\n2024-01-02,100\n2024-01-01,101\n";
        assert!(matches!(
            read_price_table(csv.as_bytes()),
            Err(LabError::Risk(RiskError::InvalidSeries(_)))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,A").unwrap();
        writeln!(file, "2024-01-01,10").unwrap();
        writeln!(file, "2024-01-02,11").unwrap();

        let table = load_price_table(file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }
}
