//! Read spreadsheet range exports (CSV) into raw rows

use crate::error::{ProjectionError, Result};
use csv::ReaderBuilder;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load every row of a CSV export as raw cell text.
///
/// Rows may have different lengths; missing trailing cells are read as
/// empty by the normalizers.
pub fn load_sheet_rows<P: AsRef<Path>>(path: P, skip_header: bool) -> Result<Vec<Vec<String>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ProjectionError::io(path, e))?;
    let rows = load_sheet_rows_from_reader(file, skip_header)?;
    info!("loaded {} sheet rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load rows from any reader (e.g., an HTTP response body)
pub fn load_sheet_rows_from_reader<R: std::io::Read>(reader: R, skip_header: bool) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(skip_header)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::normalize_year_rows;

    const EXPORT: &str = "\
Year,Revenue,Profit,Distribution,Cumulative,Share,Equity,Total
1,\"$1,000,000\",\"$200,000\",$0,$0,0%,\"$1,000,000\",\"$1,000,000\"
2,\"$1,300,000\",\"$455,000\",$0,$0,0%,\"$1,300,000\",\"$1,300,000\"
,,
";

    #[test]
    fn test_load_with_header() {
        let rows = load_sheet_rows_from_reader(EXPORT.as_bytes(), true).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][1], "$1,000,000");
        assert_eq!(rows[2].len(), 3);

        let records = normalize_year_rows(&rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].revenue, 1_300_000.0);
    }

    #[test]
    fn test_load_without_header_keeps_first_row() {
        let rows = load_sheet_rows_from_reader(EXPORT.as_bytes(), false).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], "Year");

        // The header row has a non-numeric year and reads as year 0
        let records = normalize_year_rows(&rows);
        assert_eq!(records[0].year, 0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_sheet_rows("missing/export.csv", true).unwrap_err();
        assert!(matches!(err, ProjectionError::Io { .. }));
    }
}
