//! Spreadsheet-derived metrics normalizer
//!
//! Takes rows already resolved from the fund spreadsheet and reshapes them
//! into [`YearRecord`](crate::projection::YearRecord)s and [`FundMetrics`].
//! There is no trigger or tier logic here: values are parsed and mapped,
//! never recomputed.

pub mod columns;
mod parse;
mod normalizer;
pub mod loader;

pub use parse::{parse_count, parse_currency, parse_percentage};
pub use normalizer::{
    normalize_fund_metrics, normalize_year_row, normalize_year_rows, sheet_totals, FundMetrics, SheetTotals,
};
pub use loader::{load_sheet_rows, load_sheet_rows_from_reader};
