//! Normalize a CSV export of the fund spreadsheet
//!
//! Reads the yearly projection range and, optionally, the fund metrics row,
//! and prints the normalized records as JSON

use anyhow::Context;
use clap::Parser;
use fund_projection::portfolio::{load_companies_csv, PortfolioSummary};
use fund_projection::sheet::{load_sheet_rows, normalize_fund_metrics, normalize_year_rows, sheet_totals, FundMetrics, SheetTotals};
use fund_projection::YearRecord;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "normalize_sheet", about = "Normalize spreadsheet projection exports")]
struct Args {
    /// CSV export of the yearly projection range
    projection: PathBuf,

    /// The export's first row is a header
    #[arg(long)]
    header: bool,

    /// CSV export of the fund metrics range; its first row is used
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// CSV export of portfolio company records (with header row)
    #[arg(long)]
    companies: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NormalizedSheet {
    years: Vec<YearRecord>,
    totals: SheetTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    fund_metrics: Option<FundMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    portfolio: Option<PortfolioSummary>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rows = load_sheet_rows(&args.projection, args.header)
        .with_context(|| format!("loading {}", args.projection.display()))?;
    let years = normalize_year_rows(&rows);
    let totals = sheet_totals(&years);

    let fund_metrics = match &args.metrics {
        Some(path) => {
            let rows = load_sheet_rows(path, false).with_context(|| format!("loading {}", path.display()))?;
            rows.first().map(|row| normalize_fund_metrics(row))
        }
        None => None,
    };

    let portfolio = match &args.companies {
        Some(path) => {
            let companies = load_companies_csv(path).with_context(|| format!("loading {}", path.display()))?;
            Some(PortfolioSummary::from_companies(&companies))
        }
        None => None,
    };

    let normalized = NormalizedSheet {
        years,
        totals,
        fund_metrics,
        portfolio,
    };
    println!("{}", serde_json::to_string_pretty(&normalized)?);
    Ok(())
}
