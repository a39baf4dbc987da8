//! Reshape spreadsheet rows into projection records and fund metrics

use super::columns::{cell, CellKind, ColumnBinding, FundField, YearField, FUND_METRICS_LAYOUT, YEAR_ROW_LAYOUT};
use super::parse::{parse_count, parse_currency, parse_percentage};
use crate::projection::YearRecord;
use serde::{Deserialize, Serialize};

/// Fund-level figures from the metrics row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundMetrics {
    pub total_invested: f64,
    pub total_distributions: f64,
    pub portfolio_value: f64,
    pub tvpi: f64,
    /// Fraction, e.g. 0.18 for 18%
    pub irr: f64,
    /// Fraction of invested capital returned
    pub capital_returned: f64,
    pub active_companies: u32,
    pub portfolio_revenue: f64,
    /// Portfolio revenue over active companies, with at least one company assumed
    pub avg_revenue_per_company: f64,
}

/// Totals over a normalized yearly range
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetTotals {
    pub years: usize,
    pub total_revenue: f64,
    pub total_profits: f64,
    pub total_distributions: f64,
    pub distribution_to_profit_ratio: f64,
    pub final_total_value: f64,
}

fn numeric<F>(row: &[String], binding: &ColumnBinding<F>) -> f64 {
    let raw = cell(row, binding.column);
    match binding.kind {
        CellKind::Count => parse_count(raw) as f64,
        CellKind::Currency => parse_currency(raw),
        CellKind::Percentage => parse_percentage(raw),
    }
}

/// Normalize one yearly row. Rows with a blank year cell are spreadsheet
/// padding and yield `None`.
pub fn normalize_year_row(row: &[String]) -> Option<YearRecord> {
    let mut record = YearRecord::new(0);

    for binding in &YEAR_ROW_LAYOUT {
        if binding.field == YearField::Year {
            if cell(row, binding.column).trim().is_empty() {
                return None;
            }
            record.year = parse_count(cell(row, binding.column));
            continue;
        }

        let value = numeric(row, binding);
        match binding.field {
            YearField::Year => {}
            YearField::Revenue => record.revenue = value,
            YearField::Profit => record.profit = value,
            YearField::Distribution => record.distribution = value,
            YearField::CumulativeDistribution => record.cumulative_distribution = value,
            // Records carry percent units, cells parse to fractions
            YearField::ProfitSharePercentage => record.profit_share_percentage = value * 100.0,
            YearField::EquityValue => record.equity_value = value,
            YearField::TotalValue => record.total_value = value,
        }
    }

    Some(record)
}

/// Normalize a yearly range, skipping blank rows
pub fn normalize_year_rows(rows: &[Vec<String>]) -> Vec<YearRecord> {
    rows.iter().filter_map(|row| normalize_year_row(row)).collect()
}

/// Normalize the fund metrics row
pub fn normalize_fund_metrics(row: &[String]) -> FundMetrics {
    let mut metrics = FundMetrics::default();

    for binding in &FUND_METRICS_LAYOUT {
        let value = numeric(row, binding);
        match binding.field {
            FundField::TotalInvested => metrics.total_invested = value,
            FundField::TotalDistributions => metrics.total_distributions = value,
            FundField::PortfolioValue => metrics.portfolio_value = value,
            FundField::Tvpi => metrics.tvpi = value,
            FundField::Irr => metrics.irr = value,
            FundField::CapitalReturned => metrics.capital_returned = value,
            FundField::ActiveCompanies => metrics.active_companies = value as u32,
            FundField::PortfolioRevenue => metrics.portfolio_revenue = value,
        }
    }

    metrics.avg_revenue_per_company = metrics.portfolio_revenue / metrics.active_companies.max(1) as f64;
    metrics
}

/// Totals over normalized yearly records
pub fn sheet_totals(records: &[YearRecord]) -> SheetTotals {
    let total_revenue: f64 = records.iter().map(|r| r.revenue).sum();
    let total_profits: f64 = records.iter().map(|r| r.profit).sum();
    let total_distributions: f64 = records.iter().map(|r| r.distribution).sum();

    SheetTotals {
        years: records.len(),
        total_revenue,
        total_profits,
        total_distributions,
        distribution_to_profit_ratio: if total_profits != 0.0 {
            total_distributions / total_profits
        } else {
            0.0
        },
        final_total_value: records.last().map(|r| r.total_value).unwrap_or(0.0),
    }
}
