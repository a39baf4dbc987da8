//! Output structures for projections

use serde::{Deserialize, Serialize};

/// A single simulated year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    /// Year index (1-indexed)
    pub year: u32,

    pub revenue: f64,
    pub profit: f64,

    /// Profit-sharing payout for this year
    pub distribution: f64,

    /// Running total of payouts through this year
    pub cumulative_distribution: f64,

    /// Rate (percent) that produced this year's distribution: 20, 10, 5 or 0
    pub profit_share_percentage: f64,

    /// Value of the equity stake at the revenue valuation multiple
    pub equity_value: f64,

    /// Rounded cumulative distribution plus rounded equity value
    pub total_value: f64,
}

impl YearRecord {
    /// Create a record with zeroed financials
    pub fn new(year: u32) -> Self {
        Self {
            year,
            revenue: 0.0,
            profit: 0.0,
            distribution: 0.0,
            cumulative_distribution: 0.0,
            profit_share_percentage: 0.0,
            equity_value: 0.0,
            total_value: 0.0,
        }
    }
}

/// Fund-level metrics derived from the full year sequence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub total_distributions: f64,
    pub total_profits: f64,
    pub total_revenue: f64,

    /// Fraction of total company profit paid to the fund
    pub distribution_to_profit_ratio: f64,

    /// First year cumulative distributions reached the investment amount
    pub time_to_recoup: Option<u32>,

    /// First year all trigger conditions held
    pub trigger_year: Option<u32>,

    /// Distributions only, as a multiple of the investment
    pub final_return_multiple: f64,

    /// Distributions plus final-year equity value, as a multiple of the investment (TVPI)
    pub total_return_multiple: f64,

    /// Distributions as a percentage of the investment
    pub capital_returned_pct: f64,

    /// Equity value in the last simulated year
    pub final_equity_value: f64,

    /// Ownership implied by converting at the valuation cap
    pub implied_ownership_pct: f64,

    /// Annual IRR of the fund cashflows, when one exists
    pub irr: Option<f64>,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Yearly records, ascending by year
    pub years: Vec<YearRecord>,

    pub summary: SummaryMetrics,
}

impl ProjectionResult {
    /// Record for a given (1-indexed) year
    pub fn year(&self, year: u32) -> Option<&YearRecord> {
        if year == 0 {
            return None;
        }
        self.years.get(year as usize - 1)
    }

    /// Last simulated year, if any
    pub fn final_year(&self) -> Option<&YearRecord> {
        self.years.last()
    }

    /// Fund cashflow stream: the investment as an outflow at t=0, yearly
    /// distributions, and the final equity value realised in the last year
    pub fn fund_cashflows(&self, investment_amount: f64) -> Vec<f64> {
        fund_cashflows(investment_amount, &self.years)
    }
}

/// Cashflow stream behind [`ProjectionResult::fund_cashflows`] and the summary IRR
pub(crate) fn fund_cashflows(investment_amount: f64, years: &[YearRecord]) -> Vec<f64> {
    let mut cashflows = Vec::with_capacity(years.len() + 1);
    cashflows.push(-investment_amount);
    cashflows.extend(years.iter().map(|r| r.distribution));

    if let (Some(last), Some(record)) = (cashflows.last_mut(), years.last()) {
        *last += record.equity_value;
    }

    cashflows
}
