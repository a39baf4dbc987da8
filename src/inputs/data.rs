//! Investment assumptions driving a single projection run

use serde::{Deserialize, Serialize};

/// Longest horizon the engine will run
pub const MAX_SIMULATION_YEARS: u32 = 200;

/// Scalar inputs for one simulation.
///
/// Currency amounts are whole dollars; percentage fields are expressed in
/// percent units (35.0 means 35%). Field names are camelCase on the wire so
/// form payloads deserialize directly. Missing fields fall back to the
/// base case returned by [`SimulationInputs::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationInputs {
    /// Amount invested by the fund
    pub investment_amount: f64,

    /// Valuation cap of the instrument
    pub valuation_cap: f64,

    /// Minimum elapsed years before profit-sharing can begin
    pub years_to_trigger: u32,

    /// Minimum revenue required to trigger profit-sharing
    pub revenue_threshold: f64,

    /// Minimum margin (percent) required to trigger profit-sharing.
    /// Also used as the ongoing profit margin from year 2 onward.
    pub profit_margin_threshold: f64,

    /// Year 1 revenue
    pub initial_revenue: f64,

    /// Year 1 profit margin (percent)
    pub initial_profit_margin_pct: f64,

    /// Annual revenue growth (percent)
    pub annual_growth_rate_pct: f64,

    /// Horizon length in years
    pub simulation_years: u32,

    /// Ownership stake used for equity valuation (percent)
    pub equity_percentage: f64,
}

impl Default for SimulationInputs {
    fn default() -> Self {
        Self {
            investment_amount: 2_000_000.0,
            valuation_cap: 12_500_000.0,
            years_to_trigger: 4,
            revenue_threshold: 2_000_000.0,
            profit_margin_threshold: 35.0,
            initial_revenue: 1_000_000.0,
            initial_profit_margin_pct: 20.0,
            annual_growth_rate_pct: 30.0,
            simulation_years: 10,
            equity_percentage: 20.0,
        }
    }
}

impl SimulationInputs {
    /// Whether the engine may run on these inputs.
    ///
    /// Return multiples divide by the investment amount, so a zero,
    /// negative or non-finite amount declines the run. Horizons longer than
    /// [`MAX_SIMULATION_YEARS`] are declined too.
    pub fn is_runnable(&self) -> bool {
        self.investment_amount.is_finite()
            && self.investment_amount > 0.0
            && self.simulation_years <= MAX_SIMULATION_YEARS
    }

    /// Ownership implied by converting the investment at the valuation cap
    pub fn implied_ownership_pct(&self) -> f64 {
        if self.valuation_cap > 0.0 {
            self.investment_amount / self.valuation_cap * 100.0
        } else {
            0.0
        }
    }

    /// Copy of these inputs with a different horizon
    pub fn with_years(&self, simulation_years: u32) -> Self {
        Self {
            simulation_years,
            ..self.clone()
        }
    }

    /// Copy of these inputs with a different growth rate
    pub fn with_growth_rate(&self, annual_growth_rate_pct: f64) -> Self {
        Self {
            annual_growth_rate_pct,
            ..self.clone()
        }
    }
}
