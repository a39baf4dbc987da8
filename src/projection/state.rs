//! Running state carried from one simulated year to the next

use super::tier::ProfitShareTier;
use crate::inputs::SimulationInputs;

/// State of the simulation between years
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Last simulated year (0 before the first year)
    pub year: u32,

    /// Revenue of the last simulated year
    pub revenue: f64,

    /// One-way latch: set the first year all trigger conditions hold
    pub has_triggered: bool,

    /// Year the trigger fired
    pub trigger_year: Option<u32>,

    /// Tier applied to the next distribution once triggered
    pub tier: ProfitShareTier,

    /// Running total of distributions
    pub cumulative_distribution: f64,

    /// First year cumulative distributions covered the investment
    pub time_to_recoup: Option<u32>,

    pub total_profits: f64,
    pub total_revenue: f64,
}

impl ProjectionState {
    /// State before year 1
    pub fn new() -> Self {
        Self {
            year: 0,
            revenue: 0.0,
            has_triggered: false,
            trigger_year: None,
            tier: ProfitShareTier::Senior,
            cumulative_distribution: 0.0,
            time_to_recoup: None,
            total_profits: 0.0,
            total_revenue: 0.0,
        }
    }

    /// Advance to the next year and apply the growth law.
    ///
    /// Year 1 uses the initial revenue and margin. Later years grow revenue
    /// and earn the threshold margin, not an independently modelled one.
    /// Returns `(revenue, profit)` for the new year.
    pub fn advance_year(&mut self, inputs: &SimulationInputs) -> (f64, f64) {
        self.year += 1;

        let (revenue, profit) = if self.year == 1 {
            let revenue = inputs.initial_revenue;
            (revenue, revenue * inputs.initial_profit_margin_pct / 100.0)
        } else {
            let revenue = self.revenue * (1.0 + inputs.annual_growth_rate_pct / 100.0);
            (revenue, revenue * inputs.profit_margin_threshold / 100.0)
        };

        self.revenue = revenue;
        self.total_revenue += revenue;
        self.total_profits += profit;

        (revenue, profit)
    }

    /// Fire the trigger latch for the current year
    pub fn fire_trigger(&mut self) {
        if !self.has_triggered {
            self.has_triggered = true;
            self.trigger_year = Some(self.year);
            self.tier = ProfitShareTier::Senior;
        }
    }

    /// Latch the recoup year the first time distributions cover the investment
    pub fn record_recoup(&mut self, investment_amount: f64) {
        if self.time_to_recoup.is_none() && self.cumulative_distribution >= investment_amount {
            self.time_to_recoup = Some(self.year);
        }
    }
}

impl Default for ProjectionState {
    fn default() -> Self {
        Self::new()
    }
}
