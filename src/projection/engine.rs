//! Core projection engine for yearly profit-sharing projections

use super::irr::calculate_irr;
use super::records::{fund_cashflows, ProjectionResult, SummaryMetrics, YearRecord};
use super::state::ProjectionState;
use super::tier::{ProfitShareTier, TierSchedule};
use crate::error::{ProjectionError, Result};
use crate::inputs::SimulationInputs;
use log::debug;
use std::env;

/// Revenue multiple used to value the equity stake
pub const DEFAULT_VALUATION_MULTIPLE: f64 = 5.0;

/// Model constants for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Equity value = revenue * valuation_multiple * equity share
    pub valuation_multiple: f64,

    /// Return multiples at which the profit share steps down
    pub tiers: TierSchedule,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            valuation_multiple: DEFAULT_VALUATION_MULTIPLE,
            tiers: TierSchedule::default(),
        }
    }
}

impl ProjectionConfig {
    /// Defaults with overrides from the environment:
    /// FUND_VALUATION_MULTIPLE, FUND_TIER_REDUCED_AT, FUND_TIER_RESIDUAL_AT, FUND_TIER_CAP_AT
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            valuation_multiple: env_override(
                "FUND_VALUATION_MULTIPLE",
                env::var("FUND_VALUATION_MULTIPLE").ok(),
                defaults.valuation_multiple,
            )?,
            tiers: TierSchedule {
                reduced_at: env_override(
                    "FUND_TIER_REDUCED_AT",
                    env::var("FUND_TIER_REDUCED_AT").ok(),
                    defaults.tiers.reduced_at,
                )?,
                residual_at: env_override(
                    "FUND_TIER_RESIDUAL_AT",
                    env::var("FUND_TIER_RESIDUAL_AT").ok(),
                    defaults.tiers.residual_at,
                )?,
                cap_at: env_override(
                    "FUND_TIER_CAP_AT",
                    env::var("FUND_TIER_CAP_AT").ok(),
                    defaults.tiers.cap_at,
                )?,
            },
        })
    }
}

fn env_override(key: &'static str, value: Option<String>, default: f64) -> Result<f64> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() && parsed > 0.0 => Ok(parsed),
            _ => Err(ProjectionError::InvalidConfig { key, value: raw }),
        },
    }
}

/// Main projection engine
///
/// Stateless between runs: every call to [`ProjectionEngine::simulate`]
/// recomputes the full horizon from year 1.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the year-by-year simulation.
    ///
    /// Returns `None` without running when the investment amount is not
    /// positive or the horizon exceeds
    /// [`MAX_SIMULATION_YEARS`](crate::inputs::MAX_SIMULATION_YEARS). A zero-year
    /// horizon yields an empty sequence and a zeroed summary.
    pub fn simulate(&self, inputs: &SimulationInputs) -> Option<ProjectionResult> {
        if !inputs.is_runnable() {
            debug!(
                "declining to simulate: investment {} over {} years",
                inputs.investment_amount, inputs.simulation_years
            );
            return None;
        }

        let mut state = ProjectionState::new();
        let years: Vec<YearRecord> = (1..=inputs.simulation_years)
            .map(|_| self.simulate_year(inputs, &mut state))
            .collect();

        let summary = self.summarize(inputs, &state, &years);
        Some(ProjectionResult { years, summary })
    }

    /// Calculate a single year and update state for the next one
    fn simulate_year(&self, inputs: &SimulationInputs, state: &mut ProjectionState) -> YearRecord {
        let (revenue, profit) = state.advance_year(inputs);

        let mut row = YearRecord::new(state.year);
        row.revenue = revenue;
        row.profit = profit;

        if !state.has_triggered && self.trigger_conditions_met(inputs, state.year, revenue, profit) {
            state.fire_trigger();
            debug!("profit-sharing triggered in year {}", state.year);
        }

        if state.has_triggered {
            self.distribute(inputs, state, &mut row);
        }

        // Equity valued at a fixed revenue multiple
        row.equity_value = revenue * self.config.valuation_multiple * (inputs.equity_percentage / 100.0);

        state.record_recoup(inputs.investment_amount);

        row.cumulative_distribution = state.cumulative_distribution;
        row.total_value = state.cumulative_distribution.round() + row.equity_value.round();

        row
    }

    /// All of: minimum elapsed years, revenue threshold, margin threshold.
    ///
    /// The margin test compares profit against the threshold profit for this
    /// revenue. From year 2 that is the same expression the growth law uses,
    /// so a margin equal to the threshold always passes.
    fn trigger_conditions_met(&self, inputs: &SimulationInputs, year: u32, revenue: f64, profit: f64) -> bool {
        // No margin exists without positive revenue
        revenue > 0.0
            && year >= inputs.years_to_trigger
            && revenue >= inputs.revenue_threshold
            && profit >= revenue * inputs.profit_margin_threshold / 100.0
    }

    /// Pay this year's share, then step the tier down on the new multiple.
    ///
    /// The cap applies within the year that crosses it: that year's payout
    /// is zeroed and never enters the cumulative total.
    fn distribute(&self, inputs: &SimulationInputs, state: &mut ProjectionState, row: &mut YearRecord) {
        let tier = state.tier;
        let prior_cumulative = state.cumulative_distribution;

        let mut distribution = row.profit * (tier.rate_pct() / 100.0);
        state.cumulative_distribution = prior_cumulative + distribution;

        let multiple = state.cumulative_distribution / inputs.investment_amount;
        let next_tier = tier.min(self.config.tiers.tier_for_multiple(multiple));

        if next_tier != tier {
            debug!(
                "year {}: multiple {:.3}x moves tier {:?} -> {:?}",
                state.year, multiple, tier, next_tier
            );
        }
        state.tier = next_tier;

        let applied_tier = if next_tier == ProfitShareTier::Capped {
            distribution = 0.0;
            state.cumulative_distribution = prior_cumulative;
            ProfitShareTier::Capped
        } else {
            tier
        };

        row.distribution = distribution;
        row.profit_share_percentage = applied_tier.rate_pct();
    }

    /// Derive fund-level metrics after the loop
    fn summarize(&self, inputs: &SimulationInputs, state: &ProjectionState, years: &[YearRecord]) -> SummaryMetrics {
        let investment = inputs.investment_amount;
        let total_distributions = state.cumulative_distribution;
        let final_equity_value = years.last().map(|r| r.equity_value).unwrap_or(0.0);

        let distribution_to_profit_ratio = if state.total_profits != 0.0 {
            total_distributions / state.total_profits
        } else {
            0.0
        };

        let irr = calculate_irr(&fund_cashflows(investment, years), 1);

        SummaryMetrics {
            total_distributions,
            total_profits: state.total_profits,
            total_revenue: state.total_revenue,
            distribution_to_profit_ratio,
            time_to_recoup: state.time_to_recoup,
            trigger_year: state.trigger_year,
            final_return_multiple: total_distributions / investment,
            total_return_multiple: (total_distributions + final_equity_value) / investment,
            capital_returned_pct: total_distributions / investment * 100.0,
            final_equity_value,
            implied_ownership_pct: inputs.implied_ownership_pct(),
            irr,
        }
    }
}

/// Run a projection with the default model constants
pub fn simulate(inputs: &SimulationInputs) -> Option<ProjectionResult> {
    ProjectionEngine::default().simulate(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::MAX_SIMULATION_YEARS;
    use crate::projection::irr::npv_at_rate;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn base_case() -> SimulationInputs {
        SimulationInputs::default()
    }

    #[test]
    fn test_base_case_growth() {
        let result = simulate(&base_case()).unwrap();
        assert_eq!(result.years.len(), 10);

        let y1 = &result.years[0];
        assert_eq!(y1.year, 1);
        assert_eq!(y1.revenue, 1_000_000.0);
        assert_eq!(y1.profit, 200_000.0);

        let y2 = &result.years[1];
        assert_eq!(y2.revenue, 1_300_000.0);
        assert_relative_eq!(y2.profit, 455_000.0);
    }

    #[test]
    fn test_base_case_trigger_and_recoup() {
        let result = simulate(&base_case()).unwrap();
        let summary = &result.summary;

        // Year 4 is the first year with revenue >= 2M (2.197M) and margin >= 35%
        assert_eq!(summary.trigger_year, Some(4));
        for record in &result.years[..3] {
            assert_eq!(record.distribution, 0.0);
            assert_eq!(record.profit_share_percentage, 0.0);
        }

        let y4 = &result.years[3];
        assert_relative_eq!(y4.revenue, 2_197_000.0, max_relative = 1e-12);
        assert_relative_eq!(y4.distribution, 153_790.0, max_relative = 1e-12);
        assert_eq!(y4.profit_share_percentage, 20.0);

        // Cumulative reaches 1.96M in year 9 and 2.70M in year 10
        assert!(result.years[8].cumulative_distribution < 2_000_000.0);
        assert_eq!(summary.time_to_recoup, Some(10));
        assert_relative_eq!(summary.total_distributions, 2_704_064.80981, max_relative = 1e-9);
    }

    #[test]
    fn test_base_case_summary() {
        let result = simulate(&base_case()).unwrap();
        let summary = &result.summary;

        assert_relative_eq!(summary.total_profits, 14_766_824.04905, max_relative = 1e-9);
        assert_relative_eq!(summary.total_revenue, 42_619_497.283, max_relative = 1e-9);
        assert_relative_eq!(
            summary.distribution_to_profit_ratio,
            2_704_064.80981 / 14_766_824.04905,
            max_relative = 1e-9
        );
        assert_relative_eq!(summary.final_return_multiple, 1.352032404905, max_relative = 1e-9);
        assert_relative_eq!(summary.capital_returned_pct, 135.2032404905, max_relative = 1e-9);

        // Final equity: 10.6M revenue * 5 * 20%
        assert_relative_eq!(summary.final_equity_value, 10_604_499.373, max_relative = 1e-9);
        assert_relative_eq!(
            summary.total_return_multiple,
            (2_704_064.80981 + 10_604_499.373) / 2_000_000.0,
            max_relative = 1e-9
        );
        assert_relative_eq!(summary.implied_ownership_pct, 16.0);
    }

    #[test]
    fn test_base_case_irr_discounts_to_zero() {
        let inputs = base_case();
        let result = simulate(&inputs).unwrap();
        let irr = result.summary.irr.expect("base case has an IRR");
        assert!(irr > 0.0);

        let npv = npv_at_rate(&result.fund_cashflows(inputs.investment_amount), irr);
        assert!(npv.abs() < 1.0, "npv at irr was {}", npv);
    }

    #[test]
    fn test_total_value_rounds_components() {
        let result = simulate(&base_case()).unwrap();
        for record in &result.years {
            assert_eq!(
                record.total_value,
                record.cumulative_distribution.round() + record.equity_value.round()
            );
        }
        assert_eq!(result.years[0].total_value, 1_000_000.0);
    }

    #[test]
    fn test_tier_step_down_and_same_year_cap() {
        let result = simulate(&base_case().with_years(25)).unwrap();
        let pct: Vec<f64> = result.years.iter().map(|r| r.profit_share_percentage).collect();

        // 2.46x after year 12, 4.09x after year 15, cap crossed in year 19
        assert_eq!(pct[11], 20.0);
        assert_eq!(pct[12], 10.0);
        assert_eq!(pct[14], 10.0);
        assert_eq!(pct[15], 5.0);
        assert_eq!(pct[17], 5.0);

        let y18 = &result.years[17];
        let y19 = &result.years[18];
        assert!(y19.profit > 0.0);
        assert_eq!(y19.distribution, 0.0);
        assert_eq!(y19.profit_share_percentage, 0.0);
        assert_eq!(y19.cumulative_distribution, y18.cumulative_distribution);

        for record in &result.years[18..] {
            assert_eq!(record.distribution, 0.0);
        }
        assert!(result.summary.final_return_multiple < 6.0);
    }

    #[test]
    fn test_trigger_never_reached() {
        let inputs = SimulationInputs {
            revenue_threshold: 1e15,
            simulation_years: 5,
            ..base_case()
        };
        let result = simulate(&inputs).unwrap();

        assert_eq!(result.summary.trigger_year, None);
        assert_eq!(result.summary.time_to_recoup, None);
        for record in &result.years {
            assert_eq!(record.distribution, 0.0);
            assert_eq!(record.cumulative_distribution, 0.0);
        }
        assert_eq!(result.summary.total_distributions, 0.0);
        assert_eq!(result.summary.distribution_to_profit_ratio, 0.0);
    }

    #[test]
    fn test_year_one_trigger_uses_initial_margin() {
        let inputs = SimulationInputs {
            years_to_trigger: 1,
            revenue_threshold: 500_000.0,
            profit_margin_threshold: 15.0,
            ..base_case()
        };
        let result = simulate(&inputs).unwrap();
        assert_eq!(result.summary.trigger_year, Some(1));
        assert_relative_eq!(result.years[0].distribution, 40_000.0);
    }

    #[test]
    fn test_year_one_margin_below_threshold_defers_trigger() {
        let inputs = SimulationInputs {
            years_to_trigger: 1,
            revenue_threshold: 0.0,
            ..base_case()
        };
        let result = simulate(&inputs).unwrap();
        // Year 1 margin is 20% < 35%; year 2 earns the threshold margin
        assert_eq!(result.summary.trigger_year, Some(2));
    }

    #[test]
    fn test_zero_revenue_never_triggers() {
        let inputs = SimulationInputs {
            initial_revenue: 0.0,
            revenue_threshold: 0.0,
            years_to_trigger: 1,
            ..base_case()
        };
        let result = simulate(&inputs).unwrap();
        assert_eq!(result.summary.trigger_year, None);
        assert_eq!(result.summary.total_profits, 0.0);
        assert_eq!(result.summary.distribution_to_profit_ratio, 0.0);
    }

    #[test]
    fn test_zero_investment_declines() {
        let inputs = SimulationInputs {
            investment_amount: 0.0,
            ..base_case()
        };
        assert!(simulate(&inputs).is_none());

        let negative = SimulationInputs {
            investment_amount: -5.0,
            ..base_case()
        };
        assert!(simulate(&negative).is_none());
    }

    #[test]
    fn test_overlong_horizon_declines() {
        let inputs: SimulationInputs = serde_json::from_str(r#"{"simulationYears": 4294967295}"#).unwrap();
        assert!(simulate(&inputs).is_none());

        let longest = simulate(&base_case().with_years(MAX_SIMULATION_YEARS)).unwrap();
        assert_eq!(longest.years.len(), MAX_SIMULATION_YEARS as usize);
    }

    #[test]
    fn test_fractional_margin_thresholds_trigger_on_schedule() {
        // Year 4 revenue clears 2M and the margin equals the threshold
        for tenths in 1..=1000u32 {
            let threshold = tenths as f64 / 10.0;
            let inputs = SimulationInputs {
                profit_margin_threshold: threshold,
                ..base_case()
            };
            let result = simulate(&inputs).unwrap();
            assert_eq!(result.summary.trigger_year, Some(4), "threshold {}", threshold);
        }
    }

    #[test]
    fn test_summary_irr_uses_fund_cashflows() {
        let inputs = base_case().with_years(15);
        let result = simulate(&inputs).unwrap();
        let expected = calculate_irr(&result.fund_cashflows(inputs.investment_amount), 1);
        assert_eq!(result.summary.irr, expected);
    }

    #[test]
    fn test_zero_years_yields_empty_run() {
        let result = simulate(&base_case().with_years(0)).unwrap();
        assert!(result.years.is_empty());

        let summary = &result.summary;
        assert_eq!(summary.total_distributions, 0.0);
        assert_eq!(summary.total_profits, 0.0);
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.final_return_multiple, 0.0);
        assert_eq!(summary.total_return_multiple, 0.0);
        assert_eq!(summary.time_to_recoup, None);
        assert_eq!(summary.trigger_year, None);
        assert_eq!(summary.irr, None);
    }

    #[test]
    fn test_valuation_multiple_from_config() {
        let engine = ProjectionEngine::new(ProjectionConfig {
            valuation_multiple: 3.0,
            ..Default::default()
        });
        let result = engine.simulate(&base_case()).unwrap();
        assert_relative_eq!(result.years[0].equity_value, 600_000.0);
    }

    #[test]
    fn test_env_override_parsing() {
        assert_eq!(env_override("K", None, 5.0).unwrap(), 5.0);
        assert_eq!(env_override("K", Some(" 7.5 ".into()), 5.0).unwrap(), 7.5);
        assert!(matches!(
            env_override("K", Some("five".into()), 5.0),
            Err(ProjectionError::InvalidConfig { key: "K", .. })
        ));
        assert!(env_override("K", Some("-1".into()), 5.0).is_err());
    }

    fn valid_inputs() -> impl Strategy<Value = SimulationInputs> {
        (
            (100_000.0..10_000_000.0f64, 1u32..8, 0.0..10_000_000.0f64, 0.0..=100.0f64),
            (0.0..5_000_000.0f64, 0.0..=100.0f64, 0.0..80.0f64, 1u32..30, 0.0..=100.0f64),
        )
            .prop_map(
                |(
                    (investment_amount, years_to_trigger, revenue_threshold, profit_margin_threshold),
                    (initial_revenue, initial_profit_margin_pct, annual_growth_rate_pct, simulation_years, equity_percentage),
                )| SimulationInputs {
                    investment_amount,
                    valuation_cap: investment_amount * 6.0,
                    years_to_trigger,
                    revenue_threshold,
                    profit_margin_threshold,
                    initial_revenue,
                    initial_profit_margin_pct,
                    annual_growth_rate_pct,
                    simulation_years,
                    equity_percentage,
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_cumulative_is_running_sum(inputs in valid_inputs()) {
            let result = simulate(&inputs).unwrap();
            prop_assert_eq!(result.years.len(), inputs.simulation_years as usize);
            prop_assert_eq!(result.years[0].cumulative_distribution, result.years[0].distribution);
            for pair in result.years.windows(2) {
                prop_assert!(pair[1].cumulative_distribution >= pair[0].cumulative_distribution);
                prop_assert_eq!(
                    pair[1].cumulative_distribution,
                    pair[0].cumulative_distribution + pair[1].distribution
                );
            }
        }

        #[test]
        fn prop_tier_never_increases_after_trigger(inputs in valid_inputs()) {
            let result = simulate(&inputs).unwrap();
            if let Some(trigger) = result.summary.trigger_year {
                let after = &result.years[(trigger - 1) as usize..];
                for pair in after.windows(2) {
                    prop_assert!(pair[1].profit_share_percentage <= pair[0].profit_share_percentage);
                }
            }
        }

        #[test]
        fn prop_no_distribution_before_trigger(inputs in valid_inputs()) {
            let result = simulate(&inputs).unwrap();
            let first_paying_year = result.summary.trigger_year.unwrap_or(u32::MAX);
            for record in result.years.iter().filter(|r| r.year < first_paying_year) {
                prop_assert_eq!(record.distribution, 0.0);
                prop_assert_eq!(record.cumulative_distribution, 0.0);
            }
        }

        #[test]
        fn prop_distribution_matches_reported_rate(inputs in valid_inputs()) {
            let result = simulate(&inputs).unwrap();
            for record in &result.years {
                prop_assert_eq!(record.distribution, record.profit * (record.profit_share_percentage / 100.0));
            }
        }

        #[test]
        fn prop_cap_stops_all_later_payouts(inputs in valid_inputs()) {
            let result = simulate(&inputs).unwrap();
            prop_assert!(result.summary.final_return_multiple < 6.0);

            let capped_from = result
                .years
                .iter()
                .position(|r| result.summary.trigger_year.is_some_and(|t| r.year >= t) && r.profit_share_percentage == 0.0);
            if let Some(start) = capped_from {
                for record in &result.years[start..] {
                    prop_assert_eq!(record.distribution, 0.0);
                }
            }
        }

        #[test]
        fn prop_recoup_is_first_crossing(inputs in valid_inputs()) {
            let result = simulate(&inputs).unwrap();
            let expected = result
                .years
                .iter()
                .find(|r| r.cumulative_distribution >= inputs.investment_amount)
                .map(|r| r.year);
            prop_assert_eq!(result.summary.time_to_recoup, expected);
        }

        #[test]
        fn prop_simulation_is_deterministic(inputs in valid_inputs()) {
            prop_assert_eq!(simulate(&inputs), simulate(&inputs));
        }
    }
}
