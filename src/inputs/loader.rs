//! Load simulation inputs from JSON files and scenario CSVs

use super::SimulationInputs;
use crate::error::{ProjectionError, Result};
use csv::Reader;
use log::info;
use std::fs::File;
use std::path::Path;

/// A labelled set of inputs, one per scenario CSV row
#[derive(Debug, Clone, PartialEq)]
pub struct NamedScenario {
    pub name: String,
    pub inputs: SimulationInputs,
}

/// Raw CSV row matching the scenario file columns
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    #[serde(default)]
    name: String,
    investment_amount: f64,
    valuation_cap: f64,
    years_to_trigger: u32,
    revenue_threshold: f64,
    profit_margin_threshold: f64,
    initial_revenue: f64,
    initial_profit_margin_pct: f64,
    annual_growth_rate_pct: f64,
    simulation_years: u32,
    equity_percentage: f64,
}

impl CsvRow {
    fn into_scenario(self, index: usize) -> NamedScenario {
        let name = if self.name.trim().is_empty() {
            format!("scenario-{}", index + 1)
        } else {
            self.name
        };

        NamedScenario {
            name,
            inputs: SimulationInputs {
                investment_amount: self.investment_amount,
                valuation_cap: self.valuation_cap,
                years_to_trigger: self.years_to_trigger,
                revenue_threshold: self.revenue_threshold,
                profit_margin_threshold: self.profit_margin_threshold,
                initial_revenue: self.initial_revenue,
                initial_profit_margin_pct: self.initial_profit_margin_pct,
                annual_growth_rate_pct: self.annual_growth_rate_pct,
                simulation_years: self.simulation_years,
                equity_percentage: self.equity_percentage,
            },
        }
    }
}

/// Load a single set of inputs from a JSON file
pub fn load_inputs_json<P: AsRef<Path>>(path: P) -> Result<SimulationInputs> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ProjectionError::io(path, e))?;
    let inputs = serde_json::from_reader(file)?;
    Ok(inputs)
}

/// Load all scenarios from a CSV file
pub fn load_scenarios_csv<P: AsRef<Path>>(path: P) -> Result<Vec<NamedScenario>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ProjectionError::io(path, e))?;
    let scenarios = load_scenarios_from_reader(file)?;
    info!("loaded {} scenarios from {}", scenarios.len(), path.display());
    Ok(scenarios)
}

/// Load scenarios from any reader (e.g., string buffer, request body)
pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<NamedScenario>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut scenarios = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        scenarios.push(row.into_scenario(index));
    }

    Ok(scenarios)
}
