//! Run a growth-rate sensitivity grid (or a scenario file) in parallel
//!
//! Outputs one summary row per run for comparison across assumptions

use anyhow::{ensure, Context};
use clap::Parser;
use fund_projection::inputs::{load_inputs_json, load_scenarios_csv};
use fund_projection::{ProjectionConfig, ProjectionResult, ScenarioRunner, SimulationInputs};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "sensitivity", about = "Growth-rate sensitivity grid for the projection engine")]
struct Args {
    /// JSON file of base inputs (defaults to the base case)
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// CSV of named scenarios; replaces the growth grid when given
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Lowest growth rate (percent)
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Highest growth rate (percent)
    #[arg(long, default_value_t = 60.0)]
    to: f64,

    /// Grid step (percent)
    #[arg(long, default_value_t = 5.0)]
    step: f64,

    /// Output CSV path
    #[arg(long, default_value = "sensitivity_output.csv")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    scenario: String,
    growth_rate_pct: f64,
    trigger_year: Option<u32>,
    time_to_recoup: Option<u32>,
    total_distributions: f64,
    distribution_to_profit_ratio: f64,
    final_return_multiple: f64,
    total_return_multiple: f64,
    irr: Option<f64>,
}

impl SummaryRow {
    fn new(scenario: String, growth_rate_pct: f64, result: &ProjectionResult) -> Self {
        let s = &result.summary;
        Self {
            scenario,
            growth_rate_pct,
            trigger_year: s.trigger_year,
            time_to_recoup: s.time_to_recoup,
            total_distributions: s.total_distributions,
            distribution_to_profit_ratio: s.distribution_to_profit_ratio,
            final_return_multiple: s.final_return_multiple,
            total_return_multiple: s.total_return_multiple,
            irr: s.irr,
        }
    }
}

/// Most points a single grid run will produce
const MAX_GRID_POINTS: usize = 10_000;

fn growth_grid(from: f64, to: f64, step: f64) -> anyhow::Result<Vec<f64>> {
    ensure!(
        from.is_finite() && to.is_finite() && step.is_finite(),
        "grid bounds and step must be finite"
    );
    ensure!(step > 0.0 && to >= from, "grid needs step > 0 and to >= from");

    let intervals = ((to - from) / step).floor();
    ensure!(
        intervals < MAX_GRID_POINTS as f64,
        "grid from {} to {} by {} exceeds {} points",
        from,
        to,
        step,
        MAX_GRID_POINTS
    );

    let count = intervals as usize + 1;
    Ok((0..count).map(|i| from + step * i as f64).collect())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let runner = ScenarioRunner::with_config(ProjectionConfig::from_env()?);

    let rows: Vec<SummaryRow> = match &args.scenarios {
        Some(path) => {
            let scenarios = load_scenarios_csv(path).with_context(|| format!("loading {}", path.display()))?;
            println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

            runner
                .run_named(&scenarios)
                .into_iter()
                .zip(&scenarios)
                .filter_map(|(outcome, scenario)| {
                    let growth = scenario.inputs.annual_growth_rate_pct;
                    outcome.result.map(|r| SummaryRow::new(outcome.name, growth, &r))
                })
                .collect()
        }
        None => {
            let base = match &args.inputs {
                Some(path) => load_inputs_json(path).with_context(|| format!("loading {}", path.display()))?,
                None => SimulationInputs::default(),
            };

            let rates = growth_grid(args.from, args.to, args.step)?;
            runner
                .growth_sensitivity(&base, &rates)
                .into_iter()
                .filter_map(|point| {
                    let label = format!("growth-{}", point.growth_rate_pct);
                    point.result.map(|r| SummaryRow::new(label, point.growth_rate_pct, &r))
                })
                .collect()
        }
    };

    println!("Projections complete in {:?}", start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("{} rows written to {}", rows.len(), args.output.display());
    for row in &rows {
        println!("  {:<20} TVPI {:>6.2}x  distributions {:>5.2}x  recoup {}",
            row.scenario,
            row.total_return_multiple,
            row.final_return_multiple,
            row.time_to_recoup.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
        );
    }

    Ok(())
}
