//! Fund Projection CLI
//!
//! Runs a single projection and prints the yearly table and summary metrics

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::Parser;
use fund_projection::inputs::{load_inputs_json, MAX_SIMULATION_YEARS};
use fund_projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, SimulationInputs, SummaryMetrics};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fund_projection", version, about = "Project profit-sharing returns for a venture bond")]
struct Args {
    /// JSON file of simulation inputs (defaults to the base case)
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Override the horizon length in years
    #[arg(long)]
    years: Option<u32>,

    /// Override the investment amount
    #[arg(long)]
    investment: Option<f64>,

    /// Override the annual growth rate (percent)
    #[arg(long)]
    growth: Option<f64>,

    /// Write the yearly records to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print a JSON report instead of the table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationReport<'a> {
    generated_at: DateTime<Utc>,
    inputs: &'a SimulationInputs,
    years: &'a [fund_projection::YearRecord],
    summary: &'a SummaryMetrics,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut inputs = match &args.inputs {
        Some(path) => load_inputs_json(path).with_context(|| format!("loading inputs from {}", path.display()))?,
        None => SimulationInputs::default(),
    };
    if let Some(years) = args.years {
        inputs.simulation_years = years;
    }
    if let Some(investment) = args.investment {
        inputs.investment_amount = investment;
    }
    if let Some(growth) = args.growth {
        inputs.annual_growth_rate_pct = growth;
    }

    let config = ProjectionConfig::from_env().context("reading projection config from environment")?;
    let engine = ProjectionEngine::new(config);

    let Some(result) = engine.simulate(&inputs) else {
        bail!(
            "cannot project {} years of a {} investment: the amount must be positive and the horizon at most {} years",
            inputs.simulation_years,
            inputs.investment_amount,
            MAX_SIMULATION_YEARS
        );
    };
    info!("simulated {} years", result.years.len());

    if let Some(path) = &args.csv {
        write_csv(path, &result).with_context(|| format!("writing {}", path.display()))?;
    }

    if args.json {
        let report = SimulationReport {
            generated_at: Utc::now(),
            inputs: &inputs,
            years: &result.years,
            summary: &result.summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_table(&inputs, &result);
    if let Some(path) = &args.csv {
        println!("\nYearly records written to: {}", path.display());
    }
    Ok(())
}

fn write_csv(path: &PathBuf, result: &ProjectionResult) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in &result.years {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_table(inputs: &SimulationInputs, result: &ProjectionResult) {
    println!("Fund Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("Investment:       ${:.0}", inputs.investment_amount);
    println!("Valuation cap:    ${:.0}", inputs.valuation_cap);
    println!("Trigger:          year >= {}, revenue >= ${:.0}, margin >= {:.1}%",
        inputs.years_to_trigger, inputs.revenue_threshold, inputs.profit_margin_threshold);
    println!("Growth:           {:.1}% per year from ${:.0}", inputs.annual_growth_rate_pct, inputs.initial_revenue);
    println!();

    println!("{:>4} {:>15} {:>14} {:>13} {:>14} {:>6} {:>15} {:>15}",
        "Year", "Revenue", "Profit", "Distribution", "Cumulative", "Share", "Equity", "Total");
    println!("{}", "-".repeat(103));

    for row in &result.years {
        println!("{:>4} {:>15.0} {:>14.0} {:>13.0} {:>14.0} {:>5.0}% {:>15.0} {:>15.0}",
            row.year,
            row.revenue,
            row.profit,
            row.distribution,
            row.cumulative_distribution,
            row.profit_share_percentage,
            row.equity_value,
            row.total_value,
        );
    }

    let summary = &result.summary;
    let milestone = |year: Option<u32>| year.map(|y| format!("year {}", y)).unwrap_or_else(|| "not reached".to_string());

    println!("\nSummary:");
    println!("  Trigger:              {}", milestone(summary.trigger_year));
    println!("  Time to recoup:       {}", milestone(summary.time_to_recoup));
    println!("  Total distributions:  ${:.0}", summary.total_distributions);
    println!("  Distribution/profit:  {:.2}%", summary.distribution_to_profit_ratio * 100.0);
    println!("  Capital returned:     {:.1}%", summary.capital_returned_pct);
    println!("  Distribution multiple: {:.2}x", summary.final_return_multiple);
    println!("  Total multiple (TVPI): {:.2}x", summary.total_return_multiple);
    match summary.irr {
        Some(irr) => println!("  IRR:                  {:.2}%", irr * 100.0),
        None => println!("  IRR:                  n/a"),
    }
}
