//! Scenario runner for batch and sensitivity projections
//!
//! Holds one engine configuration and runs many input sets against it.
//! Batches run in parallel; results keep the order of the inputs.

use crate::inputs::{NamedScenario, SimulationInputs};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use log::info;
use rayon::prelude::*;
use serde::Serialize;

/// Result of one point on a sensitivity grid
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    pub growth_rate_pct: f64,
    /// `None` when the inputs were not runnable
    pub result: Option<ProjectionResult>,
}

/// Result of a named scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Option<ProjectionResult>,
}

/// Pre-configured runner for batch projections
///
/// # Example
/// ```
/// use fund_projection::{ScenarioRunner, SimulationInputs};
///
/// let runner = ScenarioRunner::new();
/// let points = runner.growth_sensitivity(&SimulationInputs::default(), &[10.0, 30.0, 50.0]);
/// assert_eq!(points.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with default model constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with a specific configuration
    pub fn with_config(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    /// Run a single projection
    pub fn run(&self, inputs: &SimulationInputs) -> Option<ProjectionResult> {
        self.engine.simulate(inputs)
    }

    /// Run many input sets in parallel
    pub fn run_batch(&self, inputs: &[SimulationInputs]) -> Vec<Option<ProjectionResult>> {
        info!("running batch of {} projections", inputs.len());
        inputs.par_iter().map(|i| self.engine.simulate(i)).collect()
    }

    /// Run labelled scenarios in parallel
    pub fn run_named(&self, scenarios: &[NamedScenario]) -> Vec<ScenarioOutcome> {
        info!("running {} named scenarios", scenarios.len());
        scenarios
            .par_iter()
            .map(|s| ScenarioOutcome {
                name: s.name.clone(),
                result: self.engine.simulate(&s.inputs),
            })
            .collect()
    }

    /// Rerun the base inputs once per growth rate
    pub fn growth_sensitivity(&self, base: &SimulationInputs, rates: &[f64]) -> Vec<SensitivityPoint> {
        rates
            .par_iter()
            .map(|&rate| SensitivityPoint {
                growth_rate_pct: rate,
                result: self.engine.simulate(&base.with_growth_rate(rate)),
            })
            .collect()
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }
}
