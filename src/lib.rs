//! Fund Projection - pro-forma return engine for venture-bond profit sharing
//!
//! This library provides:
//! - Year-by-year simulation of company growth, profit-sharing distributions and equity value
//! - Fund-level return metrics (distribution multiples, TVPI, IRR, time to recoup)
//! - Normalization of spreadsheet-derived projection rows and fund metrics
//! - Alias-resolved portfolio company records
//! - Parallel batch and sensitivity runs
//! - A session-aware periodic refresh task for external data

pub mod error;
pub mod inputs;
pub mod projection;
pub mod sheet;
pub mod portfolio;
pub mod scenario;
pub mod refresh;

// Re-export commonly used types
pub use error::{ProjectionError, Result};
pub use inputs::SimulationInputs;
pub use projection::{simulate, ProjectionEngine, ProjectionConfig, ProjectionResult, YearRecord, SummaryMetrics};
pub use scenario::ScenarioRunner;
