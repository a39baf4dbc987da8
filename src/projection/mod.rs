//! Projection engine for venture-bond profit-sharing returns

mod state;
mod engine;
mod records;
mod tier;
pub mod irr;

pub use state::ProjectionState;
pub use engine::{simulate, ProjectionEngine, ProjectionConfig, DEFAULT_VALUATION_MULTIPLE};
pub use records::{YearRecord, SummaryMetrics, ProjectionResult};
pub use tier::{ProfitShareTier, TierSchedule};
pub use irr::{calculate_irr, fund_irr};
