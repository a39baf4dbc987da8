//! Profit-sharing tiers and the multiple-based step-down schedule

use serde::{Deserialize, Serialize};

/// Profit-sharing tier active after the trigger fires.
///
/// Variants are ordered by rate so that `min` picks the lower tier. The
/// engine only ever combines the current tier with a new one via `min`,
/// which keeps the rate from stepping back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProfitShareTier {
    /// Return cap reached, no further payouts
    Capped,
    /// 5% of profit
    Residual,
    /// 10% of profit
    Reduced,
    /// 20% of profit, the rate at trigger
    Senior,
}

impl ProfitShareTier {
    /// Share of profit paid out, in percent
    pub fn rate_pct(self) -> f64 {
        match self {
            ProfitShareTier::Senior => 20.0,
            ProfitShareTier::Reduced => 10.0,
            ProfitShareTier::Residual => 5.0,
            ProfitShareTier::Capped => 0.0,
        }
    }
}

/// Return multiples at which the tier steps down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSchedule {
    /// Multiple at which Senior steps down to Reduced
    pub reduced_at: f64,
    /// Multiple at which the tier steps down to Residual
    pub residual_at: f64,
    /// Multiple at which payouts stop
    pub cap_at: f64,
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self {
            reduced_at: 2.0,
            residual_at: 4.0,
            cap_at: 6.0,
        }
    }
}

impl TierSchedule {
    /// Tier implied by a cumulative return multiple
    pub fn tier_for_multiple(&self, multiple: f64) -> ProfitShareTier {
        if multiple >= self.cap_at {
            ProfitShareTier::Capped
        } else if multiple >= self.residual_at {
            ProfitShareTier::Residual
        } else if multiple >= self.reduced_at {
            ProfitShareTier::Reduced
        } else {
            ProfitShareTier::Senior
        }
    }
}
