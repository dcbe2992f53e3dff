//! Cost model — tiered per-share brokerage commission.
//!
//! A flat base fee covers the first `threshold` shares; every share above it
//! is charged `per_share`, multiplied by the number of sides (open + close).

use serde::{Deserialize, Serialize};

/// Tiered commission schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionSchedule {
    /// Flat fee charged on every trade.
    pub base_fee: f64,
    /// Share count covered by the flat fee.
    pub threshold: f64,
    /// Marginal fee per share above the threshold, per side.
    pub per_share: f64,
    /// Number of sides charged (2 = round trip).
    pub sides: f64,
}

impl Default for CommissionSchedule {
    fn default() -> Self {
        Self {
            base_fee: 4.0,
            threshold: 250.0,
            per_share: 0.008,
            sides: 2.0,
        }
    }
}

impl CommissionSchedule {
    pub fn new(base_fee: f64, threshold: f64, per_share: f64, sides: f64) -> Self {
        Self {
            base_fee,
            threshold,
            per_share,
            sides,
        }
    }

    /// Create a zero-commission schedule.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Commission for a position of `position_size` shares.
    ///
    /// `size > threshold ⇒ (size − threshold) × per_share × sides + base_fee`,
    /// otherwise `base_fee`.
    pub fn commission(&self, position_size: f64) -> f64 {
        if position_size > self.threshold {
            ((position_size - self.threshold) * self.per_share) * self.sides + self.base_fee
        } else {
            self.base_fee
        }
    }
}
