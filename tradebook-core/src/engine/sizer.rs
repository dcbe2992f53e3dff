//! Fixed fractional position sizer.
//!
//! Quantity = (pre-trade equity × risk fraction) / entry price.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionalSizer {
    pub fraction: f64,
}

impl Default for FractionalSizer {
    fn default() -> Self {
        Self { fraction: 0.10 }
    }
}

impl FractionalSizer {
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }

    /// Position size for a trade entered at `entry_price`.
    ///
    /// The caller guarantees `entry_price != 0`; a zero price yields a
    /// non-finite size.
    pub fn size(&self, equity: f64, entry_price: f64) -> f64 {
        (equity * self.fraction) / entry_price
    }
}
