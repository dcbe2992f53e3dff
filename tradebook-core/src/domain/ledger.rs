//! Ledger — the accounting engine's output contract.

use super::trade::TradeRecord;
use serde::{Deserialize, Serialize};

/// Derived accounting values for one trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccountingResult {
    /// Quantity implied by fixed fractional sizing on pre-trade equity.
    pub position_size: f64,
    pub gross_pl: f64,
    pub commission: f64,
    pub net_pl: f64,
    /// Account equity after this trade.
    pub running_balance: f64,
    /// Set only on the last trade of each contiguous date group.
    pub day_end_balance: Option<f64>,
}

/// A trade paired with its accounting result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub trade: TradeRecord,
    pub result: AccountingResult,
}

/// Ordered accounting output for a whole trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub initial_balance: f64,
    pub final_balance: f64,
    pub entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_net_pl(&self) -> f64 {
        self.entries.iter().map(|e| e.result.net_pl).sum()
    }

    pub fn total_commission(&self) -> f64 {
        self.entries.iter().map(|e| e.result.commission).sum()
    }

    /// Balance change over the whole run.
    pub fn total_return(&self) -> f64 {
        self.final_balance - self.initial_balance
    }

    /// Balance change as a percentage of the initial balance.
    pub fn total_return_pct(&self) -> f64 {
        if self.initial_balance == 0.0 {
            return 0.0;
        }
        self.total_return() / self.initial_balance * 100.0
    }
}
