//! TradeRecord — one normalized row of the trade log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction as written in the `action` column.
///
/// Anything other than `BUY` / `SELL` is kept verbatim in `Other` so the
/// accounting engine can apply its zero-P/L fallback instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Other(String),
}

impl Action {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "BUY" => Self::Buy,
            "SELL" => Self::Sell,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Planned outcome of the trade, from the `pl` column (`P` / `L`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Profit,
    Loss,
    Other(String),
}

impl Outcome {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "P" => Self::Profit,
            "L" => Self::Loss,
            other => Self::Other(other.to_string()),
        }
    }

    /// The label used in the log and as a pivot column header.
    pub fn label(&self) -> &str {
        match self {
            Self::Profit => "P",
            Self::Loss => "L",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_profit(&self) -> bool {
        matches!(self, Self::Profit)
    }

    pub fn is_loss(&self) -> bool {
        matches!(self, Self::Loss)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single executed (or planned) trade from the input log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Zero-based data row index in the source file.
    pub row: usize,
    pub date: NaiveDate,
    pub action: Action,
    pub outcome: Outcome,

    // ── Prices ──
    pub buy_point: f64,
    pub take_profit: f64,
    pub stop_loss: f64,

    // ── Classification ──
    pub symbol: String,
    pub trade_type: String,

    /// Raw cells of every retained input column, in input order.
    #[serde(default)]
    pub fields: Vec<String>,
}
