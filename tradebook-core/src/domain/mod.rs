//! Domain types for Tradebook

pub mod ledger;
pub mod trade;

pub use ledger::{AccountingResult, Ledger, LedgerEntry};
pub use trade::{Action, Outcome, TradeRecord};

/// Symbol type alias
pub type Symbol = String;
