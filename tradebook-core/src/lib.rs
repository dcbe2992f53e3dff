//! Tradebook Core — trade log normalization, accounting engine, aggregate reports.
//!
//! This crate contains the whole computation of a tradebook run:
//! - Domain types (trade records, accounting results, ledger)
//! - CSV trade log normalizer with an explicit error taxonomy
//! - Sequential accounting engine (fixed fractional sizing, tiered commission)
//! - Monthly, type-distribution and per-symbol aggregators

pub mod aggregate;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;

pub use error::TradebookError;

use std::path::Path;

use data::{IngestOptions, TradeLogReader};
use domain::Ledger;
use engine::{AccountingEngine, EngineConfig};

/// A normalized log run through the accounting engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountedLog {
    /// Retained input columns, in input order.
    pub columns: Vec<String>,
    /// Position of the `date` column within `columns`.
    pub date_column: usize,
    pub ledger: Ledger,
}

/// Normalize a CSV trade log and run it through the engine.
pub fn account_file(
    path: &Path,
    ingest: &IngestOptions,
    engine: &EngineConfig,
) -> Result<AccountedLog, TradebookError> {
    let log = TradeLogReader::new(ingest.clone()).read_path(path)?;
    let ledger = AccountingEngine::new(engine).run(&log.records)?;
    Ok(AccountedLog {
        columns: log.columns,
        date_column: log.date_column,
        ledger,
    })
}
