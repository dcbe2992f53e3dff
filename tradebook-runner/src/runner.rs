//! Pipeline runner — wires together normalization, accounting, and aggregation.
//!
//! Two entry points:
//! - `run_analysis()`: computes every table in memory. Writes nothing.
//! - `run_pipeline()`: `run_analysis()` followed by the workbook export. Used by the CLI.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use tradebook_core::aggregate::{
    distribute_by_type, hit_by_symbol, summarize_months, MonthlySummary, SymbolHitStats,
    TypeDistribution,
};
use tradebook_core::data::TradeLogReader;
use tradebook_core::domain::Ledger;
use tradebook_core::engine::AccountingEngine;
use tradebook_core::{AccountedLog, TradebookError};

use crate::config::{ConfigError, PipelineConfig};
use crate::export::{save_workbook, ArtifactPaths};
use crate::workbook::Workbook;

/// Errors raised before any output is produced.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read trade log {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Trades(#[from] TradebookError),
}

/// Current schema version for persisted manifests.
pub const SCHEMA_VERSION: u32 = 1;

/// The three aggregate tables derived from a ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub months: Vec<MonthlySummary>,
    pub types: TypeDistribution,
    pub symbols: Vec<SymbolHitStats>,
}

/// Everything computed for one input file.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub input: PathBuf,
    /// BLAKE3 hex digest of the raw input bytes.
    pub input_hash: String,
    pub accounted: AccountedLog,
    pub aggregates: Aggregates,
}

impl AnalysisResult {
    pub fn ledger(&self) -> &Ledger {
        &self.accounted.ledger
    }
}

/// A finished run: the computed tables and where they were written.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub analysis: AnalysisResult,
    pub workbook: Workbook,
    pub artifacts: ArtifactPaths,
}

/// Run the three aggregators over a finished ledger.
///
/// The aggregators share nothing but the read-only ledger, so they run in
/// parallel on the rayon pool.
pub fn aggregate(ledger: &Ledger) -> Aggregates {
    let (months, (types, symbols)) = rayon::join(
        || summarize_months(ledger),
        || rayon::join(|| distribute_by_type(ledger), || hit_by_symbol(ledger)),
    );
    Aggregates {
        months,
        types,
        symbols,
    }
}

/// Normalize, account and aggregate one trade log. Writes nothing.
pub fn run_analysis(config: &PipelineConfig) -> Result<AnalysisResult, RunError> {
    config.validate()?;
    analyze_file(&config.input, config)
}

fn analyze_file(path: &Path, config: &PipelineConfig) -> Result<AnalysisResult, RunError> {
    let bytes = std::fs::read(path).map_err(|source| RunError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let input_hash = blake3::hash(&bytes).to_hex().to_string();
    info!(path = %path.display(), bytes = bytes.len(), "loading trade log");

    let log = TradeLogReader::new(config.ingest_options())
        .read(bytes.as_slice())
        .map_err(TradebookError::from)?;
    let ledger = AccountingEngine::new(&config.accounting)
        .run(&log.records)
        .map_err(TradebookError::from)?;
    info!(
        rows = ledger.len(),
        final_balance = ledger.final_balance,
        "Data analysis completed"
    );

    let aggregates = aggregate(&ledger);
    info!("Summary, type distribution and hit-by-symbol tables computed");

    Ok(AnalysisResult {
        input: path.to_path_buf(),
        input_hash,
        accounted: AccountedLog {
            columns: log.columns,
            date_column: log.date_column,
            ledger,
        },
        aggregates,
    })
}

/// Run the full pipeline and write the workbook directory.
///
/// Every table is computed before the first file is written, so a bad row
/// leaves no output behind.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineRun> {
    let analysis = run_analysis(config)?;
    let workbook = Workbook::build(&config.workbook_name, &analysis);
    let artifacts = save_workbook(&workbook, &analysis, config)?;
    Ok(PipelineRun {
        analysis,
        workbook,
        artifacts,
    })
}
