//! Run manifest export (JSON).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::runner::{AnalysisResult, SCHEMA_VERSION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub input: PathBuf,
    /// BLAKE3 hex digest of the input bytes.
    pub input_hash: String,
    pub rows: usize,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub total_net_pl: f64,
    pub total_commission: f64,
    /// Artifact file names, relative to the workbook directory.
    pub files: Vec<String>,
}

impl RunManifest {
    pub fn new(analysis: &AnalysisResult, files: Vec<String>) -> Self {
        let ledger = analysis.ledger();
        Self {
            schema_version: SCHEMA_VERSION,
            timestamp: chrono::Utc::now(),
            input: analysis.input.clone(),
            input_hash: analysis.input_hash.clone(),
            rows: ledger.len(),
            initial_balance: ledger.initial_balance,
            final_balance: ledger.final_balance,
            total_net_pl: ledger.total_net_pl(),
            total_commission: ledger.total_commission(),
            files,
        }
    }
}

pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    let json =
        serde_json::to_string_pretty(manifest).context("Failed to serialize run manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
    Ok(())
}

/// Load a manifest, rejecting schema versions newer than this build.
pub fn read_manifest(path: &Path) -> Result<RunManifest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest: RunManifest =
        serde_json::from_str(&json).context("Failed to deserialize run manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}
