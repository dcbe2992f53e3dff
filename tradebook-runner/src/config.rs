//! Pipeline configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) runs the
//! pipeline on `data.csv` in the working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use tradebook_core::data::{IngestOptions, DEFAULT_DATE_FORMATS};
use tradebook_core::engine::EngineConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Name of the workbook directory created under `output_dir`.
    pub workbook_name: String,
    pub accounting: EngineConfig,
    pub ingest: IngestConfig,
    pub export: ExportConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.csv"),
            output_dir: PathBuf::from("."),
            workbook_name: "data_analyzed".to_string(),
            accounting: EngineConfig::default(),
            ingest: IngestConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// `chrono` format strings, tried in order.
    pub date_formats: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Optional artifacts. Sheet CSVs and the manifest are always written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub parquet: bool,
    pub report: bool,
    pub charts: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            parquet: true,
            report: true,
            charts: true,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let acc = &self.accounting;
        if !(acc.initial_balance.is_finite() && acc.initial_balance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "accounting.initial_balance must be positive, got {}",
                acc.initial_balance
            )));
        }
        if !(acc.risk_fraction > 0.0 && acc.risk_fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "accounting.risk_fraction must be in (0, 1], got {}",
                acc.risk_fraction
            )));
        }
        let fees = [
            ("base_fee", acc.commission.base_fee),
            ("threshold", acc.commission.threshold),
            ("per_share", acc.commission.per_share),
            ("sides", acc.commission.sides),
        ];
        for (name, value) in fees {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "accounting.commission.{name} must be non-negative, got {value}"
                )));
            }
        }
        if self.ingest.date_formats.is_empty() {
            return Err(ConfigError::Invalid(
                "ingest.date_formats must list at least one format".into(),
            ));
        }
        if self.workbook_name.trim().is_empty() {
            return Err(ConfigError::Invalid("workbook_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            date_formats: self.ingest.date_formats.clone(),
        }
    }

    /// Directory all artifacts of this run are written to.
    pub fn workbook_dir(&self) -> PathBuf {
        self.output_dir.join(&self.workbook_name)
    }
}
