//! Tradebook Runner — pipeline orchestration and workbook export.
//!
//! This crate builds on `tradebook-core` to provide:
//! - TOML pipeline configuration with validation
//! - The run pipeline (normalize → account → aggregate in parallel)
//! - Workbook assembly (Data, Summary, Type Distribution, Hit By Symbol sheets)
//! - Artifact export: per-sheet CSV and Parquet, manifest, Markdown report, text charts

pub mod config;
pub mod export;
pub mod reporting;
pub mod runner;
pub mod workbook;

pub use config::{ConfigError, ExportConfig, IngestConfig, PipelineConfig};
pub use export::{export_sheet_csv, save_workbook, ArtifactPaths};
pub use reporting::RunManifest;
pub use runner::{
    aggregate, run_analysis, run_pipeline, Aggregates, AnalysisResult, PipelineRun, RunError,
    SCHEMA_VERSION,
};
pub use workbook::{Cell, Sheet, Workbook};
