//! Reporting artifacts: Parquet sheets, run manifest, Markdown report, text charts.

pub mod charts;
pub mod manifest;
pub mod markdown;
pub mod parquet;

pub use charts::render_charts;
pub use manifest::{read_manifest, write_manifest, RunManifest};
pub use markdown::generate_report;
pub use parquet::{sheet_to_dataframe, write_sheet_parquet};
