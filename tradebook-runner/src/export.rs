//! Workbook export — sheet CSVs, Parquet, manifest, report and charts.
//!
//! All files of a run land in `<output_dir>/<workbook_name>/`. They are first
//! written to a hidden staging directory next to it, which replaces the
//! workbook directory only once every file is written. A failed export leaves
//! the previous workbook (if any) untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::{ExportConfig, PipelineConfig};
use crate::reporting::{
    generate_report, render_charts, write_manifest, write_sheet_parquet, RunManifest,
};
use crate::runner::AnalysisResult;
use crate::workbook::{Sheet, Workbook};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const REPORT_FILE: &str = "report.md";
pub const CHARTS_FILE: &str = "charts.txt";

/// Artifact paths returned after export.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    /// One per sheet, in workbook order.
    pub sheets_csv: Vec<PathBuf>,
    /// Empty when Parquet export is disabled.
    pub sheets_parquet: Vec<PathBuf>,
    pub manifest: PathBuf,
    pub report_markdown: Option<PathBuf>,
    pub charts: Option<PathBuf>,
}

/// Serialize a sheet as CSV: header row, then one record per row.
pub fn export_sheet_csv(sheet: &Sheet) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        let mut record: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        record.resize(sheet.headers.len(), String::new());
        wtr.write_record(&record)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write every artifact of a run and return their paths.
pub fn save_workbook(
    workbook: &Workbook,
    analysis: &AnalysisResult,
    config: &PipelineConfig,
) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output dir: {}",
            config.output_dir.display()
        )
    })?;

    let staging = config
        .output_dir
        .join(format!(".{}.partial", config.workbook_name));
    if staging.exists() {
        std::fs::remove_dir_all(&staging)
            .with_context(|| format!("failed to clear {}", staging.display()))?;
    }
    std::fs::create_dir_all(&staging)
        .with_context(|| format!("failed to create staging dir: {}", staging.display()))?;

    let written = match write_artifacts(&staging, workbook, analysis, &config.export) {
        Ok(written) => written,
        Err(e) => {
            let _ = std::fs::remove_dir_all(&staging);
            return Err(e);
        }
    };

    let dir = config.workbook_dir();
    if dir.exists() {
        std::fs::remove_dir_all(&dir)
            .with_context(|| format!("failed to replace {}", dir.display()))?;
    }
    std::fs::rename(&staging, &dir)
        .with_context(|| format!("failed to move workbook into {}", dir.display()))?;
    info!(dir = %dir.display(), files = written.len(), "Workbook written");

    Ok(ArtifactPaths {
        sheets_csv: workbook
            .sheets
            .iter()
            .map(|s| dir.join(csv_file_name(s)))
            .collect(),
        sheets_parquet: if config.export.parquet {
            workbook
                .sheets
                .iter()
                .map(|s| dir.join(parquet_file_name(s)))
                .collect()
        } else {
            Vec::new()
        },
        manifest: dir.join(MANIFEST_FILE),
        report_markdown: config.export.report.then(|| dir.join(REPORT_FILE)),
        charts: config.export.charts.then(|| dir.join(CHARTS_FILE)),
        dir,
    })
}

fn csv_file_name(sheet: &Sheet) -> String {
    format!("{}.csv", sheet.name)
}

fn parquet_file_name(sheet: &Sheet) -> String {
    format!("{}.parquet", sheet.name)
}

/// Write all files into `dir`; returns the file names written, manifest last.
fn write_artifacts(
    dir: &Path,
    workbook: &Workbook,
    analysis: &AnalysisResult,
    export: &ExportConfig,
) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for sheet in &workbook.sheets {
        let name = csv_file_name(sheet);
        let csv = export_sheet_csv(sheet)
            .with_context(|| format!("failed to serialize sheet '{}'", sheet.name))?;
        write_file(&dir.join(&name), &csv)?;
        debug!(sheet = %sheet.name, rows = sheet.len(), "sheet written");
        files.push(name);
    }
    info!("Summary added");

    if export.parquet {
        for sheet in &workbook.sheets {
            let name = parquet_file_name(sheet);
            write_sheet_parquet(&dir.join(&name), sheet)?;
            files.push(name);
        }
    }

    let aggregates = &analysis.aggregates;
    let charts = export
        .charts
        .then(|| render_charts(&aggregates.months, &aggregates.types));
    if let Some(charts) = &charts {
        write_file(&dir.join(CHARTS_FILE), charts)?;
        files.push(CHARTS_FILE.to_string());
        info!("Charts added");
    }

    if export.report {
        let md = generate_report(analysis, charts.as_deref());
        write_file(&dir.join(REPORT_FILE), &md)?;
        files.push(REPORT_FILE.to_string());
    }

    let manifest = RunManifest::new(analysis, files.clone());
    write_manifest(&dir.join(MANIFEST_FILE), &manifest)?;
    files.push(MANIFEST_FILE.to_string());

    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
