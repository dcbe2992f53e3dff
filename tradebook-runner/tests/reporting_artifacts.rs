use std::path::{Path, PathBuf};

use tradebook_runner::reporting::read_manifest;
use tradebook_runner::{run_pipeline, ExportConfig, PipelineConfig, SCHEMA_VERSION};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../tradebook-core/tests/fixtures/trades.csv")
}

fn config(output_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        input: fixture(),
        output_dir: output_dir.to_path_buf(),
        ..PipelineConfig::default()
    }
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let headers = rdr.headers().unwrap().iter().map(String::from).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

#[test]
fn test_full_run_writes_every_artifact() {
    let temp_dir = tempfile::tempdir().unwrap();
    let run = run_pipeline(&config(temp_dir.path())).unwrap();
    let paths = &run.artifacts;

    assert_eq!(paths.dir, temp_dir.path().join("data_analyzed"));
    assert_eq!(paths.sheets_csv.len(), 4);
    assert_eq!(paths.sheets_parquet.len(), 4);
    for path in paths.sheets_csv.iter().chain(&paths.sheets_parquet) {
        assert!(path.exists(), "missing {}", path.display());
    }
    assert!(paths.manifest.exists());
    assert!(paths.report_markdown.as_ref().unwrap().exists());
    assert!(paths.charts.as_ref().unwrap().exists());
    assert!(paths.dir.join("Type Distribution.csv").exists());
    assert!(paths.dir.join("Hit By Symbol.parquet").exists());

    // No staging directory is left behind.
    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("data_analyzed")]);
}

#[test]
fn test_data_sheet_contents() {
    let temp_dir = tempfile::tempdir().unwrap();
    let run = run_pipeline(&config(temp_dir.path())).unwrap();

    let (headers, rows) = read_csv(&run.artifacts.dir.join("Data.csv"));
    assert_eq!(
        headers,
        vec![
            "date",
            "symbol",
            "type",
            "action",
            "pl",
            "buy_point",
            "take_profit",
            "stop_loss",
            "setup_notes",
            "real_quantity",
            "profitLose",
            "commissions",
            "neto",
            "updated_balance"
        ]
    );
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0][0], "2024-01-02");
    assert_eq!(rows[0][9], "100");
    assert_eq!(rows[0][10], "1000");
    assert_eq!(rows[0][11], "4");
    assert_eq!(rows[0][12], "996");
    // Row 0 shares its date with row 1, so only row 1 carries the balance.
    assert_eq!(rows[0][13], "");
    assert!(!rows[1][13].is_empty());

    // Float cells round-trip exactly.
    let last_balance: f64 = rows[7][13].parse().unwrap();
    assert_eq!(last_balance, run.analysis.ledger().final_balance);
}

#[test]
fn test_aggregate_sheets() {
    let temp_dir = tempfile::tempdir().unwrap();
    let run = run_pipeline(&config(temp_dir.path())).unwrap();
    let dir = &run.artifacts.dir;

    let (headers, rows) = read_csv(&dir.join("Summary.csv"));
    assert_eq!(
        headers,
        vec![
            "Month",
            "Profits",
            "Losses",
            "Monthly Positions",
            "Hit Percentage",
            "Commission",
            "Neto",
            "Gross",
            "Yield Percentage"
        ]
    );
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0][..5], ["1", "2", "2", "4", "50"]);
    assert_eq!(rows[1][4], "100");
    assert_eq!(rows[2][7], "0");

    let (headers, rows) = read_csv(&dir.join("Type Distribution.csv"));
    assert_eq!(headers, vec!["type", "L", "P"]);
    assert_eq!(rows[0], vec!["breakout", "1", "3"]);

    let (headers, rows) = read_csv(&dir.join("Hit By Symbol.csv"));
    assert_eq!(headers[0], "Symbol");
    let symbols: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "MSFT", "TSLA"]);
    assert_eq!(rows[0][4], "0.75");
    assert_eq!(rows[1][4], "0.5");
}

#[test]
fn test_manifest_describes_run() {
    let temp_dir = tempfile::tempdir().unwrap();
    let run = run_pipeline(&config(temp_dir.path())).unwrap();

    let manifest = read_manifest(&run.artifacts.manifest).unwrap();
    assert_eq!(manifest.schema_version, SCHEMA_VERSION);
    assert_eq!(manifest.rows, 8);
    assert_eq!(manifest.initial_balance, 100_000.0);
    assert!((manifest.final_balance - 101_792.628_225_503_53).abs() < 1e-6);
    let bytes = std::fs::read(fixture()).unwrap();
    assert_eq!(manifest.input_hash, blake3::hash(&bytes).to_hex().to_string());
    assert!(manifest.files.contains(&"Data.csv".to_string()));
    assert!(manifest.files.contains(&"report.md".to_string()));
    assert!(!manifest.files.contains(&"manifest.json".to_string()));
}

#[test]
fn test_optional_artifacts_can_be_disabled() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        export: ExportConfig {
            parquet: false,
            report: false,
            charts: false,
        },
        ..config(temp_dir.path())
    };
    let run = run_pipeline(&config).unwrap();
    let paths = &run.artifacts;

    assert!(paths.sheets_parquet.is_empty());
    assert!(paths.report_markdown.is_none());
    assert!(paths.charts.is_none());
    assert!(!paths.dir.join("Data.parquet").exists());
    assert!(!paths.dir.join("report.md").exists());
    assert!(!paths.dir.join("charts.txt").exists());

    let manifest = read_manifest(&paths.manifest).unwrap();
    assert_eq!(
        manifest.files,
        vec![
            "Data.csv",
            "Summary.csv",
            "Type Distribution.csv",
            "Hit By Symbol.csv"
        ]
    );
}

#[test]
fn test_report_embeds_charts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let run = run_pipeline(&config(temp_dir.path())).unwrap();

    let md = std::fs::read_to_string(run.artifacts.report_markdown.unwrap()).unwrap();
    let charts = std::fs::read_to_string(run.artifacts.charts.unwrap()).unwrap();
    assert!(charts.contains("Monthly Gross Balance"));
    assert!(charts.contains("Type Distribution"));
    assert!(md.contains(&charts));
}
