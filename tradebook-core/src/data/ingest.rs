//! Trade log ingestion: CSV → normalized `TradeRecord`s.
//!
//! Normalization drops index-artifact columns, resolves the required columns
//! by name, and parses every row. Any malformed row aborts the whole load;
//! rows are never skipped or defaulted.

use chrono::{NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::data::schema::{self, ColumnIndex, TradeLogSchema};
use crate::domain::{Action, Outcome, TradeRecord};

/// Date formats tried in order when no configuration overrides them.
pub const DEFAULT_DATE_FORMATS: [&str; 4] =
    ["%Y-%m-%d", "%d/%m/%Y", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d"];

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read trade log: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("column '{0}' is reserved for accounting output")]
    ReservedColumn(String),

    #[error("row {row}: missing value in column '{column}'")]
    MissingField { row: usize, column: String },

    #[error("row {row}: non-numeric value '{value}' in column '{column}'")]
    NonNumericValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: buy_point is zero, position size is undefined")]
    DivisionByZero { row: usize },

    #[error("row {row}: unparseable date '{value}'")]
    UnparseableDate { row: usize, value: String },
}

/// Options for the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    /// `chrono` format strings, tried in order.
    pub date_formats: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// A normalized trade log.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeLog {
    /// Retained column headers, in input order.
    pub columns: Vec<String>,
    /// Position of the `date` column within `columns`.
    pub date_column: usize,
    pub records: Vec<TradeRecord>,
}

impl TradeLog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Trade log reader for CSV files
pub struct TradeLogReader {
    options: IngestOptions,
}

impl TradeLogReader {
    pub fn new(options: IngestOptions) -> Self {
        Self { options }
    }

    /// Ingest a CSV file from disk.
    pub fn read_path(&self, path: &Path) -> Result<TradeLog, IngestError> {
        let file = std::fs::File::open(path)?;
        info!(path = %path.display(), "loading trade log");
        self.read(file)
    }

    /// Ingest CSV from any reader.
    pub fn read<R: Read>(&self, source: R) -> Result<TradeLog, IngestError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let raw_headers = rdr.headers()?.clone();
        let mut keep = Vec::with_capacity(raw_headers.len());
        let mut columns = Vec::with_capacity(raw_headers.len());
        for (i, header) in raw_headers.iter().enumerate() {
            if TradeLogSchema::is_index_artifact(header) {
                debug!(column = %header, "dropping index column");
                continue;
            }
            keep.push(i);
            columns.push(header.to_string());
        }

        TradeLogSchema::check_headers(&columns)?;
        let index = TradeLogSchema::resolve(&columns)?;

        let mut records = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let raw = result?;
            let fields: Vec<String> = keep
                .iter()
                .map(|&i| raw.get(i).unwrap_or("").to_string())
                .collect();
            records.push(self.parse_row(row, fields, &index)?);
        }

        info!(rows = records.len(), columns = columns.len(), "trade log normalized");
        Ok(TradeLog {
            columns,
            date_column: index.date,
            records,
        })
    }

    fn parse_row(
        &self,
        row: usize,
        fields: Vec<String>,
        index: &ColumnIndex,
    ) -> Result<TradeRecord, IngestError> {
        let date_raw = required(&fields, index.date, row, schema::DATE)?;
        let date = parse_date(date_raw, &self.options.date_formats).ok_or_else(|| {
            IngestError::UnparseableDate {
                row,
                value: date_raw.to_string(),
            }
        })?;

        let action = Action::parse(required(&fields, index.action, row, schema::ACTION)?);
        let outcome = Outcome::parse(required(&fields, index.outcome, row, schema::OUTCOME)?);

        let buy_point = numeric(&fields, index.buy_point, row, schema::BUY_POINT)?;
        if buy_point == 0.0 {
            return Err(IngestError::DivisionByZero { row });
        }
        let take_profit = numeric(&fields, index.take_profit, row, schema::TAKE_PROFIT)?;
        let stop_loss = numeric(&fields, index.stop_loss, row, schema::STOP_LOSS)?;

        let symbol = required(&fields, index.symbol, row, schema::SYMBOL)?.to_string();
        let trade_type = required(&fields, index.trade_type, row, schema::TYPE)?.to_string();

        Ok(TradeRecord {
            row,
            date,
            action,
            outcome,
            buy_point,
            take_profit,
            stop_loss,
            symbol,
            trade_type,
            fields,
        })
    }
}

impl Default for TradeLogReader {
    fn default() -> Self {
        Self::new(IngestOptions::default())
    }
}

/// Parse a date cell with the first matching format.
///
/// Formats carrying a time component are accepted; the time is discarded.
pub fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDate> {
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(raw, fmt)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, fmt).map(|dt| dt.date()))
            .ok()
    })
}

fn required<'a>(
    fields: &'a [String],
    col: usize,
    row: usize,
    name: &str,
) -> Result<&'a str, IngestError> {
    match fields.get(col).map(|s| s.as_str()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(IngestError::MissingField {
            row,
            column: name.to_string(),
        }),
    }
}

fn numeric(fields: &[String], col: usize, row: usize, name: &str) -> Result<f64, IngestError> {
    let raw = required(fields, col, row, name)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(IngestError::NonNumericValue {
            row,
            column: name.to_string(),
            value: raw.to_string(),
        }),
    }
}
