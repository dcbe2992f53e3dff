//! In-memory workbook: the four output sheets as typed cells.
//!
//! Writers (CSV, Parquet, Markdown) all render from this one model, so every
//! artifact of a run shows the same numbers.

use std::fmt;

use serde::Serialize;

use tradebook_core::aggregate::{MonthlySummary, SymbolHitStats, TypeDistribution};
use tradebook_core::data::TradeLogSchema;
use tradebook_core::AccountedLog;

use crate::runner::AnalysisResult;

pub const DATA_SHEET: &str = "Data";
pub const SUMMARY_SHEET: &str = "Summary";
pub const TYPE_DISTRIBUTION_SHEET: &str = "Type Distribution";
pub const HIT_BY_SYMBOL_SHEET: &str = "Hit By Symbol";

/// Columns appended to the retained input columns on the Data sheet.
pub const DATA_RESULT_COLUMNS: [&str; 5] = TradeLogSchema::result_columns();

pub const SUMMARY_COLUMNS: [&str; 9] = [
    "Month",
    "Profits",
    "Losses",
    "Monthly Positions",
    "Hit Percentage",
    "Commission",
    "Neto",
    "Gross",
    "Yield Percentage",
];

pub const HIT_BY_SYMBOL_COLUMNS: [&str; 5] = [
    "Symbol",
    "Profits",
    "Losses",
    "Total Positions",
    "Hit Percentage",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    /// Numeric view of the cell. Text cells are parsed, so input columns
    /// that hold numbers stay numeric in typed exports.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => s.parse().ok(),
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<usize> for Cell {
    fn from(v: usize) -> Self {
        Cell::Int(v as i64)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Cell::Empty, Cell::Float)
    }
}

/// Floats use Rust's shortest round-trip representation.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, headers: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cells of one column, top to bottom. Short rows yield `Cell::Empty`.
    pub fn column_cells(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(col).unwrap_or(&Cell::Empty))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ordered, named sheets making up one run's output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workbook {
    pub name: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Assemble the Data, Summary, Type Distribution and Hit By Symbol sheets.
    pub fn build(name: &str, analysis: &AnalysisResult) -> Self {
        let aggregates = &analysis.aggregates;
        Self {
            name: name.to_string(),
            sheets: vec![
                data_sheet(&analysis.accounted),
                summary_sheet(&aggregates.months),
                type_distribution_sheet(&aggregates.types),
                hit_by_symbol_sheet(&aggregates.symbols),
            ],
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Retained input columns followed by the accounting results.
pub fn data_sheet(accounted: &AccountedLog) -> Sheet {
    let headers = accounted
        .columns
        .iter()
        .cloned()
        .chain(DATA_RESULT_COLUMNS.iter().map(|c| c.to_string()))
        .collect();
    let mut sheet = Sheet::new(DATA_SHEET, headers);

    for entry in &accounted.ledger.entries {
        let mut row: Vec<Cell> = (0..accounted.columns.len())
            .map(|i| {
                if i == accounted.date_column {
                    Cell::Text(entry.trade.date.format("%Y-%m-%d").to_string())
                } else {
                    match entry.trade.fields.get(i) {
                        Some(v) if !v.is_empty() => Cell::Text(v.clone()),
                        _ => Cell::Empty,
                    }
                }
            })
            .collect();
        let r = &entry.result;
        row.extend([
            Cell::from(r.position_size),
            Cell::from(r.gross_pl),
            Cell::from(r.commission),
            Cell::from(r.net_pl),
            Cell::from(r.day_end_balance),
        ]);
        sheet.rows.push(row);
    }
    sheet
}

pub fn summary_sheet(months: &[MonthlySummary]) -> Sheet {
    let mut sheet = Sheet::new(
        SUMMARY_SHEET,
        SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
    );
    for m in months {
        sheet.rows.push(vec![
            Cell::Int(i64::from(m.month)),
            m.profit_count.into(),
            m.loss_count.into(),
            m.positions.into(),
            m.hit_percentage.into(),
            m.commission_total.into(),
            m.net_total.into(),
            m.gross_balance.into(),
            m.yield_percentage.into(),
        ]);
    }
    sheet
}

pub fn type_distribution_sheet(dist: &TypeDistribution) -> Sheet {
    let headers = std::iter::once("type".to_string())
        .chain(dist.outcomes.iter().cloned())
        .collect();
    let mut sheet = Sheet::new(TYPE_DISTRIBUTION_SHEET, headers);
    for row in &dist.rows {
        let mut cells = vec![Cell::from(row.trade_type.as_str())];
        cells.extend(row.counts.iter().map(|&c| Cell::from(c)));
        sheet.rows.push(cells);
    }
    sheet
}

/// Hit percentage is the raw `profits / total` ratio.
pub fn hit_by_symbol_sheet(stats: &[SymbolHitStats]) -> Sheet {
    let mut sheet = Sheet::new(
        HIT_BY_SYMBOL_SHEET,
        HIT_BY_SYMBOL_COLUMNS.iter().map(|c| c.to_string()).collect(),
    );
    for s in stats {
        sheet.rows.push(vec![
            Cell::from(s.symbol.as_str()),
            s.profits.into(),
            s.losses.into(),
            s.total.into(),
            s.hit_ratio.into(),
        ]);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tradebook_core::aggregate::{distribute_by_type, hit_by_symbol, summarize_months};
    use tradebook_core::domain::{Action, Outcome, TradeRecord};
    use tradebook_core::engine::AccountingEngine;

    fn trade(row: usize, date: (i32, u32, u32), symbol: &str, outcome: Outcome) -> TradeRecord {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        TradeRecord {
            row,
            date,
            action: Action::Buy,
            outcome,
            buy_point: 100.0,
            take_profit: 110.0,
            stop_loss: 95.0,
            symbol: symbol.into(),
            trade_type: "breakout".into(),
            fields: vec![
                "02/01/2024".into(),
                symbol.into(),
                "".into(),
            ],
        }
    }

    fn accounted() -> AccountedLog {
        let trades = vec![
            trade(0, (2024, 1, 2), "AAPL", Outcome::Profit),
            trade(1, (2024, 1, 2), "MSFT", Outcome::Loss),
        ];
        AccountedLog {
            columns: vec!["date".into(), "symbol".into(), "notes".into()],
            date_column: 0,
            ledger: AccountingEngine::default().run(&trades).unwrap(),
        }
    }

    #[test]
    fn data_sheet_appends_result_columns() {
        let sheet = data_sheet(&accounted());
        assert_eq!(
            sheet.headers,
            vec![
                "date",
                "symbol",
                "notes",
                "real_quantity",
                "profitLose",
                "commissions",
                "neto",
                "updated_balance"
            ]
        );
        assert_eq!(sheet.len(), 2);

        let first = &sheet.rows[0];
        assert_eq!(first[0], Cell::Text("2024-01-02".into()));
        assert_eq!(first[1], Cell::Text("AAPL".into()));
        assert_eq!(first[2], Cell::Empty);
        assert_eq!(first[3], Cell::Float(100.0));
        assert_eq!(first[4], Cell::Float(1000.0));
        assert_eq!(first[6], Cell::Float(996.0));
        // Not the last trade of its day.
        assert_eq!(first[7], Cell::Empty);
        assert!(matches!(sheet.rows[1][7], Cell::Float(_)));
    }

    #[test]
    fn summary_sheet_has_twelve_rows() {
        let ledger = accounted().ledger;
        let sheet = summary_sheet(&summarize_months(&ledger));
        assert_eq!(sheet.headers.len(), 9);
        assert_eq!(sheet.len(), 12);
        assert_eq!(sheet.rows[0][0], Cell::Int(1));
        assert_eq!(sheet.rows[0][1], Cell::Int(1));
        assert_eq!(sheet.rows[0][2], Cell::Int(1));
        assert_eq!(sheet.rows[0][4], Cell::Float(50.0));
        assert_eq!(sheet.rows[11][0], Cell::Int(12));
        assert_eq!(sheet.rows[11][3], Cell::Int(0));
    }

    #[test]
    fn pivot_and_symbol_sheets() {
        let ledger = accounted().ledger;
        let types = type_distribution_sheet(&distribute_by_type(&ledger));
        assert_eq!(types.headers, vec!["type", "L", "P"]);
        assert_eq!(
            types.rows[0],
            vec![Cell::Text("breakout".into()), Cell::Int(1), Cell::Int(1)]
        );

        let hits = hit_by_symbol_sheet(&hit_by_symbol(&ledger));
        assert_eq!(hits.headers[4], "Hit Percentage");
        assert_eq!(hits.rows[0][0], Cell::Text("AAPL".into()));
        assert_eq!(hits.rows[0][4], Cell::Float(1.0));
        assert_eq!(hits.rows[1][4], Cell::Float(0.0));
    }

    #[test]
    fn symbol_hit_cell_is_a_ratio() {
        let stats = vec![SymbolHitStats {
            symbol: "AAPL".into(),
            profits: 3,
            losses: 1,
            total: 4,
            hit_ratio: 0.75,
        }];
        let sheet = hit_by_symbol_sheet(&stats);
        assert_eq!(sheet.rows[0][4], Cell::Float(0.75));
        assert_eq!(sheet.rows[0][4].to_string(), "0.75");
    }

    #[test]
    fn float_cells_round_trip_exactly() {
        let v = 100_487.019_999_999_99_f64;
        let rendered = Cell::Float(v).to_string();
        assert_eq!(rendered.parse::<f64>().unwrap(), v);
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::Int(7).to_string(), "7");
    }

    #[test]
    fn text_cells_parse_as_numbers_when_possible() {
        assert_eq!(Cell::from("101.5").as_f64(), Some(101.5));
        assert_eq!(Cell::from("AAPL").as_f64(), None);
        assert_eq!(Cell::Empty.as_f64(), None);
        assert!(Cell::Text(String::new()).is_empty());
    }
}
