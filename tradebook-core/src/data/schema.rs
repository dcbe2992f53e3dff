//! Column layout of the trade log.

use super::ingest::IngestError;

pub const DATE: &str = "date";
pub const ACTION: &str = "action";
pub const OUTCOME: &str = "pl";
pub const BUY_POINT: &str = "buy_point";
pub const TAKE_PROFIT: &str = "take_profit";
pub const STOP_LOSS: &str = "stop_loss";
pub const SYMBOL: &str = "symbol";
pub const TYPE: &str = "type";

pub const POSITION_SIZE: &str = "real_quantity";
pub const GROSS_PL: &str = "profitLose";
pub const COMMISSION: &str = "commissions";
pub const NET_PL: &str = "neto";
pub const DAY_END_BALANCE: &str = "updated_balance";

/// Expected schema for trade log data
pub struct TradeLogSchema;

impl TradeLogSchema {
    /// Columns every trade log must carry.
    pub fn required() -> [&'static str; 8] {
        [
            DATE,
            ACTION,
            OUTCOME,
            BUY_POINT,
            TAKE_PROFIT,
            STOP_LOSS,
            SYMBOL,
            TYPE,
        ]
    }

    /// Columns the accounting results are written under. Input logs may not
    /// carry them.
    pub const fn result_columns() -> [&'static str; 5] {
        [POSITION_SIZE, GROSS_PL, COMMISSION, NET_PL, DAY_END_BALANCE]
    }

    /// True for headers left behind by spreadsheet/dataframe index exports
    /// (`""`, `Unnamed: 0`, `Unnamed: 22`, ...).
    pub fn is_index_artifact(header: &str) -> bool {
        let header = header.trim();
        header.is_empty() || header.starts_with("Unnamed")
    }

    /// Reject header sets that would produce an ambiguous output table.
    pub fn check_headers(headers: &[String]) -> Result<(), IngestError> {
        for (i, header) in headers.iter().enumerate() {
            if Self::result_columns().contains(&header.as_str()) {
                return Err(IngestError::ReservedColumn(header.clone()));
            }
            if headers[..i].contains(header) {
                return Err(IngestError::DuplicateColumn(header.clone()));
            }
        }
        Ok(())
    }

    /// Resolve required column positions within the retained headers.
    pub fn resolve(headers: &[String]) -> Result<ColumnIndex, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
        };

        Ok(ColumnIndex {
            date: find(DATE)?,
            action: find(ACTION)?,
            outcome: find(OUTCOME)?,
            buy_point: find(BUY_POINT)?,
            take_profit: find(TAKE_PROFIT)?,
            stop_loss: find(STOP_LOSS)?,
            symbol: find(SYMBOL)?,
            trade_type: find(TYPE)?,
        })
    }
}

/// Positions of the required columns within a retained row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub date: usize,
    pub action: usize,
    pub outcome: usize,
    pub buy_point: usize,
    pub take_profit: usize,
    pub stop_loss: usize,
    pub symbol: usize,
    pub trade_type: usize,
}
