//! Sequential trade accounting.
//!
//! Each trade is sized on the balance left by the previous trade, so the
//! ledger is a left fold over the input in input order:
//! `step(balance, trade) -> (result, balance')`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::cost_model::CommissionSchedule;
use super::sizer::FractionalSizer;
use crate::domain::{AccountingResult, Action, Ledger, LedgerEntry, Outcome, TradeRecord};

/// Starting equity when no configuration overrides it.
pub const INITIAL_BALANCE: f64 = 100_000.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AccountingError {
    #[error("row {row}: buy_point is zero, position size is undefined")]
    DivisionByZero { row: usize },

    #[error("row {row}: {field} is not finite")]
    NonFiniteResult { row: usize, field: &'static str },
}

/// Engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub initial_balance: f64,
    pub risk_fraction: f64,
    pub commission: CommissionSchedule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_balance: INITIAL_BALANCE,
            risk_fraction: FractionalSizer::default().fraction,
            commission: CommissionSchedule::default(),
        }
    }
}

/// Trade accounting engine.
#[derive(Debug, Clone)]
pub struct AccountingEngine {
    initial_balance: f64,
    sizer: FractionalSizer,
    commission: CommissionSchedule,
}

impl AccountingEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            initial_balance: config.initial_balance,
            sizer: FractionalSizer::new(config.risk_fraction),
            commission: config.commission,
        }
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    /// Account for one trade against the balance it was entered with.
    ///
    /// Returns the result (without a day-end marker) and the balance after
    /// the trade's net P/L is applied.
    pub fn step(
        &self,
        balance: f64,
        trade: &TradeRecord,
    ) -> Result<(AccountingResult, f64), AccountingError> {
        if trade.buy_point == 0.0 {
            return Err(AccountingError::DivisionByZero { row: trade.row });
        }

        let position_size = self.sizer.size(balance, trade.buy_point);
        let gross_pl = gross_pl(trade, position_size);
        let commission = self.commission.commission(position_size);
        let net_pl = gross_pl - commission;
        let running_balance = balance + net_pl;

        for (field, value) in [
            ("position_size", position_size),
            ("gross_pl", gross_pl),
            ("commission", commission),
            ("running_balance", running_balance),
        ] {
            if !value.is_finite() {
                return Err(AccountingError::NonFiniteResult {
                    row: trade.row,
                    field,
                });
            }
        }

        let result = AccountingResult {
            position_size,
            gross_pl,
            commission,
            net_pl,
            running_balance,
            day_end_balance: None,
        };
        Ok((result, running_balance))
    }

    /// Run the whole log in input order and mark day-end balances.
    pub fn run(&self, trades: &[TradeRecord]) -> Result<Ledger, AccountingError> {
        let mut balance = self.initial_balance;
        let mut entries = Vec::with_capacity(trades.len());

        for trade in trades {
            let (result, next) = self.step(balance, trade)?;
            debug!(
                row = trade.row,
                symbol = %trade.symbol,
                size = result.position_size,
                net = result.net_pl,
                balance = next,
                "trade accounted"
            );
            entries.push(LedgerEntry {
                trade: trade.clone(),
                result,
            });
            balance = next;
        }

        mark_day_ends(&mut entries);

        info!(
            trades = entries.len(),
            initial_balance = self.initial_balance,
            final_balance = balance,
            "accounting complete"
        );

        Ok(Ledger {
            initial_balance: self.initial_balance,
            final_balance: balance,
            entries,
        })
    }
}

impl Default for AccountingEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// Signed P/L of a trade before costs.
///
/// Combinations outside the four known ones yield 0.
pub fn gross_pl(trade: &TradeRecord, position_size: f64) -> f64 {
    match (&trade.action, &trade.outcome) {
        (Action::Buy, Outcome::Profit) => (trade.take_profit - trade.buy_point) * position_size,
        (Action::Buy, Outcome::Loss) => (trade.stop_loss - trade.buy_point) * position_size,
        (Action::Sell, Outcome::Profit) => (trade.buy_point - trade.take_profit) * position_size,
        (Action::Sell, Outcome::Loss) => (trade.buy_point - trade.stop_loss) * position_size,
        _ => 0.0,
    }
}

/// Stamp the running balance on the last entry of every contiguous date run.
///
/// Walks backwards so each entry only has to compare against the date of the
/// entry after it.
pub fn mark_day_ends(entries: &mut [LedgerEntry]) {
    let mut next_date = None;
    for entry in entries.iter_mut().rev() {
        entry.result.day_end_balance = if next_date == Some(entry.trade.date) {
            None
        } else {
            Some(entry.result.running_balance)
        };
        next_date = Some(entry.trade.date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trade(row: usize, day: u32, action: Action, outcome: Outcome) -> TradeRecord {
        TradeRecord {
            row,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            action,
            outcome,
            buy_point: 100.0,
            take_profit: 110.0,
            stop_loss: 95.0,
            symbol: "AAPL".into(),
            trade_type: "breakout".into(),
            fields: vec![],
        }
    }

    #[test]
    fn test_buy_profit_example() {
        let engine = AccountingEngine::default();
        let (res, balance) = engine
            .step(100_000.0, &trade(0, 2, Action::Buy, Outcome::Profit))
            .unwrap();
        assert_eq!(res.position_size, 100.0);
        assert_eq!(res.gross_pl, 1000.0);
        assert_eq!(res.commission, 4.0);
        assert_eq!(res.net_pl, 996.0);
        assert_eq!(balance, 100_996.0);
    }

    #[test]
    fn test_four_case_table() {
        let size = 100.0;
        let bp = trade(0, 2, Action::Buy, Outcome::Profit);
        let bl = trade(0, 2, Action::Buy, Outcome::Loss);
        let sp = trade(0, 2, Action::Sell, Outcome::Profit);
        let sl = trade(0, 2, Action::Sell, Outcome::Loss);
        assert_eq!(gross_pl(&bp, size), 1000.0);
        assert_eq!(gross_pl(&bl, size), -500.0);
        assert_eq!(gross_pl(&sp, size), -1000.0);
        assert_eq!(gross_pl(&sl, size), 500.0);
    }

    #[test]
    fn test_unmatched_combination_is_zero() {
        let engine = AccountingEngine::default();
        let t = trade(0, 2, Action::Other("HOLD".into()), Outcome::Profit);
        let (res, balance) = engine.step(100_000.0, &t).unwrap();
        assert_eq!(res.gross_pl, 0.0);
        assert_eq!(res.net_pl, -4.0);
        assert_eq!(balance, 99_996.0);

        let t = trade(0, 2, Action::Buy, Outcome::Other("BE".into()));
        assert_eq!(gross_pl(&t, 100.0), 0.0);
    }

    #[test]
    fn test_sizing_uses_pre_trade_balance() {
        let engine = AccountingEngine::default();
        let trades = vec![
            trade(0, 2, Action::Buy, Outcome::Profit),
            trade(1, 2, Action::Buy, Outcome::Profit),
        ];
        let ledger = engine.run(&trades).unwrap();
        assert_eq!(ledger.entries[0].result.position_size, 100.0);
        // second trade sized on 100_996
        assert!((ledger.entries[1].result.position_size - 100.996).abs() < 1e-9);
    }

    #[test]
    fn test_day_end_marking() {
        let engine = AccountingEngine::default();
        let trades = vec![
            trade(0, 2, Action::Buy, Outcome::Profit),
            trade(1, 2, Action::Buy, Outcome::Loss),
            trade(2, 3, Action::Sell, Outcome::Loss),
        ];
        let ledger = engine.run(&trades).unwrap();
        let marks: Vec<Option<f64>> = ledger
            .entries
            .iter()
            .map(|e| e.result.day_end_balance)
            .collect();
        assert_eq!(marks[0], None);
        assert_eq!(marks[1], Some(ledger.entries[1].result.running_balance));
        assert_eq!(marks[2], Some(ledger.final_balance));
    }

    #[test]
    fn test_day_end_marks_each_contiguous_run() {
        // D1, D2, D1: the date comes back, so both D1 runs get a marker.
        let engine = AccountingEngine::default();
        let trades = vec![
            trade(0, 2, Action::Buy, Outcome::Profit),
            trade(1, 3, Action::Buy, Outcome::Profit),
            trade(2, 2, Action::Buy, Outcome::Profit),
        ];
        let ledger = engine.run(&trades).unwrap();
        assert!(ledger
            .entries
            .iter()
            .all(|e| e.result.day_end_balance.is_some()));
    }

    #[test]
    fn test_zero_buy_point_is_an_error() {
        let engine = AccountingEngine::default();
        let mut t = trade(7, 2, Action::Buy, Outcome::Profit);
        t.buy_point = 0.0;
        assert_eq!(
            engine.run(&[t]).unwrap_err(),
            AccountingError::DivisionByZero { row: 7 }
        );
    }

    #[test]
    fn test_non_finite_is_an_error() {
        let engine = AccountingEngine::default();
        let mut t = trade(3, 2, Action::Buy, Outcome::Profit);
        t.take_profit = f64::MAX;
        t.buy_point = 1e-300;
        assert!(matches!(
            engine.run(&[t]),
            Err(AccountingError::NonFiniteResult { row: 3, .. })
        ));
    }

    #[test]
    fn test_empty_log() {
        let ledger = AccountingEngine::default().run(&[]).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.final_balance, INITIAL_BALANCE);
    }

    #[test]
    fn test_custom_config() {
        let config = EngineConfig {
            initial_balance: 50_000.0,
            risk_fraction: 0.2,
            commission: CommissionSchedule::zero(),
        };
        let engine = AccountingEngine::new(&config);
        let ledger = engine
            .run(&[trade(0, 2, Action::Buy, Outcome::Profit)])
            .unwrap();
        assert_eq!(ledger.entries[0].result.position_size, 100.0);
        assert_eq!(ledger.final_balance, 51_000.0);
    }
}
