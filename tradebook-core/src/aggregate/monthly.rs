//! Monthly performance summary.
//!
//! Always twelve rows, January through December. Months are matched by
//! number only, so the same month of different years is merged.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::ratio;
use crate::domain::Ledger;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Calendar month, 1..=12.
    pub month: u32,
    pub profit_count: usize,
    pub loss_count: usize,
    /// `profit_count + loss_count`.
    pub positions: usize,
    /// Profits as a percentage of positions; 0 when there are none.
    pub hit_percentage: f64,
    pub commission_total: f64,
    pub net_total: f64,
    /// Last day-end balance observed in the month; 0 when there is none.
    pub gross_balance: f64,
    pub yield_percentage: f64,
}

#[derive(Default, Clone, Copy)]
struct MonthAcc {
    profits: usize,
    losses: usize,
    commission: f64,
    net: f64,
    gross: Option<f64>,
}

/// Build the twelve-month summary from a ledger.
pub fn summarize_months(ledger: &Ledger) -> Vec<MonthlySummary> {
    let mut months = [MonthAcc::default(); 12];

    for entry in &ledger.entries {
        let acc = &mut months[entry.trade.date.month0() as usize];
        if entry.trade.outcome.is_profit() {
            acc.profits += 1;
        } else if entry.trade.outcome.is_loss() {
            acc.losses += 1;
        }
        acc.commission += entry.result.commission;
        acc.net += entry.result.net_pl;
        if let Some(balance) = entry.result.day_end_balance {
            acc.gross = Some(balance);
        }
    }

    let mut prev_gross = ledger.initial_balance;
    months
        .iter()
        .enumerate()
        .map(|(i, acc)| {
            let positions = acc.profits + acc.losses;
            let (gross_balance, yield_percentage) = match acc.gross {
                Some(gross) => {
                    let pct = ratio(gross - prev_gross, prev_gross) * 100.0;
                    prev_gross = gross;
                    (gross, pct)
                }
                None => (0.0, 0.0),
            };
            MonthlySummary {
                month: i as u32 + 1,
                profit_count: acc.profits,
                loss_count: acc.losses,
                positions,
                hit_percentage: ratio(acc.profits as f64, positions as f64) * 100.0,
                commission_total: acc.commission,
                net_total: acc.net,
                gross_balance,
                yield_percentage,
            }
        })
        .collect()
}
