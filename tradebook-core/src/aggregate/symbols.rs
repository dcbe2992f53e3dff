//! Per-symbol hit rate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ratio;
use crate::domain::{Ledger, Symbol};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolHitStats {
    pub symbol: Symbol,
    pub profits: usize,
    pub losses: usize,
    /// `profits + losses`; rows with any other outcome are not counted.
    pub total: usize,
    /// `profits / total` as a fraction; 0 when `total` is 0.
    pub hit_ratio: f64,
}

/// Hit statistics per symbol, in order of first appearance.
pub fn hit_by_symbol(ledger: &Ledger) -> Vec<SymbolHitStats> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for entry in &ledger.entries {
        let symbol = entry.trade.symbol.as_str();
        let slot = counts.entry(symbol).or_insert_with(|| {
            order.push(symbol);
            (0, 0)
        });
        if entry.trade.outcome.is_profit() {
            slot.0 += 1;
        } else if entry.trade.outcome.is_loss() {
            slot.1 += 1;
        }
    }

    order
        .into_iter()
        .map(|symbol| {
            let (profits, losses) = counts[symbol];
            let total = profits + losses;
            SymbolHitStats {
                symbol: symbol.to_string(),
                profits,
                losses,
                total,
                hit_ratio: ratio(profits as f64, total as f64),
            }
        })
        .collect()
}
