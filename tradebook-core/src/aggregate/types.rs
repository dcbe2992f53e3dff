//! Trade type × outcome distribution.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::Ledger;

/// One pivot row: a trade type and its count per outcome label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDistributionRow {
    pub trade_type: String,
    /// Aligned with `TypeDistribution::outcomes`.
    pub counts: Vec<usize>,
}

impl TypeDistributionRow {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Pivot of trade counts: types as rows, outcome labels as columns.
///
/// Both axes are sorted; absent pairs are 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeDistribution {
    pub outcomes: Vec<String>,
    pub rows: Vec<TypeDistributionRow>,
}

impl TypeDistribution {
    /// Sum over every cell; equals the number of ledger entries.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.total()).sum()
    }

    pub fn count(&self, trade_type: &str, outcome: &str) -> usize {
        let Some(col) = self.outcomes.iter().position(|o| o == outcome) else {
            return 0;
        };
        self.rows
            .iter()
            .find(|r| r.trade_type == trade_type)
            .map(|r| r.counts[col])
            .unwrap_or(0)
    }
}

pub fn distribute_by_type(ledger: &Ledger) -> TypeDistribution {
    let mut outcomes = BTreeSet::new();
    let mut cells: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();

    for entry in &ledger.entries {
        let outcome = entry.trade.outcome.label();
        outcomes.insert(outcome);
        *cells
            .entry(entry.trade.trade_type.as_str())
            .or_default()
            .entry(outcome)
            .or_insert(0) += 1;
    }

    let rows = cells
        .into_iter()
        .map(|(trade_type, by_outcome)| TypeDistributionRow {
            trade_type: trade_type.to_string(),
            counts: outcomes
                .iter()
                .map(|o| by_outcome.get(o).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    TypeDistribution {
        outcomes: outcomes.into_iter().map(String::from).collect(),
        rows,
    }
}
