//! Aggregate reports over a finished ledger.
//!
//! Every aggregator is a stateless reduction over `Ledger::entries`; none of
//! them depends on another, so they can run in any order once the engine is
//! done.

pub mod monthly;
pub mod symbols;
pub mod types;

pub use monthly::{summarize_months, MonthlySummary};
pub use symbols::{hit_by_symbol, SymbolHitStats};
pub use types::{distribute_by_type, TypeDistribution, TypeDistributionRow};

/// `num / den`, or 0 when the denominator is 0.
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}
