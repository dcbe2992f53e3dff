//! Accounting engine — sequential trade accounting and supporting models.
//!
//! The engine consumes normalized trade records in input order and folds a
//! single balance accumulator across them:
//!
//! 1. Size the position on the pre-trade balance (fixed fraction)
//! 2. Compute gross P/L from the action × outcome table
//! 3. Charge the tiered commission
//! 4. Advance the balance by the net result
//!
//! A reverse pass then stamps the balance on the last trade of each date run.

pub mod accounting;
pub mod cost_model;
pub mod sizer;

pub use accounting::{
    gross_pl, mark_day_ends, AccountingEngine, AccountingError, EngineConfig, INITIAL_BALANCE,
};
pub use cost_model::CommissionSchedule;
pub use sizer::FractionalSizer;
