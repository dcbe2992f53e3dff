//! Crate-level error type.

use crate::data::IngestError;
use crate::engine::AccountingError;

/// Any failure that aborts a tradebook run.
#[derive(Debug, thiserror::Error)]
pub enum TradebookError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Accounting(#[from] AccountingError),
}

impl TradebookError {
    /// Data row the failure points at, when it is row-specific.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::Ingest(IngestError::MissingField { row, .. })
            | Self::Ingest(IngestError::NonNumericValue { row, .. })
            | Self::Ingest(IngestError::DivisionByZero { row })
            | Self::Ingest(IngestError::UnparseableDate { row, .. })
            | Self::Accounting(AccountingError::DivisionByZero { row })
            | Self::Accounting(AccountingError::NonFiniteResult { row, .. }) => Some(*row),
            _ => None,
        }
    }
}
