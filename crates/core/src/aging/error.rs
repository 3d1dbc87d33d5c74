//! Aging error types.

use chrono::NaiveDate;
use jusfinn_shared::AppError;
use jusfinn_shared::types::{Currency, OpenItemId};
use thiserror::Error;

/// Aging-related errors.
#[derive(Debug, Error)]
pub enum AgingError {
    /// Document is dated after the aging date.
    #[error("Open item {id} is dated {document_date}, after the aging date {as_of}")]
    FutureDocument {
        /// The offending item.
        id: OpenItemId,
        /// Document date.
        document_date: NaiveDate,
        /// Aging date.
        as_of: NaiveDate,
    },

    /// Due date precedes the document date.
    #[error("Open item {0} is due before it was issued")]
    DueBeforeDocument(OpenItemId),

    /// Outstanding amount cannot be negative.
    #[error("Open item {0} has a negative outstanding amount")]
    NegativeOutstanding(OpenItemId),

    /// Items in one report must share a currency.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        /// Report currency.
        expected: Currency,
        /// Currency of the offending item.
        got: Currency,
    },
}

impl AgingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FutureDocument { .. } => "FUTURE_DOCUMENT",
            Self::DueBeforeDocument(_) => "DUE_BEFORE_DOCUMENT",
            Self::NegativeOutstanding(_) => "NEGATIVE_OUTSTANDING",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
        }
    }
}

impl From<AgingError> for AppError {
    fn from(err: AgingError) -> Self {
        Self::Validation(err.to_string())
    }
}
