//! Goods receipt error types.

use jusfinn_shared::AppError;
use jusfinn_shared::types::LineItemId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Goods receipt errors.
#[derive(Debug, Error)]
pub enum GrnError {
    /// A quantity is negative.
    #[error("Negative {field} on line item {item_id}")]
    NegativeQuantity {
        /// The offending item.
        item_id: LineItemId,
        /// Which quantity.
        field: &'static str,
    },

    /// Nothing was ordered.
    #[error("Ordered quantity must be positive on line item {0}")]
    NothingOrdered(LineItemId),

    /// Received plus rejected exceeds ordered.
    #[error(
        "Line item {item_id} over-received: ordered {ordered}, received {received}, rejected {rejected}"
    )]
    OverReceipt {
        /// The offending item.
        item_id: LineItemId,
        /// Ordered quantity.
        ordered: Decimal,
        /// Accepted quantity.
        received: Decimal,
        /// Rejected quantity.
        rejected: Decimal,
    },

    /// PO, GRN and invoice lines refer to different items.
    #[error("Cannot match documents for different line items")]
    ItemMismatch,
}

impl GrnError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeQuantity { .. } => "NEGATIVE_QUANTITY",
            Self::NothingOrdered(_) => "NOTHING_ORDERED",
            Self::OverReceipt { .. } => "OVER_RECEIPT",
            Self::ItemMismatch => "ITEM_MISMATCH",
        }
    }
}

impl From<GrnError> for AppError {
    fn from(err: GrnError) -> Self {
        match err {
            GrnError::OverReceipt { .. } => Self::BusinessRule(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
