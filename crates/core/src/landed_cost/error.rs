//! Landed-cost error types.

use jusfinn_shared::AppError;
use jusfinn_shared::types::LineItemId;
use thiserror::Error;

use super::types::{AllocationMethod, ShipmentStatus};

/// Errors raised while validating or allocating a shipment cost record.
///
/// All of them are detected before any derived figure is produced, so a
/// failed calculation never yields a partially allocated record.
#[derive(Debug, Error)]
pub enum LandedCostError {
    /// The basis total for a method is zero.
    #[error("Allocation basis for method {method} sums to zero")]
    ZeroBasis {
        /// The allocation method whose basis is empty.
        method: AllocationMethod,
    },

    /// An item lacks the field the method needs.
    #[error("Line item {item_id} has no {method} basis")]
    MissingBasis {
        /// The offending item.
        item_id: LineItemId,
        /// The allocation method that needed the value.
        method: AllocationMethod,
    },

    /// Input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The record is not in a state that allows the operation.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ShipmentStatus,
        /// The attempted target status.
        to: ShipmentStatus,
    },
}

impl LandedCostError {
    /// Input whose arithmetic leaves the `Decimal` range.
    pub(crate) fn overflow(what: impl std::fmt::Display) -> Self {
        Self::InvalidInput(format!("{what} exceeds the decimal range"))
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroBasis { .. } => "ZERO_BASIS",
            Self::MissingBasis { .. } => "MISSING_BASIS",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

impl From<LandedCostError> for AppError {
    fn from(err: LandedCostError) -> Self {
        match err {
            LandedCostError::InvalidInput(_) => Self::Validation(err.to_string()),
            LandedCostError::ZeroBasis { .. } | LandedCostError::MissingBasis { .. } => {
                Self::BusinessRule(err.to_string())
            }
            LandedCostError::InvalidTransition { .. } => Self::Conflict(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LandedCostError::ZeroBasis {
                method: AllocationMethod::Weight
            }
            .error_code(),
            "ZERO_BASIS"
        );
        assert_eq!(
            LandedCostError::InvalidInput(String::new()).error_code(),
            "INVALID_INPUT"
        );
    }

    #[test]
    fn test_display_names_method() {
        let err = LandedCostError::ZeroBasis {
            method: AllocationMethod::Weight,
        };
        assert_eq!(err.to_string(), "Allocation basis for method weight sums to zero");
    }

    #[test]
    fn test_maps_onto_app_error() {
        let app: AppError = LandedCostError::MissingBasis {
            item_id: LineItemId::new(),
            method: AllocationMethod::Weight,
        }
        .into();
        assert_eq!(app.status_code(), 422);

        let app: AppError = LandedCostError::InvalidInput("quantity".into()).into();
        assert_eq!(app.status_code(), 400);

        let app: AppError = LandedCostError::InvalidTransition {
            from: ShipmentStatus::Completed,
            to: ShipmentStatus::Calculated,
        }
        .into();
        assert_eq!(app.status_code(), 409);
    }
}
