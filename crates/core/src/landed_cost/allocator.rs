//! Proportional cost allocation.
//!
//! Each portion is rounded to currency precision with banker's rounding and
//! whatever residue that leaves (positive or negative) is booked against the
//! item holding the largest basis share. The portions therefore always sum to
//! the allocated total exactly.

use jusfinn_shared::types::Currency;
use rust_decimal::Decimal;

use super::aggregator::checked_sum;
use super::basis::BasisShares;
use super::error::LandedCostError;

/// Distributes an amount across items in proportion to their basis.
pub struct ProportionalAllocator;

impl ProportionalAllocator {
    /// Allocates `total` according to `shares`, in `currency` precision.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use jusfinn_core::landed_cost::{AllocationMethod, BasisShares, ProportionalAllocator};
    /// use jusfinn_shared::types::Currency;
    ///
    /// let shares = BasisShares {
    ///     method: AllocationMethod::Quantity,
    ///     values: vec![dec!(1), dec!(1), dec!(1)],
    ///     total: dec!(3),
    /// };
    /// let portions = ProportionalAllocator::allocate(dec!(100), &shares, Currency::Inr).unwrap();
    /// assert_eq!(portions, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `LandedCostError::InvalidInput` if a portion leaves the
    /// `Decimal` range.
    pub fn allocate(
        total: Decimal,
        shares: &BasisShares,
        currency: Currency,
    ) -> Result<Vec<Decimal>, LandedCostError> {
        if shares.values.is_empty() {
            return Ok(vec![]);
        }
        if shares.total.is_zero() {
            return Ok(vec![Decimal::ZERO; shares.values.len()]);
        }

        let mut portions = shares
            .values
            .iter()
            .map(|value| {
                total
                    .checked_mul(*value)
                    .and_then(|scaled| scaled.checked_div(shares.total))
                    .map(|portion| currency.round(portion))
                    .ok_or_else(|| {
                        LandedCostError::overflow(format!("{} share of {total}", shares.method))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let residual = checked_sum(portions.iter().copied())
            .and_then(|allocated| total.checked_sub(allocated))
            .ok_or_else(|| {
                LandedCostError::overflow(format!("{} allocation of {total}", shares.method))
            })?;
        if !residual.is_zero()
            && let Some(idx) = shares.largest_index()
        {
            portions[idx] += residual;
        }

        Ok(portions)
    }
}
