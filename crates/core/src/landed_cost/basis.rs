//! Allocation basis resolution.

use jusfinn_shared::ZeroBasisPolicy;
use rust_decimal::Decimal;
use tracing::warn;

use super::aggregator::checked_sum;
use super::error::LandedCostError;
use super::types::{AllocationMethod, LineItem};

/// Basis values of every item for one allocation method, in item order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasisShares {
    /// Method the values were taken from.
    pub method: AllocationMethod,
    /// One basis value per item.
    pub values: Vec<Decimal>,
    /// Sum of `values`; never zero.
    pub total: Decimal,
}

impl BasisShares {
    /// Item's share of the basis as an unrounded percentage.
    #[must_use]
    pub fn percentage(&self, index: usize) -> Decimal {
        self.values
            .get(index)
            .map_or(Decimal::ZERO, |v| *v / self.total * Decimal::ONE_HUNDRED)
    }

    /// Index of the largest share (first one on ties).
    #[must_use]
    pub fn largest_index(&self) -> Option<usize> {
        self.values
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, Decimal)>, (i, v)| match best {
                Some((_, max)) if *v <= max => best,
                _ => Some((i, *v)),
            })
            .map(|(i, _)| i)
    }
}

/// Resolves each item's basis value for an allocation method.
pub struct BasisResolver;

impl BasisResolver {
    /// Collects basis values for `method` over `items`.
    ///
    /// # Errors
    ///
    /// - `MissingBasis` if an item lacks the field (weight).
    /// - `ZeroBasis` if the values sum to zero and `policy` is `Reject`.
    /// - `InvalidInput` for `Manual`, which has no computed basis, or an empty item list.
    pub fn resolve(
        method: AllocationMethod,
        items: &[LineItem],
        policy: ZeroBasisPolicy,
    ) -> Result<BasisShares, LandedCostError> {
        if method == AllocationMethod::Manual {
            return Err(LandedCostError::InvalidInput(
                "manual allocation has no computed basis".to_string(),
            ));
        }
        if items.is_empty() {
            return Err(LandedCostError::InvalidInput(
                "cannot resolve a basis without line items".to_string(),
            ));
        }

        let values = items
            .iter()
            .map(|item| {
                item.basis_value(method)
                    .ok_or(LandedCostError::MissingBasis {
                        item_id: item.id,
                        method,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = checked_sum(values.iter().copied())
            .ok_or_else(|| LandedCostError::overflow(format!("{method} basis total")))?;
        if !total.is_zero() {
            return Ok(BasisShares {
                method,
                values,
                total,
            });
        }

        match policy {
            ZeroBasisPolicy::Reject => Err(LandedCostError::ZeroBasis { method }),
            ZeroBasisPolicy::EqualSplit => {
                warn!(%method, items = items.len(), "Zero allocation basis, splitting equally");
                Ok(BasisShares {
                    method,
                    values: vec![Decimal::ONE; items.len()],
                    total: Decimal::from(items.len()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn weighed(weight: Decimal) -> LineItem {
        LineItem::new("crate", dec!(1), dec!(100)).with_weight(weight)
    }

    #[test]
    fn test_weight_basis_percentages() {
        let items = vec![weighed(dec!(500)), weighed(dec!(250))];
        let shares =
            BasisResolver::resolve(AllocationMethod::Weight, &items, ZeroBasisPolicy::Reject)
                .unwrap();

        assert_eq!(shares.total, dec!(750));
        assert_eq!(shares.percentage(0).round_dp(2), dec!(66.67));
        assert_eq!(shares.percentage(1).round_dp(2), dec!(33.33));
        assert_eq!(shares.largest_index(), Some(0));
    }

    #[test]
    fn test_missing_weight_names_item() {
        let bare = LineItem::new("loose", dec!(1), dec!(10));
        let bare_id = bare.id;
        let items = vec![weighed(dec!(5)), bare];

        let result =
            BasisResolver::resolve(AllocationMethod::Weight, &items, ZeroBasisPolicy::Reject);

        assert!(matches!(
            result,
            Err(LandedCostError::MissingBasis { item_id, method: AllocationMethod::Weight })
                if item_id == bare_id
        ));
    }

    #[test]
    fn test_zero_basis_rejected() {
        let items = vec![weighed(dec!(0)), weighed(dec!(0))];
        let result =
            BasisResolver::resolve(AllocationMethod::Weight, &items, ZeroBasisPolicy::Reject);
        assert!(matches!(
            result,
            Err(LandedCostError::ZeroBasis {
                method: AllocationMethod::Weight
            })
        ));
    }

    #[test]
    fn test_zero_basis_equal_split() {
        let items = vec![weighed(dec!(0)), weighed(dec!(0)), weighed(dec!(0))];
        let shares =
            BasisResolver::resolve(AllocationMethod::Weight, &items, ZeroBasisPolicy::EqualSplit)
                .unwrap();
        assert_eq!(shares.values, vec![dec!(1), dec!(1), dec!(1)]);
        assert_eq!(shares.total, dec!(3));
    }

    #[test]
    fn test_manual_has_no_basis() {
        let items = vec![weighed(dec!(1))];
        let result =
            BasisResolver::resolve(AllocationMethod::Manual, &items, ZeroBasisPolicy::Reject);
        assert!(matches!(result, Err(LandedCostError::InvalidInput(_))));
    }

    #[test]
    fn test_largest_index_prefers_first_on_tie() {
        let shares = BasisShares {
            method: AllocationMethod::Quantity,
            values: vec![dec!(2), dec!(5), dec!(5)],
            total: dec!(12),
        };
        assert_eq!(shares.largest_index(), Some(1));
    }
}
