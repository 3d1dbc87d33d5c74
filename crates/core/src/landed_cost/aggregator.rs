//! Cost component aggregation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LandedCostError;
use super::types::{AllocationMethod, CostComponent};

/// Sums `values`, or `None` if the total leaves the `Decimal` range.
pub(crate) fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Totals of a shipment's cost components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostAggregate {
    /// Sum of `total_amount` over every component.
    pub component_total: Decimal,
    /// GST portion of `component_total`.
    pub gst_total: Decimal,
    /// `component_total` grouped by allocation method.
    pub total_by_method: BTreeMap<AllocationMethod, Decimal>,
}

impl CostAggregate {
    /// The allocation method shared by every component, if there is exactly one.
    #[must_use]
    pub fn single_method(&self) -> Option<AllocationMethod> {
        let mut methods = self.total_by_method.keys();
        match (methods.next(), methods.next()) {
            (Some(method), None) => Some(*method),
            _ => None,
        }
    }
}

/// Sums cost components. Pure; negative amounts are summed as given and
/// must be rejected by validation beforehand.
pub struct CostAggregator;

impl CostAggregator {
    /// Aggregates `components` into totals.
    ///
    /// # Errors
    ///
    /// Returns `LandedCostError::InvalidInput` if a total leaves the
    /// `Decimal` range.
    pub fn aggregate(components: &[CostComponent]) -> Result<CostAggregate, LandedCostError> {
        components
            .iter()
            .try_fold(CostAggregate::default(), |mut acc, component| {
                let overflow = || LandedCostError::overflow("cost component total");
                acc.component_total = acc
                    .component_total
                    .checked_add(component.total_amount)
                    .ok_or_else(overflow)?;
                acc.gst_total = acc
                    .gst_total
                    .checked_add(component.gst_amount)
                    .ok_or_else(overflow)?;
                let group = acc
                    .total_by_method
                    .entry(component.allocation_method)
                    .or_insert(Decimal::ZERO);
                *group = group
                    .checked_add(component.total_amount)
                    .ok_or_else(overflow)?;
                Ok(acc)
            })
    }
}
