//! Landed-cost calculation service.

use std::collections::{BTreeMap, HashSet};

use jusfinn_shared::LandedCostConfig;
use jusfinn_shared::types::Currency;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};

use super::aggregator::{CostAggregator, checked_sum};
use super::allocator::ProportionalAllocator;
use super::basis::{BasisResolver, BasisShares};
use super::error::LandedCostError;
use super::types::{AllocationMethod, CostComponent, LineItem, ShipmentCostRecord, ShipmentStatus};

/// Stateless service running the landed-cost allocation pass.
pub struct LandedCostService;

impl LandedCostService {
    /// Validates a record before allocation.
    ///
    /// # Errors
    ///
    /// Returns `LandedCostError::InvalidInput` for empty or duplicate items,
    /// non-positive shipment value or quantity, negative costs or weights,
    /// inconsistent derived totals, and malformed manual allocations.
    /// Returns `LandedCostError::MissingBasis` when a manual component omits an item.
    pub fn validate(record: &ShipmentCostRecord) -> Result<(), LandedCostError> {
        if record.items.is_empty() {
            return Err(invalid("shipment must have at least one line item"));
        }
        if record.shipment_value <= Decimal::ZERO {
            return Err(invalid(format!(
                "shipment value must be positive, got {}",
                record.shipment_value
            )));
        }

        let mut seen = HashSet::with_capacity(record.items.len());
        for item in &record.items {
            if !seen.insert(item.id) {
                return Err(invalid(format!("duplicate line item {}", item.id)));
            }
            validate_item(item, record.currency)?;
        }

        for component in &record.cost_components {
            validate_component(component, &record.items)?;
        }

        Ok(())
    }

    /// Runs the allocation pass and returns the calculated record.
    ///
    /// The input is left untouched. Running the pass again on the result
    /// yields an identical record.
    ///
    /// # Errors
    ///
    /// Returns `LandedCostError::InvalidTransition` if the record is already
    /// allocated or completed, plus any validation or basis error.
    /// Returns `LandedCostError::InvalidInput` if a derived figure leaves the
    /// `Decimal` range.
    pub fn calculate(
        record: &ShipmentCostRecord,
        config: &LandedCostConfig,
    ) -> Result<ShipmentCostRecord, LandedCostError> {
        if !record.status.is_editable() {
            return Err(LandedCostError::InvalidTransition {
                from: record.status,
                to: ShipmentStatus::Calculated,
            });
        }
        Self::validate(record)?;

        let aggregate = CostAggregator::aggregate(&record.cost_components)?;
        let mut allocations: Vec<BTreeMap<AllocationMethod, Decimal>> =
            vec![BTreeMap::new(); record.items.len()];
        // Basis shares of the only method in use, if it is a computed one.
        let sole_method = aggregate.single_method();
        let mut sole_basis = None;

        for (method, group_total) in &aggregate.total_by_method {
            if *method == AllocationMethod::Manual {
                continue;
            }
            let shares = BasisResolver::resolve(*method, &record.items, config.zero_basis_policy)?;
            let portions = ProportionalAllocator::allocate(*group_total, &shares, record.currency)?;
            debug!(
                shipment_id = %record.id,
                %method,
                group_total = %group_total,
                basis_total = %shares.total,
                "Allocated cost group"
            );
            for (slot, portion) in allocations.iter_mut().zip(portions) {
                slot.insert(*method, portion);
            }
            if sole_method == Some(*method) {
                sole_basis = Some(shares);
            }
        }

        for component in record
            .cost_components
            .iter()
            .filter(|c| c.allocation_method == AllocationMethod::Manual)
        {
            for (slot, item) in allocations.iter_mut().zip(&record.items) {
                let amount = component
                    .manual_allocations
                    .get(&item.id)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let manual = slot.entry(AllocationMethod::Manual).or_insert(Decimal::ZERO);
                *manual = manual.checked_add(amount).ok_or_else(|| {
                    LandedCostError::overflow(format!("manual allocation to line item {}", item.id))
                })?;
            }
        }

        let allocated_totals = record
            .items
            .iter()
            .zip(&allocations)
            .map(|(item, by_method)| {
                checked_sum(by_method.values().copied()).ok_or_else(|| {
                    LandedCostError::overflow(format!("landed cost of line item {}", item.id))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let percentages = allocation_percentages(
            record,
            &allocated_totals,
            aggregate.component_total,
            sole_basis.as_ref(),
        )?;

        let mut items = Vec::with_capacity(record.items.len());
        for (((item, by_method), allocated), share) in record
            .items
            .iter()
            .zip(allocations)
            .zip(allocated_totals)
            .zip(percentages)
        {
            let final_unit_cost = allocated
                .checked_div(item.quantity)
                .and_then(|per_unit| item.unit_cost.checked_add(per_unit))
                .ok_or_else(|| {
                    LandedCostError::overflow(format!("final unit cost of line item {}", item.id))
                })?;
            let final_total_cost = item.total_cost.checked_add(allocated).ok_or_else(|| {
                LandedCostError::overflow(format!("final total cost of line item {}", item.id))
            })?;
            items.push(LineItem {
                allocated_landed_cost: allocated,
                allocated_by_method: by_method,
                final_unit_cost: final_unit_cost.round_dp_with_strategy(
                    config.unit_cost_decimal_places,
                    RoundingStrategy::MidpointNearestEven,
                ),
                final_total_cost,
                allocation_percentage: share.round_dp(config.percentage_decimal_places),
                ..item.clone()
            });
        }

        let landed_cost_percentage = percentage_of(aggregate.component_total, record.shipment_value)?
            .round_dp(config.percentage_decimal_places);
        let total_landed_cost = record
            .shipment_value
            .checked_add(aggregate.component_total)
            .ok_or_else(|| LandedCostError::overflow("total landed cost"))?;

        let calculated = ShipmentCostRecord {
            items,
            total_landed_cost,
            landed_cost_percentage,
            status: ShipmentStatus::Calculated,
            ..record.clone()
        };

        info!(
            shipment_id = %calculated.id,
            items = calculated.items.len(),
            components = calculated.cost_components.len(),
            component_total = %aggregate.component_total,
            landed_cost_percentage = %calculated.landed_cost_percentage,
            "Landed cost calculated"
        );

        Ok(calculated)
    }
}

fn invalid(reason: impl Into<String>) -> LandedCostError {
    LandedCostError::InvalidInput(reason.into())
}

fn percentage_of(part: Decimal, whole: Decimal) -> Result<Decimal, LandedCostError> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| LandedCostError::overflow(format!("{part} as a percentage of {whole}")))
}

/// Unrounded allocation percentage of each item.
///
/// With a single computed method this is the item's basis share. Mixed or
/// manual-only components fall back to the share of allocated cost, and a
/// record without components to the share of goods value.
fn allocation_percentages(
    record: &ShipmentCostRecord,
    allocated_totals: &[Decimal],
    component_total: Decimal,
    sole_basis: Option<&BasisShares>,
) -> Result<Vec<Decimal>, LandedCostError> {
    if let Some(shares) = sole_basis {
        return Ok((0..record.items.len()).map(|i| shares.percentage(i)).collect());
    }
    if component_total.is_zero() {
        let value_total = checked_sum(record.items.iter().map(|i| i.total_cost))
            .ok_or_else(|| LandedCostError::overflow("shipment goods value"))?;
        return record
            .items
            .iter()
            .map(|item| percentage_of(item.total_cost, value_total))
            .collect();
    }
    allocated_totals
        .iter()
        .map(|allocated| percentage_of(*allocated, component_total))
        .collect()
}

fn validate_item(item: &LineItem, currency: Currency) -> Result<(), LandedCostError> {
    if item.quantity <= Decimal::ZERO {
        return Err(invalid(format!(
            "quantity of line item {} must be positive",
            item.id
        )));
    }
    if item.unit_cost < Decimal::ZERO {
        return Err(invalid(format!(
            "unit cost of line item {} cannot be negative",
            item.id
        )));
    }
    if item.weight.is_some_and(|w| w < Decimal::ZERO) {
        return Err(invalid(format!(
            "weight of line item {} cannot be negative",
            item.id
        )));
    }
    let expected = item
        .unit_cost
        .checked_mul(item.quantity)
        .map(|total| currency.round(total))
        .ok_or_else(|| LandedCostError::overflow(format!("total cost of line item {}", item.id)))?;
    if currency.round(item.total_cost) != expected {
        return Err(invalid(format!(
            "total cost of line item {} is {}, expected {expected}",
            item.id, item.total_cost
        )));
    }
    Ok(())
}

fn validate_component(component: &CostComponent, items: &[LineItem]) -> Result<(), LandedCostError> {
    if component.amount < Decimal::ZERO || component.gst_amount < Decimal::ZERO {
        return Err(invalid(format!(
            "cost component {} has a negative amount",
            component.id
        )));
    }
    if component.amount.checked_add(component.gst_amount) != Some(component.total_amount) {
        return Err(invalid(format!(
            "cost component {} total {} does not equal amount plus GST",
            component.id, component.total_amount
        )));
    }

    if component.allocation_method != AllocationMethod::Manual {
        if !component.manual_allocations.is_empty() {
            return Err(invalid(format!(
                "cost component {} carries manual allocations but uses {} allocation",
                component.id, component.allocation_method
            )));
        }
        return Ok(());
    }

    if let Some(unknown) = component
        .manual_allocations
        .keys()
        .find(|id| !items.iter().any(|item| item.id == **id))
    {
        return Err(invalid(format!(
            "cost component {} allocates to unknown line item {unknown}",
            component.id
        )));
    }
    if let Some(missing) = items
        .iter()
        .find(|item| !component.manual_allocations.contains_key(&item.id))
    {
        return Err(LandedCostError::MissingBasis {
            item_id: missing.id,
            method: AllocationMethod::Manual,
        });
    }
    if component.manual_allocations.values().any(|a| *a < Decimal::ZERO) {
        return Err(invalid(format!(
            "cost component {} has a negative manual allocation",
            component.id
        )));
    }
    let allocated = checked_sum(component.manual_allocations.values().copied()).ok_or_else(|| {
        LandedCostError::overflow(format!("manual allocations of cost component {}", component.id))
    })?;
    if allocated != component.total_amount {
        return Err(invalid(format!(
            "manual allocations of cost component {} sum to {allocated}, expected {}",
            component.id, component.total_amount
        )));
    }
    Ok(())
}
