//! Landed-cost domain types.
//!
//! A [`ShipmentCostRecord`] carries the goods of one inbound shipment plus the
//! ancillary costs (freight, duty, insurance, ...) that must be spread over
//! them to arrive at the true inventory cost.

use std::collections::BTreeMap;
use std::fmt;

use jusfinn_shared::types::{CostComponentId, Currency, LineItemId, ShipmentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LandedCostError;

/// Kind of ancillary cost. Informational only; it never changes the math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    /// Inbound freight.
    Freight,
    /// Basic customs duty and related levies.
    CustomsDuty,
    /// Transit insurance.
    Insurance,
    /// Loading, unloading and port handling.
    Handling,
    /// Installation charges.
    Installation,
    /// Testing and certification.
    Certification,
    /// Storage before receipt.
    Warehousing,
    /// Anything else.
    Other,
}

/// Basis used to spread a cost component across line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    /// Proportional to each item's original total cost.
    Value,
    /// Proportional to each item's weight.
    Weight,
    /// Proportional to each item's quantity.
    Quantity,
    /// Caller-supplied amount per item.
    Manual,
}

impl AllocationMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Weight => "weight",
            Self::Quantity => "quantity",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for AllocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of a shipment cost record.
///
/// Only `Draft -> Calculated` is driven by this crate; `Allocated` and
/// `Completed` are set by the approval workflow of the host application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentStatus {
    /// Components are still being attached.
    #[default]
    Draft,
    /// An allocation pass has run on the current inputs.
    Calculated,
    /// Allocation approved and posted to inventory.
    Allocated,
    /// Closed.
    Completed,
}

impl ShipmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Calculated => "calculated",
            Self::Allocated => "allocated",
            Self::Completed => "completed",
        }
    }

    /// Returns true if inputs may still change and allocation may (re)run.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Calculated)
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ancillary cost attached to a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostComponent {
    /// Component ID.
    pub id: CostComponentId,
    /// Cost classification.
    pub cost_type: CostType,
    /// Optional free-text description (vendor bill number, etc.).
    #[serde(default)]
    pub description: Option<String>,
    /// Base cost before GST.
    pub amount: Decimal,
    /// GST charged on the cost.
    pub gst_amount: Decimal,
    /// `amount + gst_amount`.
    pub total_amount: Decimal,
    /// How this component is spread over the items.
    pub allocation_method: AllocationMethod,
    /// Per-item amounts, used only when `allocation_method` is `Manual`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub manual_allocations: BTreeMap<LineItemId, Decimal>,
}

impl CostComponent {
    /// Creates a component, deriving `total_amount`.
    #[must_use]
    pub fn new(
        cost_type: CostType,
        amount: Decimal,
        gst_amount: Decimal,
        allocation_method: AllocationMethod,
    ) -> Self {
        Self {
            id: CostComponentId::new(),
            cost_type,
            description: None,
            amount,
            gst_amount,
            total_amount: amount + gst_amount,
            allocation_method,
            manual_allocations: BTreeMap::new(),
        }
    }

    /// Creates a manually allocated component; the amounts are taken as given.
    #[must_use]
    pub fn manual(
        cost_type: CostType,
        amount: Decimal,
        gst_amount: Decimal,
        allocations: BTreeMap<LineItemId, Decimal>,
    ) -> Self {
        Self {
            manual_allocations: allocations,
            ..Self::new(cost_type, amount, gst_amount, AllocationMethod::Manual)
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A line of goods on the shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item ID.
    pub id: LineItemId,
    /// Item description or SKU.
    pub description: String,
    /// Quantity received.
    pub quantity: Decimal,
    /// Total weight of the line; required for weight-based allocation.
    #[serde(default)]
    pub weight: Option<Decimal>,
    /// Purchase price per unit.
    pub unit_cost: Decimal,
    /// `unit_cost * quantity`.
    pub total_cost: Decimal,
    /// Sum of this item's share of every cost component.
    #[serde(default)]
    pub allocated_landed_cost: Decimal,
    /// `allocated_landed_cost` broken down by allocation method.
    #[serde(default)]
    pub allocated_by_method: BTreeMap<AllocationMethod, Decimal>,
    /// `unit_cost + allocated_landed_cost / quantity`.
    #[serde(default)]
    pub final_unit_cost: Decimal,
    /// `total_cost + allocated_landed_cost`.
    #[serde(default)]
    pub final_total_cost: Decimal,
    /// Share of the allocation, 0-100.
    #[serde(default)]
    pub allocation_percentage: Decimal,
}

impl LineItem {
    /// Creates an unallocated line item, deriving `total_cost`.
    #[must_use]
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_cost: Decimal) -> Self {
        let total_cost = unit_cost * quantity;
        Self {
            id: LineItemId::new(),
            description: description.into(),
            quantity,
            weight: None,
            unit_cost,
            total_cost,
            allocated_landed_cost: Decimal::ZERO,
            allocated_by_method: BTreeMap::new(),
            final_unit_cost: unit_cost,
            final_total_cost: total_cost,
            allocation_percentage: Decimal::ZERO,
        }
    }

    /// Sets the weight.
    #[must_use]
    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Returns the basis value for `method`, or `None` if the item lacks it.
    ///
    /// `Manual` never has a computed basis.
    #[must_use]
    pub fn basis_value(&self, method: AllocationMethod) -> Option<Decimal> {
        match method {
            AllocationMethod::Value => Some(self.total_cost),
            AllocationMethod::Weight => self.weight,
            AllocationMethod::Quantity => Some(self.quantity),
            AllocationMethod::Manual => None,
        }
    }
}

/// Landed-cost worksheet for one shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentCostRecord {
    /// Record ID.
    pub id: ShipmentId,
    /// Currency of every amount on the record.
    #[serde(default)]
    pub currency: Currency,
    /// Value of the goods before ancillary costs.
    pub shipment_value: Decimal,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ShipmentStatus,
    /// Ancillary costs.
    #[serde(default)]
    pub cost_components: Vec<CostComponent>,
    /// Goods on the shipment.
    pub items: Vec<LineItem>,
    /// `shipment_value + sum(cost_components.total_amount)`.
    #[serde(default)]
    pub total_landed_cost: Decimal,
    /// Ancillary costs as a percentage of `shipment_value`.
    #[serde(default)]
    pub landed_cost_percentage: Decimal,
}

impl ShipmentCostRecord {
    /// Creates a draft record whose shipment value is the sum of item costs.
    #[must_use]
    pub fn new(currency: Currency, items: Vec<LineItem>) -> Self {
        let shipment_value: Decimal = items.iter().map(|i| i.total_cost).sum();
        Self {
            id: ShipmentId::new(),
            currency,
            shipment_value,
            status: ShipmentStatus::Draft,
            cost_components: Vec::new(),
            items,
            total_landed_cost: shipment_value,
            landed_cost_percentage: Decimal::ZERO,
        }
    }

    /// Attaches a cost component.
    ///
    /// A calculated record drops back to draft since its derived figures
    /// no longer reflect the inputs.
    ///
    /// # Errors
    ///
    /// Returns `LandedCostError::InvalidTransition` once the record has
    /// left the editable states.
    pub fn add_component(&mut self, component: CostComponent) -> Result<(), LandedCostError> {
        if !self.status.is_editable() {
            return Err(LandedCostError::InvalidTransition {
                from: self.status,
                to: ShipmentStatus::Draft,
            });
        }
        self.cost_components.push(component);
        self.status = ShipmentStatus::Draft;
        Ok(())
    }
}
