//! Landed-cost allocation.
//!
//! Spreads the ancillary costs of a shipment (freight, customs duty,
//! insurance, handling, ...) over its line items:
//! - `aggregator` sums cost components, grouped by allocation method
//! - `basis` resolves each item's value, weight or quantity basis
//! - `allocator` distributes a group total in proportion to the basis
//! - `service` validates the record and recomputes final item costs

pub mod aggregator;
pub mod allocator;
pub mod basis;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use aggregator::{CostAggregate, CostAggregator};
pub use allocator::ProportionalAllocator;
pub use basis::{BasisResolver, BasisShares};
pub use error::LandedCostError;
pub use service::LandedCostService;
pub use types::{AllocationMethod, CostComponent, CostType, LineItem, ShipmentCostRecord, ShipmentStatus};
