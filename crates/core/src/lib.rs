//! Core business logic for JusFinn accounts payable.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `landed_cost` - Allocation of freight, duty and other shipment costs to inventory
//! - `aging` - Payables/receivables aging with MSME and ITC compliance flags
//! - `grn` - Goods receipt quantity checks and three-way matching

pub mod aging;
pub mod grn;
pub mod landed_cost;
