//! Shared types, errors, and configuration for JusFinn.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AgingConfig, AppConfig, GrnConfig, LandedCostConfig, OverReceiptPolicy, ZeroBasisPolicy};
pub use error::{AppError, AppResult};
