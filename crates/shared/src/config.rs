//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppResult;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Landed-cost calculation settings.
    pub landed_cost: LandedCostConfig,
    /// Payables/receivables aging settings.
    pub aging: AgingConfig,
    /// Goods receipt settings.
    pub grn: GrnConfig,
}

/// What to do when an allocation basis sums to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroBasisPolicy {
    /// Surface the error to the caller.
    #[default]
    Reject,
    /// Split the cost equally across all items.
    EqualSplit,
}

/// Landed-cost calculation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LandedCostConfig {
    /// Policy applied when a basis total is zero.
    pub zero_basis_policy: ZeroBasisPolicy,
    /// Decimal places kept on final unit costs.
    pub unit_cost_decimal_places: u32,
    /// Decimal places kept on reported percentages.
    pub percentage_decimal_places: u32,
}

impl Default for LandedCostConfig {
    fn default() -> Self {
        Self {
            zero_basis_policy: ZeroBasisPolicy::Reject,
            unit_cost_decimal_places: 4,
            percentage_decimal_places: 2,
        }
    }
}

/// Aging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgingConfig {
    /// Statutory payment window for MSME vendors, in days.
    pub msme_payment_days: i64,
    /// Days after which unpaid purchase invoices put ITC at risk of reversal.
    pub itc_reversal_days: i64,
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            msme_payment_days: 45,
            itc_reversal_days: 180,
        }
    }
}

/// What to do when a GRN records more than was ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverReceiptPolicy {
    /// Reject the GRN line.
    #[default]
    Reject,
    /// Accept the line and report a warning.
    Warn,
}

/// Goods receipt and matching configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GrnConfig {
    /// Policy applied to over-receipts.
    pub over_receipt_policy: OverReceiptPolicy,
    /// Allowed quantity variance for three-way matching, in percent.
    pub quantity_tolerance_percent: Decimal,
    /// Allowed unit price variance for three-way matching, in percent.
    pub price_tolerance_percent: Decimal,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("JUSFINN").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
