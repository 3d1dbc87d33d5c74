//! Goods receipt and matching types.

use jusfinn_shared::GrnConfig;
use jusfinn_shared::types::{GrnId, LineItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a goods receipt note.
///
/// `received_quantity` is what was accepted into stock; rejected goods are
/// counted separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrnLine {
    /// Item received.
    pub item_id: LineItemId,
    /// Quantity on the purchase order.
    pub ordered_quantity: Decimal,
    /// Quantity accepted.
    pub received_quantity: Decimal,
    /// Quantity rejected at inspection.
    #[serde(default)]
    pub rejected_quantity: Decimal,
}

impl GrnLine {
    /// Quantity still expected from the vendor. Zero once fully received.
    #[must_use]
    pub fn pending_quantity(&self) -> Decimal {
        (self.ordered_quantity - self.received_quantity - self.rejected_quantity).max(Decimal::ZERO)
    }
}

/// A goods receipt note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsReceipt {
    /// GRN ID.
    pub id: GrnId,
    /// GRN number.
    pub grn_number: String,
    /// Lines.
    pub lines: Vec<GrnLine>,
}

/// Non-fatal finding on a GRN line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrnWarning {
    /// More was delivered than ordered.
    OverReceipt {
        /// The item.
        item_id: LineItemId,
        /// Quantity beyond the order.
        excess: Decimal,
    },
}

/// Purchase order line, for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoLine {
    /// Item ordered.
    pub item_id: LineItemId,
    /// Ordered quantity.
    pub ordered_quantity: Decimal,
    /// Agreed unit price.
    pub unit_price: Decimal,
}

/// Vendor invoice line, for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Item billed.
    pub item_id: LineItemId,
    /// Billed quantity.
    pub invoiced_quantity: Decimal,
    /// Billed unit price.
    pub unit_price: Decimal,
}

/// Allowed variances, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTolerance {
    /// Invoiced vs received quantity.
    pub quantity_percent: Decimal,
    /// Invoiced vs ordered unit price.
    pub price_percent: Decimal,
}

impl From<&GrnConfig> for MatchTolerance {
    fn from(config: &GrnConfig) -> Self {
        Self {
            quantity_percent: config.quantity_tolerance_percent,
            price_percent: config.price_tolerance_percent,
        }
    }
}

/// Outcome of a three-way match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Within tolerance on both quantity and price.
    Matched,
    /// Invoiced quantity differs from received quantity.
    QuantityMismatch,
    /// Invoiced price differs from the PO price.
    PriceMismatch,
    /// Both differ.
    QuantityAndPriceMismatch,
}

impl MatchStatus {
    /// Returns true if the invoice can be passed for payment.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// Three-way match result for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Item matched.
    pub item_id: LineItemId,
    /// Match outcome.
    pub status: MatchStatus,
    /// `invoiced - received`.
    pub quantity_variance: Decimal,
    /// `invoice price - PO price`.
    pub price_variance: Decimal,
    /// `invoiced amount - received quantity at PO price`.
    pub amount_variance: Decimal,
}
