//! Goods receipt validation and three-way matching.

use jusfinn_shared::OverReceiptPolicy;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::GrnError;
use super::types::{
    GoodsReceipt, GrnLine, GrnWarning, InvoiceLine, MatchResult, MatchStatus, MatchTolerance,
    PoLine,
};

/// Stateless goods receipt service.
pub struct GrnService;

impl GrnService {
    /// Validates one GRN line.
    ///
    /// Over-receipt (`received + rejected > ordered`) is an error under
    /// `OverReceiptPolicy::Reject` and a warning under `Warn`.
    ///
    /// # Errors
    ///
    /// Returns `NegativeQuantity`, `NothingOrdered` or `OverReceipt`.
    pub fn validate_line(
        line: &GrnLine,
        policy: OverReceiptPolicy,
    ) -> Result<Vec<GrnWarning>, GrnError> {
        for (field, value) in [
            ("ordered quantity", line.ordered_quantity),
            ("received quantity", line.received_quantity),
            ("rejected quantity", line.rejected_quantity),
        ] {
            if value < Decimal::ZERO {
                return Err(GrnError::NegativeQuantity {
                    item_id: line.item_id,
                    field,
                });
            }
        }
        if line.ordered_quantity.is_zero() {
            return Err(GrnError::NothingOrdered(line.item_id));
        }

        let delivered = line.received_quantity + line.rejected_quantity;
        if delivered <= line.ordered_quantity {
            return Ok(vec![]);
        }

        match policy {
            OverReceiptPolicy::Reject => Err(GrnError::OverReceipt {
                item_id: line.item_id,
                ordered: line.ordered_quantity,
                received: line.received_quantity,
                rejected: line.rejected_quantity,
            }),
            OverReceiptPolicy::Warn => {
                let excess = delivered - line.ordered_quantity;
                warn!(item_id = %line.item_id, %excess, "Over-receipt accepted");
                Ok(vec![GrnWarning::OverReceipt {
                    item_id: line.item_id,
                    excess,
                }])
            }
        }
    }

    /// Validates every line of a GRN, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first line error.
    pub fn validate_receipt(
        receipt: &GoodsReceipt,
        policy: OverReceiptPolicy,
    ) -> Result<Vec<GrnWarning>, GrnError> {
        let mut warnings = Vec::new();
        for line in &receipt.lines {
            warnings.extend(Self::validate_line(line, policy)?);
        }
        debug!(
            grn_id = %receipt.id,
            lines = receipt.lines.len(),
            warnings = warnings.len(),
            "GRN validated"
        );
        Ok(warnings)
    }

    /// Matches a vendor invoice line against the PO and the GRN.
    ///
    /// Quantity is compared with what was accepted, price with the PO.
    ///
    /// # Errors
    ///
    /// Returns `ItemMismatch` if the three lines are for different items.
    pub fn three_way_match(
        po: &PoLine,
        grn: &GrnLine,
        invoice: &InvoiceLine,
        tolerance: &MatchTolerance,
    ) -> Result<MatchResult, GrnError> {
        if po.item_id != grn.item_id || po.item_id != invoice.item_id {
            return Err(GrnError::ItemMismatch);
        }

        let quantity_variance = invoice.invoiced_quantity - grn.received_quantity;
        let price_variance = invoice.unit_price - po.unit_price;
        let amount_variance = invoice.invoiced_quantity * invoice.unit_price
            - grn.received_quantity * po.unit_price;

        let quantity_ok =
            within_tolerance(quantity_variance, grn.received_quantity, tolerance.quantity_percent);
        let price_ok = within_tolerance(price_variance, po.unit_price, tolerance.price_percent);

        let status = match (quantity_ok, price_ok) {
            (true, true) => MatchStatus::Matched,
            (false, true) => MatchStatus::QuantityMismatch,
            (true, false) => MatchStatus::PriceMismatch,
            (false, false) => MatchStatus::QuantityAndPriceMismatch,
        };

        Ok(MatchResult {
            item_id: po.item_id,
            status,
            quantity_variance,
            price_variance,
            amount_variance,
        })
    }
}

fn within_tolerance(variance: Decimal, reference: Decimal, percent: Decimal) -> bool {
    variance.abs() <= reference.abs() * percent / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use jusfinn_shared::GrnConfig;
    use jusfinn_shared::types::{GrnId, LineItemId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn line(ordered: Decimal, received: Decimal, rejected: Decimal) -> GrnLine {
        GrnLine {
            item_id: LineItemId::new(),
            ordered_quantity: ordered,
            received_quantity: received,
            rejected_quantity: rejected,
        }
    }

    #[test]
    fn test_partial_receipt_is_valid() {
        let grn = line(dec!(100), dec!(60), dec!(5));
        let warnings = GrnService::validate_line(&grn, OverReceiptPolicy::Reject).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(grn.pending_quantity(), dec!(35));
    }

    #[test]
    fn test_over_receipt_rejected_by_default() {
        let grn = line(dec!(100), dec!(98), dec!(3));
        let result = GrnService::validate_line(&grn, OverReceiptPolicy::default());
        assert!(matches!(result, Err(GrnError::OverReceipt { .. })));
    }

    #[test]
    fn test_over_receipt_warned_when_tolerated() {
        let grn = line(dec!(100), dec!(98), dec!(3));
        let warnings = GrnService::validate_line(&grn, OverReceiptPolicy::Warn).unwrap();
        assert_eq!(
            warnings,
            vec![GrnWarning::OverReceipt {
                item_id: grn.item_id,
                excess: dec!(1)
            }]
        );
        assert_eq!(grn.pending_quantity(), Decimal::ZERO);
    }

    #[rstest]
    #[case(dec!(-1), dec!(0), dec!(0))]
    #[case(dec!(10), dec!(-1), dec!(0))]
    #[case(dec!(10), dec!(0), dec!(-1))]
    fn test_negative_quantities_rejected(
        #[case] ordered: Decimal,
        #[case] received: Decimal,
        #[case] rejected: Decimal,
    ) {
        let result = GrnService::validate_line(&line(ordered, received, rejected), OverReceiptPolicy::Warn);
        assert!(matches!(result, Err(GrnError::NegativeQuantity { .. })));
    }

    #[test]
    fn test_nothing_ordered_rejected() {
        let result = GrnService::validate_line(&line(dec!(0), dec!(0), dec!(0)), OverReceiptPolicy::Warn);
        assert!(matches!(result, Err(GrnError::NothingOrdered(_))));
    }

    #[test]
    fn test_validate_receipt_collects_warnings() {
        let receipt = GoodsReceipt {
            id: GrnId::new(),
            grn_number: "GRN-2026-0042".to_string(),
            lines: vec![
                line(dec!(10), dec!(10), dec!(0)),
                line(dec!(10), dec!(12), dec!(0)),
                line(dec!(5), dec!(5), dec!(1)),
            ],
        };

        let warnings = GrnService::validate_receipt(&receipt, OverReceiptPolicy::Warn).unwrap();
        assert_eq!(warnings.len(), 2);

        let result = GrnService::validate_receipt(&receipt, OverReceiptPolicy::Reject);
        assert!(matches!(result, Err(GrnError::OverReceipt { .. })));
    }

    fn documents(
        received: Decimal,
        invoiced: Decimal,
        po_price: Decimal,
        invoice_price: Decimal,
    ) -> (PoLine, GrnLine, InvoiceLine) {
        let item_id = LineItemId::new();
        (
            PoLine {
                item_id,
                ordered_quantity: dec!(100),
                unit_price: po_price,
            },
            GrnLine {
                item_id,
                ordered_quantity: dec!(100),
                received_quantity: received,
                rejected_quantity: Decimal::ZERO,
            },
            InvoiceLine {
                item_id,
                invoiced_quantity: invoiced,
                unit_price: invoice_price,
            },
        )
    }

    #[rstest]
    #[case::exact(dec!(100), dec!(100), dec!(50), dec!(50), MatchStatus::Matched)]
    #[case::short_received(dec!(90), dec!(100), dec!(50), dec!(50), MatchStatus::QuantityMismatch)]
    #[case::price_hike(dec!(100), dec!(100), dec!(50), dec!(52), MatchStatus::PriceMismatch)]
    #[case::both(dec!(90), dec!(100), dec!(50), dec!(52), MatchStatus::QuantityAndPriceMismatch)]
    fn test_three_way_match_exact(
        #[case] received: Decimal,
        #[case] invoiced: Decimal,
        #[case] po_price: Decimal,
        #[case] invoice_price: Decimal,
        #[case] expected: MatchStatus,
    ) {
        let (po, grn, invoice) = documents(received, invoiced, po_price, invoice_price);
        let result =
            GrnService::three_way_match(&po, &grn, &invoice, &MatchTolerance::default()).unwrap();
        assert_eq!(result.status, expected);
    }

    #[test]
    fn test_three_way_match_within_tolerance() {
        let (po, grn, invoice) = documents(dec!(100), dec!(102), dec!(50), dec!(51));
        let config = GrnConfig {
            quantity_tolerance_percent: dec!(2),
            price_tolerance_percent: dec!(2),
            ..GrnConfig::default()
        };

        let result =
            GrnService::three_way_match(&po, &grn, &invoice, &MatchTolerance::from(&config))
                .unwrap();

        assert!(result.status.is_matched());
        assert_eq!(result.quantity_variance, dec!(2));
        assert_eq!(result.price_variance, dec!(1));
        // 102 x 51 - 100 x 50
        assert_eq!(result.amount_variance, dec!(202));
    }

    #[test]
    fn test_three_way_match_rejects_different_items() {
        let (po, grn, mut invoice) = documents(dec!(1), dec!(1), dec!(1), dec!(1));
        invoice.item_id = LineItemId::new();
        let result = GrnService::three_way_match(&po, &grn, &invoice, &MatchTolerance::default());
        assert!(matches!(result, Err(GrnError::ItemMismatch)));
    }
}
