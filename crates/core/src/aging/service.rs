//! Aging classification and reporting.

use chrono::NaiveDate;
use jusfinn_shared::AgingConfig;
use jusfinn_shared::types::Money;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::error::AgingError;
use super::types::{AgedItem, AgingBucket, AgingReport, BucketTotal, LedgerSide, OpenItem};

/// Stateless aging service.
pub struct AgingService;

impl AgingService {
    /// Ages one open item as of `as_of`.
    ///
    /// MSME and ITC flags only apply to payables: an MSME vendor must be paid
    /// within `msme_payment_days` of the invoice, and input tax credit on a
    /// purchase left unpaid past `itc_reversal_days` has to be reversed.
    ///
    /// # Errors
    ///
    /// Returns an error for documents dated after `as_of`, due dates before
    /// the document date, or negative outstanding amounts.
    pub fn classify(
        item: &OpenItem,
        as_of: NaiveDate,
        config: &AgingConfig,
    ) -> Result<AgedItem, AgingError> {
        if item.document_date > as_of {
            return Err(AgingError::FutureDocument {
                id: item.id,
                document_date: item.document_date,
                as_of,
            });
        }
        if item.due_date < item.document_date {
            return Err(AgingError::DueBeforeDocument(item.id));
        }
        if item.outstanding.is_negative() {
            return Err(AgingError::NegativeOutstanding(item.id));
        }

        let days_outstanding = (as_of - item.document_date).num_days();
        let days_overdue = (as_of - item.due_date).num_days().max(0);
        let is_payable = item.ledger == LedgerSide::Payable;

        Ok(AgedItem {
            id: item.id,
            party_name: item.party_name.clone(),
            outstanding: item.outstanding,
            days_outstanding,
            days_overdue,
            bucket: AgingBucket::from_days_overdue(days_overdue),
            msme_breach: is_payable && item.is_msme && days_outstanding > config.msme_payment_days,
            itc_reversal_risk: is_payable && days_outstanding > config.itc_reversal_days,
        })
    }

    /// Builds the aging report for one side of the books.
    ///
    /// Items of the other side are skipped. The report currency is taken from
    /// the first matching item.
    ///
    /// # Errors
    ///
    /// Returns any classification error, or `CurrencyMismatch` when items
    /// are in different currencies.
    pub fn summarize(
        ledger: LedgerSide,
        items: &[OpenItem],
        as_of: NaiveDate,
        config: &AgingConfig,
    ) -> Result<AgingReport, AgingError> {
        let relevant: Vec<&OpenItem> = items.iter().filter(|i| i.ledger == ledger).collect();
        let currency = relevant
            .first()
            .map(|i| i.outstanding.currency)
            .unwrap_or_default();

        let mut total = Money::zero(currency);
        let mut buckets: Vec<BucketTotal> = AgingBucket::ALL
            .iter()
            .map(|bucket| BucketTotal {
                bucket: *bucket,
                count: 0,
                amount: Decimal::ZERO,
            })
            .collect();
        let mut msme_overdue_total = Decimal::ZERO;
        let mut itc_at_risk_total = Decimal::ZERO;
        let mut aged_items = Vec::with_capacity(relevant.len());

        for item in relevant {
            let aged = Self::classify(item, as_of, config)?;
            total = total
                .checked_add(aged.outstanding)
                .ok_or(AgingError::CurrencyMismatch {
                    expected: currency,
                    got: aged.outstanding.currency,
                })?;

            if let Some(slot) = buckets.iter_mut().find(|b| b.bucket == aged.bucket) {
                slot.count += 1;
                slot.amount += aged.outstanding.amount;
            }
            if aged.msme_breach {
                warn!(
                    open_item_id = %aged.id,
                    party = %aged.party_name,
                    days_outstanding = aged.days_outstanding,
                    "MSME payment window exceeded"
                );
                msme_overdue_total += aged.outstanding.amount;
            }
            if aged.itc_reversal_risk {
                itc_at_risk_total += aged.outstanding.amount;
            }
            aged_items.push(aged);
        }

        info!(
            ?ledger,
            %as_of,
            items = aged_items.len(),
            total_outstanding = %total.amount,
            "Aging report built"
        );

        Ok(AgingReport {
            as_of,
            ledger,
            currency,
            buckets,
            total_outstanding: total.amount,
            msme_overdue_total,
            itc_at_risk_total,
            items: aged_items,
        })
    }
}
