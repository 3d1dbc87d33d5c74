//! Aging data types.

use chrono::NaiveDate;
use jusfinn_shared::types::{Currency, Money, OpenItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the books an open item sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSide {
    /// Owed to a vendor.
    Payable,
    /// Owed by a customer.
    Receivable,
}

/// An unpaid invoice or bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenItem {
    /// Open item ID.
    pub id: OpenItemId,
    /// Payable or receivable.
    pub ledger: LedgerSide,
    /// Vendor or customer name.
    pub party_name: String,
    /// Invoice or bill number.
    pub document_number: String,
    /// Invoice date.
    pub document_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Amount still unpaid.
    pub outstanding: Money,
    /// Vendor is registered under the MSMED Act.
    #[serde(default)]
    pub is_msme: bool,
}

/// Overdue bucket, by days past the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// Not yet due.
    Current,
    /// 1 to 30 days overdue.
    Days1To30,
    /// 31 to 60 days overdue.
    Days31To60,
    /// 61 to 90 days overdue.
    Days61To90,
    /// 91 to 180 days overdue.
    Days91To180,
    /// More than 180 days overdue.
    Over180,
}

impl AgingBucket {
    /// Every bucket, in report order.
    pub const ALL: [Self; 6] = [
        Self::Current,
        Self::Days1To30,
        Self::Days31To60,
        Self::Days61To90,
        Self::Days91To180,
        Self::Over180,
    ];

    /// Classifies by days past due.
    #[must_use]
    pub fn from_days_overdue(days: i64) -> Self {
        match days {
            i64::MIN..=0 => Self::Current,
            1..=30 => Self::Days1To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            91..=180 => Self::Days91To180,
            _ => Self::Over180,
        }
    }

    /// Column label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Days1To30 => "1-30",
            Self::Days31To60 => "31-60",
            Self::Days61To90 => "61-90",
            Self::Days91To180 => "91-180",
            Self::Over180 => "180+",
        }
    }
}

/// An open item with its aging figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgedItem {
    /// Open item ID.
    pub id: OpenItemId,
    /// Vendor or customer name.
    pub party_name: String,
    /// Amount still unpaid.
    pub outstanding: Money,
    /// Days since the document date.
    pub days_outstanding: i64,
    /// Days past the due date, zero if not yet due.
    pub days_overdue: i64,
    /// Overdue bucket.
    pub bucket: AgingBucket,
    /// MSME vendor unpaid beyond the statutory window.
    pub msme_breach: bool,
    /// Purchase unpaid long enough to force ITC reversal.
    pub itc_reversal_risk: bool,
}

/// Total of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotal {
    /// The bucket.
    pub bucket: AgingBucket,
    /// Number of items in the bucket.
    pub count: usize,
    /// Sum of outstanding amounts.
    pub amount: Decimal,
}

/// Aging report for one side of the books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingReport {
    /// Aging date.
    pub as_of: NaiveDate,
    /// Payables or receivables.
    pub ledger: LedgerSide,
    /// Report currency.
    pub currency: Currency,
    /// One entry per bucket, in `AgingBucket::ALL` order.
    pub buckets: Vec<BucketTotal>,
    /// Sum over all buckets.
    pub total_outstanding: Decimal,
    /// Outstanding owed to MSME vendors past the statutory window.
    pub msme_overdue_total: Decimal,
    /// Outstanding on purchases whose ITC must be reversed if unpaid.
    pub itc_at_risk_total: Decimal,
    /// Item detail.
    pub items: Vec<AgedItem>,
}
