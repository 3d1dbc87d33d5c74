//! Payables and receivables aging.

pub mod error;
pub mod service;
pub mod types;

pub use error::AgingError;
pub use service::AgingService;
pub use types::{AgedItem, AgingBucket, AgingReport, BucketTotal, LedgerSide, OpenItem};
