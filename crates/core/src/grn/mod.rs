//! Goods receipt validation and three-way matching.

pub mod error;
pub mod service;
pub mod types;

pub use error::GrnError;
pub use service::GrnService;
pub use types::{
    GoodsReceipt, GrnLine, GrnWarning, InvoiceLine, MatchResult, MatchStatus, MatchTolerance,
    PoLine,
};
