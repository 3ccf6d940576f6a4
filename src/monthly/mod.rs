//! Monthly digest
//!
//! Aggregates the previous calendar month's scan summary and high-risk-item
//! detections into one digest mail. This path has no threshold logic: the
//! digest is always sent.

pub mod aggregate;
pub mod digest;

pub use aggregate::{aggregate_high_risk, HighRiskItem, HIGH_RISK_RANK_LIMIT};
pub use digest::{previous_month_range, render_digest};
