//! ocrwatch: OCR telemetry alerting and monthly reporting
//!
//! Evaluates precomputed OCR-processing aggregates fetched from a REST store
//! against configurable thresholds and emails a plain-text report: a routine
//! OK summary, an ALERT with diagnosis, or (via a separate binary) a monthly
//! digest with a high-risk-item ranking.
//!
//! The pipeline is a single linear fetch -> evaluate -> format -> send pass,
//! run once per invocation by an external scheduler. The store is read-only
//! from this crate's perspective; the only side effect is the outgoing mail.
//!
//! # Example
//!
//! ```no_run
//! use ocrwatch::alerts::evaluate;
//! use ocrwatch::store::{ThresholdConfig, WindowSummary};
//!
//! let thresholds = ThresholdConfig::default();
//! let window = WindowSummary {
//!     window_minutes: Some(60),
//!     total_count: 42,
//!     fail_count: 7,
//!     fail_rate: Some(0.17),
//!     avg_quality_score: Some(62.0),
//!     low_quality_count: 2,
//!     low_quality_rate: Some(0.05),
//!     high_unknown_count: 1,
//!     high_unknown_rate: Some(0.02),
//! };
//!
//! let decision = evaluate(&thresholds, &window);
//! assert!(decision.is_alert); // fail_count 7 >= threshold 5
//! ```

pub mod alerts;
pub mod config;
pub mod mail;
pub mod monthly;
pub mod report;
pub mod store;

// Re-export commonly used types
pub use alerts::{evaluate, AlertDecision};
pub use config::{Config, ConfigError};
pub use mail::{MailError, Mailer};
pub use report::{Report, ReportStyle};
pub use store::{FetchError, StoreClient};

/// Top-level error for the run-to-completion pipelines.
///
/// Every variant is fatal: the binaries print the message to stdout and exit
/// with status 1 so an external scheduler can detect pipeline breakage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Mail(#[from] MailError),
}
