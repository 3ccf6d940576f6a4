//! Threshold-based alert evaluation
//!
//! Applies the configured rules to one window summary and produces a
//! decision with human-readable reasons.

pub mod evaluator;

pub use evaluator::{evaluate, AlertDecision, MIN_SAMPLE_SIZE};
