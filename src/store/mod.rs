//! Read-only metrics store access
//!
//! The store exposes precomputed aggregate rows over a PostgREST-style HTTP
//! interface. This module fetches them and resolves absent/null fields into
//! explicit typed records at the boundary, so downstream logic never sees
//! dynamic values.

pub mod client;
pub mod records;

pub use client::{FetchError, StoreClient, STAGE_RANK_LIMIT};
pub use records::{
    HighRiskDaily, MonthlySummary, StageFailure, ThresholdConfig, WindowSummary,
};
