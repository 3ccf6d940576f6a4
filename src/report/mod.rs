//! Report rendering
//!
//! Turns an evaluated window into a mail subject and plain-text body. Two
//! mutually exclusive paths (OK vs ALERT) selected by the decision, each
//! renderable in a narrative or tabular layout.

pub mod format;

use chrono::{DateTime, Utc};

use crate::alerts::AlertDecision;
use crate::store::{StageFailure, ThresholdConfig, WindowSummary};

pub use format::{build_subject, pct, NOT_COMPUTED};

/// Body layout for the alert-check report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    /// Prose sections, readable by non-operators.
    Narrative,
    /// Aligned metric/value/threshold table.
    Tabular,
}

/// A rendered report, ready to send.
#[derive(Debug, Clone)]
pub struct Report {
    pub subject: String,
    pub body: String,
}

/// Render the alert-check report for one evaluated window.
///
/// `now` is injected so repeated runs produce distinguishable subjects and
/// tests stay deterministic.
pub fn render(
    style: ReportStyle,
    decision: &AlertDecision,
    thresholds: &ThresholdConfig,
    window: &WindowSummary,
    stage_rank: &[StageFailure],
    now: DateTime<Utc>,
) -> Report {
    let window_minutes = window.window_minutes_or(thresholds);
    let subject = format::build_subject(decision.is_alert, window_minutes, now);

    let body = match (style, decision.is_alert) {
        (ReportStyle::Narrative, false) => format::narrative_ok(thresholds, window),
        (ReportStyle::Narrative, true) => {
            format::narrative_alert(thresholds, window, stage_rank, &decision.reasons)
        }
        (ReportStyle::Tabular, _) => {
            format::tabular(decision, thresholds, window, stage_rank)
        }
    };

    Report { subject, body }
}
