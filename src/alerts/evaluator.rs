//! Alert rule evaluation

use crate::store::{ThresholdConfig, WindowSummary};

/// Below this many runs in the window, rate rules are suppressed: one
/// failure in a two-run window would otherwise read as a 50% error rate.
pub const MIN_SAMPLE_SIZE: i64 = 10;

/// Outcome of evaluating one window against the thresholds.
///
/// Derived, never persisted. `is_alert` holds iff `reasons` is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    pub is_alert: bool,
    /// Rule-order reasons, each embedding the observed value and threshold.
    pub reasons: Vec<String>,
}

/// Evaluate all rules independently; every violated rule contributes a
/// reason, none short-circuits. Pure and deterministic.
///
/// The absolute fail-count rule always applies. Rate rules apply only when
/// the window holds at least [`MIN_SAMPLE_SIZE`] runs, and trigger on
/// equality with the threshold. Missing rates compare as 0.
pub fn evaluate(thresholds: &ThresholdConfig, window: &WindowSummary) -> AlertDecision {
    let mut reasons = Vec::new();

    if window.fail_count >= thresholds.max_fail_count {
        reasons.push(format!(
            "high failure count ({} failures / threshold {})",
            window.fail_count, thresholds.max_fail_count
        ));
    }

    let rated = window.total_count >= MIN_SAMPLE_SIZE;

    let fail_rate = window.fail_rate.unwrap_or(0.0);
    if rated && fail_rate >= thresholds.max_fail_rate {
        reasons.push(format!(
            "high failure rate ({:.1}% / threshold {:.0}%)",
            fail_rate * 100.0,
            thresholds.max_fail_rate * 100.0
        ));
    }

    let low_quality_rate = window.low_quality_rate.unwrap_or(0.0);
    if rated && low_quality_rate >= thresholds.max_low_quality_rate {
        reasons.push(format!(
            "high share of low-quality images ({:.1}% / threshold {:.0}%)",
            low_quality_rate * 100.0,
            thresholds.max_low_quality_rate * 100.0
        ));
    }

    let high_unknown_rate = window.high_unknown_rate.unwrap_or(0.0);
    if rated && high_unknown_rate >= thresholds.max_high_unknown_rate {
        reasons.push(format!(
            "high share of unregistered-word scans ({:.1}% / threshold {:.0}%)",
            high_unknown_rate * 100.0,
            thresholds.max_high_unknown_rate * 100.0
        ));
    }

    AlertDecision {
        is_alert: !reasons.is_empty(),
        reasons,
    }
}
