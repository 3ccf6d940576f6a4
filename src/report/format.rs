//! Subject and body builders for the alert-check report

use chrono::{DateTime, Utc};

use crate::alerts::AlertDecision;
use crate::store::{StageFailure, ThresholdConfig, WindowSummary};

/// Marker for rates that cannot be derived (null source, zero denominator).
/// Rendered instead of a misleading `0.0%`.
pub const NOT_COMPUTED: &str = "not computed";

const RULE: &str = "----------------------------------------";

/// Render a 0..=1 ratio as `"NN.N%"`, or the not-computed marker when the
/// source value is absent.
pub fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => NOT_COMPUTED.to_string(),
    }
}

/// Like [`pct`], but a zero-run window has no meaningful rates at all, so
/// everything renders as not computed regardless of what the view returned.
fn rate_display(total_count: i64, value: Option<f64>) -> String {
    if total_count == 0 {
        NOT_COMPUTED.to_string()
    } else {
        pct(value)
    }
}

/// Subject line: OK/ALERT marker, window length, and a UTC timestamp at
/// minute granularity so repeated runs stay distinguishable.
pub fn build_subject(is_alert: bool, window_minutes: i64, now: DateTime<Utc>) -> String {
    let ts = now.format("%Y-%m-%d %H:%M UTC");
    let prefix = if is_alert {
        "[ALERT] OCR monitoring detected problems"
    } else {
        "[OK] OCR monitoring report"
    };
    format!("{} - last {} min - {}", prefix, window_minutes, ts)
}

fn stage_lines(stage_rank: &[StageFailure]) -> String {
    if stage_rank.is_empty() {
        return "- (none)".to_string();
    }
    stage_rank
        .iter()
        .map(|row| {
            format!(
                "- {}: {}",
                row.error_stage.as_deref().unwrap_or("(unknown)"),
                row.cnt
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn threshold_lines(th: &ThresholdConfig) -> String {
    format!(
        "- {} or more processing failures\n\
         - failure rate at or above {:.0}%\n\
         - low-quality image share at or above {:.0}%\n\
         - unregistered-word scan share at or above {:.0}%",
        th.max_fail_count,
        th.max_fail_rate * 100.0,
        th.max_low_quality_rate * 100.0,
        th.max_high_unknown_rate * 100.0,
    )
}

/// OK body, narrative layout.
pub fn narrative_ok(th: &ThresholdConfig, w: &WindowSummary) -> String {
    let window_minutes = w.window_minutes_or(th);

    let no_runs_note = if w.total_count == 0 {
        "Note: no OCR runs happened in this window, so every metric\n\
         is either zero or not computed.\n\n"
    } else {
        ""
    };

    format!(
        "OCR monitoring report (OK)\n\
         \n\
         The last {window_minutes} minutes of OCR processing were checked\n\
         and no problems were detected.\n\
         \n\
         {RULE}\n\
         Overall\n\
         {RULE}\n\
         - runs checked: {total}\n\
         - processing failures: {fails}\n\
         - verdict: OK\n\
         \n\
         {no_runs_note}{RULE}\n\
         Quality checks\n\
         {RULE}\n\
         - image and recognition quality were within limits\n\
         - no unusual amount of unregistered words was detected\n\
         - no processing stage reported failures\n\
         \n\
         {RULE}\n\
         Active alert rules (for reference)\n\
         {RULE}\n\
         An alert is sent when any of these hold:\n\
         \n\
         {rules}\n\
         \n\
         Monitoring continues automatically; you will only be\n\
         notified again if a problem is detected.\n",
        total = w.total_count,
        fails = w.fail_count,
        rules = threshold_lines(th),
    )
}

/// ALERT body, narrative layout: metrics, reasons, failing stages, and
/// suggested follow-up.
pub fn narrative_alert(
    th: &ThresholdConfig,
    w: &WindowSummary,
    stage_rank: &[StageFailure],
    reasons: &[String],
) -> String {
    let window_minutes = w.window_minutes_or(th);

    let reason_lines = if reasons.is_empty() {
        "- (see the pipeline logs for details)".to_string()
    } else {
        reasons
            .iter()
            .map(|r| format!("- {}", r))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "OCR monitoring detected problems\n\
         \n\
         The last {window_minutes} minutes of OCR processing require\n\
         attention; details follow.\n\
         \n\
         {RULE}\n\
         Window metrics\n\
         {RULE}\n\
         - runs checked: {total}\n\
         - processing failures: {fails}\n\
         - failure rate: {fail_rate}\n\
         - low-quality image share: {low_quality}\n\
         - unregistered-word scan share: {high_unknown}\n\
         \n\
         {RULE}\n\
         Why this was flagged\n\
         {RULE}\n\
         {reasons}\n\
         \n\
         {RULE}\n\
         Failing stages (most frequent first)\n\
         {RULE}\n\
         {stages}\n\
         \n\
         {RULE}\n\
         Suggested follow-up\n\
         {RULE}\n\
         - review recently uploaded images\n\
         - check capture conditions (lighting, focus, angle)\n\
         - register any missing words in the dictionary\n",
        total = w.total_count,
        fails = w.fail_count,
        fail_rate = rate_display(w.total_count, w.fail_rate),
        low_quality = rate_display(w.total_count, w.low_quality_rate),
        high_unknown = rate_display(w.total_count, w.high_unknown_rate),
        reasons = reason_lines,
        stages = stage_lines(stage_rank),
    )
}

/// Tabular layout, shared by OK and ALERT: the same facts as an aligned
/// metric/value/threshold table.
pub fn tabular(
    decision: &AlertDecision,
    th: &ThresholdConfig,
    w: &WindowSummary,
    stage_rank: &[StageFailure],
) -> String {
    let window_minutes = w.window_minutes_or(th);
    let verdict = if decision.is_alert { "ALERT" } else { "OK" };

    let mut lines = vec![
        format!(
            "OCR monitoring report ({verdict}) - last {window_minutes} min"
        ),
        String::new(),
        format!("{:<32} {:>14} {:>14}", "metric", "value", "threshold"),
        format!("{:<32} {:>14} {:>14}", "runs checked", w.total_count, "-"),
        format!(
            "{:<32} {:>14} {:>14}",
            "processing failures", w.fail_count, th.max_fail_count
        ),
        format!(
            "{:<32} {:>14} {:>14}",
            "failure rate",
            rate_display(w.total_count, w.fail_rate),
            pct(Some(th.max_fail_rate))
        ),
        format!(
            "{:<32} {:>14} {:>14}",
            "low-quality image share",
            rate_display(w.total_count, w.low_quality_rate),
            pct(Some(th.max_low_quality_rate))
        ),
        format!(
            "{:<32} {:>14} {:>14}",
            "unregistered-word scan share",
            rate_display(w.total_count, w.high_unknown_rate),
            pct(Some(th.max_high_unknown_rate))
        ),
    ];

    if w.total_count == 0 {
        lines.push(String::new());
        lines.push("note: no OCR runs in this window; rates are not computed".to_string());
    }

    if decision.is_alert {
        lines.push(String::new());
        lines.push("reasons:".to_string());
        for reason in &decision.reasons {
            lines.push(format!("- {}", reason));
        }
        lines.push(String::new());
        lines.push("failing stages (most frequent first):".to_string());
        lines.push(stage_lines(stage_rank));
    }

    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::evaluate;
    use crate::report::{render, ReportStyle};
    use chrono::TimeZone;

    fn window(total: i64, fails: i64) -> WindowSummary {
        WindowSummary {
            window_minutes: Some(60),
            total_count: total,
            fail_count: fails,
            fail_rate: None,
            avg_quality_score: None,
            low_quality_count: 0,
            low_quality_rate: None,
            high_unknown_count: 0,
            high_unknown_rate: None,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 5, 42).unwrap()
    }

    #[test]
    fn test_pct_renders_ratio_and_marker() {
        assert_eq!(pct(Some(0.123)), "12.3%");
        assert_eq!(pct(Some(0.0)), "0.0%");
        assert_eq!(pct(None), NOT_COMPUTED);
    }

    #[test]
    fn test_zero_denominator_forces_not_computed() {
        // even a (bogus) concrete rate is suppressed at zero runs
        assert_eq!(rate_display(0, Some(0.5)), NOT_COMPUTED);
        assert_eq!(rate_display(10, Some(0.5)), "50.0%");
        assert_eq!(rate_display(10, None), NOT_COMPUTED);
    }

    #[test]
    fn test_subject_embeds_marker_window_and_minute_timestamp() {
        let subject = build_subject(true, 60, fixed_now());
        assert!(subject.starts_with("[ALERT]"));
        assert!(subject.contains("last 60 min"));
        assert!(subject.contains("2024-03-15 09:05 UTC"));

        let subject = build_subject(false, 30, fixed_now());
        assert!(subject.starts_with("[OK]"));
        assert!(subject.contains("last 30 min"));
    }

    #[test]
    fn test_ok_body_flags_empty_window() {
        let th = ThresholdConfig::default();
        let body = narrative_ok(&th, &window(0, 0));
        assert!(body.contains("no OCR runs happened in this window"));
        assert!(body.contains("runs checked: 0"));
    }

    #[test]
    fn test_ok_body_restates_rules() {
        let th = ThresholdConfig::default();
        let body = narrative_ok(&th, &window(25, 1));
        assert!(body.contains("5 or more processing failures"));
        assert!(body.contains("failure rate at or above 20%"));
        assert!(!body.contains("no OCR runs happened"));
    }

    #[test]
    fn test_alert_body_lists_reasons_and_stages() {
        let th = ThresholdConfig::default();
        let mut w = window(40, 12);
        w.fail_rate = Some(0.30);

        let decision = evaluate(&th, &w);
        assert!(decision.is_alert);

        let rank = vec![
            StageFailure {
                error_stage: Some("preprocess".to_string()),
                cnt: 7,
            },
            StageFailure {
                error_stage: None,
                cnt: 2,
            },
        ];
        let body = narrative_alert(&th, &w, &rank, &decision.reasons);
        assert!(body.contains("high failure count"));
        assert!(body.contains("30.0%"));
        assert!(body.contains("- preprocess: 7"));
        assert!(body.contains("- (unknown): 2"));
        // low-quality rate was absent from the view
        assert!(body.contains(&format!("low-quality image share: {}", NOT_COMPUTED)));
    }

    #[test]
    fn test_alert_body_marks_empty_stage_rank() {
        let th = ThresholdConfig::default();
        let w = window(3, 6);
        let decision = evaluate(&th, &w);
        let body = narrative_alert(&th, &w, &[], &decision.reasons);
        assert!(body.contains("- (none)"));
    }

    #[test]
    fn test_render_selects_path_by_decision() {
        let th = ThresholdConfig::default();
        let ok_window = window(25, 0);
        let decision = evaluate(&th, &ok_window);

        let report = render(
            ReportStyle::Narrative,
            &decision,
            &th,
            &ok_window,
            &[],
            fixed_now(),
        );
        assert!(report.subject.starts_with("[OK]"));
        assert!(report.body.contains("no problems were detected"));
    }

    #[test]
    fn test_tabular_layout_carries_the_same_facts() {
        let th = ThresholdConfig::default();
        let mut w = window(40, 12);
        w.fail_rate = Some(0.30);
        let decision = evaluate(&th, &w);

        let report = render(ReportStyle::Tabular, &decision, &th, &w, &[], fixed_now());
        assert!(report.body.contains("ALERT"));
        assert!(report.body.contains("30.0%"));
        assert!(report.body.contains("reasons:"));
        assert!(report.body.contains("- (none)"));
    }

    #[test]
    fn test_tabular_ok_omits_alert_sections() {
        let th = ThresholdConfig::default();
        let w = window(25, 0);
        let decision = evaluate(&th, &w);

        let report = render(ReportStyle::Tabular, &decision, &th, &w, &[], fixed_now());
        assert!(!report.body.contains("reasons:"));
        assert!(!report.body.contains("failing stages"));
    }
}
