//! Date-range computation and digest rendering

use chrono::{Datelike, NaiveDate};

use super::aggregate::HighRiskItem;
use crate::report::{Report, NOT_COMPUTED};
use crate::store::MonthlySummary;

/// First and last day of the calendar month before `today`, inclusive.
/// Leap years fall out of the calendar arithmetic: the previous month's last
/// day is simply the day before this month's first.
pub fn previous_month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_of_this_month = today
        .with_day(1)
        .expect("day 1 exists in every month");
    let end = first_of_this_month
        .pred_opt()
        .expect("date range underflow");
    let start = end.with_day(1).expect("day 1 exists in every month");
    (start, end)
}

/// Render a numeric figure with its unit, or the bare not-computed marker
/// (never `not computed%`).
fn num(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => NOT_COMPUTED.to_string(),
    }
}

/// Render the monthly digest. A missing summary row produces a "no data"
/// body instead of failing; the digest is sent either way.
pub fn render_digest(
    summary: Option<&MonthlySummary>,
    ranking: &[HighRiskItem],
    start: NaiveDate,
    end: NaiveDate,
) -> Report {
    let subject = format!(
        "Ingredient scan monthly report ({})",
        start.format("%Y-%m")
    );
    let period = format!("{} .. {}", start, end);

    let Some(summary) = summary else {
        return Report {
            subject,
            body: format!(
                "Ingredient scan monthly report\n\
                 \n\
                 Period: {period}\n\
                 \n\
                 No scan data was recorded for this period.\n"
            ),
        };
    };

    let mut lines = vec![
        "Ingredient scan monthly report".to_string(),
        String::new(),
        format!("Period: {period}"),
        String::new(),
        "Key figures".to_string(),
        format!("- scans performed:       {}", summary.scan_count),
        format!("- scans with any error:  {}", summary.any_fail_count),
        format!("- error rate:            {}", num(summary.error_rate_pct, "%")),
        format!("- avg response time:     {}", num(summary.avg_duration_ms, " ms")),
        format!("- active users:          {}", summary.user_count),
        String::new(),
        "High-risk additives (most detected first)".to_string(),
    ];

    if ranking.is_empty() {
        lines.push("(no high-risk additives were detected this period)".to_string());
    } else {
        for (i, item) in ranking.iter().enumerate() {
            lines.push(format!(
                "{}. {} (code: {}, category: {}, risk level: {}) - {} detections",
                i + 1,
                item.name_ja.as_deref().unwrap_or("(unnamed)"),
                item.code.as_deref().unwrap_or("-"),
                item.category.as_deref().unwrap_or("-"),
                item.risk_level
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                item.total_count,
            ));
        }
    }

    lines.push(String::new());
    lines.push("This mail was sent automatically.".to_string());
    lines.push(String::new());

    Report {
        subject,
        body: lines.join("\n"),
    }
}
