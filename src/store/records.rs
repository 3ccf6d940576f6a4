//! Typed records for fetched store rows
//!
//! Rows arrive as JSON with nullable columns. Each record resolves absence
//! at the boundary: counts become 0, thresholds take documented defaults,
//! and rates/scores stay `Option<f64>` so the formatter can distinguish
//! "not computed" from a genuine zero.

use serde::{Deserialize, Deserializer};

fn null_to_zero_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Alert thresholds, fetched fresh each run from the singleton row.
///
/// `Default` provides the documented fallback used when the store has no
/// thresholds row; null columns in an existing row fall back per field.
/// Immutable within a run.
#[derive(Debug, Clone)]
pub struct ThresholdConfig {
    pub window_minutes: i64,
    pub max_fail_count: i64,
    /// 0..=1 fraction of failed runs in the window.
    pub max_fail_rate: f64,
    /// Quality score below which an image counts as low quality.
    pub quality_score_threshold: f64,
    /// 0..=1 fraction of low-quality images.
    pub max_low_quality_rate: f64,
    /// Unknown-word ratio above which a scan counts as high-unknown.
    pub unknown_ratio_threshold: f64,
    /// 0..=1 fraction of high-unknown scans.
    pub max_high_unknown_rate: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            window_minutes: 60,
            max_fail_count: 5,
            max_fail_rate: 0.20,
            quality_score_threshold: 40.0,
            max_low_quality_rate: 0.30,
            unknown_ratio_threshold: 0.50,
            max_high_unknown_rate: 0.30,
        }
    }
}

/// Raw thresholds row as stored; every column nullable.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ThresholdRow {
    #[serde(default)]
    window_minutes: Option<i64>,
    #[serde(default)]
    max_fail_count: Option<i64>,
    #[serde(default)]
    max_fail_rate: Option<f64>,
    #[serde(default)]
    quality_score_threshold: Option<f64>,
    #[serde(default)]
    max_low_quality_rate: Option<f64>,
    #[serde(default)]
    unknown_ratio_threshold: Option<f64>,
    #[serde(default)]
    max_high_unknown_rate: Option<f64>,
}

impl From<ThresholdRow> for ThresholdConfig {
    fn from(row: ThresholdRow) -> Self {
        let d = ThresholdConfig::default();
        Self {
            window_minutes: row.window_minutes.unwrap_or(d.window_minutes),
            max_fail_count: row.max_fail_count.unwrap_or(d.max_fail_count),
            max_fail_rate: row.max_fail_rate.unwrap_or(d.max_fail_rate),
            quality_score_threshold: row
                .quality_score_threshold
                .unwrap_or(d.quality_score_threshold),
            max_low_quality_rate: row
                .max_low_quality_rate
                .unwrap_or(d.max_low_quality_rate),
            unknown_ratio_threshold: row
                .unknown_ratio_threshold
                .unwrap_or(d.unknown_ratio_threshold),
            max_high_unknown_rate: row
                .max_high_unknown_rate
                .unwrap_or(d.max_high_unknown_rate),
        }
    }
}

/// One rolling-window aggregate of OCR processing outcomes.
#[derive(Debug, Clone, Deserialize)]
pub struct WindowSummary {
    #[serde(default)]
    pub window_minutes: Option<i64>,
    #[serde(default, deserialize_with = "null_to_zero_i64")]
    pub total_count: i64,
    #[serde(default, deserialize_with = "null_to_zero_i64")]
    pub fail_count: i64,
    #[serde(default)]
    pub fail_rate: Option<f64>,
    #[serde(default)]
    pub avg_quality_score: Option<f64>,
    #[serde(default, deserialize_with = "null_to_zero_i64")]
    pub low_quality_count: i64,
    #[serde(default)]
    pub low_quality_rate: Option<f64>,
    #[serde(default, deserialize_with = "null_to_zero_i64")]
    pub high_unknown_count: i64,
    #[serde(default)]
    pub high_unknown_rate: Option<f64>,
}

impl WindowSummary {
    /// Window length, falling back to the thresholds row when the view did
    /// not carry one.
    pub fn window_minutes_or(&self, thresholds: &ThresholdConfig) -> i64 {
        self.window_minutes.unwrap_or(thresholds.window_minutes)
    }
}

/// One entry of the ranked failing-stage list, descending by count.
#[derive(Debug, Clone, Deserialize)]
pub struct StageFailure {
    #[serde(default)]
    pub error_stage: Option<String>,
    #[serde(default, deserialize_with = "null_to_zero_i64")]
    pub cnt: i64,
}

/// Aggregate row for one calendar month.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlySummary {
    #[serde(default, deserialize_with = "null_to_zero_i64")]
    pub scan_count: i64,
    #[serde(default, deserialize_with = "null_to_zero_i64")]
    pub any_fail_count: i64,
    #[serde(default)]
    pub error_rate_pct: Option<f64>,
    #[serde(default)]
    pub avg_duration_ms: Option<f64>,
    #[serde(default, deserialize_with = "null_to_zero_i64")]
    pub user_count: i64,
}

/// One day's detection count for one high-risk item.
#[derive(Debug, Clone, Deserialize)]
pub struct HighRiskDaily {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name_ja: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub risk_level: Option<i64>,
    #[serde(default, deserialize_with = "null_to_zero_i64")]
    pub detect_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_row_with_nulls_falls_back_per_field() {
        let row: ThresholdRow = serde_json::from_str(
            r#"{"id": 1, "max_fail_count": 3, "max_fail_rate": null}"#,
        )
        .unwrap();
        let config = ThresholdConfig::from(row);
        assert_eq!(config.max_fail_count, 3);
        // null and missing columns both take the documented default
        assert_eq!(config.max_fail_rate, 0.20);
        assert_eq!(config.window_minutes, 60);
    }

    #[test]
    fn test_window_summary_null_counts_resolve_to_zero() {
        let row: WindowSummary = serde_json::from_str(
            r#"{"window_minutes": 60, "total_count": null, "fail_count": 2,
                "fail_rate": null, "low_quality_rate": 0.1}"#,
        )
        .unwrap();
        assert_eq!(row.total_count, 0);
        assert_eq!(row.fail_count, 2);
        assert!(row.fail_rate.is_none());
        assert_eq!(row.low_quality_rate, Some(0.1));
        assert!(row.avg_quality_score.is_none());
    }

    #[test]
    fn test_stage_failure_tolerates_null_stage() {
        let row: StageFailure =
            serde_json::from_str(r#"{"error_stage": null, "cnt": 4}"#).unwrap();
        assert!(row.error_stage.is_none());
        assert_eq!(row.cnt, 4);
    }

    #[test]
    fn test_high_risk_daily_ignores_extra_columns() {
        let row: HighRiskDaily = serde_json::from_str(
            r#"{"code": "E211", "name_ja": "安息香酸Na", "category": "preservative",
                "risk_level": 3, "detect_count": 5, "scan_date": "2024-02-03"}"#,
        )
        .unwrap();
        assert_eq!(row.code.as_deref(), Some("E211"));
        assert_eq!(row.detect_count, 5);
    }

    #[test]
    fn test_window_minutes_falls_back_to_thresholds() {
        let row: WindowSummary =
            serde_json::from_str(r#"{"total_count": 1, "fail_count": 0}"#).unwrap();
        let thresholds = ThresholdConfig::default();
        assert_eq!(row.window_minutes_or(&thresholds), 60);
    }
}
