//! HTTP client for the metrics store

use std::time::Duration;

use serde::de::DeserializeOwned;

use chrono::NaiveDate;

use super::records::{
    HighRiskDaily, MonthlySummary, StageFailure, ThresholdConfig, ThresholdRow, WindowSummary,
};
use crate::config::StoreConfig;

/// How many failing stages the alert report lists.
pub const STAGE_RANK_LIMIT: usize = 8;

/// Client for the store's PostgREST-style read interface.
///
/// All queries are plain GETs with the service key sent as both `apikey`
/// and bearer token. No retries: any failure is fatal to the run.
#[derive(Debug, Clone)]
pub struct StoreClient {
    base_url: String,
    service_key: String,
    http_client: reqwest::Client,
}

impl StoreClient {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            service_key: config.service_key.clone(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetch the thresholds singleton, substituting documented defaults when
    /// the store has no row.
    pub async fn fetch_thresholds(&self) -> Result<ThresholdConfig, FetchError> {
        let rows: Vec<ThresholdRow> = self.get_rows("ocr_alert_thresholds?select=*&id=eq.1").await?;
        Ok(thresholds_or_default(rows))
    }

    /// Fetch the rolling-window summary. An empty result is fatal: there is
    /// nothing to evaluate.
    pub async fn fetch_window_summary(&self) -> Result<WindowSummary, FetchError> {
        let rows: Vec<WindowSummary> = self.get_rows("v_ocr_alert_window?select=*").await?;
        rows.into_iter()
            .next()
            .ok_or(FetchError::EmptyResult("v_ocr_alert_window"))
    }

    /// Fetch the failing-stage ranking, descending by count. May be empty.
    pub async fn fetch_stage_failure_rank(&self) -> Result<Vec<StageFailure>, FetchError> {
        self.get_rows(&format!(
            "v_ocr_alert_error_stage_rank?select=*&order=cnt.desc&limit={}",
            STAGE_RANK_LIMIT
        ))
        .await
    }

    /// Fetch the monthly summary row for a date range. Absence is non-fatal.
    pub async fn fetch_monthly_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<MonthlySummary>, FetchError> {
        let rows: Vec<MonthlySummary> = self
            .get_rows(&format!(
                "v_ocr_scan_monthly_summary?select=*&month=gte.{}&month=lte.{}",
                start, end
            ))
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Fetch daily high-risk-item detections across a date range.
    pub async fn fetch_high_risk_daily(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HighRiskDaily>, FetchError> {
        self.get_rows(&format!(
            "v_ocr_high_risk_additives_daily?select=code,name_ja,category,risk_level,detect_count,scan_date&scan_date=gte.{}&scan_date=lte.{}",
            start, end
        ))
        .await
    }

    /// GET one resource and deserialize the JSON-array response.
    async fn get_rows<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let url = format!("{}/rest/v1/{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| FetchError::Deserialization(e.to_string()))
    }
}

/// Select the fetched thresholds row, or the documented defaults when the
/// store returned none.
fn thresholds_or_default(rows: Vec<ThresholdRow>) -> ThresholdConfig {
    match rows.into_iter().next() {
        Some(row) => row.into(),
        None => {
            tracing::warn!("thresholds row missing, using built-in defaults");
            ThresholdConfig::default()
        }
    }
}

/// Fetch errors: fatal, propagated immediately, never retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("store request failed: {0}")]
    Network(String),

    #[error("store GET failed: {status} {body}")]
    Status { status: u16, body: String },

    #[error("store response malformed: {0}")]
    Deserialization(String),

    #[error("{0} returned empty")]
    EmptyResult(&'static str),
}
