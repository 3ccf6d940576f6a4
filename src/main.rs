//! OCR alert check
//!
//! Run with: cargo run
//!
//! Fetches the alert thresholds, the rolling-window summary, and the
//! failing-stage ranking from the store, evaluates the thresholds, and
//! emails the report when alerting (or always, with FORCE_SEND_OK=true).
//!
//! Environment variables:
//! - SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY: store endpoint and credential
//! - SMTP_HOST / SMTP_PORT / SMTP_USER / SMTP_PASS: mail transport (port default: 587)
//! - REPORT_FROM / REPORT_TO: sender and recipient list (comma/semicolon separated)
//! - FORCE_SEND_OK: also send OK reports (default: false)
//! - REPORT_STYLE: narrative | tabular (default: narrative)
//! - RUST_LOG: log level (default: info)

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocrwatch::alerts::evaluate;
use ocrwatch::{report, Config, Mailer, PipelineError, StoreClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ocrwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        // diagnostic line for the scheduler's log, then a failure status
        println!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PipelineError> {
    let config = Config::from_env()?;
    // validate addressing before any network call
    let mailer = Mailer::new(&config.mail)?;
    let store = StoreClient::new(&config.store);

    let thresholds = store.fetch_thresholds().await?;
    let window = store.fetch_window_summary().await?;
    let stage_rank = store.fetch_stage_failure_rank().await?;

    let decision = evaluate(&thresholds, &window);
    tracing::info!(
        is_alert = decision.is_alert,
        total_count = window.total_count,
        fail_count = window.fail_count,
        reasons = decision.reasons.len(),
        "window evaluated"
    );

    let rendered = report::render(
        config.report_style,
        &decision,
        &thresholds,
        &window,
        &stage_rank,
        Utc::now(),
    );

    if decision.is_alert || config.force_send_ok {
        mailer.send(&rendered.subject, &rendered.body).await?;
        println!("MAIL sent");
    } else {
        println!("OK (no alert)");
    }

    Ok(())
}
