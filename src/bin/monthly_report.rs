//! Monthly digest sender
//!
//! Run with: cargo run --bin monthly_report
//!
//! Computes the previous calendar month, fetches its scan summary and the
//! daily high-risk-item detections, aggregates the ranking, and always sends
//! one digest mail. Uses the same environment variables as the alert check;
//! FORCE_SEND_OK and REPORT_STYLE are ignored here.

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocrwatch::monthly::{
    aggregate_high_risk, previous_month_range, render_digest, HIGH_RISK_RANK_LIMIT,
};
use ocrwatch::{Config, Mailer, PipelineError, StoreClient};

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
        println!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PipelineError> {
    let config = Config::from_env()?;
    let mailer = Mailer::new(&config.mail)?;
    let store = StoreClient::new(&config.store);

    let (start, end) = previous_month_range(Utc::now().date_naive());
    tracing::info!(%start, %end, "reporting on previous month");

    let summary = store.fetch_monthly_summary(start, end).await?;
    let daily_rows = store.fetch_high_risk_daily(start, end).await?;
    let ranking = aggregate_high_risk(daily_rows, HIGH_RISK_RANK_LIMIT);

    if summary.is_none() {
        tracing::warn!("no monthly summary row for the period, sending a no-data digest");
    }

    let rendered = render_digest(summary.as_ref(), &ranking, start, end);
    mailer.send(&rendered.subject, &rendered.body).await?;
    println!("Monthly report sent.");

    Ok(())
}
