use analytics_service::{config::AppConfig, observability, service::AnalyticsService, store::PgStore};
use anyhow::Result;
use sqlx::postgres::PgPoolOptions;

/// One-shot forecast-accuracy report for a single user, printed as JSON.
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let user_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: accuracy_report <user_id>"))?;

    let cfg = AppConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect(&cfg.database.uri)
        .await?;

    let service = AnalyticsService::new(PgStore::new(pool));
    let report = service.accuracy_analysis(&user_id).await?;

    tracing::info!(
        user_id,
        total = report.total_simulations,
        with_real = report.simulations_with_real,
        accuracy_pct = report.accuracy_percentage,
        "accuracy analysis complete"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
