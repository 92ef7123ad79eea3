use std::net::SocketAddr;
use std::sync::Arc;

use analytics_service::{
    api::{self, AppState},
    config::AppConfig,
    metrics_server, observability,
    service::AnalyticsService,
    store::PgStore,
};
use anyhow::Result;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics exporter if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect(&cfg.database.uri)
        .await?;

    let service = Arc::new(AnalyticsService::new(PgStore::new(pool)));
    let app = api::router(AppState { service });

    let addr: SocketAddr = cfg
        .api
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid api.bind_addr: {e}"))?;

    tracing::info!(%addr, "analytics API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
