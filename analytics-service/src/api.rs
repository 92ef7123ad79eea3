use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::analytics::{anomaly, projection, simulation};
use crate::error::AnalyticsError;
use crate::service::{resolve_scope, AnalyticsService};
use crate::store::{PgStore, TimeRange};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalyticsService<PgStore>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analytics/consumption/stats", get(consumption_stats))
        .route("/analytics/consumption/anomalies", get(consumption_anomalies))
        .route("/analytics/consumption/projection", get(consumption_projection))
        .route("/analytics/tariffs/:id/peak", get(tariff_peak))
        .route("/analytics/tariffs/:id/cost", post(tariff_cost))
        .route("/analytics/tariffs/:id/estimate", post(tariff_estimate))
        .route("/analytics/simulations/auto", post(auto_simulation))
        .route("/analytics/simulations/accuracy", get(simulation_accuracy))
        .with_state(state)
}

impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            // A failed read must not be dressed up as data; surface a 500
            // and keep the detail in the log.
            Self::Store(e) => {
                tracing::error!(error = %e, "storage collaborator failure");
                metrics::counter!("analytics_store_errors_total").increment(1);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Deserialize)]
struct StatsQuery {
    plant_id: Option<String>,
    area_id: Option<String>,
    device_id: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    end: Option<OffsetDateTime>,
}

async fn consumption_stats(
    State(state): State<AppState>,
    Query(q): Query<StatsQuery>,
) -> Result<Response, AnalyticsError> {
    metrics::counter!("analytics_http_requests_total").increment(1);
    let scope = resolve_scope(q.plant_id, q.area_id, q.device_id)?;
    let range = TimeRange {
        start: q.start,
        end: q.end,
    };
    let stats = state.service.aggregate(&scope, range).await?;
    Ok(Json(stats).into_response())
}

#[derive(Deserialize)]
struct AnomalyQuery {
    device_id: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    end: Option<OffsetDateTime>,
    threshold: Option<f64>,
}

async fn consumption_anomalies(
    State(state): State<AppState>,
    Query(q): Query<AnomalyQuery>,
) -> Result<Response, AnalyticsError> {
    metrics::counter!("analytics_http_requests_total").increment(1);
    let range = TimeRange {
        start: q.start,
        end: q.end,
    };
    let report = state
        .service
        .detect_anomalies(
            &q.device_id,
            range,
            q.threshold.unwrap_or(anomaly::DEFAULT_THRESHOLD),
        )
        .await?;
    Ok(Json(report).into_response())
}

#[derive(Deserialize)]
struct ProjectionQuery {
    device_id: String,
    historical_days: Option<u32>,
    projection_days: Option<u32>,
}

async fn consumption_projection(
    State(state): State<AppState>,
    Query(q): Query<ProjectionQuery>,
) -> Result<Response, AnalyticsError> {
    metrics::counter!("analytics_http_requests_total").increment(1);
    let projected = state
        .service
        .project_consumption(
            &q.device_id,
            q.historical_days.unwrap_or(projection::DEFAULT_HISTORICAL_DAYS),
            q.projection_days.unwrap_or(projection::DEFAULT_PROJECTION_DAYS),
        )
        .await?;
    Ok(Json(projected).into_response())
}

#[derive(Deserialize)]
struct PeakQuery {
    #[serde(default, with = "time::serde::rfc3339::option")]
    at: Option<OffsetDateTime>,
}

async fn tariff_peak(
    State(state): State<AppState>,
    Path(tariff_id): Path<String>,
    Query(q): Query<PeakQuery>,
) -> Result<Response, AnalyticsError> {
    metrics::counter!("analytics_http_requests_total").increment(1);
    let status = state.service.check_peak_time(&tariff_id, q.at).await?;
    Ok(Json(status).into_response())
}

#[derive(Deserialize)]
struct CostRequest {
    regular_kwh: f64,
    #[serde(default)]
    peak_kwh: f64,
}

async fn tariff_cost(
    State(state): State<AppState>,
    Path(tariff_id): Path<String>,
    Json(body): Json<CostRequest>,
) -> Result<Response, AnalyticsError> {
    metrics::counter!("analytics_http_requests_total").increment(1);
    let breakdown = state
        .service
        .calculate_cost(&tariff_id, body.regular_kwh, body.peak_kwh)
        .await?;
    Ok(Json(breakdown).into_response())
}

#[derive(Deserialize)]
struct EstimateRequest {
    daily_regular_kwh: f64,
    #[serde(default)]
    daily_peak_kwh: f64,
}

async fn tariff_estimate(
    State(state): State<AppState>,
    Path(tariff_id): Path<String>,
    Json(body): Json<EstimateRequest>,
) -> Result<Response, AnalyticsError> {
    metrics::counter!("analytics_http_requests_total").increment(1);
    let estimate = state
        .service
        .estimate_cost(&tariff_id, body.daily_regular_kwh, body.daily_peak_kwh)
        .await?;
    Ok(Json(estimate).into_response())
}

#[derive(Deserialize)]
struct AutoSimulationRequest {
    plant_id: Option<String>,
    area_id: Option<String>,
    device_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    period_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    period_end: OffsetDateTime,
    adjustment_factor: Option<f64>,
}

async fn auto_simulation(
    State(state): State<AppState>,
    Json(body): Json<AutoSimulationRequest>,
) -> Result<Response, AnalyticsError> {
    metrics::counter!("analytics_http_requests_total").increment(1);
    let scope = resolve_scope(body.plant_id, body.area_id, body.device_id)?;
    let draft = state
        .service
        .auto_calculate_simulation(
            &scope,
            body.period_start,
            body.period_end,
            body.adjustment_factor
                .unwrap_or(simulation::DEFAULT_ADJUSTMENT_FACTOR),
        )
        .await?;
    Ok(Json(draft).into_response())
}

#[derive(Deserialize)]
struct AccuracyQuery {
    user_id: String,
}

async fn simulation_accuracy(
    State(state): State<AppState>,
    Query(q): Query<AccuracyQuery>,
) -> Result<Response, AnalyticsError> {
    metrics::counter!("analytics_http_requests_total").increment(1);
    let report = state.service.accuracy_analysis(&q.user_id).await?;
    Ok(Json(report).into_response())
}
