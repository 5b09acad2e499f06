use axum::extract::State;
use axum::Json;
use shared_types::error::AppError;
use shared_types::facets::DashboardData;
use std::time::Duration;

use crate::engine;
use crate::state::AppState;

/// Dashboard charts summarize the whole corpus and change only on ingestion,
/// so they tolerate a much longer TTL than search results.
const DASHBOARD_TTL: Duration = Duration::from_secs(300);

const CACHE_KEY: &str = "dashboard";

/// GET /api/dashboard
///
/// Corpus-wide chart data: outcomes by state, application volume by month,
/// and the bargaining-unit size distribution.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Aggregate chart data", body = DashboardData),
        (status = 429, description = "Search engine rate limit exhausted", body = AppError),
        (status = 502, description = "Search engine unavailable", body = AppError)
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardData>, AppError> {
    if let Some(data) = state
        .cache
        .get(CACHE_KEY)
        .and_then(|v| serde_json::from_value::<DashboardData>(v).ok())
    {
        return Ok(Json(data));
    }

    let data = engine::dashboard::get_dashboard(&state.engine).await?;
    if let Ok(json) = serde_json::to_value(&data) {
        state.cache.set(CACHE_KEY, json, DASHBOARD_TTL);
    }
    Ok(Json(data))
}
