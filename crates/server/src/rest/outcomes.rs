use axum::extract::{RawQuery, State};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::error::AppError;
use shared_types::facets::Facets;
use shared_types::outcome::OutcomesPage;
use shared_types::search_params::SearchParams;
use std::time::Duration;

use crate::engine;
use crate::state::AppState;

/// How long a search or facet response stays servable from memory.
const SEARCH_TTL: Duration = Duration::from_secs(60);

fn cached<T: DeserializeOwned>(state: &AppState, key: &str) -> Option<T> {
    state
        .cache
        .get(key)
        .and_then(|v| serde_json::from_value(v).ok())
}

fn store<T: Serialize>(state: &AppState, key: &str, value: &T, ttl: Duration) {
    if let Ok(json) = serde_json::to_value(value) {
        state.cache.set(key, json, ttl);
    }
}

/// GET /api/outcomes?query=...&state=...&page=...
///
/// One page of matching outcomes. The query string uses the application's
/// own parameter surface (dotted names, repeated keys), so the raw string is
/// decoded here rather than through the framework extractor. Decoding is
/// lenient; an unparseable parameter falls back to its default.
#[utoipa::path(
    get,
    path = "/api/outcomes",
    responses(
        (status = 200, description = "One page of matching outcomes", body = OutcomesPage),
        (status = 429, description = "Search engine rate limit exhausted", body = AppError),
        (status = 502, description = "Search engine unavailable", body = AppError)
    ),
    tag = "outcomes"
)]
pub async fn search_outcomes(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<OutcomesPage>, AppError> {
    let params = SearchParams::decode(query.as_deref().unwrap_or(""));
    let cache_key = format!("outcomes?{}", params.encode());

    // Debug responses carry the engine query and are never cached.
    if !params.debug {
        if let Some(page) = cached::<OutcomesPage>(&state, &cache_key) {
            return Ok(Json(page));
        }
    }

    let page = engine::outcomes::get_outcomes(&state.engine, &params).await?;
    if !params.debug {
        store(&state, &cache_key, &page, SEARCH_TTL);
    }
    Ok(Json(page))
}

/// GET /api/outcomes/facets?query=...&state=...
///
/// Facet counts for the same parameter surface as /api/outcomes. Counts for
/// each facet exclude that facet's own active filter.
#[utoipa::path(
    get,
    path = "/api/outcomes/facets",
    responses(
        (status = 200, description = "Facet counts for the active filters", body = Facets),
        (status = 429, description = "Search engine rate limit exhausted", body = AppError),
        (status = 502, description = "Search engine unavailable", body = AppError)
    ),
    tag = "outcomes"
)]
pub async fn get_facets(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Facets>, AppError> {
    let params = SearchParams::decode(query.as_deref().unwrap_or(""));
    let cache_key = format!("facets?{}", params.encode());

    if let Some(facets) = cached::<Facets>(&state, &cache_key) {
        return Ok(Json(facets));
    }

    let facets = engine::facets::get_facets(&state.engine, &params).await?;
    store(&state, &cache_key, &facets, SEARCH_TTL);
    Ok(Json(facets))
}
