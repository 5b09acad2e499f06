pub mod dashboard;
pub mod outcomes;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/outcomes", get(outcomes::search_outcomes))
        .route("/api/outcomes/facets", get(outcomes::get_facets))
        .route("/api/dashboard", get(dashboard::get_dashboard))
}
