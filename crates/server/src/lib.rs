pub mod cache;
pub mod config;
pub mod engine;
pub mod fixtures;
pub mod health;
pub mod openapi;
pub mod rest;
pub mod state;
pub mod telemetry;

use axum::{routing::get, Router};

use state::AppState;

/// Build the full application router. Fixtures are mounted only when asked
/// for, so production never exposes the fake upstreams.
pub fn app(state: AppState, fixtures_enabled: bool) -> Router {
    let mut router = rest::api_router().route("/health", get(health::health_check));
    if fixtures_enabled {
        router = router.merge(fixtures::fixtures_router());
    }
    router.with_state(state)
}
