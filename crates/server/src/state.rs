use axum::extract::FromRef;
use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::engine::client::EngineClient;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers can extract the engine client or the
/// response cache directly.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub engine: Arc<EngineClient>,
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    pub fn new(engine: EngineClient) -> Self {
        AppState {
            engine: Arc::new(engine),
            cache: Arc::new(ResponseCache::new()),
        }
    }
}
