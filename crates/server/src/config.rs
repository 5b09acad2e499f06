use std::sync::OnceLock;

/// Process-wide configuration, resolved once at startup. The engine client is
/// constructed from this before the first request is served, so credentials
/// are never fetched lazily on a request path.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the document search engine, e.g. `http://localhost:9200`.
    pub engine_url: String,
    /// Optional API key sent as `Authorization: ApiKey <key>`.
    pub engine_api_key: Option<String>,
    /// Index holding the outcome documents.
    pub index: String,
    pub port: u16,
    /// Mount the fake upstream APIs under `/fixtures` when true.
    pub fixtures_enabled: bool,
}

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Load configuration from the environment (and `.env` if present). Safe to
/// call multiple times; only the first call reads the environment.
pub fn load() -> &'static AppConfig {
    CONFIG.get_or_init(|| {
        let _ = dotenvy::dotenv();

        AppConfig {
            engine_url: std::env::var("SEARCH_ENGINE_URL")
                .expect("SEARCH_ENGINE_URL must be set"),
            engine_api_key: env_nonempty("SEARCH_ENGINE_API_KEY"),
            index: env_nonempty("SEARCH_INDEX").unwrap_or_else(|| "cac-outcomes".to_string()),
            port: env_nonempty("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            fixtures_enabled: env_nonempty("FIXTURES_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    })
}
