use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use server::engine::client::EngineClient;
use server::state::AppState;
use server::{config, health, telemetry};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    telemetry::init_telemetry();
    health::record_start_time();

    let config = config::load();
    let shutdown = CancellationToken::new();

    let engine = EngineClient::new(
        config.engine_url.clone(),
        config.index.clone(),
        config.engine_api_key.clone(),
        shutdown.clone(),
    );
    let state = AppState::new(engine);

    let app = server::app(state, config.fixtures_enabled).layer(telemetry::OtelTraceLayer);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));
    tracing::info!(%addr, index = %config.index, fixtures = config.fixtures_enabled,
        "outcomes search server listening");

    let server_shutdown = shutdown.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
            server_shutdown.cancel();
        })
        .await;

    if let Err(e) = result {
        tracing::error!(error = %e, "server exited with error");
    }
}
