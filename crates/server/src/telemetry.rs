use axum::{body::Body, http::Request, response::Response};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::WithExportConfig;
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Keep the LoggerProvider alive for the process lifetime.
static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

/// Set up the OpenTelemetry TracerProvider and register it globally.
///
/// Must be called from within the Tokio runtime; tonic's `connect_lazy()`
/// spawns onto the current runtime.
///
/// Reads config from environment:
///   - `OTEL_EXPORTER_OTLP_ENDPOINT` — collector gRPC address
///       (e.g. `http://localhost:4317`)
///   - `OTEL_SERVICE_NAME` — service name tag (default: `outcomes-search`)
///   - `DEPLOY_ENV` — deployment environment tag (default: `development`)
pub fn init_telemetry() {
    let _ = dotenvy::dotenv();

    let endpoint = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(ep) => ep,
        Err(_) => {
            eprintln!("OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping OTLP telemetry");
            return;
        }
    };

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "outcomes-search".to_string());
    let environment = std::env::var("DEPLOY_ENV").unwrap_or_else(|_| "development".to_string());

    use opentelemetry_otlp::WithTonicConfig;

    let mut builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);

    // Enable TLS with system root certs for HTTPS collector endpoints
    if endpoint.starts_with("https://") {
        builder = builder.with_tls_config(
            opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots(),
        );
    }

    let exporter = builder.build().expect("Failed to create OTLP exporter");

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name)
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource.clone())
        .build();

    global::set_tracer_provider(provider);

    // -- Log exporter (bridges the `log` crate, not the tracing subscriber) --
    let mut log_builder = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if endpoint.starts_with("https://") {
        log_builder = log_builder.with_tls_config(
            opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots(),
        );
    }
    let log_exporter = log_builder
        .build()
        .expect("Failed to create OTLP log exporter");

    let logger_provider = opentelemetry_sdk::logs::SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();
    let _ = LOGGER_PROVIDER.set(logger_provider);

    let bridge =
        opentelemetry_appender_log::OpenTelemetryLogBridge::new(LOGGER_PROVIDER.get().unwrap());
    match log::set_boxed_logger(Box::new(bridge)) {
        Ok(()) => {
            log::set_max_level(log::LevelFilter::Info);
            eprintln!("Log bridge active — logs exporting over OTLP");
        }
        Err(_) => {
            eprintln!("Log bridge skipped — log crate logger already set");
        }
    }

    eprintln!("Telemetry initialized v{APP_VERSION} — traces + logs exporting to {endpoint}");
}

/// Tower layer that creates an OpenTelemetry span for each HTTP request.
///
/// Captures: method, path, user-agent, request ID, and response status.
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer("outcomes-search");
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.target", path.clone()),
            KeyValue::new("http.user_agent", user_agent),
            KeyValue::new("http.request_id", request_id),
        ];

        let span = tracer
            .span_builder(format!("{} {}", &method, &path))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));

            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            } else if status.is_client_error() {
                span.set_attribute(KeyValue::new("error.type", "client_error"));
            }

            Ok(response)
        })
    }
}
