//! HTTP client for the search engine, with bounded retry on rate limiting.

use rand::Rng;
use reqwest::{header, StatusCode};
use serde_json::Value;
use shared_types::error::AppError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Total attempts per logical request, including the first.
pub const MAX_ATTEMPTS: u32 = 3;
/// Backoff base. Attempt `n` sleeps a uniformly random duration in
/// `[0, BASE_DELAY_MS * 2^(n-1)]` (full jitter).
pub const BASE_DELAY_MS: u64 = 50;

const NDJSON: &str = "application/x-ndjson";

pub struct EngineClient {
    http: reqwest::Client,
    base_url: String,
    index: String,
    api_key: Option<String>,
    cancel: CancellationToken,
}

impl EngineClient {
    pub fn new(
        base_url: impl Into<String>,
        index: impl Into<String>,
        api_key: Option<String>,
        cancel: CancellationToken,
    ) -> Self {
        EngineClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            index: index.into(),
            api_key,
            cancel,
        }
    }

    /// Run one search against the configured index.
    pub async fn search(&self, body: &Value) -> Result<Value, AppError> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        let payload = serde_json::to_string(body)
            .map_err(|e| AppError::internal(format!("failed to encode search request: {e}")))?;
        self.execute(&url, payload, "application/json").await
    }

    /// Run several searches in one round trip. Returns one response value per
    /// request body, in order.
    pub async fn msearch(&self, bodies: &[Value]) -> Result<Vec<Value>, AppError> {
        let mut payload = String::new();
        for body in bodies {
            payload.push_str(&format!("{{\"index\":{}}}\n", Value::String(self.index.clone())));
            let line = serde_json::to_string(body).map_err(|e| {
                AppError::internal(format!("failed to encode msearch request: {e}"))
            })?;
            payload.push_str(&line);
            payload.push('\n');
        }

        let url = format!("{}/_msearch", self.base_url);
        let response = self.execute(&url, payload, NDJSON).await?;
        let responses = response
            .get("responses")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| AppError::upstream("msearch response missing responses array"))?;
        if responses.len() != bodies.len() {
            return Err(AppError::upstream(format!(
                "msearch returned {} responses for {} requests",
                responses.len(),
                bodies.len()
            )));
        }
        Ok(responses)
    }

    /// POST with retry. Only 429 is retried; all other failures surface on
    /// the first attempt. The whole exchange aborts promptly when the
    /// shutdown token fires, including mid-backoff.
    async fn execute(
        &self,
        url: &str,
        payload: String,
        content_type: &'static str,
    ) -> Result<Value, AppError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let mut request = self
                .http
                .post(url)
                .header(header::CONTENT_TYPE, content_type)
                .body(payload.clone());
            if let Some(key) = &self.api_key {
                request = request.header(header::AUTHORIZATION, format!("ApiKey {key}"));
            }

            let response = tokio::select! {
                result = request.send() => {
                    result.map_err(|e| AppError::upstream(format!("engine unreachable: {e}")))?
                }
                _ = self.cancel.cancelled() => {
                    return Err(AppError::upstream("engine request cancelled"));
                }
            };

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS if attempt < MAX_ATTEMPTS => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, %url,
                        "engine rate limited, backing off");
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = self.cancel.cancelled() => {
                            return Err(AppError::upstream("engine request cancelled"));
                        }
                    }
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    return Err(AppError::rate_limited(format!(
                        "engine still rate limited after {MAX_ATTEMPTS} attempts"
                    )));
                }
                status if !status.is_success() => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::upstream(format!(
                        "engine returned {status}: {}",
                        truncate(&body, 200)
                    )));
                }
                _ => {
                    return response
                        .json::<Value>()
                        .await
                        .map_err(|e| AppError::upstream(format!("undecodable engine response: {e}")));
                }
            }
        }
        unreachable!("retry loop returns on the final attempt")
    }
}

/// Full-jitter exponential backoff.
fn backoff_delay(attempt: u32) -> Duration {
    let ceiling = BASE_DELAY_MS * 2u64.pow(attempt - 1);
    Duration::from_millis(rand::thread_rng().gen_range(0..=ceiling))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
