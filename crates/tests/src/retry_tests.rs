use axum::http::StatusCode;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use server::engine::client::EngineClient;
use shared_types::error::AppErrorKind;

use crate::common::{display_doc, get, search_response, test_app};

/// Rate-limited attempts are retried and the eventual success is returned as
/// if nothing happened.
#[tokio::test]
async fn rate_limit_is_retried_until_success() {
    let (app, stub) = test_app().await;
    stub.push_response(StatusCode::TOO_MANY_REQUESTS, json!({ "error": "throttled" }));
    stub.push_response(StatusCode::TOO_MANY_REQUESTS, json!({ "error": "throttled" }));
    stub.push_response(
        StatusCode::OK,
        search_response(
            1,
            &[display_doc("TUR1/1001(2024)", "recognized", "Union recognized")],
        ),
    );

    let (status, page) = get(&app, "/api/outcomes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["size"], 1);
    assert_eq!(stub.request_count(), 3);
}

/// After the attempt budget is spent the client gives up and the caller sees
/// the rate limit.
#[tokio::test]
async fn rate_limit_exhausts_after_three_attempts() {
    let (app, stub) = test_app().await;
    for _ in 0..3 {
        stub.push_response(StatusCode::TOO_MANY_REQUESTS, json!({ "error": "throttled" }));
    }

    let (status, body) = get(&app, "/api/outcomes").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["kind"], "RateLimited");
    assert_eq!(stub.request_count(), 3);
}

/// Only 429 triggers the retry loop. Other failures are terminal on the
/// first attempt.
#[tokio::test]
async fn server_errors_are_not_retried() {
    let (app, stub) = test_app().await;
    stub.push_response(StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "down" }));

    let (status, body) = get(&app, "/api/outcomes").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "Upstream");
    assert_eq!(stub.request_count(), 1);
}

/// Shutdown aborts a pending retry. The upstream here rate-limits and fires
/// the token before responding, so the client is cancelled during (or right
/// after) its backoff and never sends a second request.
#[tokio::test]
async fn cancellation_during_backoff_stops_retrying() {
    let hits = Arc::new(AtomicUsize::new(0));
    let cancel = CancellationToken::new();

    let counter = hits.clone();
    let token = cancel.clone();
    let upstream = Router::new().fallback(move || {
        let counter = counter.clone();
        let token = token.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            token.cancel();
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "throttled" })),
            )
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, upstream).await;
    });

    let engine = EngineClient::new(format!("http://{addr}"), "cac-outcomes", None, cancel);
    let err = engine
        .search(&json!({ "query": { "match_all": {} } }))
        .await
        .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Upstream);
    assert!(err.message.contains("cancelled"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

/// A retried success lands in the cache like any other; the retry wrapper is
/// invisible to the caching layer.
#[tokio::test]
async fn retried_response_is_still_cached() {
    let (app, stub) = test_app().await;
    stub.push_response(StatusCode::TOO_MANY_REQUESTS, json!({ "error": "throttled" }));
    stub.push_response(
        StatusCode::OK,
        search_response(
            1,
            &[display_doc("TUR1/1002(2024)", "ballot_ordered", "Ballot ordered")],
        ),
    );

    let (first_status, first) = get(&app, "/api/outcomes?state=ballot_ordered").await;
    assert_eq!(first_status, StatusCode::OK);
    let (_, second) = get(&app, "/api/outcomes?state=ballot_ordered").await;
    assert_eq!(first, second);
    assert_eq!(stub.request_count(), 2);
}
