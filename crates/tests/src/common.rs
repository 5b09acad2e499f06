use axum::{
    body::Body,
    http::{Method, Request, StatusCode, Uri},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use server::engine::client::EngineClient;
use server::state::AppState;

/// A request the stub engine received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).expect("recorded request body is not JSON")
    }
}

/// In-process stand-in for the search engine. Records every request body and
/// replays scripted responses in order; once the script is exhausted it
/// answers with an empty search result.
#[derive(Clone)]
pub struct StubEngine {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
}

fn empty_search_response() -> Value {
    json!({ "hits": { "total": { "value": 0, "relation": "eq" }, "hits": [] } })
}

impl StubEngine {
    pub async fn spawn() -> StubEngine {
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let responses: Arc<Mutex<VecDeque<(StatusCode, Value)>>> =
            Arc::new(Mutex::new(VecDeque::new()));

        let recorded = requests.clone();
        let scripted = responses.clone();
        let app = Router::new().fallback(move |uri: Uri, body: String| {
            let recorded = recorded.clone();
            let scripted = scripted.clone();
            async move {
                recorded.lock().unwrap().push(RecordedRequest {
                    path: uri.path().to_string(),
                    body,
                });
                let (status, value) = scripted
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or((StatusCode::OK, empty_search_response()));
                (status, Json(value))
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub engine");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        StubEngine {
            url: format!("http://{addr}"),
            requests,
            responses,
        }
    }

    /// Queue the next response the stub will return.
    pub fn push_response(&self, status: StatusCode, body: Value) {
        self.responses.lock().unwrap().push_back((status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Build the application router against a fresh stub engine. Fixtures are
/// mounted so fixture endpoints are testable through the same router.
pub async fn test_app() -> (Router, StubEngine) {
    let stub = StubEngine::spawn().await;
    let engine = EngineClient::new(
        stub.url.clone(),
        "cac-outcomes",
        None,
        CancellationToken::new(),
    );
    let app = server::app(AppState::new(engine), true);
    (app, stub)
}

/// GET a route and parse the JSON response.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// POST JSON to a route.
pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// Send a request through the router and parse the response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).expect("response body is not JSON")
    };
    (status, value)
}

/// A display document in the shape the engine stores it.
pub fn display_doc(reference: &str, state: &str, label: &str) -> Value {
    json!({
        "reference": reference,
        "title": format!("Test Union & {reference}"),
        "state": { "value": state, "label": label },
        "parties": { "unions": ["Test Union"], "employer": "Test Employer Ltd" },
        "events": [{ "type": "application_received", "date": "2024-01-15" }],
        "keyDates": { "applicationReceived": "2024-01-15" },
        "lastUpdated": "2024-05-02T09:30:00Z"
    })
}

/// A search response with the given display documents.
pub fn search_response(total: i64, docs: &[Value]) -> Value {
    let hits: Vec<Value> = docs
        .iter()
        .map(|doc| json!({ "_id": doc["reference"], "_source": { "display": doc } }))
        .collect();
    json!({ "hits": { "total": { "value": total, "relation": "eq" }, "hits": hits } })
}
