use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{get, test_app};

fn msearch_response() -> Value {
    json!({
        "responses": [
            {
                "aggregations": {
                    "items": {
                        "buckets": [
                            {"key": "recognized", "doc_count": 14},
                            {"key": "application_withdrawn", "doc_count": 6}
                        ]
                    }
                }
            },
            {
                "aggregations": {
                    "items": {
                        "doc_count": 20,
                        "items": {
                            "buckets": [
                                {"key": 1704067200000i64, "key_as_string": "2024-01", "doc_count": 8},
                                {"key": 1706745600000i64, "key_as_string": "2024-02", "doc_count": 12}
                            ]
                        }
                    }
                }
            },
            {
                "aggregations": {
                    "items": {
                        "buckets": [
                            {"key": 0, "doc_count": 5},
                            {"key": 50, "doc_count": 9}
                        ]
                    }
                }
            }
        ]
    })
}

#[tokio::test]
async fn dashboard_batches_three_charts_into_one_round_trip() {
    let (app, stub) = test_app().await;
    stub.push_response(StatusCode::OK, msearch_response());

    let (status, data) = get(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);

    // state buckets carry human labels
    assert_eq!(
        data["outcomesByState"][0],
        json!({ "value": "recognized", "label": "Union recognized", "count": 14 })
    );
    // month buckets use the formatted key
    assert_eq!(
        data["applicationsByMonth"],
        json!([
            { "value": "2024-01", "count": 8 },
            { "value": "2024-02", "count": 12 }
        ])
    );
    assert_eq!(
        data["bargainingUnitSizes"][1],
        json!({ "value": 50, "count": 9 })
    );

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/_msearch");

    // ndjson: one header line plus one body line per chart
    let lines: Vec<&str> = requests[0].body.lines().collect();
    assert_eq!(lines.len(), 6);
    for header in [lines[0], lines[2], lines[4]] {
        assert_eq!(
            serde_json::from_str::<Value>(header).unwrap(),
            json!({ "index": "cac-outcomes" })
        );
    }
}

#[tokio::test]
async fn dashboard_is_cached_across_requests() {
    let (app, stub) = test_app().await;
    stub.push_response(StatusCode::OK, msearch_response());

    let (_, first) = get(&app, "/api/dashboard").await;
    let (_, second) = get(&app, "/api/dashboard").await;
    assert_eq!(first, second);
    assert_eq!(stub.request_count(), 1);
}

/// A response without the expected envelope is an upstream error, not a
/// panic or an empty 200.
#[tokio::test]
async fn missing_responses_array_is_upstream_error() {
    let (app, stub) = test_app().await;
    stub.push_response(StatusCode::OK, json!({ "took": 2 }));

    let (status, body) = get(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "Upstream");
}

/// One malformed chart leaves the other charts intact.
#[tokio::test]
async fn malformed_chart_decodes_empty() {
    let (app, stub) = test_app().await;
    let mut response = msearch_response();
    response["responses"][1] = json!({ "error": "aggregation failed" });
    stub.push_response(StatusCode::OK, response);

    let (status, data) = get(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["applicationsByMonth"], json!([]));
    assert_eq!(data["outcomesByState"].as_array().unwrap().len(), 2);
}
