use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{display_doc, get, search_response, test_app};

/// A filtered search sends the expected engine request and returns the page.
#[tokio::test]
async fn search_returns_page_and_sends_filtered_query() {
    let (app, stub) = test_app().await;
    stub.push_response(
        StatusCode::OK,
        search_response(
            57,
            &[display_doc("TUR1/1001(2024)", "recognized", "Union recognized")],
        ),
    );

    let (status, page) = get(&app, "/api/outcomes?state=recognized").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["size"], 57);
    assert_eq!(page["docs"][0]["reference"], "TUR1/1001(2024)");
    assert!(page.get("query").is_none());

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/cac-outcomes/_search");

    let body = requests[0].body_json();
    assert_eq!(body["from"], 0);
    assert_eq!(body["size"], 20);
    assert_eq!(body["_source"], json!(["display"]));
    assert_eq!(
        body["query"]["bool"]["filter"][0]["terms"],
        json!({ "filter.state": ["recognized"], "_name": "state" })
    );
}

#[tokio::test]
async fn page_parameter_moves_the_offset_window() {
    let (app, stub) = test_app().await;
    let (status, _) = get(&app, "/api/outcomes?page=4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stub.requests()[0].body_json()["from"], 60);
}

/// A page past the last one still reports the true total; the document list
/// is simply empty.
#[tokio::test]
async fn page_past_the_end_keeps_true_total_with_no_docs() {
    let (app, stub) = test_app().await;
    stub.push_response(StatusCode::OK, search_response(57, &[]));

    let (status, page) = get(&app, "/api/outcomes?page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["size"], 57);
    assert_eq!(page["docs"], json!([]));
    assert_eq!(stub.requests()[0].body_json()["from"], 160);
}

#[tokio::test]
async fn sort_parameter_reaches_the_engine() {
    let (app, stub) = test_app().await;
    let (status, _) = get(&app, "/api/outcomes?sort=applicationDate-asc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stub.requests()[0].body_json()["sort"],
        json!([
            { "filter.keyDates.applicationReceived": { "order": "asc" } },
            { "filter.reference": { "order": "asc" } },
        ])
    );
}

/// Identical parameter bags are served from cache within the TTL; the
/// canonical cache key makes parameter order irrelevant.
#[tokio::test]
async fn repeat_search_is_served_from_cache() {
    let (app, stub) = test_app().await;
    stub.push_response(
        StatusCode::OK,
        search_response(
            1,
            &[display_doc("TUR1/1002(2024)", "ballot_ordered", "Ballot ordered")],
        ),
    );

    let (_, first) = get(&app, "/api/outcomes?state=ballot_ordered&query=depot").await;
    let (_, second) = get(&app, "/api/outcomes?query=depot&state=ballot_ordered").await;
    assert_eq!(first, second);
    assert_eq!(stub.request_count(), 1);
}

/// Debug requests echo the engine query and bypass the cache entirely.
#[tokio::test]
async fn debug_echoes_query_and_skips_cache() {
    let (app, stub) = test_app().await;

    let (status, page) = get(&app, "/api/outcomes?query=pay&debug=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        page["query"]["bool"]["should"][0]["match"]["filter.fullText"]["query"],
        "pay"
    );

    let (_, again) = get(&app, "/api/outcomes?query=pay&debug=true").await;
    assert!(again.get("query").is_some());
    assert_eq!(stub.request_count(), 2);
}

/// Unknown parameters and malformed values never fail the request.
#[tokio::test]
async fn lenient_decoding_ignores_junk_parameters() {
    let (app, stub) = test_app().await;
    let (status, _) =
        get(&app, "/api/outcomes?state=not_a_state&page=banana&mystery=42").await;
    assert_eq!(status, StatusCode::OK);

    let body = stub.requests()[0].body_json();
    assert_eq!(body["from"], 0);
    assert!(body["query"]["bool"].get("filter").is_none());
}

/// Engine failures other than rate limiting surface as 502 upstream errors.
#[tokio::test]
async fn engine_error_maps_to_bad_gateway() {
    let (app, stub) = test_app().await;
    stub.push_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "shard failure" }),
    );

    let (status, body) = get(&app, "/api/outcomes").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "Upstream");
    // 5xx is not retried
    assert_eq!(stub.request_count(), 1);
}

/// A bad document in the page is dropped; the rest of the page survives.
#[tokio::test]
async fn undecodable_document_is_dropped_from_page() {
    let (app, stub) = test_app().await;
    let good = display_doc("TUR1/1003(2024)", "method_agreed", "Bargaining method agreed");
    stub.push_response(
        StatusCode::OK,
        json!({
            "hits": {
                "total": { "value": 2 },
                "hits": [
                    { "_id": "bad", "_source": { "display": { "reference": "incomplete" } } },
                    { "_id": "good", "_source": { "display": good } },
                ]
            }
        }),
    );

    let (status, page) = get(&app, "/api/outcomes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["size"], 2);
    assert_eq!(page["docs"].as_array().unwrap().len(), 1);
    assert_eq!(page["docs"][0]["reference"], "TUR1/1003(2024)");
}

/// Duration filters compile to the two-branch form: exact stored durations
/// for concluded cases, a date window for still-open ones.
#[tokio::test]
async fn duration_filter_compiles_to_two_branches() {
    let (app, stub) = test_app().await;
    let (status, _) = get(
        &app,
        "/api/outcomes?durations.overall.from=0&durations.overall.to=604800",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let body = stub.requests()[0].body_json();
    let clause = &body["query"]["bool"]["filter"][0]["bool"];
    assert_eq!(clause["_name"], "durations.overall");
    let branches = clause["should"].as_array().unwrap();
    assert_eq!(branches.len(), 2);
    assert_eq!(
        branches[0]["bool"]["filter"][0]["term"]["filter.durations.overall.relation"]["value"],
        "eq"
    );
    assert_eq!(
        branches[1]["bool"]["filter"][0]["term"]["filter.durations.overall.relation"]["value"],
        "gte"
    );
    let window: &Value =
        &branches[1]["bool"]["filter"][1]["range"]["filter.keyDates.applicationReceived"];
    assert!(window.get("gte").is_some());
    assert!(window.get("lte").is_some());
}
