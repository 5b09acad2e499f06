use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{get, post_json, test_app};

#[tokio::test]
async fn health_reports_ok() {
    let (app, _stub) = test_app().await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn known_company_profile_resolves() {
    let (app, _stub) = test_app().await;
    let (status, profile) = get(&app, "/fixtures/companies/company/07444723").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["company_name"], "ACME LOGISTICS LTD");
    assert_eq!(profile["company_status"], "active");
}

#[tokio::test]
async fn unknown_company_number_is_404() {
    let (app, _stub) = test_app().await;
    let (status, body) = get(&app, "/fixtures/companies/company/12345678").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");
}

#[tokio::test]
async fn company_search_finds_by_substring() {
    let (app, _stub) = test_app().await;
    let (status, result) = get(&app, "/fixtures/companies/search?q=acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["total_results"], 1);
    assert_eq!(result["items"][0]["company_number"], "07444723");

    let (_, empty) = get(&app, "/fixtures/companies/search?q=globex").await;
    assert_eq!(empty["total_results"], 0);
}

#[tokio::test]
async fn chat_completion_returns_openai_envelope() {
    let (app, _stub) = test_app().await;
    let request = json!({
        "model": "fixture-chat",
        "messages": [
            { "role": "user", "content": "Explain how a recognition ballot works" }
        ]
    })
    .to_string();

    let (status, response) = post_json(&app, "/fixtures/llm/v1/chat/completions", &request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["object"], "chat.completion");
    assert_eq!(response["choices"][0]["finish_reason"], "stop");
    let content = response["choices"][0]["message"]["content"].as_str().unwrap();
    assert!(content.contains("ballot"));

    let usage = &response["usage"];
    assert_eq!(
        usage["total_tokens"].as_i64().unwrap(),
        usage["prompt_tokens"].as_i64().unwrap() + usage["completion_tokens"].as_i64().unwrap()
    );
}

#[tokio::test]
async fn sample_outcome_is_a_valid_display_document() {
    let (app, _stub) = test_app().await;
    let (status, outcomes) = get(&app, "/fixtures/outcomes").await;
    assert_eq!(status, StatusCode::OK);

    let docs = outcomes.as_array().unwrap();
    assert_eq!(docs.len(), 1);
    let outcome: shared_types::Outcome = serde_json::from_value(docs[0].clone()).unwrap();
    assert_eq!(outcome.reference, "TUR1/1001(2024)");
    assert!(!outcome.parties.unions.is_empty());
}
