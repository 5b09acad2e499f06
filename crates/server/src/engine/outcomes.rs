//! Paged outcome retrieval.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use shared_types::error::AppError;
use shared_types::outcome::{Outcome, OutcomesPage};
use shared_types::search_params::{SearchParams, SortKey, SortOrder};

use super::client::EngineClient;
use super::dsl::fields;
use super::query::build_query;

/// Fixed page length. Pagination is offset-based; the page number comes from
/// the URL and is 1-based.
pub const PAGE_SIZE: u32 = 20;

/// Engine sort specification for a sort selection. Relevance sorts on score
/// with recency as a secondary criterion; every spec ends with the unique
/// case reference so total order is deterministic across identical scores.
fn sort_spec(key: SortKey, order: SortOrder) -> Vec<Value> {
    let order = order.value();
    let mut spec = match key {
        SortKey::Relevance => vec![
            json!({ "_score": { "order": order } }),
            json!({ (fields::LAST_UPDATED): { "order": "desc" } }),
        ],
        SortKey::LastUpdated => vec![json!({ (fields::LAST_UPDATED): { "order": order } })],
        SortKey::ApplicationDate => {
            vec![json!({ (fields::APPLICATION_RECEIVED): { "order": order } })]
        }
        SortKey::ConcludedDate => vec![json!({ (fields::CONCLUDED): { "order": order } })],
        SortKey::BargainingUnitSize => vec![json!({ (fields::UNIT_SIZE): { "order": order } })],
    };
    spec.push(json!({ (fields::REFERENCE): { "order": "asc" } }));
    spec
}

/// One page of hits: query, sort, offset window, and the display projection
/// only. Filter-indexed fields never leave the engine.
pub fn build_search_request(params: &SearchParams, now: DateTime<Utc>) -> Value {
    json!({
        "from": u64::from(params.page.saturating_sub(1)) * u64::from(PAGE_SIZE),
        "size": PAGE_SIZE,
        "query": build_query(params, now),
        "sort": sort_spec(params.sort.key, params.sort.order),
        "_source": [fields::DISPLAY],
    })
}

/// Decode total count and display documents from a search response. A hit
/// whose display projection fails to decode is dropped with a warning; one
/// bad document never fails the page.
pub fn parse_search_response(response: &Value) -> (i64, Vec<Outcome>) {
    let total = response
        .pointer("/hits/total/value")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let docs = response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| {
                    let display = hit.pointer("/_source/display")?;
                    match serde_json::from_value::<Outcome>(display.clone()) {
                        Ok(outcome) => Some(outcome),
                        Err(err) => {
                            tracing::warn!(
                                doc_id = hit.get("_id").and_then(serde_json::Value::as_str),
                                error = %err,
                                "dropping undecodable display document"
                            );
                            None
                        }
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    (total, docs)
}

/// Run a paged search for the given parameters. With `debug=true` the page
/// carries the query the engine actually saw.
pub async fn get_outcomes(
    engine: &EngineClient,
    params: &SearchParams,
) -> Result<OutcomesPage, AppError> {
    let request = build_search_request(params, Utc::now());
    let response = engine.search(&request).await?;
    let (size, docs) = parse_search_response(&response);
    let query = params.debug.then(|| request["query"].clone());
    Ok(OutcomesPage { size, docs, query })
}
