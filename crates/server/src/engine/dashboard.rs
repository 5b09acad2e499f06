//! Corpus-wide dashboard aggregations, fetched as one batched round trip.

use serde_json::{json, Value};
use shared_types::error::AppError;
use shared_types::facets::{DashboardData, FacetBucket, FacetValue};
use shared_types::outcome::{EventType, OutcomeState};

use super::client::EngineClient;
use super::dsl::{fields, filtered_agg, histogram_agg, month_histogram_agg, terms_agg};
use super::facets::{HISTOGRAM_INTERVAL, HISTOGRAM_MAX, HISTOGRAM_MIN};

const STATE_TERMS_SIZE: u32 = 20;

/// The three chart queries, batched into a single `_msearch` call. Charts
/// cover the whole corpus; no user filters apply.
fn build_dashboard_requests() -> Vec<Value> {
    let by_state = json!({
        "size": 0,
        "aggs": { "items": terms_agg(fields::FACET_STATE, STATE_TERMS_SIZE) }
    });

    // Application volume per month: event-date histogram scoped to
    // application-received events only.
    let by_month = json!({
        "size": 0,
        "aggs": {
            "items": filtered_agg(
                json!({ "term": { (fields::FACET_EVENT_TYPE): {
                    "value": EventType::ApplicationReceived.value()
                } } }),
                month_histogram_agg(fields::FACET_EVENT_DATE),
            )
        }
    });

    let by_size = json!({
        "size": 0,
        "aggs": {
            "items": histogram_agg(
                fields::FACET_UNIT_SIZE,
                HISTOGRAM_INTERVAL,
                HISTOGRAM_MIN,
                HISTOGRAM_MAX,
            )
        }
    });

    vec![by_state, by_month, by_size]
}

/// Decode one chart's buckets. Date-histogram buckets carry both an epoch
/// key and a formatted `key_as_string`; the formatted form is what charts
/// want. Missing or malformed aggregations yield an empty chart.
fn chart_buckets(response: &Value, nested_in_filter: bool) -> Vec<FacetBucket> {
    let path = if nested_in_filter {
        "/aggregations/items/items/buckets"
    } else {
        "/aggregations/items/buckets"
    };
    response
        .pointer(path)
        .and_then(Value::as_array)
        .map(|buckets| {
            buckets
                .iter()
                .filter_map(|bucket| {
                    let count = bucket.get("doc_count")?.as_i64()?;
                    let value = match bucket.get("key_as_string").and_then(Value::as_str) {
                        Some(s) => FacetValue::from(s),
                        None => match bucket.get("key")? {
                            Value::String(s) => FacetValue::from(s.as_str()),
                            // histogram keys may arrive as floats
                            Value::Number(n) => FacetValue::Number(
                                n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
                            ),
                            _ => return None,
                        },
                    };
                    Some(FacetBucket {
                        value,
                        label: None,
                        count,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Attach human labels to state buckets. Values outside the closed state set
/// pass through unlabelled.
fn label_states(mut buckets: Vec<FacetBucket>) -> Vec<FacetBucket> {
    for bucket in &mut buckets {
        if let FacetValue::Text(value) = &bucket.value {
            bucket.label = OutcomeState::parse(value).map(|s| s.label().to_string());
        }
    }
    buckets
}

pub async fn get_dashboard(engine: &EngineClient) -> Result<DashboardData, AppError> {
    let requests = build_dashboard_requests();
    let responses = engine.msearch(&requests).await?;

    Ok(DashboardData {
        outcomes_by_state: label_states(chart_buckets(&responses[0], false)),
        applications_by_month: chart_buckets(&responses[1], true),
        bargaining_unit_sizes: chart_buckets(&responses[2], false),
    })
}
