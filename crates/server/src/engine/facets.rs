//! Facet aggregation request construction and response parsing.
//!
//! Each facet's counts are scoped by every active filter EXCEPT the facet's
//! own, so selecting a value inside a facet never collapses that facet to a
//! single row. The exclusion works by name: the facet identifier equals the
//! `_name` of the filter clause its URL parameter compiles to.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use shared_types::facets::{FacetBucket, FacetValue, Facets};
use shared_types::search_params::{keys, SearchParams};

use super::dsl::{fields, filtered_agg, histogram_agg, terms_agg};
use super::query::build_query_excluding;

/// Bin width for the bargaining-unit-size histogram.
pub const HISTOGRAM_INTERVAL: u32 = 50;
/// Histogram bounds. Sizes above the ceiling fall outside the chart rather
/// than stretching its axis.
pub const HISTOGRAM_MIN: u32 = 0;
pub const HISTOGRAM_MAX: u32 = 500;

/// Maximum rows returned for a discrete facet.
const TERMS_SIZE: u32 = 30;

struct FacetDef {
    /// Facet identifier, equal to the URL parameter group it filters on.
    name: &'static str,
    agg: fn() -> Value,
}

const FACETS: &[FacetDef] = &[
    FacetDef {
        name: keys::UNIONS,
        agg: || terms_agg(fields::FACET_UNIONS, TERMS_SIZE),
    },
    FacetDef {
        name: keys::STATE,
        agg: || terms_agg(fields::FACET_STATE, TERMS_SIZE),
    },
    FacetDef {
        name: keys::EVENT_TYPE,
        agg: || terms_agg(fields::FACET_EVENT_TYPE, TERMS_SIZE),
    },
    FacetDef {
        name: "bargainingUnit.size",
        agg: || histogram_agg(fields::FACET_UNIT_SIZE, HISTOGRAM_INTERVAL, HISTOGRAM_MIN, HISTOGRAM_MAX),
    },
];

/// One request computes every facet: each aggregation wraps its bucketing in
/// a `filter` scope built from the query with that facet's own clause
/// stripped. No hits are requested, only aggregations.
pub fn build_facet_request(params: &SearchParams, now: DateTime<Utc>) -> Value {
    let mut aggs = serde_json::Map::new();
    for def in FACETS {
        let scope = build_query_excluding(params, now, Some(def.name));
        aggs.insert(def.name.to_string(), filtered_agg(scope, (def.agg)()));
    }
    json!({ "size": 0, "aggs": Value::Object(aggs) })
}

/// How the engine keys a bucket. Discrete facets key by string; fields
/// indexed with an attached label key by a JSON object serialized into the
/// string key; histograms key by number.
fn decode_bucket(bucket: &Value) -> Option<FacetBucket> {
    let count = bucket.get("doc_count")?.as_i64()?;

    let (value, label) = match bucket.get("key") {
        // keyless bucket decodes to an empty-string sentinel, not a skip
        None | Some(Value::Null) => (FacetValue::from(""), None),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            // compound key: {"value": ..., "label": ...}
            Ok(Value::Object(obj)) => {
                let value = obj
                    .get("value")
                    .and_then(Value::as_str)
                    .map(|v| FacetValue::from(v))
                    .unwrap_or_else(|| FacetValue::from(s.as_str()));
                let label = obj
                    .get("label")
                    .and_then(Value::as_str)
                    .map(|l| l.to_string());
                (value, label)
            }
            _ => (FacetValue::from(s.as_str()), None),
        },
        // histogram keys may arrive as floats (`50.0`); bin edges are whole
        Some(Value::Number(n)) => {
            let key = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            (FacetValue::Number(key), None)
        }
        Some(Value::Bool(b)) => (FacetValue::from(if *b { "true" } else { "false" }), None),
        Some(_) => return None,
    };

    Some(FacetBucket {
        value,
        label,
        count,
    })
}

fn buckets_for(response: &Value, facet_name: &str) -> Vec<FacetBucket> {
    response
        .pointer(&format!("/aggregations/{}/items/buckets", facet_name))
        .and_then(Value::as_array)
        .map(|buckets| buckets.iter().filter_map(decode_bucket).collect())
        .unwrap_or_default()
}

/// Fetch all facets for the current parameter bag.
pub async fn get_facets(
    engine: &super::client::EngineClient,
    params: &SearchParams,
) -> Result<Facets, shared_types::error::AppError> {
    let request = build_facet_request(params, Utc::now());
    let response = engine.search(&request).await?;
    Ok(parse_facet_response(&response))
}

/// Decode the aggregation response. Facets decode independently: a missing
/// or malformed aggregation yields an empty facet without affecting the rest.
pub fn parse_facet_response(response: &Value) -> Facets {
    let mut facets = Facets::default();
    facets.multi_select.unions = buckets_for(response, keys::UNIONS);
    facets.multi_select.state = buckets_for(response, keys::STATE);
    facets.multi_select.event_type = buckets_for(response, keys::EVENT_TYPE);
    facets.histogram.bargaining_unit_size = buckets_for(response, "bargainingUnit.size");
    facets
}
