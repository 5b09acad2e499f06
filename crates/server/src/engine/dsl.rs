//! Typed construction of the search engine's JSON query DSL.
//!
//! The engine speaks a boolean query language (`bool` with `should`/`filter`
//! clauses, `match`, `terms`, `range`) plus bucketed aggregations. Clauses
//! may carry a `_name` so downstream facet computation can identify and strip
//! a specific filter. This module owns the JSON shapes; the semantic mapping
//! from search parameters lives in [`super::query`].

use serde_json::{json, Map, Value};

/// Index field naming convention: filter-indexed variants under `filter.`,
/// facet-indexed variants under `facet.`, and the denormalized display
/// projection under `display`.
pub mod fields {
    pub const DISPLAY: &str = "display";

    pub const FULL_TEXT: &str = "filter.fullText";
    pub const UNIONS: &str = "filter.parties.unions";
    pub const EMPLOYER: &str = "filter.parties.employer";
    pub const REFERENCE: &str = "filter.reference";
    pub const STATE: &str = "filter.state";
    pub const EVENT_TYPE: &str = "filter.events.type";
    pub const UNIT_SIZE: &str = "filter.bargainingUnit.size";
    pub const EVENT_DATE: &str = "filter.events.date";
    pub const DURATION_VALUE: &str = "filter.durations.overall.value";
    pub const DURATION_RELATION: &str = "filter.durations.overall.relation";
    pub const APPLICATION_RECEIVED: &str = "filter.keyDates.applicationReceived";
    pub const CONCLUDED: &str = "filter.keyDates.concluded";
    pub const LAST_UPDATED: &str = "filter.lastUpdated";

    pub const FACET_UNIONS: &str = "facet.parties.unions";
    pub const FACET_STATE: &str = "facet.state";
    pub const FACET_EVENT_TYPE: &str = "facet.events.type";
    pub const FACET_UNIT_SIZE: &str = "facet.bargainingUnit.size";
    pub const FACET_EVENT_DATE: &str = "facet.events.date";
}

/// One boolean query clause.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    MatchAll,
    Match {
        field: &'static str,
        query: String,
        minimum_should_match: Option<&'static str>,
        name: Option<String>,
    },
    Term {
        field: &'static str,
        value: Value,
    },
    Terms {
        field: &'static str,
        values: Vec<Value>,
        name: Option<String>,
    },
    Range {
        field: &'static str,
        gte: Option<Value>,
        lte: Option<Value>,
        name: Option<String>,
    },
    Bool {
        should: Vec<QueryClause>,
        filter: Vec<QueryClause>,
        minimum_should_match: Option<u32>,
        name: Option<String>,
    },
}

impl QueryClause {
    pub fn match_text(field: &'static str, query: impl Into<String>) -> Self {
        QueryClause::Match {
            field,
            query: query.into(),
            minimum_should_match: None,
            name: None,
        }
    }

    pub fn term(field: &'static str, value: impl Into<Value>) -> Self {
        QueryClause::Term {
            field,
            value: value.into(),
        }
    }

    pub fn terms(field: &'static str, values: Vec<Value>) -> Self {
        QueryClause::Terms {
            field,
            values,
            name: None,
        }
    }

    pub fn range(field: &'static str, gte: Option<Value>, lte: Option<Value>) -> Self {
        QueryClause::Range {
            field,
            gte,
            lte,
            name: None,
        }
    }

    pub fn bool_filter(filter: Vec<QueryClause>) -> Self {
        QueryClause::Bool {
            should: Vec::new(),
            filter,
            minimum_should_match: None,
            name: None,
        }
    }

    pub fn bool_should(should: Vec<QueryClause>) -> Self {
        QueryClause::Bool {
            should,
            filter: Vec::new(),
            minimum_should_match: Some(1),
            name: None,
        }
    }

    pub fn with_minimum_match(mut self, policy: &'static str) -> Self {
        if let QueryClause::Match {
            minimum_should_match,
            ..
        } = &mut self
        {
            *minimum_should_match = Some(policy);
        }
        self
    }

    /// Attach a `_name` to the clause so it can be identified (and excluded)
    /// later. No-op on clause kinds the engine cannot name.
    pub fn named(mut self, clause_name: &str) -> Self {
        match &mut self {
            QueryClause::Match { name, .. }
            | QueryClause::Terms { name, .. }
            | QueryClause::Range { name, .. }
            | QueryClause::Bool { name, .. } => *name = Some(clause_name.to_string()),
            QueryClause::MatchAll | QueryClause::Term { .. } => {}
        }
        self
    }

    /// Render to the engine's JSON representation.
    pub fn to_value(&self) -> Value {
        match self {
            QueryClause::MatchAll => json!({ "match_all": {} }),
            QueryClause::Match {
                field,
                query,
                minimum_should_match,
                name,
            } => {
                let mut body = Map::new();
                body.insert("query".to_string(), json!(query));
                if let Some(policy) = minimum_should_match {
                    body.insert("minimum_should_match".to_string(), json!(policy));
                }
                if let Some(n) = name {
                    body.insert("_name".to_string(), json!(n));
                }
                json!({ "match": { (*field): Value::Object(body) } })
            }
            QueryClause::Term { field, value } => {
                json!({ "term": { (*field): { "value": value } } })
            }
            QueryClause::Terms {
                field,
                values,
                name,
            } => {
                let mut body = Map::new();
                body.insert(field.to_string(), json!(values));
                if let Some(n) = name {
                    body.insert("_name".to_string(), json!(n));
                }
                json!({ "terms": Value::Object(body) })
            }
            QueryClause::Range {
                field,
                gte,
                lte,
                name,
            } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), gte.clone());
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".to_string(), lte.clone());
                }
                if let Some(n) = name {
                    bounds.insert("_name".to_string(), json!(n));
                }
                json!({ "range": { (*field): Value::Object(bounds) } })
            }
            QueryClause::Bool {
                should,
                filter,
                minimum_should_match,
                name,
            } => {
                let mut body = Map::new();
                if !should.is_empty() {
                    body.insert(
                        "should".to_string(),
                        Value::Array(should.iter().map(|c| c.to_value()).collect()),
                    );
                }
                if !filter.is_empty() {
                    body.insert(
                        "filter".to_string(),
                        Value::Array(filter.iter().map(|c| c.to_value()).collect()),
                    );
                }
                if let Some(msm) = minimum_should_match {
                    body.insert("minimum_should_match".to_string(), json!(msm));
                }
                if let Some(n) = name {
                    body.insert("_name".to_string(), json!(n));
                }
                json!({ "bool": Value::Object(body) })
            }
        }
    }
}

/// Terms aggregation over a facet field.
pub fn terms_agg(field: &str, size: u32) -> Value {
    json!({ "terms": { "field": field, "size": size } })
}

/// Fixed-width histogram with clamped bounds so bucket edges stay stable
/// across queries (required for consistent chart rendering).
pub fn histogram_agg(field: &str, interval: u32, min: u32, max: u32) -> Value {
    json!({
        "histogram": {
            "field": field,
            "interval": interval,
            "min_doc_count": 0,
            "extended_bounds": { "min": min, "max": max },
            "hard_bounds": { "min": min, "max": max }
        }
    })
}

/// Calendar-month date histogram, keyed as `YYYY-MM`.
pub fn month_histogram_agg(field: &str) -> Value {
    json!({
        "date_histogram": {
            "field": field,
            "calendar_interval": "month",
            "format": "yyyy-MM",
            "min_doc_count": 0
        }
    })
}

/// Wrap a bucketing aggregation in a `filter` aggregation so its counts are
/// scoped to `scope`. The inner aggregation is always keyed `items`.
pub fn filtered_agg(scope: Value, inner: Value) -> Value {
    json!({ "filter": scope, "aggs": { "items": inner } })
}
