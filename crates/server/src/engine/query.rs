//! Translation of the typed search-parameter bag into the engine's boolean
//! query structure.
//!
//! The free-text clause participates in relevance scoring (`should`); every
//! filter clause is non-scoring (`filter`) and carries a `_name` equal to its
//! URL parameter group so the facet layer can strip one filter by name.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use shared_types::search_params::{keys, SearchParams};

use super::dsl::{fields, QueryClause};

/// Minimum-match threshold for fuzzy name filters: at least 3 tokens, or 25%
/// of tokens, whichever is larger. Tolerates partial name matches without
/// excessive false positives.
pub const MINIMUM_MATCH_POLICY: &str = "3<25%";

/// A filter clause tagged with the URL parameter group it compiled from.
#[derive(Debug, Clone)]
pub struct NamedFilter {
    pub name: &'static str,
    pub clause: QueryClause,
}

/// The scoring clause: full-text match when a query term is present,
/// match-all otherwise.
pub fn text_clause(params: &SearchParams) -> QueryClause {
    match &params.query {
        Some(query) => QueryClause::match_text(fields::FULL_TEXT, query.clone()),
        None => QueryClause::MatchAll,
    }
}

/// One fuzzy/partial name filter: per-value `match` clauses OR-combined.
fn name_match_filter(
    field: &'static str,
    filter_name: &'static str,
    values: &[String],
) -> Option<NamedFilter> {
    let mut clauses: Vec<QueryClause> = values
        .iter()
        .map(|v| QueryClause::match_text(field, v.clone()).with_minimum_match(MINIMUM_MATCH_POLICY))
        .collect();

    let clause = match clauses.len() {
        0 => return None,
        1 => clauses.remove(0).named(filter_name),
        _ => QueryClause::bool_should(clauses).named(filter_name),
    };
    Some(NamedFilter {
        name: filter_name,
        clause,
    })
}

fn terms_filter(
    field: &'static str,
    filter_name: &'static str,
    values: Vec<Value>,
) -> Option<NamedFilter> {
    if values.is_empty() {
        return None;
    }
    Some(NamedFilter {
        name: filter_name,
        clause: QueryClause::terms(field, values).named(filter_name),
    })
}

fn range_filter(
    field: &'static str,
    filter_name: &'static str,
    gte: Option<Value>,
    lte: Option<Value>,
) -> Option<NamedFilter> {
    if gte.is_none() && lte.is_none() {
        return None;
    }
    Some(NamedFilter {
        name: filter_name,
        clause: QueryClause::range(field, gte, lte).named(filter_name),
    })
}

/// The two-branch elapsed-duration filter.
///
/// Concluded cases store an exact duration (`relation = eq`); open cases
/// store a lower bound (`relation = gte`) whose current duration is
/// `now − applicationReceived`. Requesting `elapsed ∈ [from, to]` for open
/// cases is therefore a window on the application-received date:
/// `applicationReceived ∈ [now − to, now − from]`.
fn duration_filter(params: &SearchParams, now: DateTime<Utc>) -> Option<NamedFilter> {
    let range = &params.duration;
    if range.is_empty() {
        return None;
    }

    let eq_branch = QueryClause::bool_filter(vec![
        QueryClause::term(fields::DURATION_RELATION, "eq"),
        QueryClause::range(
            fields::DURATION_VALUE,
            range.from.map(|v| json!(v)),
            range.to.map(|v| json!(v)),
        ),
    ]);

    let received_not_before = range.to.map(|to| json!((now - Duration::seconds(to)).to_rfc3339()));
    let received_not_after = range
        .from
        .map(|from| json!((now - Duration::seconds(from)).to_rfc3339()));
    let gte_branch = QueryClause::bool_filter(vec![
        QueryClause::term(fields::DURATION_RELATION, "gte"),
        QueryClause::range(
            fields::APPLICATION_RECEIVED,
            received_not_before,
            received_not_after,
        ),
    ]);

    Some(NamedFilter {
        name: "durations.overall",
        clause: QueryClause::bool_should(vec![eq_branch, gte_branch]).named("durations.overall"),
    })
}

/// Compile every active filter into its named clause, in a stable order.
pub fn build_filters(params: &SearchParams, now: DateTime<Utc>) -> Vec<NamedFilter> {
    let mut filters = Vec::new();

    if let Some(f) = name_match_filter(fields::UNIONS, keys::UNIONS, &params.unions) {
        filters.push(f);
    }
    if let Some(f) = name_match_filter(fields::EMPLOYER, keys::EMPLOYER, &params.employer) {
        filters.push(f);
    }
    if let Some(f) = terms_filter(
        fields::REFERENCE,
        keys::REFERENCE,
        params.reference.iter().map(|r| json!(r)).collect(),
    ) {
        filters.push(f);
    }
    if let Some(f) = terms_filter(
        fields::STATE,
        keys::STATE,
        params.state.iter().map(|s| json!(s.value())).collect(),
    ) {
        filters.push(f);
    }
    if let Some(f) = terms_filter(
        fields::EVENT_TYPE,
        keys::EVENT_TYPE,
        params.event_type.iter().map(|t| json!(t.value())).collect(),
    ) {
        filters.push(f);
    }
    if let Some(f) = range_filter(
        fields::UNIT_SIZE,
        "bargainingUnit.size",
        params.bargaining_unit_size.from.map(|v| json!(v)),
        params.bargaining_unit_size.to.map(|v| json!(v)),
    ) {
        filters.push(f);
    }
    if let Some(f) = range_filter(
        fields::EVENT_DATE,
        "events.date",
        params.event_date.from.map(|d| json!(d.format("%Y-%m-%d").to_string())),
        params.event_date.to.map(|d| json!(d.format("%Y-%m-%d").to_string())),
    ) {
        filters.push(f);
    }
    if let Some(f) = duration_filter(params, now) {
        filters.push(f);
    }

    filters
}

/// The combined query: scoring text clause in `should`, non-scoring filters
/// in `filter`.
pub fn build_query(params: &SearchParams, now: DateTime<Utc>) -> Value {
    build_query_excluding(params, now, None)
}

/// Same as [`build_query`] but with one named filter stripped. The facet
/// layer uses this to compute self-excluded counts.
pub fn build_query_excluding(
    params: &SearchParams,
    now: DateTime<Utc>,
    exclude: Option<&str>,
) -> Value {
    let filter = build_filters(params, now)
        .into_iter()
        .filter(|f| Some(f.name) != exclude)
        .map(|f| f.clause)
        .collect();

    QueryClause::Bool {
        should: vec![text_clause(params)],
        filter,
        minimum_should_match: Some(1),
        name: None,
    }
    .to_value()
}
