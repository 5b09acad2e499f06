use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::outcome::{EventType, OutcomeState};

/// Sort keys accepted on the URL surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Relevance,
    LastUpdated,
    ApplicationDate,
    ConcludedDate,
    BargainingUnitSize,
}

impl SortKey {
    pub fn value(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::LastUpdated => "lastUpdated",
            SortKey::ApplicationDate => "applicationDate",
            SortKey::ConcludedDate => "concludedDate",
            SortKey::BargainingUnitSize => "bargainingUnitSize",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            SortKey::Relevance,
            SortKey::LastUpdated,
            SortKey::ApplicationDate,
            SortKey::ConcludedDate,
            SortKey::BargainingUnitSize,
        ]
        .into_iter()
        .find(|k| k.value() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn value(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Combined sort selection, encoded on the URL as `sort=<key>-<order>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Sort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for Sort {
    fn default() -> Self {
        Sort {
            key: SortKey::Relevance,
            order: SortOrder::Desc,
        }
    }
}

impl Sort {
    pub fn encode(&self) -> String {
        format!("{}-{}", self.key.value(), self.order.value())
    }

    /// Parse `<key>-<order>`. The key itself never contains `-`, so a plain
    /// rsplit is enough.
    pub fn parse(s: &str) -> Option<Self> {
        let (key, order) = s.rsplit_once('-')?;
        Some(Sort {
            key: SortKey::parse(key)?,
            order: SortOrder::parse(order)?,
        })
    }
}

/// Inclusive range filter; either bound independently optional. Both bounds
/// absent means the filter contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RangeFilter<T> {
    pub from: Option<T>,
    pub to: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        RangeFilter {
            from: None,
            to: None,
        }
    }
}

impl<T> RangeFilter<T> {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// URL parameter names. The dotted names are part of the public URL surface
/// and double as the `_name` of the filter clause each parameter compiles to.
pub mod keys {
    pub const QUERY: &str = "query";
    pub const PAGE: &str = "page";
    pub const SORT: &str = "sort";
    pub const UNIONS: &str = "parties.unions";
    pub const EMPLOYER: &str = "parties.employer";
    pub const REFERENCE: &str = "reference";
    pub const STATE: &str = "state";
    pub const EVENT_TYPE: &str = "events.type";
    pub const UNIT_SIZE_FROM: &str = "bargainingUnit.size.from";
    pub const UNIT_SIZE_TO: &str = "bargainingUnit.size.to";
    pub const EVENT_DATE_FROM: &str = "events.date.from";
    pub const EVENT_DATE_TO: &str = "events.date.to";
    pub const DURATION_FROM: &str = "durations.overall.from";
    pub const DURATION_TO: &str = "durations.overall.to";
    pub const DEBUG: &str = "debug";
}

/// Addressable parameter groups for `add_value`/`delete_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKey {
    Query,
    Unions,
    Employer,
    Reference,
    State,
    EventType,
}

/// The typed search-parameter bag. Every field is independently optional or
/// defaultable; absence in the URL means "no filter", never "zero value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: u32,
    pub sort: Sort,
    pub unions: Vec<String>,
    pub employer: Vec<String>,
    pub reference: Vec<String>,
    pub state: Vec<OutcomeState>,
    pub event_type: Vec<EventType>,
    pub bargaining_unit_size: RangeFilter<u32>,
    pub event_date: RangeFilter<NaiveDate>,
    /// Overall elapsed case duration, in seconds.
    pub duration: RangeFilter<i64>,
    pub debug: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            query: None,
            page: 1,
            sort: Sort::default(),
            unions: Vec::new(),
            employer: Vec::new(),
            reference: Vec::new(),
            state: Vec::new(),
            event_type: Vec::new(),
            bargaining_unit_size: RangeFilter::default(),
            event_date: RangeFilter::default(),
            duration: RangeFilter::default(),
            debug: false,
        }
    }
}

/// Percent-decode one query-string token. Browsers encode spaces as `+` in
/// the query component, so translate those first.
fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|c| c.into_owned())
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

impl SearchParams {
    /// Decode a URL query string (without the leading `?`).
    ///
    /// Lenient by design: unknown keys are ignored, malformed values are
    /// treated as absent, and enum values outside their closed set are
    /// dropped. A bad value for one field never aborts decoding the others.
    pub fn decode(query_string: &str) -> SearchParams {
        let mut params = SearchParams::default();

        for pair in query_string.split('&').filter(|p| !p.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let (key, value) = match (decode_component(raw_key), decode_component(raw_value)) {
                (Some(k), Some(v)) => (k, v),
                _ => continue,
            };
            if value.is_empty() {
                continue;
            }

            match key.as_str() {
                keys::QUERY => params.query = Some(value),
                keys::PAGE => {
                    if let Ok(page) = value.parse::<u32>() {
                        if page >= 1 {
                            params.page = page;
                        }
                    }
                }
                keys::SORT => {
                    if let Some(sort) = Sort::parse(&value) {
                        params.sort = sort;
                    }
                }
                keys::UNIONS => push_unique(&mut params.unions, value),
                keys::EMPLOYER => push_unique(&mut params.employer, value),
                keys::REFERENCE => push_unique(&mut params.reference, value),
                keys::STATE => {
                    if let Some(state) = OutcomeState::parse(&value) {
                        push_unique(&mut params.state, state);
                    }
                }
                keys::EVENT_TYPE => {
                    if let Some(event_type) = EventType::parse(&value) {
                        push_unique(&mut params.event_type, event_type);
                    }
                }
                keys::UNIT_SIZE_FROM => {
                    params.bargaining_unit_size.from = value.parse().ok();
                }
                keys::UNIT_SIZE_TO => {
                    params.bargaining_unit_size.to = value.parse().ok();
                }
                keys::EVENT_DATE_FROM => {
                    params.event_date.from = value.parse::<NaiveDate>().ok();
                }
                keys::EVENT_DATE_TO => {
                    params.event_date.to = value.parse::<NaiveDate>().ok();
                }
                keys::DURATION_FROM => {
                    params.duration.from = value.parse().ok();
                }
                keys::DURATION_TO => {
                    params.duration.to = value.parse().ok();
                }
                keys::DEBUG => params.debug = value == "true" || value == "1",
                _ => {}
            }
        }

        params
    }

    /// Encode to a URL query string, omitting every default-valued field so
    /// URLs stay minimal.
    pub fn encode(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        // an empty query decodes back to "no filter", so never emit it
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            pairs.push((keys::QUERY, query.to_string()));
        }
        if self.page > 1 {
            pairs.push((keys::PAGE, self.page.to_string()));
        }
        if self.sort != Sort::default() {
            pairs.push((keys::SORT, self.sort.encode()));
        }
        for union in &self.unions {
            pairs.push((keys::UNIONS, union.clone()));
        }
        for employer in &self.employer {
            pairs.push((keys::EMPLOYER, employer.clone()));
        }
        for reference in &self.reference {
            pairs.push((keys::REFERENCE, reference.clone()));
        }
        for state in &self.state {
            pairs.push((keys::STATE, state.value().to_string()));
        }
        for event_type in &self.event_type {
            pairs.push((keys::EVENT_TYPE, event_type.value().to_string()));
        }
        if let Some(from) = self.bargaining_unit_size.from {
            pairs.push((keys::UNIT_SIZE_FROM, from.to_string()));
        }
        if let Some(to) = self.bargaining_unit_size.to {
            pairs.push((keys::UNIT_SIZE_TO, to.to_string()));
        }
        if let Some(from) = self.event_date.from {
            pairs.push((keys::EVENT_DATE_FROM, from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.event_date.to {
            pairs.push((keys::EVENT_DATE_TO, to.format("%Y-%m-%d").to_string()));
        }
        if let Some(from) = self.duration.from {
            pairs.push((keys::DURATION_FROM, from.to_string()));
        }
        if let Some(to) = self.duration.to {
            pairs.push((keys::DURATION_TO, to.to_string()));
        }
        if self.debug {
            pairs.push((keys::DEBUG, "true".to_string()));
        }

        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Apply defaults and set-semantics de-duplication, matching what a
    /// decode of this bag's encoding would produce.
    pub fn normalized(&self) -> SearchParams {
        let mut out = self.clone();
        out.query = out.query.filter(|q| !q.is_empty());
        out.page = out.page.max(1);
        out.unions = dedup_preserving_order(&out.unions);
        out.employer = dedup_preserving_order(&out.employer);
        out.reference = dedup_preserving_order(&out.reference);
        out.state = dedup_preserving_order(&out.state);
        out.event_type = dedup_preserving_order(&out.event_type);
        out
    }

    /// Append to (or initialize) a multi-value field, de-duplicating.
    /// For the single-valued `query` key, sets the value.
    pub fn add_value(&mut self, key: ParamKey, value: &str) {
        match key {
            ParamKey::Query => self.query = Some(value.to_string()),
            ParamKey::Unions => push_unique(&mut self.unions, value.to_string()),
            ParamKey::Employer => push_unique(&mut self.employer, value.to_string()),
            ParamKey::Reference => push_unique(&mut self.reference, value.to_string()),
            ParamKey::State => {
                if let Some(state) = OutcomeState::parse(value) {
                    push_unique(&mut self.state, state);
                }
            }
            ParamKey::EventType => {
                if let Some(event_type) = EventType::parse(value) {
                    push_unique(&mut self.event_type, event_type);
                }
            }
        }
    }

    /// Remove one value from a multi-value field, or clear the whole field
    /// when `value` is `None`. The single-valued `query` key clears when the
    /// value is omitted or matches.
    pub fn delete_value(&mut self, key: ParamKey, value: Option<&str>) {
        match (key, value) {
            (ParamKey::Query, None) => self.query = None,
            (ParamKey::Query, Some(v)) => {
                if self.query.as_deref() == Some(v) {
                    self.query = None;
                }
            }
            (ParamKey::Unions, None) => self.unions.clear(),
            (ParamKey::Unions, Some(v)) => self.unions.retain(|u| u != v),
            (ParamKey::Employer, None) => self.employer.clear(),
            (ParamKey::Employer, Some(v)) => self.employer.retain(|e| e != v),
            (ParamKey::Reference, None) => self.reference.clear(),
            (ParamKey::Reference, Some(v)) => self.reference.retain(|r| r != v),
            (ParamKey::State, None) => self.state.clear(),
            (ParamKey::State, Some(v)) => self.state.retain(|s| s.value() != v),
            (ParamKey::EventType, None) => self.event_type.clear(),
            (ParamKey::EventType, Some(v)) => self.event_type.retain(|t| t.value() != v),
        }
    }
}

fn dedup_preserving_order<T: PartialEq + Clone>(values: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}
