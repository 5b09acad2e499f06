use serde::{Deserialize, Serialize};

/// A bucket value: discrete terms are strings, histogram bins are the
/// numeric lower edge of the bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum FacetValue {
    Text(String),
    Number(i64),
}

impl From<&str> for FacetValue {
    fn from(s: &str) -> Self {
        FacetValue::Text(s.to_string())
    }
}

impl From<i64> for FacetValue {
    fn from(n: i64) -> Self {
        FacetValue::Number(n)
    }
}

/// One aggregation result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FacetBucket {
    pub value: FacetValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub count: i64,
}

/// Discrete multi-select facets. The key set is fixed: every field is always
/// present, empty when there is no data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MultiSelectFacets {
    #[serde(rename = "parties.unions")]
    pub unions: Vec<FacetBucket>,
    #[serde(rename = "state")]
    pub state: Vec<FacetBucket>,
    #[serde(rename = "events.type")]
    pub event_type: Vec<FacetBucket>,
}

/// Fixed-width histogram facets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistogramFacets {
    #[serde(rename = "bargainingUnit.size")]
    pub bargaining_unit_size: Vec<FacetBucket>,
}

/// All facets for the current parameter bag. Counts for each facet exclude
/// that facet's own active filter but include every other filter and the
/// free-text query (cross-filtering without self-suppression).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub multi_select: MultiSelectFacets,
    pub histogram: HistogramFacets,
}

/// Aggregate chart data for the dashboard, produced by one batched
/// multi-query round trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub outcomes_by_state: Vec<FacetBucket>,
    pub applications_by_month: Vec<FacetBucket>,
    pub bargaining_unit_sizes: Vec<FacetBucket>,
}
