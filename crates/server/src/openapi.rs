use shared_types::{
    AppError, AppErrorKind, Ballot, BargainingUnit, DashboardData, EventType, FacetBucket,
    FacetValue, Facets, HistogramFacets, KeyDates, LabelledState, MultiSelectFacets, Outcome,
    OutcomeEvent, OutcomeState, OutcomesPage, Parties,
};
use utoipa::OpenApi;

use crate::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Union Recognition Outcomes API",
        description = "Search and analytics over statutory union recognition cases.",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        crate::rest::outcomes::search_outcomes,
        crate::rest::outcomes::get_facets,
        crate::rest::dashboard::get_dashboard,
        crate::health::health_check,
    ),
    components(schemas(
        AppError,
        AppErrorKind,
        Ballot,
        BargainingUnit,
        DashboardData,
        EventType,
        FacetBucket,
        FacetValue,
        Facets,
        HealthResponse,
        HistogramFacets,
        KeyDates,
        LabelledState,
        MultiSelectFacets,
        Outcome,
        OutcomeEvent,
        OutcomeState,
        OutcomesPage,
        Parties,
    )),
    tags(
        (name = "outcomes", description = "Outcome search and faceting"),
        (name = "dashboard", description = "Corpus-wide analytics"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
