use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of outcome lifecycle states.
///
/// Wire value is the snake_case name; `label()` is the human-readable form
/// shown in facets and result cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum OutcomeState {
    ApplicationReceived,
    ApplicationAccepted,
    ApplicationRejected,
    ApplicationWithdrawn,
    BallotOrdered,
    Recognized,
    NotRecognized,
    MethodAgreed,
}

impl OutcomeState {
    pub const ALL: [OutcomeState; 8] = [
        OutcomeState::ApplicationReceived,
        OutcomeState::ApplicationAccepted,
        OutcomeState::ApplicationRejected,
        OutcomeState::ApplicationWithdrawn,
        OutcomeState::BallotOrdered,
        OutcomeState::Recognized,
        OutcomeState::NotRecognized,
        OutcomeState::MethodAgreed,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            OutcomeState::ApplicationReceived => "application_received",
            OutcomeState::ApplicationAccepted => "application_accepted",
            OutcomeState::ApplicationRejected => "application_rejected",
            OutcomeState::ApplicationWithdrawn => "application_withdrawn",
            OutcomeState::BallotOrdered => "ballot_ordered",
            OutcomeState::Recognized => "recognized",
            OutcomeState::NotRecognized => "not_recognized",
            OutcomeState::MethodAgreed => "method_agreed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutcomeState::ApplicationReceived => "Application received",
            OutcomeState::ApplicationAccepted => "Application accepted",
            OutcomeState::ApplicationRejected => "Application rejected",
            OutcomeState::ApplicationWithdrawn => "Application withdrawn",
            OutcomeState::BallotOrdered => "Ballot ordered",
            OutcomeState::Recognized => "Union recognized",
            OutcomeState::NotRecognized => "Union not recognized",
            OutcomeState::MethodAgreed => "Bargaining method agreed",
        }
    }

    /// Parse a wire value. Returns `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.value() == s)
    }
}

/// Closed set of case event-type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ApplicationReceived,
    ApplicationAccepted,
    ApplicationRejected,
    ApplicationWithdrawn,
    BargainingUnitDecided,
    BallotOrdered,
    BallotHeld,
    RecognitionDecision,
    MethodDecision,
    CaseClosed,
}

impl EventType {
    pub const ALL: [EventType; 10] = [
        EventType::ApplicationReceived,
        EventType::ApplicationAccepted,
        EventType::ApplicationRejected,
        EventType::ApplicationWithdrawn,
        EventType::BargainingUnitDecided,
        EventType::BallotOrdered,
        EventType::BallotHeld,
        EventType::RecognitionDecision,
        EventType::MethodDecision,
        EventType::CaseClosed,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            EventType::ApplicationReceived => "application_received",
            EventType::ApplicationAccepted => "application_accepted",
            EventType::ApplicationRejected => "application_rejected",
            EventType::ApplicationWithdrawn => "application_withdrawn",
            EventType::BargainingUnitDecided => "bargaining_unit_decided",
            EventType::BallotOrdered => "ballot_ordered",
            EventType::BallotHeld => "ballot_held",
            EventType::RecognitionDecision => "recognition_decision",
            EventType::MethodDecision => "method_decision",
            EventType::CaseClosed => "case_closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.value() == s)
    }
}

/// State as carried on a display document: wire value plus human label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LabelledState {
    pub value: OutcomeState,
    pub label: String,
}

impl From<OutcomeState> for LabelledState {
    fn from(state: OutcomeState) -> Self {
        Self {
            value: state,
            label: state.label().to_string(),
        }
    }
}

/// The union(s) and employer named on a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Parties {
    pub unions: Vec<String>,
    pub employer: String,
}

/// One entry in a case's event history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OutcomeEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Recognition ballot results, present once a ballot has been held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    pub eligible_workers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_favor: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub against: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnout_percent: Option<f64>,
}

/// The proposed or determined bargaining unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BargainingUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Milestone dates for a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct KeyDates {
    pub application_received: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concluded: Option<NaiveDate>,
}

/// A case record as projected for display. Read-only from this layer; the
/// ingestion pipeline owns creation and updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Unique case reference, e.g. "TUR1/1234(2024)".
    pub reference: String,
    pub title: String,
    pub state: LabelledState,
    pub parties: Parties,
    pub events: Vec<OutcomeEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballot: Option<Ballot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bargaining_unit: Option<BargainingUnit>,
    pub key_dates: KeyDates,
    pub last_updated: DateTime<Utc>,
}

/// One page of search results. `size` is the total match count, not the
/// page length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OutcomesPage {
    pub size: i64,
    pub docs: Vec<Outcome>,
    /// Engine query echo, present only when the request had `debug=true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<serde_json::Value>,
}
