//! Static outcomes-list upstream. One record in the display projection;
//! integration clients depend on this exact shape.

use axum::Json;
use serde_json::{json, Value};

pub fn sample_outcomes() -> Value {
    json!([
        {
            "reference": "TUR1/1001(2024)",
            "title": "Unite the Union & Acme Logistics Ltd",
            "state": { "value": "recognized", "label": "Union recognized" },
            "parties": {
                "unions": ["Unite the Union"],
                "employer": "Acme Logistics Ltd"
            },
            "events": [
                { "type": "application_received", "date": "2024-01-15" },
                { "type": "application_accepted", "date": "2024-02-02" },
                { "type": "bargaining_unit_decided", "date": "2024-03-11",
                  "description": "Warehouse operatives at the Leeds depot" },
                { "type": "ballot_held", "date": "2024-04-18" },
                { "type": "recognition_decision", "date": "2024-05-02",
                  "description": "Recognition awarded following ballot" }
            ],
            "ballot": {
                "eligibleWorkers": 120,
                "inFavor": 74,
                "against": 21,
                "turnoutPercent": 79.2
            },
            "bargainingUnit": { "size": 120, "description": "Warehouse operatives" },
            "keyDates": { "applicationReceived": "2024-01-15", "concluded": "2024-05-02" },
            "lastUpdated": "2024-05-02T09:30:00Z"
        }
    ])
}

/// GET /fixtures/outcomes
pub async fn list_outcomes() -> Json<Value> {
    Json(sample_outcomes())
}
