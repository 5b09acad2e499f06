//! Fake companies-registry upstream. One known company; everything else 404s,
//! which is exactly how enrichment lookups fail in production.

use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::error::AppError;

const KNOWN_COMPANY_NUMBER: &str = "07444723";

fn known_profile() -> Value {
    json!({
        "company_number": KNOWN_COMPANY_NUMBER,
        "company_name": "ACME LOGISTICS LTD",
        "company_status": "active",
        "type": "ltd",
        "date_of_creation": "2010-11-09",
        "sic_codes": ["52103"],
        "registered_office_address": {
            "address_line_1": "1 Depot Way",
            "locality": "Leeds",
            "postal_code": "LS1 4AB",
            "country": "England"
        }
    })
}

/// GET /fixtures/companies/company/{number}
pub async fn company_profile(Path(number): Path<String>) -> Result<Json<Value>, AppError> {
    if number == KNOWN_COMPANY_NUMBER {
        Ok(Json(known_profile()))
    } else {
        Err(AppError::not_found(format!(
            "no company registered with number {number}"
        )))
    }
}

#[derive(Debug, Deserialize)]
pub struct CompanySearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /fixtures/companies/search?q=...
///
/// Case-insensitive substring match over the one known company.
pub async fn company_search(Query(query): Query<CompanySearchQuery>) -> Json<Value> {
    let needle = query.q.to_lowercase();
    let items = if !needle.is_empty() && "acme logistics ltd".contains(&needle) {
        vec![json!({
            "company_number": KNOWN_COMPANY_NUMBER,
            "title": "ACME LOGISTICS LTD",
            "company_status": "active",
            "address_snippet": "1 Depot Way, Leeds, LS1 4AB"
        })]
    } else {
        Vec::new()
    };
    Json(json!({
        "total_results": items.len(),
        "items": items
    }))
}
