//! Canned stand-ins for the external services the application talks to in
//! production. Mounted under `/fixtures` only when `FIXTURES_ENABLED` is set,
//! so local development and demos run without network access or credentials.

pub mod chat;
pub mod companies;
pub mod outcomes_list;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn fixtures_router() -> Router<AppState> {
    Router::new()
        .route(
            "/fixtures/companies/company/{number}",
            get(companies::company_profile),
        )
        .route("/fixtures/companies/search", get(companies::company_search))
        .route(
            "/fixtures/llm/v1/chat/completions",
            post(chat::chat_completion),
        )
        .route("/fixtures/outcomes", get(outcomes_list::list_outcomes))
}
