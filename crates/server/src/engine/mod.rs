pub mod client;
pub mod dashboard;
pub mod dsl;
pub mod facets;
pub mod outcomes;
pub mod query;
