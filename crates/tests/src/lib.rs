#[cfg(test)]
mod common;

#[cfg(test)]
mod outcome_search_tests;


#[cfg(test)]
mod retry_tests;

#[cfg(test)]
mod dashboard_tests;

#[cfg(test)]
mod fixture_api_tests;
