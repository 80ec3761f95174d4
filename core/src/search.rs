//! Country autocomplete state.
//!
//! An empty query needs no request and clears the suggestions. Results that
//! arrive for a query the user has already changed are ignored. Failures are
//! logged and leave the list empty.

use tracing::{debug, warn};

use crate::types::Country;

/// Upper bound on suggestions kept from one response.
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountrySearch {
    query: String,
    results: Vec<Country>,
}

impl CountrySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Country] {
        &self.results
    }

    /// Store the new query. Returns `true` when a request should be issued.
    pub fn set_query(&mut self, query: &str) -> bool {
        self.query = query.to_string();
        if query.trim().is_empty() {
            self.results.clear();
            return false;
        }
        true
    }

    pub fn apply_results(&mut self, query: &str, outcome: Result<Vec<Country>, String>) {
        if query != self.query {
            debug!(query, current = %self.query, "dropping outdated country results");
            return;
        }
        match outcome {
            Ok(mut countries) => {
                countries.truncate(MAX_SUGGESTIONS);
                self.results = countries;
            }
            Err(message) => {
                warn!(%message, query, "country search failed");
                self.results.clear();
            }
        }
    }

    /// Take the suggestion at `index` and reset the search box.
    pub fn pick(&mut self, index: usize) -> Option<Country> {
        if index >= self.results.len() {
            return None;
        }
        let country = self.results.swap_remove(index);
        self.query.clear();
        self.results.clear();
        Some(country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str, cca2: &str) -> Country {
        Country {
            name: name.to_string(),
            cca2: cca2.to_string(),
            flag: String::new(),
        }
    }

    #[test]
    fn empty_query_needs_no_request_and_clears() {
        let mut search = CountrySearch::new();
        assert!(search.set_query("sp"));
        search.apply_results("sp", Ok(vec![country("Spain", "ES")]));
        assert_eq!(search.results().len(), 1);

        assert!(!search.set_query("   "));
        assert!(search.results().is_empty());
    }

    #[test]
    fn results_are_capped() {
        let mut search = CountrySearch::new();
        search.set_query("a");
        let many: Vec<_> = (0..15).map(|i| country(&format!("C{i}"), "XX")).collect();
        search.apply_results("a", Ok(many));
        assert_eq!(search.results().len(), MAX_SUGGESTIONS);
        assert_eq!(search.results()[0].name, "C0");
    }

    #[test]
    fn outdated_results_are_ignored() {
        let mut search = CountrySearch::new();
        search.set_query("fr");
        search.set_query("ger");
        search.apply_results("fr", Ok(vec![country("France", "FR")]));
        assert!(search.results().is_empty());
        assert_eq!(search.query(), "ger");
    }

    #[test]
    fn failure_leaves_list_empty() {
        let mut search = CountrySearch::new();
        search.set_query("it");
        search.apply_results("it", Ok(vec![country("Italy", "IT")]));
        search.apply_results("it", Err("Network Error".into()));
        assert!(search.results().is_empty());
    }

    #[test]
    fn pick_returns_country_and_resets() {
        let mut search = CountrySearch::new();
        search.set_query("a");
        search.apply_results(
            "a",
            Ok(vec![country("Spain", "ES"), country("Canada", "CA")]),
        );
        let picked = search.pick(1).unwrap();
        assert_eq!(picked.cca2, "CA");
        assert!(search.query().is_empty());
        assert!(search.results().is_empty());
        assert!(search.pick(0).is_none());
    }
}
