//! Request/response invariant tests.

use proptest::prelude::*;
use wol_search_mcp::search::types::{MAX_RESULTS, MIN_RESULTS};
use wol_search_mcp::search::{SearchRequest, SearchResponse, SearchResult};

fn sample_result() -> SearchResult {
    SearchResult {
        title: "Article".to_string(),
        link: "https://wol.jw.org/en/wol/d/r1/lp-e/1?q=faith&p=par".to_string(),
        publication: "The Watchtower\u{2014}2017".to_string(),
        occurrences: "3 occurrences".to_string(),
        year: "2017".to_string(),
        snippet: "Faith moves mountains.".to_string(),
    }
}

#[test]
fn limits_outside_range_are_clamped() {
    assert_eq!(SearchRequest::new("q", 0).limit(), MIN_RESULTS);
    assert_eq!(SearchRequest::new("q", 11).limit(), MAX_RESULTS);
    assert_eq!(SearchRequest::new("q", 5).limit(), 5);
}

#[test]
fn request_carries_passthrough_codes() {
    let request = SearchRequest::new("q", 5)
        .with_search_type("doc")
        .with_sort_by("rel");
    assert_eq!(request.search_type(), "doc");
    assert_eq!(request.sort_by(), "rel");
}

#[test]
fn successful_response_has_empty_error() {
    let response = SearchResponse::ok("faith", 42, vec![sample_result()], "https://example/s");
    assert!(response.success);
    assert_eq!(response.error, "");
    assert_eq!(response.total_results, 42);
    assert_eq!(response.results.len(), 1);
}

#[test]
fn failed_response_is_empty_with_zero_total() {
    let response = SearchResponse::failed("faith", "https://example/s", "navigation timed out");
    assert!(!response.success);
    assert!(response.results.is_empty());
    assert_eq!(response.total_results, 0);
    assert_eq!(response.error, "navigation timed out");
}

proptest! {
    #[test]
    fn limit_always_lands_in_accepted_range(limit in any::<usize>()) {
        let request = SearchRequest::new("faith", limit);
        prop_assert!((MIN_RESULTS..=MAX_RESULTS).contains(&request.limit()));
    }

    #[test]
    fn query_is_always_trimmed(query in "[ \\t]*[a-z]{1,10}[ \\t]*") {
        let request = SearchRequest::new(query.clone(), 5);
        prop_assert_eq!(request.query(), query.trim());
    }
}
