//! Data structures and constants for library search.

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Smallest accepted result ceiling.
pub const MIN_RESULTS: usize = 1;

/// Largest accepted result ceiling.
pub const MAX_RESULTS: usize = 10;

/// Ceiling used when the caller does not ask for one.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Maximum snippet length in characters before truncation.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Title used when a result anchor carries no text.
pub const NO_TITLE: &str = "No title";

/// Sentinel used when a result has no anchor href.
pub const NO_LINK: &str = "No link";

/// Search-type code for paragraph-level matches.
pub const DEFAULT_SEARCH_TYPE: &str = "par";

/// Sort code for ordering by occurrence count.
pub const DEFAULT_SORT_BY: &str = "occ";

/// CSS selector for the rendered results container. The page builds its
/// result list client-side, so this appearing is the "results are ready"
/// signal.
pub const RESULTS_CONTAINER_SELECTOR: &str = "ul.results";

/// CSS selector for one search-result entry.
pub const RESULT_SELECTOR: &str = "li.searchResult";

/// CSS selector for the title anchor inside a result entry.
pub const TITLE_LINK_SELECTOR: &str = ".searchResultHeader a";

/// CSS selector for the publication label inside a result entry.
pub const PUBLICATION_SELECTOR: &str = ".searchResultPublication";

/// CSS selector for the occurrence-count label inside a result entry.
pub const OCCURRENCES_SELECTOR: &str = ".searchResultOccurrences";

/// CSS selector for the snippet inside a result entry.
pub const SNIPPET_SELECTOR: &str = ".searchResultSnippet";

/// CSS selector for the site's total-results indicator.
pub const RESULTS_COUNT_SELECTOR: &str = "#searchResultsCount";

// =============================================================================
// Data structures
// =============================================================================

/// A search request. Immutable once constructed: the query is trimmed and
/// the ceiling clamped to [`MIN_RESULTS`]..=[`MAX_RESULTS`] up front, so
/// every later stage can rely on both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    limit: usize,
    search_type: String,
    sort_by: String,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        Self {
            query: query.into().trim().to_string(),
            limit: limit.clamp(MIN_RESULTS, MAX_RESULTS),
            search_type: DEFAULT_SEARCH_TYPE.to_string(),
            sort_by: DEFAULT_SORT_BY.to_string(),
        }
    }

    /// Override the search-type code passed through to the site.
    #[must_use]
    pub fn with_search_type(mut self, code: impl Into<String>) -> Self {
        self.search_type = code.into();
        self
    }

    /// Override the sort code passed through to the site.
    #[must_use]
    pub fn with_sort_by(mut self, code: impl Into<String>) -> Self {
        self.sort_by = code.into();
        self
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn search_type(&self) -> &str {
        &self.search_type
    }

    #[must_use]
    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }
}

/// One extracted search result, in the order the site returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document title, or [`NO_TITLE`].
    pub title: String,

    /// Absolute URL opening onto the matching paragraph, or [`NO_LINK`].
    pub link: String,

    /// Publication label as shown by the site, possibly empty.
    pub publication: String,

    /// Occurrence-count label, e.g. "3 occurrences", possibly empty.
    pub occurrences: String,

    /// Publication year derived from the publication label, empty if
    /// undetectable.
    pub year: String,

    /// Snippet, trimmed and truncated to [`SNIPPET_MAX_CHARS`] characters.
    pub snippet: String,
}

/// The assembled response for one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query as searched (post-trim).
    pub query: String,

    /// Total matches the site reports, 0 when unparseable.
    pub total_results: u32,

    /// Extracted results, never longer than the request ceiling.
    pub results: Vec<SearchResult>,

    /// The URL that was (or would have been) navigated to, for diagnostics.
    pub search_url: String,

    pub success: bool,

    /// Empty on success, the underlying failure text otherwise.
    pub error: String,
}

impl SearchResponse {
    /// A successful response. `error` is always empty here.
    #[must_use]
    pub fn ok(
        query: &str,
        total_results: u32,
        results: Vec<SearchResult>,
        search_url: &str,
    ) -> Self {
        Self {
            query: query.to_string(),
            total_results,
            results,
            search_url: search_url.to_string(),
            success: true,
            error: String::new(),
        }
    }

    /// A failed response. Results are always empty and the total zero here.
    #[must_use]
    pub fn failed(query: &str, search_url: &str, error: impl Into<String>) -> Self {
        Self {
            query: query.to_string(),
            total_results: 0,
            results: Vec::new(),
            search_url: search_url.to_string(),
            success: false,
            error: error.into(),
        }
    }
}
