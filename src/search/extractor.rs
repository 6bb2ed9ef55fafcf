//! Result extraction from the rendered search page.
//!
//! Works on the page HTML captured after the results container has
//! rendered, so everything here is synchronous and testable against stub
//! markup. Each result node is mapped independently; a malformed node is
//! skipped and logged, never aborting the batch; the site's DOM is not
//! contractually stable per result.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::types::{
    NO_LINK, NO_TITLE, OCCURRENCES_SELECTOR, PUBLICATION_SELECTOR, RESULT_SELECTOR,
    RESULTS_COUNT_SELECTOR, SNIPPET_MAX_CHARS, SNIPPET_SELECTOR, SearchResult,
    TITLE_LINK_SELECTOR,
};

static RESULT: Lazy<Selector> = Lazy::new(|| parse_selector(RESULT_SELECTOR));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| parse_selector(TITLE_LINK_SELECTOR));
static PUBLICATION: Lazy<Selector> = Lazy::new(|| parse_selector(PUBLICATION_SELECTOR));
static OCCURRENCES: Lazy<Selector> = Lazy::new(|| parse_selector(OCCURRENCES_SELECTOR));
static SNIPPET: Lazy<Selector> = Lazy::new(|| parse_selector(SNIPPET_SELECTOR));
static RESULTS_COUNT: Lazy<Selector> = Lazy::new(|| parse_selector(RESULTS_COUNT_SELECTOR));

/// Publication date suffix, e.g. "The Watchtower—2017".
static DASHED_YEAR: Lazy<Regex> = Lazy::new(|| parse_regex(r"—(\d{4})\b"));

/// Any standalone 4-digit token, the fallback when no dashed suffix exists.
static BARE_YEAR: Lazy<Regex> = Lazy::new(|| parse_regex(r"\b(\d{4})\b"));

/// Leading integer (digit-grouping commas allowed) followed by the word
/// "results", as rendered by the site's count indicator.
static TOTAL_COUNT: Lazy<Regex> = Lazy::new(|| parse_regex(r"^([0-9][0-9,]*)\s+results"));

fn parse_selector(selector: &str) -> Selector {
    // All inputs are fixed module constants, checked by the test suite.
    Selector::parse(selector).expect("fixed CSS selector")
}

fn parse_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("fixed regex pattern")
}

/// Extract up to `limit` results from the rendered page HTML, in document
/// order, stopping as soon as the ceiling is reached.
#[must_use]
pub fn extract(html: &str, query: &str, base_url: &str, limit: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let mut results = Vec::new();

    for node in document.select(&RESULT) {
        if results.len() >= limit {
            break;
        }
        match extract_node(&node, query, base_url) {
            Some(result) => results.push(result),
            // Malformed fragment without a title anchor: excluded, not counted.
            None => debug!("skipping result node without a title anchor"),
        }
    }

    debug!(count = results.len(), limit, "extracted search results");
    results
}

/// Best-effort total-results count from the site's indicator element.
///
/// Returns 0 whenever the element is missing or its wording does not match;
/// the site's phrasing is not under our control and a wrong total must not
/// fail the request.
#[must_use]
pub fn total_results(html: &str) -> u32 {
    let document = Html::parse_document(html);

    let Some(element) = document.select(&RESULTS_COUNT).next() else {
        debug!("results-count element not found");
        return 0;
    };

    let text = element.text().collect::<String>();
    let trimmed = text.trim();

    match TOTAL_COUNT
        .captures(trimmed)
        .and_then(|captures| captures[1].replace(',', "").parse::<u32>().ok())
    {
        Some(total) => total,
        None => {
            warn!("could not parse results count from '{trimmed}', reporting 0");
            0
        }
    }
}

/// Derive a publication year from a free-text publication label.
///
/// An em-dash immediately followed by four digits marks a date suffix and
/// wins over any other number in the label; otherwise the first standalone
/// 4-digit token is taken. Empty when neither matches.
#[must_use]
pub fn derive_year(publication: &str) -> String {
    DASHED_YEAR
        .captures(publication)
        .or_else(|| BARE_YEAR.captures(publication))
        .map(|captures| captures[1].to_string())
        .unwrap_or_default()
}

/// Trim a snippet and cut it to [`SNIPPET_MAX_CHARS`] characters, with an
/// ellipsis marker when something was removed. Cuts on character
/// boundaries, never bytes.
#[must_use]
pub fn truncate_snippet(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(SNIPPET_MAX_CHARS) {
        None => trimmed.to_string(),
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
    }
}

/// Make a result href absolute and re-append the query with a `p=par`
/// marker so the link opens directly onto the matching paragraph.
#[must_use]
pub fn absolutize_link(href: &str, base_url: &str, query: &str) -> String {
    let absolute = if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{href}", base_url.trim_end_matches('/'))
    };

    let separator = if absolute.contains('?') { '&' } else { '?' };
    format!("{absolute}{separator}q={}&p=par", urlencoding::encode(query))
}

/// Map one result node to a [`SearchResult`].
///
/// `None` means the node has no title anchor and is excluded from the
/// count. Optional sub-elements degrade to empty fields.
fn extract_node(node: &ElementRef, query: &str, base_url: &str) -> Option<SearchResult> {
    let anchor = node.select(&TITLE_LINK).next()?;

    let title_text = anchor.text().collect::<String>();
    let title_text = title_text.trim();
    let title = if title_text.is_empty() {
        NO_TITLE.to_string()
    } else {
        title_text.to_string()
    };

    let link = match anchor.value().attr("href") {
        Some(href) => absolutize_link(href, base_url, query),
        None => NO_LINK.to_string(),
    };

    let publication = text_of(node, &PUBLICATION);
    let occurrences = text_of(node, &OCCURRENCES);
    let year = derive_year(&publication);
    let snippet = node
        .select(&SNIPPET)
        .next()
        .map(|element| truncate_snippet(&element.text().collect::<String>()))
        .unwrap_or_default();

    Some(SearchResult {
        title,
        link,
        publication,
        occurrences,
        year,
        snippet,
    })
}

fn text_of(node: &ElementRef, selector: &Selector) -> String {
    node.select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_prefers_dashed_suffix() {
        assert_eq!(derive_year("The Watchtower—2017"), "2017");
        // A dashed suffix beats an earlier bare token.
        assert_eq!(derive_year("Awake 1998—2003"), "2003");
    }

    #[test]
    fn year_falls_back_to_bare_token() {
        assert_eq!(derive_year("Awake No. 3 1998 study"), "1998");
    }

    #[test]
    fn year_ignores_non_year_numbers() {
        assert_eq!(derive_year("no year here"), "");
        assert_eq!(derive_year("chapter 12 verse 345"), "");
        // Five digits in a row are not a year.
        assert_eq!(derive_year("catalog 12345"), "");
    }

    #[test]
    fn snippet_shorter_than_limit_is_unchanged() {
        let input = "a".repeat(150);
        assert_eq!(truncate_snippet(&input), input);
    }

    #[test]
    fn snippet_is_cut_at_200_chars_with_ellipsis() {
        let input = "b".repeat(250);
        let output = truncate_snippet(&input);
        assert_eq!(output.chars().count(), SNIPPET_MAX_CHARS + 3);
        assert!(output.ends_with("..."));
        assert_eq!(&output[..SNIPPET_MAX_CHARS], "b".repeat(200));
    }

    #[test]
    fn snippet_truncation_respects_multibyte_boundaries() {
        let input = "é".repeat(250);
        let output = truncate_snippet(&input);
        assert!(output.ends_with("..."));
        assert_eq!(output.chars().count(), SNIPPET_MAX_CHARS + 3);
    }
}
