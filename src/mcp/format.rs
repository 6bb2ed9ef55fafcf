//! Human-readable rendering of search responses.
//!
//! The tool returns presentation text, not structured data, and always
//! distinguishes "invalid input" from "no results" from "search failed".

use std::fmt::Write;

use crate::search::SearchResponse;

/// Fixed reply for an empty or whitespace-only query. No search happens.
pub const REJECTION_MESSAGE: &str =
    "Please provide a search query, for example: search the publications for \"faith\".";

/// Fixed reply when the search ran but matched nothing.
#[must_use]
pub fn no_results_message(query: &str) -> String {
    format!("No results found for \"{query}\". Try different or fewer search terms.")
}

/// Fixed reply when the search could not be completed.
#[must_use]
pub fn search_failed_message(error: &str) -> String {
    format!("Search failed: {error}")
}

/// Render a search response as the text block returned to the caller.
#[must_use]
pub fn render_response(response: &SearchResponse) -> String {
    if !response.success {
        return search_failed_message(&response.error);
    }
    if response.results.is_empty() {
        return no_results_message(&response.query);
    }

    let shown = response.results.len();
    let mut out = String::new();

    let _ = write!(out, "Found {shown} result(s) for \"{}\"", response.query);
    if response.total_results > 0 {
        let _ = write!(out, " ({} total matches on the site)", response.total_results);
    }
    out.push_str(":\n\n");

    for (index, result) in response.results.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", index + 1, result.title);
        let _ = writeln!(out, "   Publication: {}", result.publication);
        let _ = writeln!(out, "   Link: {}", result.link);
        if !result.occurrences.is_empty() {
            let _ = writeln!(out, "   Occurrences: {}", result.occurrences);
        }
        if !result.snippet.is_empty() {
            let _ = writeln!(out, "   Snippet: {}", result.snippet);
        }
        out.push('\n');
    }

    let _ = write!(out, "Returned {shown} result(s).");
    out
}
