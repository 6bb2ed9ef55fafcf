//! Extractor tests against stub results-page markup.

use wol_search_mcp::search::extractor::{absolutize_link, derive_year, extract, total_results};
use wol_search_mcp::search::types::{NO_LINK, NO_TITLE};

const BASE_URL: &str = "https://wol.jw.org";

fn result_node(title: &str, href: Option<&str>) -> String {
    let anchor = match href {
        Some(href) => format!("<a href=\"{href}\">{title}</a>"),
        None => format!("<a>{title}</a>"),
    };
    format!(
        "<li class=\"searchResult\">\
           <div class=\"searchResultHeader\">{anchor}</div>\
           <div class=\"searchResultPublication\">The Watchtower\u{2014}2017</div>\
           <div class=\"searchResultOccurrences\">3 occurrences</div>\
           <div class=\"searchResultSnippet\">Faith moves mountains.</div>\
         </li>"
    )
}

fn results_page(nodes: &[String], count_text: &str) -> String {
    format!(
        "<html><body>\
           <div id=\"searchResultsCount\">{count_text}</div>\
           <ul class=\"results\">{}</ul>\
         </body></html>",
        nodes.join("")
    )
}

#[test]
fn three_nodes_under_ceiling_all_extracted_in_document_order() {
    let nodes: Vec<String> = (1..=3)
        .map(|i| result_node(&format!("Article {i}"), Some(&format!("/en/wol/d/r1/lp-e/{i}"))))
        .collect();
    let html = results_page(&nodes, "3 results (0.02 seconds)");

    let results = extract(&html, "faith", BASE_URL, 5);

    assert_eq!(results.len(), 3);
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Article 1", "Article 2", "Article 3"]);
}

#[test]
fn extraction_stops_at_the_ceiling() {
    let nodes: Vec<String> = (1..=7)
        .map(|i| result_node(&format!("Article {i}"), Some(&format!("/en/wol/d/r1/lp-e/{i}"))))
        .collect();
    let html = results_page(&nodes, "7 results (0.02 seconds)");

    let results = extract(&html, "faith", BASE_URL, 5);

    assert_eq!(results.len(), 5);
    assert_eq!(results[4].title, "Article 5");
}

#[test]
fn node_without_title_anchor_is_skipped_not_counted() {
    let broken = "<li class=\"searchResult\">\
                    <div class=\"searchResultHeader\"><span>not a link</span></div>\
                  </li>"
        .to_string();
    let nodes = vec![
        result_node("First", Some("/en/wol/d/r1/lp-e/1")),
        broken,
        result_node("Second", Some("/en/wol/d/r1/lp-e/2")),
    ];
    let html = results_page(&nodes, "3 results (0.02 seconds)");

    let results = extract(&html, "faith", BASE_URL, 10);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "First");
    assert_eq!(results[1].title, "Second");
}

#[test]
fn empty_anchor_text_defaults_the_title() {
    let nodes = vec![result_node("", Some("/en/wol/d/r1/lp-e/1"))];
    let html = results_page(&nodes, "1 results (0.01 seconds)");

    let results = extract(&html, "faith", BASE_URL, 5);

    assert_eq!(results[0].title, NO_TITLE);
}

#[test]
fn missing_href_yields_the_link_sentinel() {
    let nodes = vec![result_node("Unlinked", None)];
    let html = results_page(&nodes, "1 results (0.01 seconds)");

    let results = extract(&html, "faith", BASE_URL, 5);

    assert_eq!(results[0].link, NO_LINK);
}

#[test]
fn links_are_absolute_and_open_onto_the_matching_paragraph() {
    let nodes = vec![result_node("Article", Some("/en/wol/d/r1/lp-e/2017284"))];
    let html = results_page(&nodes, "1 results (0.01 seconds)");

    let results = extract(&html, "faith & hope", BASE_URL, 5);

    assert_eq!(
        results[0].link,
        "https://wol.jw.org/en/wol/d/r1/lp-e/2017284?q=faith%20%26%20hope&p=par"
    );
}

#[test]
fn optional_sub_elements_degrade_to_empty_fields() {
    let minimal = "<li class=\"searchResult\">\
                     <div class=\"searchResultHeader\">\
                       <a href=\"/en/wol/d/r1/lp-e/9\">Bare</a>\
                     </div>\
                   </li>"
        .to_string();
    let html = results_page(&[minimal], "1 results (0.01 seconds)");

    let results = extract(&html, "faith", BASE_URL, 5);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].publication, "");
    assert_eq!(results[0].occurrences, "");
    assert_eq!(results[0].snippet, "");
    assert_eq!(results[0].year, "");
}

#[test]
fn year_and_occurrences_flow_through_from_the_node() {
    let nodes = vec![result_node("Article", Some("/en/wol/d/r1/lp-e/1"))];
    let html = results_page(&nodes, "1 results (0.01 seconds)");

    let results = extract(&html, "faith", BASE_URL, 5);

    assert_eq!(results[0].publication, "The Watchtower\u{2014}2017");
    assert_eq!(results[0].year, "2017");
    assert_eq!(results[0].occurrences, "3 occurrences");
}

#[test]
fn long_snippets_are_truncated_through_extraction() {
    let snippet = "x".repeat(250);
    let node = format!(
        "<li class=\"searchResult\">\
           <div class=\"searchResultHeader\"><a href=\"/d/1\">Long</a></div>\
           <div class=\"searchResultSnippet\">{snippet}</div>\
         </li>"
    );
    let html = results_page(&[node], "1 results (0.01 seconds)");

    let results = extract(&html, "faith", BASE_URL, 5);

    assert_eq!(results[0].snippet.chars().count(), 203);
    assert!(results[0].snippet.ends_with("..."));
}

#[test]
fn total_count_parses_plain_and_grouped_numbers() {
    let html = results_page(&[], "12 results");
    assert_eq!(total_results(&html), 12);

    let html = results_page(&[], "1,234 results (0.31 seconds)");
    assert_eq!(total_results(&html), 1234);
}

#[test]
fn total_count_degrades_to_zero() {
    // Wording change: number not leading.
    let html = results_page(&[], "about 12 results");
    assert_eq!(total_results(&html), 0);

    // No count element at all.
    let html = "<html><body><ul class=\"results\"></ul></body></html>";
    assert_eq!(total_results(html), 0);

    // Non-numeric text.
    let html = results_page(&[], "no matches");
    assert_eq!(total_results(&html), 0);
}

#[test]
fn year_extraction_vectors() {
    assert_eq!(derive_year("Watchtower\u{2014}2017"), "2017");
    assert_eq!(derive_year("Awake No. 3 1998 study"), "1998");
    assert_eq!(derive_year("no year here"), "");
}

#[test]
fn absolute_hrefs_are_not_double_prefixed() {
    let link = absolutize_link("https://other.example/doc", BASE_URL, "faith");
    assert_eq!(link, "https://other.example/doc?q=faith&p=par");
}
