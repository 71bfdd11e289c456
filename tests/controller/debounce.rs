//! Debounce, normalization and query gating.

use crate::common::{harness, harness_with, query_param, results_body, ViewCall, DELAY};
use sorex_searchbox::PanelState;

#[test]
fn burst_of_keystrokes_sends_one_request_for_the_last_value() {
    let mut h = harness();
    for text in ["o", "op", "ope", "open", "opens", "opensearch"] {
        h.type_text(text);
        h.advance(DELAY - 1);
    }
    assert!(h.requests().is_empty(), "nothing fires while keys keep coming");

    h.advance(1);
    let requests = h.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(query_param(&requests[0]), "opensearch");
}

#[test]
fn request_goes_out_exactly_one_delay_after_the_last_keystroke() {
    let mut h = harness();
    h.type_text("index");
    h.advance(120);
    h.type_text("indexing");
    h.advance(DELAY - 1);
    assert!(h.requests().is_empty());
    h.advance(1);
    assert_eq!(h.last_request().issued_at_ms, 120 + DELAY);
}

#[test]
fn pauses_longer_than_the_delay_search_each_time() {
    let mut h = harness();
    h.type_text("index");
    h.advance(DELAY);
    h.type_text("indexes");
    h.advance(DELAY);
    let queries: Vec<String> = h.requests().iter().map(query_param).collect();
    assert_eq!(queries, vec!["index", "indexes"]);
}

#[test]
fn custom_delay_is_honored() {
    let mut h = harness_with(r#"{"debounceMs":100}"#);
    h.type_text("alpha");
    h.advance(99);
    assert!(h.requests().is_empty());
    h.advance(1);
    assert_eq!(h.requests().len(), 1);
}

#[test]
fn punctuation_runs_collapse_to_one_space() {
    let mut h = harness();
    h.type_text("k-NN:(approx)!!search");
    h.advance(DELAY);
    assert_eq!(query_param(&h.last_request()), "k-NN approx search");
}

#[test]
fn allowed_spaces_between_punctuation_runs_are_kept() {
    let mut h = harness();
    h.type_text("k-NN: (approx)!!search");
    h.advance(DELAY);
    assert_eq!(query_param(&h.last_request()), "k-NN   approx search");
}

#[test]
fn same_normalized_query_is_not_searched_twice() {
    let mut h = harness();
    h.type_text("alpha?");
    h.advance(DELAY);
    h.type_text("alpha!");
    h.advance(DELAY);
    h.type_text("alpha?!");
    h.advance(DELAY);
    assert_eq!(h.requests().len(), 1);
}

#[test]
fn short_query_hides_and_clears_without_a_request() {
    let mut h = harness();
    h.search_and_respond("alpha", &results_body(3));
    h.clear_view_calls();

    h.type_text("al");
    h.advance(DELAY);

    assert_eq!(h.requests().len(), 1, "no request for a short query");
    assert_eq!(h.controller.state(), PanelState::Hidden);
    assert!(h.controller.results().is_none());
    assert!(h.controller.last_query().is_none());
    let calls = h.view_calls();
    assert!(calls.contains(&ViewCall::Visible(false)));
    assert!(calls.contains(&ViewCall::Clear));
}

#[test]
fn symbols_only_count_as_short() {
    let mut h = harness();
    h.type_text("a!!!!!!");
    h.advance(DELAY);
    assert!(h.requests().is_empty());
}

#[test]
fn retyping_after_a_short_query_searches_again() {
    let mut h = harness();
    h.search_and_respond("alpha", &results_body(1));
    h.type_text("al");
    h.advance(DELAY);
    h.type_text("alpha");
    h.advance(DELAY);
    assert_eq!(h.requests().len(), 2);
}

#[test]
fn version_rides_along_as_v() {
    let mut h = harness_with(r#"{"endpoint":"/api/search","version":"2.11"}"#);
    h.type_text("snapshot restore");
    h.advance(DELAY);
    assert_eq!(h.last_request().url, "/api/search?q=snapshot%20restore&v=2.11");
}

#[test]
fn no_version_means_no_v() {
    let mut h = harness_with(r#"{"endpoint":"/api/search"}"#);
    h.type_text("alpha");
    h.advance(DELAY);
    assert_eq!(h.last_request().url, "/api/search?q=alpha");
}
