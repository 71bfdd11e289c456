//! Only the latest request may touch the panel.

use crate::common::{harness, live_requests, results_body, ViewCall, DELAY, ONE_RESULT_BODY};
use sorex_searchbox::{FetchError, Key, PanelState};

#[test]
fn new_search_cancels_the_outstanding_one() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    h.type_text("bravo");
    h.advance(DELAY);

    let requests = h.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].is_cancelled());
    assert!(!requests[1].is_cancelled());
    assert_eq!(h.controller.in_flight(), Some(requests[1].id));
}

#[test]
fn stale_response_is_ignored_even_if_it_arrives() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    h.type_text("bravo");
    h.advance(DELAY);
    let requests = h.requests();

    h.respond(requests[0].id, ONE_RESULT_BODY);
    assert_eq!(h.controller.state(), PanelState::Hidden);
    assert!(h.rendered().is_none(), "stale body was rendered");

    h.respond(requests[1].id, &results_body(4));
    assert_eq!(h.controller.results().map(|r| r.len()), Some(4));
}

#[test]
fn late_old_response_does_not_overwrite_newer_results() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    h.type_text("bravo");
    h.advance(DELAY);
    let requests = h.requests();

    h.respond(requests[1].id, &results_body(2));
    let shown = h.rendered();
    h.respond(requests[0].id, &results_body(7));

    assert_eq!(h.rendered(), shown);
    assert_eq!(h.controller.results().map(|r| r.len()), Some(2));
}

#[test]
fn a_response_settles_only_once() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    let id = h.last_request().id;
    h.respond(id, ONE_RESULT_BODY);
    h.respond(id, &results_body(5));

    let renders = h
        .view_calls()
        .into_iter()
        .filter(|c| matches!(c, ViewCall::Render(_)))
        .count();
    assert_eq!(renders, 1);
    assert_eq!(h.controller.in_flight(), None);
}

#[test]
fn short_query_cancels_the_request_in_flight() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    h.type_text("a");
    h.advance(DELAY);
    assert!(live_requests(&h).is_empty());
    assert_eq!(h.controller.in_flight(), None);
}

#[test]
fn escape_cancels_pending_keystroke_and_request() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    h.type_text("alphabet");
    assert_eq!(h.pending_timers(), 1);

    assert!(h.controller.on_key(Key::Escape));
    assert_eq!(h.pending_timers(), 0);
    assert!(live_requests(&h).is_empty());

    h.advance(DELAY * 2);
    assert_eq!(h.requests().len(), 1, "cancelled keystroke still searched");
}

#[test]
fn network_failure_is_swallowed() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    let id = h.last_request().id;
    h.fail(id, FetchError::Network("offline".to_string()));

    assert_eq!(h.controller.state(), PanelState::Hidden);
    assert_eq!(h.controller.in_flight(), None);
    assert!(h.view_calls().is_empty());
}

#[test]
fn failure_keeps_what_is_already_shown() {
    let mut h = harness();
    h.search_and_respond("alpha", &results_body(3));
    h.type_text("alphabet");
    h.advance(DELAY);
    let id = h.last_request().id;
    h.fail(id, FetchError::Network("timeout".to_string()));

    assert_eq!(h.controller.state(), PanelState::ShowingResults);
    assert_eq!(h.controller.results().map(|r| r.len()), Some(3));
}

#[test]
fn abort_of_superseded_request_changes_nothing() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    h.type_text("bravo");
    h.advance(DELAY);
    let requests = h.requests();
    h.clear_view_calls();

    h.fail(requests[0].id, FetchError::Aborted);
    assert!(h.view_calls().is_empty());
    assert_eq!(h.controller.in_flight(), Some(requests[1].id));
}

#[test]
fn shutdown_stops_everything() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    h.type_text("alphabet");
    h.controller.shutdown();

    assert_eq!(h.pending_timers(), 0);
    assert!(live_requests(&h).is_empty());
}
