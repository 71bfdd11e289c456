//! Keyboard, pointer and focus handling.

use crate::common::{harness, press, results_body, showing, ViewCall, DELAY};
use sorex_searchbox::{Key, PanelState};
use std::collections::BTreeSet;

fn marked(indices: &[usize]) -> BTreeSet<usize> {
    indices.iter().copied().collect()
}

#[test]
fn arrow_down_walks_the_list_then_falls_off_the_end() {
    let mut h = showing(3);
    let mut seen = Vec::new();
    for _ in 0..4 {
        assert!(h.controller.on_key(Key::ArrowDown));
        seen.push(h.controller.highlight());
    }
    assert_eq!(seen, vec![Some(0), Some(1), Some(2), None]);
    assert!(h.marked().is_empty());
}

#[test]
fn arrow_up_from_nothing_stays_empty() {
    let mut h = showing(3);
    assert!(h.controller.on_key(Key::ArrowUp), "default still prevented");
    assert_eq!(h.controller.highlight(), None);
}

#[test]
fn arrow_up_past_the_top_clears() {
    let mut h = showing(3);
    press(&mut h, Key::ArrowDown, 2);
    press(&mut h, Key::ArrowUp, 1);
    assert_eq!(h.controller.highlight(), Some(0));
    press(&mut h, Key::ArrowUp, 1);
    assert_eq!(h.controller.highlight(), None);
}

#[test]
fn keyboard_moves_scroll_the_item_into_view() {
    let mut h = showing(5);
    h.clear_view_calls();
    press(&mut h, Key::ArrowDown, 2);
    assert_eq!(
        h.view_calls(),
        vec![
            ViewCall::Highlight(None, Some(0)),
            ViewCall::ScrollIntoView(0),
            ViewCall::Highlight(Some(0), Some(1)),
            ViewCall::ScrollIntoView(1),
        ]
    );
    assert_eq!(h.marked(), marked(&[1]));
}

#[test]
fn arrows_pass_through_while_hidden_or_empty() {
    let mut h = harness();
    assert!(!h.controller.on_key(Key::ArrowDown));

    h.search_and_respond("alpha", r#"{"results":[]}"#);
    assert_eq!(h.controller.state(), PanelState::ShowingNoResults);
    assert!(!h.controller.on_key(Key::ArrowDown));
    assert!(!h.controller.on_key(Key::Enter));
}

#[test]
fn enter_follows_the_highlighted_result_once() {
    let mut h = showing(3);
    press(&mut h, Key::ArrowDown, 2);
    assert!(h.controller.on_key(Key::Enter));
    assert_eq!(h.navigations(), vec!["/docs/page-1".to_string()]);
}

#[test]
fn enter_committing_a_composition_does_not_navigate() {
    let mut h = showing(3);
    press(&mut h, Key::ArrowDown, 1);
    assert!(!h.controller.on_key(Key::from_keyboard("Enter", true)));
    assert!(h.navigations().is_empty());
    assert_eq!(h.controller.highlight(), Some(0));
}

#[test]
fn enter_uses_the_sanitized_url() {
    let mut h = harness();
    h.search_and_respond(
        "alpha",
        r#"{"results":[{"url":"javascript:alert(1)","title":"x"}]}"#,
    );
    press(&mut h, Key::ArrowDown, 1);
    h.controller.on_key(Key::Enter);
    assert_eq!(h.navigations(), vec!["#".to_string()]);
}

#[test]
fn escape_resets_everything() {
    let mut h = showing(3);
    press(&mut h, Key::ArrowDown, 1);
    h.clear_view_calls();

    assert!(h.controller.on_key(Key::Escape));
    assert_eq!(h.controller.state(), PanelState::Hidden);
    assert_eq!(h.controller.highlight(), None);
    assert!(h.controller.results().is_none());
    assert!(h.controller.last_query().is_none());

    let calls = h.view_calls();
    assert!(calls.contains(&ViewCall::ClearInput));
    assert!(calls.contains(&ViewCall::Visible(false)));
    assert!(calls.contains(&ViewCall::Clear));

    // Nothing left to bring back
    h.controller.on_focus();
    assert_eq!(h.controller.state(), PanelState::Hidden);
}

#[test]
fn same_query_after_escape_searches_again() {
    let mut h = showing(2);
    h.controller.on_key(Key::Escape);
    h.type_text("alpha");
    h.advance(DELAY);
    assert_eq!(h.requests().len(), 2);
}

#[test]
fn hover_is_applied_once_per_frame_with_the_latest_index() {
    let mut h = showing(5);
    assert!(h.controller.on_pointer_enter(3), "first hover asks for a frame");
    assert!(!h.controller.on_pointer_enter(1));
    assert!(!h.controller.on_pointer_enter(2));
    assert_eq!(h.controller.highlight(), None, "nothing before the frame");

    h.controller.on_animation_frame();
    assert_eq!(h.controller.highlight(), Some(2));
    assert_eq!(h.marked(), marked(&[2]));

    assert!(h.controller.on_pointer_enter(4), "next frame may be requested");
}

#[test]
fn hover_then_keys_keep_a_single_highlight() {
    let mut h = showing(4);
    h.controller.on_pointer_enter(2);
    h.controller.on_animation_frame();
    press(&mut h, Key::ArrowDown, 1);
    assert_eq!(h.controller.highlight(), Some(3));
    assert_eq!(h.marked(), marked(&[3]));

    h.controller.on_pointer_enter(0);
    h.controller.on_animation_frame();
    assert_eq!(h.marked(), marked(&[0]));
}

#[test]
fn hover_is_ignored_while_hidden_or_out_of_range() {
    let mut h = harness();
    assert!(!h.controller.on_pointer_enter(0));

    let mut h = showing(2);
    h.controller.on_pointer_enter(9);
    h.controller.on_animation_frame();
    assert_eq!(h.controller.highlight(), None);
}

#[test]
fn outside_click_hides_but_keeps_results_for_refocus() {
    let mut h = showing(3);
    press(&mut h, Key::ArrowDown, 1);

    assert!(h.controller.on_pointer_down_outside());
    assert_eq!(h.controller.state(), PanelState::Hidden);
    assert!(h.view_calls().contains(&ViewCall::BlurInput));
    assert!(h.marked().is_empty());
    assert_eq!(h.controller.results().map(|r| r.len()), Some(3));
    assert!(h.controller.last_query().is_some());

    h.clear_view_calls();
    h.controller.on_focus();
    assert_eq!(h.controller.state(), PanelState::ShowingResults);
    assert_eq!(h.view_calls(), vec![ViewCall::Visible(true)]);
    assert_eq!(h.requests().len(), 1, "refocus does not refetch");
}

#[test]
fn outside_click_while_hidden_passes_through() {
    let mut h = harness();
    assert!(!h.controller.on_pointer_down_outside());
    assert!(h.view_calls().is_empty());
}

#[test]
fn response_after_dismissal_waits_for_focus() {
    let mut h = harness();
    h.type_text("alpha");
    h.advance(DELAY);
    h.controller.on_pointer_down_outside();
    let id = h.last_request().id;
    h.respond(id, &results_body(2));

    assert_eq!(h.controller.state(), PanelState::Hidden);
    assert!(!h.view_calls().contains(&ViewCall::Visible(true)));

    h.controller.on_focus();
    assert_eq!(h.controller.state(), PanelState::ShowingResults);
}

#[test]
fn focus_does_not_bring_back_no_results() {
    let mut h = harness();
    h.search_and_respond("zzzzz", "{}");
    assert_eq!(h.controller.state(), PanelState::ShowingNoResults);
    h.controller.on_pointer_down_outside();
    h.controller.on_focus();
    assert_eq!(h.controller.state(), PanelState::Hidden);
}

#[test]
fn dismiss_hides_and_keeps_query() {
    let mut h = showing(2);
    h.controller.dismiss();
    assert!(!h.controller.is_visible());
    assert_eq!(h.controller.last_query().map(|q| q.as_str()), Some("alpha"));

    h.type_text("alpha");
    h.advance(DELAY);
    assert_eq!(h.requests().len(), 1, "kept query still dedups");
}

#[test]
fn fresh_results_drop_the_old_highlight() {
    let mut h = showing(3);
    press(&mut h, Key::ArrowDown, 2);
    h.type_text("bravo");
    h.advance(DELAY);
    let id = h.last_request().id;
    h.respond(id, &results_body(3));

    assert_eq!(h.controller.highlight(), None);
    assert!(h.marked().is_empty());
    press(&mut h, Key::ArrowDown, 1);
    assert_eq!(h.controller.highlight(), Some(0));
}
