//! Debounce coalescing and cancellation precedence.

use crate::common::{harness, live_requests, results_body, DELAY};
use proptest::prelude::*;
use sorex_searchbox::normalize;

/// Words long enough to pass the gate, all distinct after normalization.
fn query_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{3,10}").unwrap()
}

proptest! {
    /// Keystrokes closer together than the delay produce exactly one request,
    /// for the final text, one delay after the final keystroke.
    #[test]
    fn prop_burst_coalesces(
        texts in prop::collection::vec(query_strategy(), 1..12),
        gaps in prop::collection::vec(0..DELAY, 12),
    ) {
        let mut h = harness();
        let mut last_at = 0;
        for (text, gap) in texts.iter().zip(&gaps) {
            h.advance(*gap);
            last_at = h.now_ms();
            h.type_text(text);
        }
        h.advance(DELAY);

        let requests = h.requests();
        prop_assert_eq!(requests.len(), 1);
        prop_assert_eq!(requests[0].issued_at_ms, last_at + DELAY);
        let expected = normalize(texts.last().unwrap());
        let want = format!("?q={}", expected);
        prop_assert!(requests[0].url.ends_with(&want));
    }

    /// However responses are ordered, only the newest request's body is shown
    /// and at most one request is ever live.
    #[test]
    fn prop_newest_response_wins(
        count in 2usize..6,
        order in Just((0..6).collect::<Vec<usize>>()).prop_shuffle(),
    ) {
        let mut h = harness();
        for i in 0..count {
            h.type_text(&format!("query{}", i));
            h.advance(DELAY);
            prop_assert!(live_requests(&h).len() <= 1);
        }
        let requests = h.requests();
        prop_assert_eq!(requests.len(), count);

        // Request i answers with i + 1 results so the winner is recognizable
        for &i in order.iter().filter(|&&i| i < count) {
            h.respond(requests[i].id, &results_body(i + 1));
        }
        prop_assert_eq!(h.controller.results().map(|r| r.len()), Some(count));
    }
}
