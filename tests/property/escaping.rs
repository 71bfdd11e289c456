//! Remote text never becomes markup.

use crate::common::harness;
use proptest::prelude::*;
use sorex_searchbox::render::render_item;
use sorex_searchbox::ResultItem;

fn hostile_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<script>alert(1)</script>".to_string()),
        Just("\"><img src=x onerror=alert(1)>".to_string()),
        Just("' onmouseover='x".to_string()),
        prop::string::string_regex("[<>&\"'a-z /=]{0,24}").unwrap(),
    ]
}

proptest! {
    #[test]
    fn prop_no_injected_tags(
        url in hostile_text(),
        title in hostile_text(),
        ancestor in hostile_text(),
        content in hostile_text(),
        kind in prop::option::of(hostile_text()),
    ) {
        let item = ResultItem {
            url,
            title,
            ancestors: vec![ancestor],
            content,
            kind,
            version: None,
        };
        let html = render_item(0, &item).into_string();
        prop_assert!(!html.contains("<script"));
        prop_assert!(!html.contains("<img"));
        // Only our own tags open: div, a, cite, span, small and their closers
        for (pos, _) in html.match_indices('<') {
            let rest = &html[pos + 1..];
            prop_assert!(
                ["div", "a ", "cite", "span", "small", "/"].iter().any(|t| rest.starts_with(t)),
                "unexpected tag in {}", html
            );
        }
    }

    /// End to end: a hostile body through the controller renders inertly.
    #[test]
    fn prop_hostile_body_is_inert(title in hostile_text()) {
        let body = serde_json::json!({
            "results": [{ "url": "/x", "title": title, "ancestors": [], "content": "" }]
        })
        .to_string();
        let mut h = harness();
        h.search_and_respond("alpha", &body);
        let html = h.rendered().unwrap_or_default();
        prop_assert!(!html.contains("<script"));
        prop_assert!(!html.contains("<img"));
    }
}
