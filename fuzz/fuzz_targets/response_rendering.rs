// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for response parsing and rendering.
//!
//! Every byte of a response body is attacker-controlled. Whatever comes back,
//! parsing must not panic and the rendered markup must not contain a tag we
//! didn't write ourselves.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sorex_searchbox::{render_outcome, SearchOutcome};

const OWN_TAGS: [&str; 6] = ["div", "a", "cite", "span", "small", "/"];

fuzz_target!(|body: &[u8]| {
    let body = String::from_utf8_lossy(body);
    let outcome = SearchOutcome::from_body(&body);

    // Results are never empty: an empty list is NoResults
    if let SearchOutcome::Results(results) = &outcome {
        assert!(!results.is_empty());
    }

    let html = render_outcome(&outcome).into_string();

    // Every '<' opens one of our tags
    for (pos, _) in html.match_indices('<') {
        let rest = &html[pos + 1..];
        assert!(
            OWN_TAGS.iter().any(|tag| rest.starts_with(tag)),
            "foreign tag at {}: {:?}",
            pos,
            &rest[..rest.len().min(20)]
        );
    }

    // No script URLs survive sanitization
    let lower = html.to_ascii_lowercase();
    assert!(!lower.contains("href=\"javascript:"));
    assert!(!lower.contains("href=\"vbscript:"));
    assert!(!lower.contains("href=\"data:"));
});
