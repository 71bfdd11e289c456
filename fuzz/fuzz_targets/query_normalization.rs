// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for query normalization and URL building.
//!
//! Whatever lands in the input box, the normalized query only uses the
//! allowed alphabet, never has two spaces in a row, and survives the trip
//! through percent-encoding.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sorex_searchbox::query::is_query_char;
use sorex_searchbox::{normalize, SearchEndpoint};

fuzz_target!(|raw: &[u8]| {
    let raw = String::from_utf8_lossy(raw);
    let query = normalize(&raw);

    assert!(query.as_str().chars().all(is_query_char));
    assert!(!query.as_str().contains("  "));

    // Idempotent
    assert_eq!(normalize(query.as_str()), query);

    let url = SearchEndpoint::new("https://search.test/search").url_for(&query, Some("2.11"));
    let q = url
        .strip_prefix("https://search.test/search?q=")
        .and_then(|rest| rest.strip_suffix("&v=2.11"))
        .expect("url shape");
    assert!(!q.contains('&') && !q.contains(' ') && !q.contains('#'));
});
