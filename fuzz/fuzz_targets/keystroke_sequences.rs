// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for arbitrary event sequences against the controller.
//!
//! Typing, waiting, responses arriving out of order, keys, hovers and
//! outside clicks in any interleaving. Afterwards at most one request is
//! live and at most one result carries the highlight.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sorex_searchbox::testing::{harness, results_body};
use sorex_searchbox::Key;

#[derive(Debug, Arbitrary)]
enum Event {
    Type(String),
    Wait(u16),
    /// Answer the n-th issued request (mod count) with k results
    Respond { nth: u8, hits: u8 },
    Garbage { nth: u8 },
    Key(u8),
    Hover(u8),
    Frame,
    Focus,
    OutsideClick,
    Dismiss,
}

fuzz_target!(|events: Vec<Event>| {
    let mut h = harness();
    for event in events.into_iter().take(64) {
        match event {
            Event::Type(text) => h.type_text(&text),
            Event::Wait(ms) => h.advance(u64::from(ms)),
            Event::Respond { nth, hits } => {
                let requests = h.requests();
                if !requests.is_empty() {
                    let id = requests[usize::from(nth) % requests.len()].id;
                    h.respond(id, &results_body(usize::from(hits % 12)));
                }
            }
            Event::Garbage { nth } => {
                let requests = h.requests();
                if !requests.is_empty() {
                    let id = requests[usize::from(nth) % requests.len()].id;
                    h.respond(id, "<html>502</html>");
                }
            }
            Event::Key(k) => {
                let key = match k % 5 {
                    0 => Key::ArrowDown,
                    1 => Key::ArrowUp,
                    2 => Key::Enter,
                    3 => Key::Escape,
                    _ => Key::Other,
                };
                h.controller.on_key(key);
            }
            Event::Hover(i) => {
                h.controller.on_pointer_enter(usize::from(i % 12));
            }
            Event::Frame => h.controller.on_animation_frame(),
            Event::Focus => h.controller.on_focus(),
            Event::OutsideClick => {
                h.controller.on_pointer_down_outside();
            }
            Event::Dismiss => h.controller.dismiss(),
        }

        if let Some(id) = h.controller.in_flight() {
            let requests = h.requests();
            let newest = requests.last().expect("in-flight request was issued");
            assert_eq!(newest.id, id, "only the newest request may be live");
            assert!(!newest.is_cancelled());
        }
        assert!(h.marked().len() <= 1, "two highlighted results");
        if let (Some(i), Some(results)) = (h.controller.highlight(), h.controller.results()) {
            assert!(i < results.len());
        }
    }
});
