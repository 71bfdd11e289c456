// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides in-memory implementations of the controller's seams driven by
//! a virtual clock, so the whole keystroke → request → render cycle runs
//! deterministically without a browser.

#![doc(hidden)]

use crate::config::WidgetConfig;
use crate::controller::SearchController;
use crate::debounce::{Scheduler, Ticket};
use crate::error::FetchError;
use crate::panel::View;
use crate::render::Markup;
use crate::request::{CancelHandle, RequestId, Transport};
use crate::types::{ResultItem, ResultSet};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

/// Endpoint used by `harness()`.
pub const TEST_ENDPOINT: &str = "https://search.test/search";

/// Single result: `/a`, "Alpha", citation "Docs", snippet "x\ny".
pub const ONE_RESULT_BODY: &str =
    r#"{"results":[{"url":"/a","title":"Alpha","ancestors":["Docs"],"content":"x\ny"}]}"#;

/// Everything the fakes record.
#[derive(Debug, Default)]
pub struct World {
    now_ms: u64,
    timers: Vec<(Ticket, u64)>,
    requests: Vec<FetchRecord>,
    view: Vec<ViewCall>,
}

/// A request issued through `FakeTransport`.
#[derive(Debug, Clone)]
pub struct FetchRecord {
    pub id: RequestId,
    pub url: String,
    pub issued_at_ms: u64,
    cancelled: Rc<Cell<bool>>,
}

impl FetchRecord {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// One call the controller made on the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Render(String),
    Clear,
    Visible(bool),
    Highlight(Option<usize>, Option<usize>),
    ScrollIntoView(usize),
    ScrollToTop,
    ClearInput,
    BlurInput,
    Navigate(String),
}

#[derive(Debug, Clone)]
pub struct FakeScheduler(Rc<RefCell<World>>);

impl Scheduler for FakeScheduler {
    fn schedule(&mut self, ticket: Ticket, delay: Duration) {
        let mut world = self.0.borrow_mut();
        let due = world.now_ms + delay.as_millis() as u64;
        world.timers.push((ticket, due));
    }

    fn cancel(&mut self, ticket: Ticket) {
        self.0.borrow_mut().timers.retain(|(t, _)| *t != ticket);
    }
}

#[derive(Debug, Clone)]
pub struct FakeCancel(Rc<Cell<bool>>);

impl CancelHandle for FakeCancel {
    fn cancel(&self) {
        self.0.set(true);
    }
}

#[derive(Debug, Clone)]
pub struct FakeTransport(Rc<RefCell<World>>);

impl Transport for FakeTransport {
    type Handle = FakeCancel;

    fn fetch(&mut self, id: RequestId, url: &str) -> FakeCancel {
        let cancelled = Rc::new(Cell::new(false));
        let mut world = self.0.borrow_mut();
        let issued_at_ms = world.now_ms;
        world.requests.push(FetchRecord {
            id,
            url: url.to_string(),
            issued_at_ms,
            cancelled: Rc::clone(&cancelled),
        });
        FakeCancel(cancelled)
    }
}

#[derive(Debug, Clone)]
pub struct FakeView(Rc<RefCell<World>>);

impl FakeView {
    fn record(&self, call: ViewCall) {
        self.0.borrow_mut().view.push(call);
    }
}

impl View for FakeView {
    fn render(&mut self, markup: &Markup) {
        self.record(ViewCall::Render(markup.as_str().to_string()));
    }

    fn clear(&mut self) {
        self.record(ViewCall::Clear);
    }

    fn set_visible(&mut self, visible: bool) {
        self.record(ViewCall::Visible(visible));
    }

    fn set_highlight(&mut self, previous: Option<usize>, current: Option<usize>) {
        self.record(ViewCall::Highlight(previous, current));
    }

    fn scroll_into_view(&mut self, index: usize) {
        self.record(ViewCall::ScrollIntoView(index));
    }

    fn scroll_to_top(&mut self) {
        self.record(ViewCall::ScrollToTop);
    }

    fn clear_input(&mut self) {
        self.record(ViewCall::ClearInput);
    }

    fn blur_input(&mut self) {
        self.record(ViewCall::BlurInput);
    }

    fn navigate(&mut self, url: &str) {
        self.record(ViewCall::Navigate(url.to_string()));
    }
}

pub type TestController = SearchController<FakeScheduler, FakeTransport, FakeView>;

/// A controller wired to fakes, plus helpers to drive it.
pub struct Harness {
    pub controller: TestController,
    world: Rc<RefCell<World>>,
    delay_ms: u64,
}

impl Harness {
    pub fn new(config: WidgetConfig) -> Self {
        let world = Rc::new(RefCell::new(World::default()));
        let controller = SearchController::new(
            &config,
            FakeScheduler(Rc::clone(&world)),
            FakeTransport(Rc::clone(&world)),
            FakeView(Rc::clone(&world)),
        );
        Harness {
            controller,
            world,
            delay_ms: u64::from(config.debounce_ms),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.world.borrow().now_ms
    }

    pub fn debounce_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Simulate the input's value changing to `raw`.
    pub fn type_text(&mut self, raw: &str) {
        self.controller.on_input(raw);
    }

    /// Move the clock forward, firing due timers in order.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms() + ms;
        loop {
            let next = {
                let mut world = self.world.borrow_mut();
                let due = world
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, due))| *due <= target)
                    .min_by_key(|(i, (_, due))| (*due, *i))
                    .map(|(i, _)| i);
                due.map(|i| {
                    let (ticket, due) = world.timers.remove(i);
                    world.now_ms = due;
                    ticket
                })
            };
            match next {
                Some(ticket) => self.controller.on_debounce_elapsed(ticket),
                None => break,
            }
        }
        self.world.borrow_mut().now_ms = target;
    }

    pub fn pending_timers(&self) -> usize {
        self.world.borrow().timers.len()
    }

    pub fn requests(&self) -> Vec<FetchRecord> {
        self.world.borrow().requests.clone()
    }

    pub fn last_request(&self) -> FetchRecord {
        self.world
            .borrow()
            .requests
            .last()
            .cloned()
            .expect("no request issued")
    }

    pub fn respond(&mut self, id: RequestId, body: &str) {
        self.controller.on_response(id, Ok(body.to_string()));
    }

    pub fn fail(&mut self, id: RequestId, error: FetchError) {
        self.controller.on_response(id, Err(error));
    }

    /// Type `raw`, wait out the debounce, and answer the request with `body`.
    pub fn search_and_respond(&mut self, raw: &str, body: &str) {
        self.type_text(raw);
        self.advance(self.delay_ms);
        let id = self.last_request().id;
        self.respond(id, body);
    }

    pub fn view_calls(&self) -> Vec<ViewCall> {
        self.world.borrow().view.clone()
    }

    pub fn clear_view_calls(&mut self) {
        self.world.borrow_mut().view.clear();
    }

    pub fn navigations(&self) -> Vec<String> {
        self.view_calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewCall::Navigate(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Last markup rendered into the panel, if any.
    pub fn rendered(&self) -> Option<String> {
        self.view_calls().into_iter().rev().find_map(|call| match call {
            ViewCall::Render(html) => Some(html),
            ViewCall::Clear => Some(String::new()),
            _ => None,
        })
    }

    /// Indices currently carrying the highlight marker in the fake DOM,
    /// reconstructed from the view calls. Rendering or clearing wipes them.
    pub fn marked(&self) -> BTreeSet<usize> {
        let mut marked = BTreeSet::new();
        for call in self.view_calls() {
            match call {
                ViewCall::Render(_) | ViewCall::Clear => marked.clear(),
                ViewCall::Highlight(previous, current) => {
                    if let Some(i) = previous {
                        marked.remove(&i);
                    }
                    if let Some(i) = current {
                        marked.insert(i);
                    }
                }
                _ => {}
            }
        }
        marked
    }
}

/// Harness with default settings against `TEST_ENDPOINT`.
pub fn harness() -> Harness {
    Harness::new(WidgetConfig {
        endpoint: TEST_ENDPOINT.to_string(),
        ..WidgetConfig::default()
    })
}

/// Create a result item for `/docs/page-{i}`.
pub fn make_item(i: usize) -> ResultItem {
    ResultItem {
        url: format!("/docs/page-{}", i),
        title: format!("Page {}", i),
        ancestors: vec!["Docs".to_string()],
        content: format!("Snippet for page {}", i),
        kind: None,
        version: None,
    }
}

/// Result set with `n` items (`n` must be positive).
pub fn result_set(n: usize) -> ResultSet {
    ResultSet::new((0..n).map(make_item).collect()).expect("n must be positive")
}

/// Response body with `n` results.
pub fn results_body(n: usize) -> String {
    let items: Vec<ResultItem> = (0..n).map(make_item).collect();
    serde_json::json!({ "results": items }).to_string()
}
