// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search box controller.
//!
//! One instance per input/results pair, created at attach time. It owns every
//! piece of state (pending keystroke, last query, in-flight request, panel)
//! and is the only thing that mutates the view. Hosts feed it events and
//! provide three seams:
//!
//! | Seam        | Browser runtime                    | Tests                 |
//! |-------------|------------------------------------|-----------------------|
//! | `Scheduler` | `setTimeout` / `clearTimeout`      | virtual clock         |
//! | `Transport` | `fetch` + `AbortController`        | recorded requests     |
//! | `View`      | DOM mutations on input + container | recorded view calls   |
//!
//! Event flow:
//!
//! ```text
//! on_input ──▶ Debouncer ──(D ms)──▶ on_debounce_elapsed ──▶ normalize ──▶ QueryGate
//!                                                                            │
//!                  ┌──────────── TooShort: cancel + hide + clear ◀───────────┤
//!                  │                                                         ▼
//!                  │                      RequestSlot::begin (cancels old) ─▶ Transport::fetch
//!                  │                                                         │
//!                  └─────────── Panel ◀── render ◀── on_response(id) ◀───────┘
//! ```
//!
//! Interaction events (`on_key`, `on_pointer_enter`, `on_focus`,
//! `on_pointer_down_outside`) only move the highlight or toggle visibility.
//! They never issue a request.

use crate::config::WidgetConfig;
use crate::debounce::{Debouncer, Scheduler, Ticket};
use crate::error::FetchError;
use crate::panel::{Direction, HighlightChange, HoverThrottle, Panel, View};
use crate::query::{normalize, GateDecision, Query, QueryGate};
use crate::render::{render_outcome, sanitize_url};
use crate::request::{RequestId, RequestSlot, SearchEndpoint, Transport};
use crate::types::{Key, PanelState, ResultSet, SearchOutcome};
use tracing::{debug, trace};

pub struct SearchController<S: Scheduler, T: Transport, V: View> {
    endpoint: SearchEndpoint,
    version: Option<String>,
    debouncer: Debouncer,
    gate: QueryGate,
    requests: RequestSlot<T::Handle>,
    panel: Panel,
    hover: HoverThrottle,
    /// Cleared by an outside click, set again by focus or typing.
    focused: bool,
    scheduler: S,
    transport: T,
    view: V,
}

impl<S: Scheduler, T: Transport, V: View> SearchController<S, T, V> {
    /// Build a controller. `config` is expected to have passed `validate()`.
    pub fn new(config: &WidgetConfig, scheduler: S, transport: T, view: V) -> Self {
        SearchController {
            endpoint: SearchEndpoint::new(config.endpoint.clone()),
            version: config.version.clone().filter(|v| !v.is_empty()),
            debouncer: Debouncer::new(config.debounce_delay()),
            gate: QueryGate::new(config.min_query_length),
            requests: RequestSlot::new(),
            panel: Panel::new(),
            hover: HoverThrottle::new(),
            focused: false,
            scheduler,
            transport,
            view,
        }
    }

    // =========================================================================
    // INPUT → REQUEST
    // =========================================================================

    /// The input's value changed.
    pub fn on_input(&mut self, raw: &str) {
        self.focused = true;
        let rescheduled = self.debouncer.schedule(raw);
        if let Some(old) = rescheduled.superseded {
            self.scheduler.cancel(old);
        }
        self.scheduler
            .schedule(rescheduled.ticket, self.debouncer.delay());
    }

    /// A debounce timer fired.
    pub fn on_debounce_elapsed(&mut self, ticket: Ticket) {
        match self.debouncer.fire(ticket) {
            Some(raw) => self.search(&raw),
            None => trace!(ticket = ticket.get(), "stale debounce timer ignored"),
        }
    }

    /// Normalize, gate and (maybe) issue a search right now.
    pub fn search(&mut self, raw: &str) {
        match self.gate.admit(normalize(raw)) {
            GateDecision::TooShort => {
                self.requests.cancel();
                self.clear_panel();
            }
            GateDecision::Duplicate => trace!("duplicate query skipped"),
            GateDecision::Submit(query) => self.issue(&query),
        }
    }

    fn issue(&mut self, query: &Query) {
        let id = self.requests.begin();
        let url = self.endpoint.url_for(query, self.version.as_deref());
        debug!(request = id.get(), query = %query, "issuing search");
        let handle = self.transport.fetch(id, &url);
        self.requests.install(id, handle);
    }

    /// A request finished. Stale or cancelled requests are dropped here
    /// without touching any state.
    pub fn on_response(&mut self, id: RequestId, result: Result<String, FetchError>) {
        if !self.requests.settle(id) {
            trace!(request = id.get(), "stale response ignored");
            return;
        }
        match result {
            Ok(body) => self.show_outcome(SearchOutcome::from_body(&body)),
            Err(e) => debug!(request = id.get(), error = %e, "search request failed"),
        }
    }

    fn show_outcome(&mut self, outcome: SearchOutcome) {
        self.hover.reset();
        self.view.render(&render_outcome(&outcome));
        self.view.scroll_to_top();
        let state = self.panel.replace(outcome, self.focused);
        debug!(?state, "results replaced");
        self.view.set_visible(state.is_visible());
    }

    fn clear_panel(&mut self) {
        self.hover.reset();
        self.panel.clear();
        self.view.set_visible(false);
        self.view.clear();
        debug!("results hidden and cleared");
    }

    // =========================================================================
    // INTERACTION
    // =========================================================================

    /// A key went down in the input. Returns true if the host should prevent
    /// the key's default action.
    pub fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => self.escape(),
            Key::ArrowDown => self.step(Direction::Down),
            Key::ArrowUp => self.step(Direction::Up),
            Key::Enter => self.activate(),
            Key::Other => false,
        }
    }

    fn escape(&mut self) -> bool {
        let busy = self.debouncer.pending().is_some() || self.requests.in_flight().is_some();
        if !self.panel.is_visible() && !busy {
            return false;
        }
        if let Some(ticket) = self.debouncer.cancel() {
            self.scheduler.cancel(ticket);
        }
        self.requests.cancel();
        self.gate.reset();
        self.view.clear_input();
        self.clear_panel();
        true
    }

    fn step(&mut self, direction: Direction) -> bool {
        if self.panel.state() != PanelState::ShowingResults {
            return false;
        }
        let change = self.panel.move_highlight(direction);
        self.apply_highlight(change);
        true
    }

    fn activate(&mut self) -> bool {
        if !self.panel.is_visible() {
            return false;
        }
        match self.panel.highlighted_url() {
            Some(url) => {
                let url = sanitize_url(url);
                debug!(%url, "navigating to highlighted result");
                self.view.navigate(&url);
                true
            }
            None => false,
        }
    }

    fn apply_highlight(&mut self, change: HighlightChange) {
        if change.is_noop() {
            return;
        }
        self.view.set_highlight(change.previous, change.current);
        if let Some(index) = change.current {
            self.view.scroll_into_view(index);
        }
    }

    /// The pointer entered result `index`. Returns true if the host should
    /// request an animation frame and call `on_animation_frame` from it.
    pub fn on_pointer_enter(&mut self, index: usize) -> bool {
        if self.panel.state() != PanelState::ShowingResults {
            return false;
        }
        self.hover.note(index)
    }

    /// Apply the latest hover recorded since the last frame.
    pub fn on_animation_frame(&mut self) {
        let Some(index) = self.hover.take() else {
            return;
        };
        if let Some(change) = self.panel.highlight_at(index) {
            if !change.is_noop() {
                self.view.set_highlight(change.previous, change.current);
            }
        }
    }

    /// The input gained focus: bring back stored results if there are any.
    pub fn on_focus(&mut self) {
        self.focused = true;
        if self.panel.restore() {
            debug!("restoring previous results");
            self.view.set_visible(true);
        }
    }

    /// Pointer went down outside the input and results. Returns true if the
    /// host should prevent the default action.
    pub fn on_pointer_down_outside(&mut self) -> bool {
        self.focused = false;
        if !self.panel.is_visible() {
            return false;
        }
        self.view.blur_input();
        self.hide();
        true
    }

    /// Hide the panel, keeping query and results for the next focus.
    pub fn dismiss(&mut self) {
        if self.panel.is_visible() {
            self.hide();
        }
    }

    fn hide(&mut self) {
        self.hover.reset();
        if let Some(previous) = self.panel.hide() {
            self.view.set_highlight(Some(previous), None);
        }
        self.view.set_visible(false);
        debug!("results hidden");
    }

    /// Stop everything in flight. Called on detach.
    pub fn shutdown(&mut self) {
        if let Some(ticket) = self.debouncer.cancel() {
            self.scheduler.cancel(ticket);
        }
        self.requests.cancel();
        self.hover.reset();
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn state(&self) -> PanelState {
        self.panel.state()
    }

    pub fn is_visible(&self) -> bool {
        self.panel.is_visible()
    }

    pub fn highlight(&self) -> Option<usize> {
        self.panel.highlight()
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.panel.results()
    }

    pub fn last_query(&self) -> Option<&Query> {
        self.gate.last_query()
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.requests.in_flight()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}
