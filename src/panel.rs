// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The result panel's state machine.
//!
//! ```text
//!                 response (focused)
//!   ┌────────┐ ─────────────────────────▶ ┌──────────────────┐
//!   │ Hidden │                            │ ShowingResults   │
//!   │        │ ◀───────────────────────── │ ShowingNoResults │
//!   └────────┘  Escape / outside click /  └──────────────────┘
//!       │       dismiss / too-short query          ▲
//!       └──────── focus (non-empty results kept) ──┘
//! ```
//!
//! `Panel` is pure state. It never touches the DOM; the controller reads the
//! transitions it reports and replays them onto a `View`. That keeps the
//! invariants checkable without a browser:
//!
//! - at most one highlighted item, and only while `ShowingResults`
//! - the highlight always indexes into the current `ResultSet`
//! - replacing the results clears the highlight

use crate::render::Markup;
use crate::types::{PanelState, ResultSet, SearchOutcome};

/// DOM side of the search box, supplied by the host.
pub trait View {
    /// Replace the panel's contents.
    fn render(&mut self, markup: &Markup);

    /// Remove all result nodes.
    fn clear(&mut self);

    /// Show or hide the panel (aria-expanded plus the root "active" class).
    fn set_visible(&mut self, visible: bool);

    /// Move the highlight marker from `previous` to `current`.
    fn set_highlight(&mut self, previous: Option<usize>, current: Option<usize>);

    /// Scroll the panel so result `index` is visible.
    fn scroll_into_view(&mut self, index: usize);

    fn scroll_to_top(&mut self);

    fn clear_input(&mut self);

    fn blur_input(&mut self);

    fn navigate(&mut self, url: &str);
}

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Before/after of a highlight move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

impl HighlightChange {
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

#[derive(Debug, Default)]
pub struct Panel {
    state: PanelState,
    results: Option<ResultSet>,
    highlight: Option<usize>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    /// Install a fresh outcome. Previous results and highlight are gone.
    ///
    /// With `show == false` the outcome is stored but the panel stays hidden;
    /// a later `restore` brings non-empty results back.
    pub fn replace(&mut self, outcome: SearchOutcome, show: bool) -> PanelState {
        self.highlight = None;
        let (results, visible_state) = match outcome {
            SearchOutcome::Results(set) => (Some(set), PanelState::ShowingResults),
            SearchOutcome::NoResults => (None, PanelState::ShowingNoResults),
        };
        self.results = results;
        self.state = if show { visible_state } else { PanelState::Hidden };
        self.state
    }

    /// Forget everything and hide.
    pub fn clear(&mut self) {
        self.state = PanelState::Hidden;
        self.results = None;
        self.highlight = None;
    }

    /// Hide without forgetting the results. Returns the highlight that was
    /// dropped so the view can unmark it.
    pub fn hide(&mut self) -> Option<usize> {
        self.state = PanelState::Hidden;
        self.highlight.take()
    }

    /// Re-show stored results after the input regains focus.
    ///
    /// Only a non-empty result set comes back; a stored "no results" stays
    /// hidden. Returns true if the panel became visible.
    pub fn restore(&mut self) -> bool {
        if self.state == PanelState::Hidden && self.results.is_some() {
            self.state = PanelState::ShowingResults;
            true
        } else {
            false
        }
    }

    /// Step the highlight one item up or down.
    ///
    /// No wrap-around. Stepping past either end clears the highlight; Down
    /// from nothing lands on the first item; Up from nothing stays empty.
    pub fn move_highlight(&mut self, direction: Direction) -> HighlightChange {
        let previous = self.highlight;
        let len = match (&self.results, self.state) {
            (Some(set), PanelState::ShowingResults) => set.len(),
            _ => {
                return HighlightChange {
                    previous,
                    current: previous,
                }
            }
        };

        let current = match (direction, previous) {
            (Direction::Down, None) => Some(0),
            (Direction::Down, Some(i)) if i + 1 < len => Some(i + 1),
            (Direction::Down, Some(_)) => None,
            (Direction::Up, None) => None,
            (Direction::Up, Some(0)) => None,
            (Direction::Up, Some(i)) => Some(i - 1),
        };

        self.highlight = current;
        HighlightChange { previous, current }
    }

    /// Highlight the item under the pointer. Ignored while hidden or when
    /// `index` is out of range.
    pub fn highlight_at(&mut self, index: usize) -> Option<HighlightChange> {
        if self.state != PanelState::ShowingResults {
            return None;
        }
        let len = self.results.as_ref().map_or(0, ResultSet::len);
        if index >= len {
            return None;
        }
        let previous = self.highlight.replace(index);
        Some(HighlightChange {
            previous,
            current: Some(index),
        })
    }

    /// URL of the highlighted item, if any.
    pub fn highlighted_url(&self) -> Option<&str> {
        let index = self.highlight?;
        self.results
            .as_ref()
            .and_then(|set| set.get(index))
            .map(|item| item.url.as_str())
    }
}

/// Coalesces pointer hover events to at most one per animation frame.
///
/// Pointer events fire far faster than the screen refreshes. Each hover just
/// records the latest index; the first one in a frame asks the host for an
/// animation frame, and the frame callback applies whatever index won.
#[derive(Debug, Default)]
pub struct HoverThrottle {
    pending: Option<usize>,
    frame_requested: bool,
}

impl HoverThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hover. Returns true if the host needs to request a frame.
    pub fn note(&mut self, index: usize) -> bool {
        self.pending = Some(index);
        if self.frame_requested {
            false
        } else {
            self.frame_requested = true;
            true
        }
    }

    /// The frame arrived. Returns the index to apply.
    pub fn take(&mut self) -> Option<usize> {
        self.frame_requested = false;
        self.pending.take()
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.frame_requested = false;
    }
}
