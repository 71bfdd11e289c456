// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The data that flows through the search box.
//!
//! Results come off the wire as loosely-typed JSON and leave as escaped markup.
//! In between they live in these types, which is where the looseness stops:
//! a `ResultSet` is never empty, and "nothing matched" is its own outcome
//! rather than an empty vector that could be confused with "never searched".
//!
//! # Invariants
//!
//! - **ResultSet**: `items.len() > 0`. Built only through `ResultSet::new`.
//! - **SearchOutcome**: `NoResults` covers empty arrays, missing `results`,
//!   non-array `results` and bodies that are not JSON. Callers never see the
//!   difference, which is the point.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One search hit as returned by the endpoint.
///
/// Every field is remote-controlled text. Nothing here is safe to put in the
/// DOM without going through `render`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultItem {
    /// Link target (sanitized at render time, never trusted)
    pub url: String,
    pub title: String,
    /// Breadcrumb trail, outermost first
    pub ancestors: Vec<String>,
    /// Snippet; newlines separate excerpt fragments
    pub content: String,
    /// Optional page type tag (e.g. "api", "guide")
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Optional documentation version tag
    pub version: Option<String>,
}

/// Ordered, non-empty list of results from a single response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    items: Vec<ResultItem>,
}

impl ResultSet {
    /// Wrap a list of items, refusing the empty list.
    pub fn new(items: Vec<ResultItem>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(ResultSet { items })
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; present for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResultItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultItem> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<ResultItem> {
        self.items
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultItem;
    type IntoIter = std::slice::Iter<'a, ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// What a settled request turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Results(ResultSet),
    NoResults,
}

impl SearchOutcome {
    /// Interpret a response body.
    ///
    /// Lenient by construction: the endpoint is outside our control, so
    /// anything that isn't a usable array of result objects degrades to
    /// `NoResults` instead of an error. Individual entries that are null,
    /// not objects, or carry wrongly-typed fields are dropped.
    pub fn from_body(body: &str) -> Self {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "search response is not JSON");
                return SearchOutcome::NoResults;
            }
        };

        let Some(entries) = value.get("results").and_then(Value::as_array) else {
            tracing::debug!("search response has no results array");
            return SearchOutcome::NoResults;
        };

        let items: Vec<ResultItem> = entries
            .iter()
            .filter(|entry| entry.is_object())
            .filter_map(|entry| ResultItem::deserialize(entry).ok())
            .collect();

        match ResultSet::new(items) {
            Some(set) => SearchOutcome::Results(set),
            None => SearchOutcome::NoResults,
        }
    }

    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            SearchOutcome::Results(set) => Some(set),
            SearchOutcome::NoResults => None,
        }
    }
}

/// Visibility of the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    ShowingResults,
    ShowingNoResults,
}

impl PanelState {
    pub fn is_visible(self) -> bool {
        !matches!(self, PanelState::Hidden)
    }
}

/// Keys the search box reacts to. Everything else is `Other` and passes
/// through to the input untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    ArrowUp,
    ArrowDown,
    Enter,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "Enter" => Key::Enter,
            _ => Key::Other,
        }
    }

    /// Map a DOM `KeyboardEvent`. Keys pressed while an IME composition is
    /// open belong to the composition.
    pub fn from_keyboard(key: &str, is_composing: bool) -> Self {
        if is_composing {
            Key::Other
        } else {
            Key::from_dom(key)
        }
    }
}
