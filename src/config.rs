// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Widget configuration.
//!
//! Everything has a default matching the stock docs-site markup, so
//! `new SearchBox()` with no options works on a standard page. Options come in
//! as a JS object (via serde-wasm-bindgen) or JSON, camelCase either way:
//!
//! ```js
//! new SearchBox({ endpoint: "/api/search", debounceMs: 250, version: "2.11" })
//! ```

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::error::WidgetError;
use crate::query::DEFAULT_MIN_QUERY_LEN;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stock search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://search-api.opensearch.org/search";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Search endpoint base URL (`q` and `v` are appended)
    pub endpoint: String,
    /// Quiet period after the last keystroke before searching (default: 300)
    pub debounce_ms: u32,
    /// Shortest normalized query that gets searched (default: 3)
    pub min_query_length: usize,
    /// Id of the text input (default: "search-input")
    pub input_id: String,
    /// Id of the results container (default: "search-results")
    pub results_id: String,
    /// Class toggled on `<html>` while results are shown (default: "search-active")
    pub active_class: String,
    /// Class on the highlighted result (default: "highlighted")
    pub highlight_class: String,
    /// Docs version sent as `v`. Falls back to the input's `data-docs-version`.
    pub version: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u32,
            min_query_length: DEFAULT_MIN_QUERY_LEN,
            input_id: "search-input".to_string(),
            results_id: "search-results".to_string(),
            active_class: "search-active".to_string(),
            highlight_class: "highlighted".to_string(),
            version: None,
        }
    }
}

impl WidgetConfig {
    /// Parse and validate a JSON options object.
    pub fn from_json(json: &str) -> Result<Self, WidgetError> {
        let config: WidgetConfig =
            serde_json::from_str(json).map_err(|e| WidgetError::InvalidOptions(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the widget can't run with.
    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.endpoint.trim().is_empty() {
            return Err(invalid("endpoint", "must not be empty"));
        }
        if self.debounce_ms == 0 {
            return Err(invalid("debounceMs", "must be at least 1"));
        }
        if self.min_query_length == 0 {
            return Err(invalid("minQueryLength", "must be at least 1"));
        }
        for (field, value) in [
            ("inputId", &self.input_id),
            ("resultsId", &self.results_id),
            ("activeClass", &self.active_class),
            ("highlightClass", &self.highlight_class),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }
        Ok(())
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.debounce_ms))
    }
}

fn invalid(field: &'static str, reason: &str) -> WidgetError {
    WidgetError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}
