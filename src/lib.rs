// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search-as-you-type box for documentation sites.
//!
//! Binds a text input and a results container on a docs page to a remote
//! search endpoint. Keystrokes are debounced, normalized and deduplicated;
//! only the latest request is allowed to update the panel; results are
//! rendered as escaped markup and can be walked with the keyboard.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  debounce.rs │──▶│   query.rs   │──▶│  request.rs  │
//! │ (Debouncer,  │   │ (normalize,  │   │ (RequestSlot,│
//! │  Scheduler)  │   │  QueryGate)  │   │  Transport)  │
//! └──────────────┘   └──────────────┘   └──────────────┘
//!        │                                     │
//!        ▼                                     ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                   controller.rs                      │
//! │        (SearchController: owns all state)            │
//! └─────────────────────────────────────────────────────┘
//!        │                                     │
//!        ▼                                     ▼
//! ┌──────────────┐                      ┌──────────────┐
//! │   panel.rs   │                      │  render.rs   │
//! │ (Panel, View,│                      │ (Markup,     │
//! │  highlight)  │                      │  escaping)   │
//! └──────────────┘                      └──────────────┘
//! ```
//!
//! The core is sans-IO: timers, network and DOM sit behind the `Scheduler`,
//! `Transport` and `View` traits. The `wasm` feature supplies browser
//! implementations and the `SearchBox` JS class (`runtime::wasm`).
//!
//! # Usage
//!
//! ```js
//! import init, { SearchBox } from "sorex-searchbox";
//! await init();
//! const box = new SearchBox({ endpoint: "/api/search" });
//! box.attach();
//! ```

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod panel;
pub mod query;
pub mod render;
pub mod request;
pub mod types;

#[cfg(feature = "wasm")]
pub mod runtime;

// Test utilities (always compiled, hidden from docs)
#[doc(hidden)]
pub mod testing;

pub use config::{WidgetConfig, DEFAULT_ENDPOINT};
pub use controller::SearchController;
pub use debounce::{Debouncer, Scheduler, Ticket, DEFAULT_DEBOUNCE};
pub use error::{FetchError, WidgetError};
pub use panel::{Direction, HighlightChange, Panel, View};
pub use query::{normalize, GateDecision, Query, QueryGate, DEFAULT_MIN_QUERY_LEN};
pub use render::{render_outcome, sanitize_url, Markup};
pub use request::{CancelHandle, RequestId, RequestSlot, SearchEndpoint, Transport};
pub use types::{Key, PanelState, ResultItem, ResultSet, SearchOutcome};
