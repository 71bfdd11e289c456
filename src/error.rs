// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! Very little in a search box is allowed to fail loudly. Network trouble is a
//! `FetchError` that the controller logs and drops. The only errors a caller
//! ever sees are `WidgetError`s from setting the widget up: bad options, or a
//! page that doesn't have the elements we were told to bind to.

use std::fmt;

/// Setup and configuration failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// No global `window`/`document` (not running in a browser page).
    NoWindow,
    /// No element with this id in the document.
    MissingElement { id: String },
    /// Element exists but isn't the expected kind.
    WrongElementType { id: String, expected: &'static str },
    /// A configuration value is out of range.
    InvalidConfig { field: &'static str, reason: String },
    /// Options could not be deserialized.
    InvalidOptions(String),
    /// `attach()` called on an already-attached widget.
    AlreadyAttached,
    /// A DOM call failed.
    Dom(String),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::NoWindow => write!(f, "no window/document available"),
            WidgetError::MissingElement { id } => write!(f, "no element with id '{}'", id),
            WidgetError::WrongElementType { id, expected } => {
                write!(f, "element '{}' is not {}", id, expected)
            }
            WidgetError::InvalidConfig { field, reason } => {
                write!(f, "invalid config '{}': {}", field, reason)
            }
            WidgetError::InvalidOptions(msg) => write!(f, "invalid options: {}", msg),
            WidgetError::AlreadyAttached => write!(f, "search box is already attached"),
            WidgetError::Dom(msg) => write!(f, "DOM error: {}", msg),
        }
    }
}

impl std::error::Error for WidgetError {}

/// Why a request produced no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Cancelled because a newer request replaced it, or the widget detached.
    Aborted,
    /// Transport failure (offline, DNS, CORS, unreadable body).
    Network(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Aborted => write!(f, "request aborted"),
            FetchError::Network(msg) => write!(f, "network error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
