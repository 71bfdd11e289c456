// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query normalization and the submit gate.
//!
//! Raw input is whatever the user typed. The endpoint only ever sees a
//! `Query`: ASCII letters, digits, `-`, `_`, `.` and spaces. Every run of
//! anything else collapses to exactly one space, so `"foo::<bar>"` becomes
//! `"foo bar "`. Case is left alone.
//!
//! The gate sits between the debouncer and the request manager and answers
//! one question: should this query hit the network?
//!
//! | Condition                         | Decision    |
//! |-----------------------------------|-------------|
//! | `len < min_len`                   | `TooShort`  |
//! | equals the last submitted query   | `Duplicate` |
//! | otherwise                         | `Submit`    |
//!
//! `TooShort` also forgets the last submitted query, so retyping the same
//! text after clearing it searches again.

use std::fmt;

/// Queries shorter than this never reach the endpoint.
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// A normalized query string.
///
/// Only `normalize` constructs one, so holding a `Query` means the text is
/// already restricted to the allowed character class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Query(String);

impl Query {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters. Normalized text is ASCII, so this is also bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Characters allowed through to the endpoint: `[a-zA-Z0-9\-_. ]`.
#[inline]
pub fn is_query_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ')
}

/// Normalize raw input into a `Query`.
///
/// Every maximal run of disallowed characters becomes a single space.
/// Allowed characters, including existing spaces, are kept verbatim.
pub fn normalize(raw: &str) -> Query {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;

    for c in raw.chars() {
        if is_query_char(c) {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push(' ');
            in_run = true;
        }
    }

    Query(out)
}

/// Result of running a query through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Below the minimum length: hide and clear, no request.
    TooShort,
    /// Same as the last submitted query: nothing to do.
    Duplicate,
    /// Go ahead and search for this.
    Submit(Query),
}

/// Remembers the last submitted query and filters out the ones not worth sending.
#[derive(Debug, Clone)]
pub struct QueryGate {
    min_len: usize,
    last_query: Option<Query>,
}

impl QueryGate {
    pub fn new(min_len: usize) -> Self {
        QueryGate {
            min_len,
            last_query: None,
        }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Decide what to do with `query`, recording it if it gets submitted.
    pub fn admit(&mut self, query: Query) -> GateDecision {
        if query.len() < self.min_len {
            self.last_query = None;
            return GateDecision::TooShort;
        }
        if self.last_query.as_ref() == Some(&query) {
            return GateDecision::Duplicate;
        }
        self.last_query = Some(query.clone());
        GateDecision::Submit(query)
    }

    /// Forget the last submitted query.
    pub fn reset(&mut self) {
        self.last_query = None;
    }

    pub fn last_query(&self) -> Option<&Query> {
        self.last_query.as_ref()
    }
}

impl Default for QueryGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUERY_LEN)
    }
}
