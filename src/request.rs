// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! At-most-one-outstanding request management.
//!
//! The race this module exists to win: the user types "rout", pauses, types
//! "router". Two requests are now in the air and the network is free to
//! answer them in either order. If "rout" lands last, the panel shows results
//! for a query the user abandoned.
//!
//! The fix is cancel-before-replace on a single slot. Issuing a request first
//! aborts whatever the slot holds, then stores the new handle. A response is
//! only accepted if its `RequestId` still matches the slot, so even a response
//! that slips past the abort (already resolved, queued on the event loop) is
//! dropped before it touches any state.
//!
//! ```text
//!  begin(q1) ── slot: [R1] ──────────── begin(q2) ── slot: [R2]
//!                 │                         │ cancels R1
//!                 └── R1 resolves late ─────┼──▶ settle(R1) = false (ignored)
//!                                           └── R2 resolves ──▶ settle(R2) = true
//! ```

use crate::query::Query;

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Something that can tell an in-flight request to stop.
///
/// Cancelling twice, or cancelling a request that already finished, must be
/// harmless.
pub trait CancelHandle {
    fn cancel(&self);
}

/// Issues network requests, supplied by the host.
///
/// The host must eventually report the outcome of every request it started
/// through the controller's `on_response(id, ..)`, including aborts.
pub trait Transport {
    type Handle: CancelHandle;

    fn fetch(&mut self, id: RequestId, url: &str) -> Self::Handle;
}

/// Single-slot owner of the current request's cancellation handle.
#[derive(Debug)]
pub struct RequestSlot<H: CancelHandle> {
    next_id: u64,
    current: Option<(RequestId, H)>,
}

impl<H: CancelHandle> RequestSlot<H> {
    pub fn new() -> Self {
        RequestSlot {
            next_id: 0,
            current: None,
        }
    }

    /// Cancel the outstanding request (if any) and allocate the next id.
    ///
    /// After this returns the slot is empty; the caller issues the request
    /// and hands its handle to `install`.
    pub fn begin(&mut self) -> RequestId {
        self.cancel();
        self.next_id += 1;
        RequestId(self.next_id)
    }

    /// Store the handle for the request allocated by the latest `begin`.
    ///
    /// A handle for any other id is cancelled on the spot; the slot never
    /// holds two handles, and never holds a stale one.
    pub fn install(&mut self, id: RequestId, handle: H) {
        if id.0 != self.next_id {
            handle.cancel();
            return;
        }
        if let Some((_, previous)) = self.current.replace((id, handle)) {
            previous.cancel();
        }
    }

    /// A response arrived for `id`. Returns true if it is the current request,
    /// in which case the slot is emptied. Returns false for anything stale.
    pub fn settle(&mut self, id: RequestId) -> bool {
        match &self.current {
            Some((current, _)) if *current == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Abort the outstanding request. Returns true if there was one.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some((id, handle)) => {
                tracing::trace!(request = id.0, "cancelling request");
                handle.cancel();
                true
            }
            None => false,
        }
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.current.as_ref().map(|(id, _)| *id)
    }
}

impl<H: CancelHandle> Default for RequestSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: CancelHandle> Drop for RequestSlot<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// The remote search API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEndpoint {
    base: String,
}

impl SearchEndpoint {
    pub fn new(base: impl Into<String>) -> Self {
        SearchEndpoint { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `GET <base>?q=<query>&v=<version>`, both values percent-encoded.
    ///
    /// `v` is omitted when no version is known. A base that already carries a
    /// query string gets the parameters appended with `&`.
    pub fn url_for(&self, query: &Query, version: Option<&str>) -> String {
        let separator = if self.base.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{}q={}",
            self.base,
            separator,
            urlencoding::encode(query.as_str())
        );
        if let Some(version) = version.filter(|v| !v.is_empty()) {
            url.push_str("&v=");
            url.push_str(&urlencoding::encode(version));
        }
        url
    }
}
