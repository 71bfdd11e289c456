// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keystroke debouncing.
//!
//! Every keystroke reschedules the search for `delay` after *that* keystroke.
//! Only the newest schedule survives: the previous timer is cancelled, and if
//! a cancelled timer fires anyway (timers and event handlers can race in the
//! browser), its ticket no longer matches and `fire` returns nothing.
//!
//! The debouncer doesn't own a clock. The host's `Scheduler` does the waiting;
//! this type just decides which wake-up counts.

use std::time::Duration;

/// Default quiet period before a search is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Identifies one scheduled search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One-shot timers, supplied by the host.
///
/// The browser runtime backs this with `setTimeout`/`clearTimeout`; tests use
/// a virtual clock.
pub trait Scheduler {
    /// Arrange for the controller's `on_debounce_elapsed(ticket)` to run after `delay`.
    fn schedule(&mut self, ticket: Ticket, delay: Duration);

    /// Cancel a scheduled ticket. Unknown or already-fired tickets are ignored.
    fn cancel(&mut self, ticket: Ticket);
}

/// Result of a new keystroke: the ticket to schedule, and the one it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rescheduled {
    pub ticket: Ticket,
    pub superseded: Option<Ticket>,
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    next_ticket: u64,
    pending: Option<(Ticket, String)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            next_ticket: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record `raw` as the value to search once things go quiet.
    pub fn schedule(&mut self, raw: impl Into<String>) -> Rescheduled {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        let superseded = self.pending.replace((ticket, raw.into())).map(|(old, _)| old);
        Rescheduled { ticket, superseded }
    }

    /// A timer went off. Returns the recorded input if `ticket` is still current.
    pub fn fire(&mut self, ticket: Ticket) -> Option<String> {
        match &self.pending {
            Some((current, _)) if *current == ticket => self.pending.take().map(|(_, raw)| raw),
            _ => None,
        }
    }

    /// Drop the pending search, returning its ticket so the timer can be cleared.
    pub fn cancel(&mut self) -> Option<Ticket> {
        self.pending.take().map(|(ticket, _)| ticket)
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending.as_ref().map(|(ticket, _)| *ticket)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
