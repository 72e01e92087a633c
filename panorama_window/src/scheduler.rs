// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounce bookkeeping for viewport recomputes.
//!
//! The engine runs on a cooperative UI loop and never spawns timers itself. A request
//! records *when* the next computation is due; the host asks for
//! [`next_deadline`](crate::WindowManager::next_deadline), arms whatever timer its loop
//! offers, and calls [`poll`](crate::WindowManager::poll) or
//! [`on_frame`](crate::WindowManager::on_frame) when it fires.
//!
//! At most one computation is pending. Requests made while one is pending do not move
//! its deadline; the computation simply runs against the latest stored viewport.

use std::time::{Duration, Instant};

/// When the pending computation should run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pending {
    /// After this instant.
    At(Instant),
    /// On the next animation frame.
    NextFrame,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Debouncer {
    pending: Option<Pending>,
}

impl Debouncer {
    /// Schedule a computation unless one is already pending. Returns whether this call
    /// scheduled it.
    pub(crate) fn request(&mut self, now: Instant, delay: Duration) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(if delay.is_zero() {
            Pending::NextFrame
        } else {
            Pending::At(now + delay)
        });
        true
    }

    pub(crate) fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// Consume the pending computation if its timer has elapsed at `now`.
    ///
    /// A next-frame request is also due here: a host that only drives timers must not
    /// starve it.
    pub(crate) fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(Pending::At(deadline)) if now >= deadline => {
                self.pending = None;
                true
            }
            Some(Pending::NextFrame) => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Consume a pending next-frame computation.
    pub(crate) fn take_frame(&mut self) -> bool {
        if self.pending == Some(Pending::NextFrame) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.pending = None;
    }
}
