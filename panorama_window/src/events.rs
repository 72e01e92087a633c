// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Windowing events and the per-manager listener registry.
//!
//! Listeners are called synchronously, in registration order, while the manager publishes
//! a computation. A panicking listener is caught and logged; the remaining listeners
//! still receive the event. Catching relies on unwinding, so builds with `panic = "abort"`
//! get no such isolation.

use std::collections::BTreeSet;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::stats::WindowStats;
use crate::types::ElementId;

/// Which events a listener receives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Every completed computation.
    Update,
    /// Computations that changed the visible node set.
    VisibilityChange,
}

/// Payload of [`WindowEvent::VisibilityChange`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityChange {
    /// The full new visible set.
    pub visible_node_ids: BTreeSet<ElementId>,
    /// Newly visible ids.
    pub added_node_ids: BTreeSet<ElementId>,
    /// Ids no longer visible.
    pub removed_node_ids: BTreeSet<ElementId>,
}

/// An event published by a [`WindowManager`](crate::WindowManager).
#[derive(Clone, Debug, PartialEq)]
pub enum WindowEvent {
    /// A computation completed; carries fresh statistics.
    Update(WindowStats),
    /// The visible node set changed.
    VisibilityChange(VisibilityChange),
}

impl WindowEvent {
    /// The kind listeners subscribe with.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Update(_) => EventKind::Update,
            Self::VisibilityChange(_) => EventKind::VisibilityChange,
        }
    }
}

/// Token returned by [`WindowManager::on`](crate::WindowManager::on); pass it to
/// [`WindowManager::off`](crate::WindowManager::off) to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// A boxed event callback.
pub type Listener = Box<dyn FnMut(&WindowEvent)>;

struct Entry {
    token: Subscription,
    kind: EventKind,
    listener: Listener,
}

/// Ordered listener list.
#[derive(Default)]
pub(crate) struct Listeners {
    next: u64,
    entries: Vec<Entry>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Listeners {
    pub(crate) fn add(&mut self, kind: EventKind, listener: Listener) -> Subscription {
        self.next += 1;
        let token = Subscription(self.next);
        self.entries.push(Entry {
            token,
            kind,
            listener,
        });
        token
    }

    pub(crate) fn remove(&mut self, token: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        self.entries.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver `event` to every listener of its kind. Returns how many panicked.
    pub(crate) fn emit(&mut self, event: &WindowEvent) -> usize {
        let kind = event.kind();
        let mut failures = 0;
        for entry in self.entries.iter_mut().filter(|e| e.kind == kind) {
            let listener = &mut entry.listener;
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| listener(event))) {
                failures += 1;
                let msg = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("non-string panic payload");
                tracing::warn!(
                    ?kind,
                    subscription = ?entry.token,
                    "window listener panicked: {msg}"
                );
            }
        }
        failures
    }
}
