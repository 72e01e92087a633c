// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node visibility flags and the added/removed delta between two visible sets.

use std::collections::BTreeSet;

use crate::types::ElementId;

bitflags::bitflags! {
    /// Visibility of one node after the latest computation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct VisibilityFlags: u8 {
        /// In the visible set (core viewport or buffer zone).
        const VISIBLE  = 0b0000_0001;
        /// Visible only because of the buffer margin.
        const BUFFERED = 0b0000_0010;
        /// Visible and near the pointer; render at higher detail.
        const PRIORITY = 0b0000_0100;
    }
}

/// Difference between two visible sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityDelta {
    /// In the new set but not the old one.
    pub added: BTreeSet<ElementId>,
    /// In the old set but not the new one.
    pub removed: BTreeSet<ElementId>,
}

impl VisibilityDelta {
    /// Compute `new − old` and `old − new`.
    pub fn between(old: &BTreeSet<ElementId>, new: &BTreeSet<ElementId>) -> Self {
        Self {
            added: new.difference(old).cloned().collect(),
            removed: old.difference(new).cloned().collect(),
        }
    }

    /// True when the two sets were equal.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
