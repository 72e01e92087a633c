// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal rectangle culler for callers that only need "what is on screen".

use kurbo::Rect;
use panorama_index::{SpatialIndex, SpatialItem};

use crate::geometry::rect_to_aabb;

/// Culls arbitrary rectangles against a viewport.
///
/// No debounce, budget or events: load rectangles, ask which ones meet a viewport.
/// Ids are returned in query order.
#[derive(Clone, Debug)]
pub struct ViewportCuller<K> {
    index: SpatialIndex<K>,
}

impl<K> Default for ViewportCuller<K> {
    fn default() -> Self {
        Self {
            index: SpatialIndex::new(),
        }
    }
}

impl<K: Clone + PartialEq> ViewportCuller<K> {
    /// Create an empty culler.
    pub fn new() -> Self {
        Self {
            index: SpatialIndex::new(),
        }
    }

    /// Replace all entries.
    ///
    /// Rectangles are normalized, so flipped corners are accepted.
    pub fn set_items(&mut self, items: impl IntoIterator<Item = (K, Rect)>) {
        let items = items
            .into_iter()
            .map(|(id, r)| SpatialItem::new(id, rect_to_aabb(r.abs()), 0.0))
            .collect();
        self.index.load(items);
    }

    /// Ids of entries that touch `viewport` grown by `margin` on every side.
    pub fn visible(&self, viewport: Rect, margin: f64) -> Vec<K> {
        let query = rect_to_aabb(viewport.abs().inflate(margin, margin));
        let mut out = Vec::new();
        self.index.search_with(query, |item| {
            out.push(item.id.clone());
        });
        out
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the culler holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
