// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public [`SpatialIndex`] API.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::bulk;
use crate::node::{Node, NodeKind};
use crate::types::{Aabb2D, Scalar, SpatialItem};

/// Default maximum number of entries per tree node.
pub const DEFAULT_FANOUT: usize = 16;

/// A bulk-loaded bounding-box tree answering rectangle queries.
///
/// The tree is rebuilt with Sort-Tile-Recursive packing on [`load`](Self::load). With the
/// default feature set, [`insert`](Self::insert) and [`remove`](Self::remove) also rebuild
/// from scratch: always correct, `O(n log n)` per call, and for a few thousand items still
/// well under a millisecond. Enable the `incremental` feature to mutate the tree in place
/// R-tree style instead; the observable behavior is the same.
#[derive(Clone)]
pub struct SpatialIndex<K, T: Scalar = f64> {
    root: Option<Node<K, T>>,
    len: usize,
    fanout: usize,
}

impl<K, T: Scalar> Default for SpatialIndex<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T: Scalar> SpatialIndex<K, T> {
    /// Create an empty index with [`DEFAULT_FANOUT`].
    pub const fn new() -> Self {
        Self {
            root: None,
            len: 0,
            fanout: DEFAULT_FANOUT,
        }
    }

    /// Create an empty index with a custom node capacity (at least 2).
    pub fn with_fanout(fanout: usize) -> Self {
        Self {
            root: None,
            len: 0,
            fanout: fanout.max(2),
        }
    }

    /// Maximum entries per node.
    pub fn fanout(&self) -> usize {
        self.fanout
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels in the tree; 0 when empty.
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, Node::height)
    }

    /// Union of all item boxes, or `None` when empty.
    pub fn bounds(&self) -> Option<Aabb2D<T>> {
        self.root.as_ref().map(|r| r.bbox)
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Replace the contents with `items`, bulk-building a packed tree.
    pub fn load(&mut self, items: Vec<SpatialItem<K, T>>) {
        debug_assert!(
            items.iter().all(|i| !i.aabb.is_empty()),
            "item boxes must satisfy min <= max"
        );
        self.len = items.len();
        self.root = bulk::build(items, self.fanout);
    }

    /// Add one item. Ids are not checked for uniqueness.
    pub fn insert(&mut self, item: SpatialItem<K, T>) {
        debug_assert!(!item.aabb.is_empty(), "item boxes must satisfy min <= max");
        match self.root.take() {
            None => {
                self.root = Some(Node::leaf(vec![item]));
                self.len = 1;
            }
            #[cfg(not(feature = "incremental"))]
            Some(root) => {
                let mut items = Vec::with_capacity(self.len + 1);
                root.into_items(&mut items);
                items.push(item);
                self.load(items);
            }
            #[cfg(feature = "incremental")]
            Some(root) => {
                self.root = Some(crate::incremental::insert(root, item, self.fanout));
                self.len += 1;
            }
        }
    }

    /// Remove every item whose id equals `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &K) -> bool
    where
        K: PartialEq,
    {
        let Some(root) = self.root.take() else {
            return false;
        };
        let (root, removed) = detach(root, id, self.fanout);
        self.root = root;
        self.len -= removed;
        removed > 0
    }

    /// Items whose boxes intersect `rect` (inclusive edges).
    ///
    /// An inverted query rectangle or an empty tree yields an empty result.
    pub fn search(&self, rect: Aabb2D<T>) -> Vec<&SpatialItem<K, T>> {
        let mut out = Vec::new();
        self.search_with(rect, |item| out.push(item));
        out
    }

    /// Items whose boxes contain the point.
    pub fn search_point(&self, x: T, y: T) -> Vec<&SpatialItem<K, T>> {
        self.search(Aabb2D::point(x, y))
    }

    /// Visit every item intersecting `rect` without collecting.
    pub fn search_with<'a>(
        &'a self,
        rect: Aabb2D<T>,
        mut visit: impl FnMut(&'a SpatialItem<K, T>),
    ) {
        let Some(root) = &self.root else {
            return;
        };
        if rect.is_empty() {
            return;
        }
        // Explicit stack so deep trees cannot overflow the call stack.
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            if !n.bbox.intersects(&rect) {
                continue;
            }
            match &n.kind {
                NodeKind::Leaf(items) => {
                    // Node boxes are conservative; test each item.
                    for item in items {
                        if item.aabb.intersects(&rect) {
                            visit(item);
                        }
                    }
                }
                NodeKind::Internal(children) => stack.extend(children.iter()),
            }
        }
    }

    /// Every indexed item, in tree order.
    pub fn all_items(&self) -> Vec<&SpatialItem<K, T>> {
        let mut out = Vec::with_capacity(self.len);
        let Some(root) = &self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            match &n.kind {
                NodeKind::Leaf(items) => out.extend(items.iter()),
                NodeKind::Internal(children) => stack.extend(children.iter()),
            }
        }
        out
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<&Node<K, T>> {
        self.root.as_ref()
    }
}

/// Remove every item with `id` from the tree, returning the new root and the removal count.
#[cfg(not(feature = "incremental"))]
fn detach<K: PartialEq, T: Scalar>(
    root: Node<K, T>,
    id: &K,
    fanout: usize,
) -> (Option<Node<K, T>>, usize) {
    let mut items = Vec::new();
    root.into_items(&mut items);
    let before = items.len();
    items.retain(|i| i.id != *id);
    let removed = before - items.len();
    (bulk::build(items, fanout), removed)
}

#[cfg(feature = "incremental")]
fn detach<K: PartialEq, T: Scalar>(
    root: Node<K, T>,
    id: &K,
    _fanout: usize,
) -> (Option<Node<K, T>>, usize) {
    crate::incremental::remove(root, id)
}

impl<K, T: Scalar> Debug for SpatialIndex<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.len)
            .field("fanout", &self.fanout)
            .field("height", &self.height())
            .field("bounds", &self.bounds())
            .finish_non_exhaustive()
    }
}

impl<K, T: Scalar> FromIterator<SpatialItem<K, T>> for SpatialIndex<K, T> {
    fn from_iter<I: IntoIterator<Item = SpatialItem<K, T>>>(iter: I) -> Self {
        let mut idx = Self::new();
        idx.load(iter.into_iter().collect());
        idx
    }
}
