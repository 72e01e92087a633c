// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes. A node owns its children outright; there are no parent links.

use alloc::vec::Vec;

use crate::types::{Aabb2D, Scalar, SpatialItem};

#[derive(Clone, Debug)]
pub(crate) struct Node<K, T> {
    /// Union of every box below this node.
    pub(crate) bbox: Aabb2D<T>,
    pub(crate) kind: NodeKind<K, T>,
}

#[derive(Clone, Debug)]
pub(crate) enum NodeKind<K, T> {
    Leaf(Vec<SpatialItem<K, T>>),
    Internal(Vec<Node<K, T>>),
}

impl<K, T: Scalar> Node<K, T> {
    pub(crate) fn leaf(items: Vec<SpatialItem<K, T>>) -> Self {
        let bbox = union_of(items.iter().map(|i| i.aabb));
        Self {
            bbox,
            kind: NodeKind::Leaf(items),
        }
    }

    pub(crate) fn internal(children: Vec<Self>) -> Self {
        let bbox = union_of(children.iter().map(|c| c.bbox));
        Self {
            bbox,
            kind: NodeKind::Internal(children),
        }
    }

    /// Number of direct entries (items or child nodes).
    #[cfg(any(test, feature = "incremental"))]
    pub(crate) fn fill(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(items) => items.len(),
            NodeKind::Internal(children) => children.len(),
        }
    }

    /// Recompute `bbox` from the direct entries.
    #[cfg(feature = "incremental")]
    pub(crate) fn refit(&mut self) {
        self.bbox = match &self.kind {
            NodeKind::Leaf(items) => union_of(items.iter().map(|i| i.aabb)),
            NodeKind::Internal(children) => union_of(children.iter().map(|c| c.bbox)),
        };
    }

    /// Levels from this node down to its leaves, inclusive.
    pub(crate) fn height(&self) -> usize {
        let mut h = 1;
        let mut n = self;
        while let NodeKind::Internal(children) = &n.kind {
            let Some(first) = children.first() else {
                break;
            };
            h += 1;
            n = first;
        }
        h
    }

    /// Move every item out of the subtree, consuming it.
    #[cfg(not(feature = "incremental"))]
    pub(crate) fn into_items(self, out: &mut Vec<SpatialItem<K, T>>) {
        let mut stack = alloc::vec![self];
        while let Some(n) = stack.pop() {
            match n.kind {
                NodeKind::Leaf(items) => out.extend(items),
                NodeKind::Internal(children) => stack.extend(children),
            }
        }
    }
}

/// Union of a sequence of boxes; a zero box for an empty sequence.
pub(crate) fn union_of<T: Scalar>(mut boxes: impl Iterator<Item = Aabb2D<T>>) -> Aabb2D<T> {
    match boxes.next() {
        Some(first) => boxes.fold(first, |acc, b| acc.union(&b)),
        // Only transiently empty nodes hit this; they are pruned before the mutation returns.
        None => Aabb2D::new(T::zero(), T::zero(), T::zero(), T::zero()),
    }
}
