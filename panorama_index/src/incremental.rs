// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-place R-tree mutation, enabled by the `incremental` feature.
//!
//! Insertion descends by least enlargement and splits overflowing nodes with an SAH-like
//! heuristic: for each axis, sort entries by center, and pick the split point `k` that
//! minimizes `area(L_k) * k + area(R_k) * (n - k)`, evaluated in O(n) per axis from
//! prefix and suffix boxes. Removal prunes emptied nodes and collapses single-child roots;
//! underfull nodes are tolerated.

use alloc::vec;
use alloc::vec::Vec;

use crate::node::{Node, NodeKind};
use crate::types::{Aabb2D, Scalar, SpatialItem, cmp_t};

/// Insert `item` below `root`, growing a new root if the old one splits.
pub(crate) fn insert<K, T: Scalar>(
    mut root: Node<K, T>,
    item: SpatialItem<K, T>,
    fanout: usize,
) -> Node<K, T> {
    match insert_into(&mut root, item, fanout) {
        Some(sibling) => Node::internal(vec![root, sibling]),
        None => root,
    }
}

/// Remove every item with `id`. Returns the surviving root and how many items went away.
pub(crate) fn remove<K: PartialEq, T: Scalar>(
    mut root: Node<K, T>,
    id: &K,
) -> (Option<Node<K, T>>, usize) {
    let removed = remove_from(&mut root, id);
    if root.fill() == 0 {
        return (None, removed);
    }
    loop {
        let only = match &mut root.kind {
            NodeKind::Internal(children) if children.len() == 1 => children.pop(),
            _ => None,
        };
        match only {
            Some(child) => root = child,
            None => break,
        }
    }
    (Some(root), removed)
}

/// Returns a new right sibling when `node` overflowed and was split.
fn insert_into<K, T: Scalar>(
    node: &mut Node<K, T>,
    item: SpatialItem<K, T>,
    fanout: usize,
) -> Option<Node<K, T>> {
    node.bbox = node.bbox.union(&item.aabb);
    let sibling = match &mut node.kind {
        NodeKind::Leaf(items) => {
            items.push(item);
            if items.len() > fanout {
                let (left, right) = split(core::mem::take(items), fanout, |i| i.aabb);
                *items = left;
                Some(Node::leaf(right))
            } else {
                None
            }
        }
        NodeKind::Internal(children) => {
            let at = choose_subtree(children, &item.aabb);
            match insert_into(&mut children[at], item, fanout) {
                Some(grown) => {
                    children.insert(at + 1, grown);
                    if children.len() > fanout {
                        let (left, right) = split(core::mem::take(children), fanout, |c| c.bbox);
                        *children = left;
                        Some(Node::internal(right))
                    } else {
                        None
                    }
                }
                None => None,
            }
        }
    };
    if sibling.is_some() {
        node.refit();
    }
    sibling
}

fn remove_from<K: PartialEq, T: Scalar>(node: &mut Node<K, T>, id: &K) -> usize {
    let removed = match &mut node.kind {
        NodeKind::Leaf(items) => {
            let before = items.len();
            items.retain(|i| i.id != *id);
            before - items.len()
        }
        NodeKind::Internal(children) => {
            let removed: usize = children.iter_mut().map(|c| remove_from(c, id)).sum();
            if removed > 0 {
                children.retain(|c| c.fill() > 0);
            }
            removed
        }
    };
    if removed > 0 {
        node.refit();
    }
    removed
}

/// Child whose box grows least to take `bbox`; ties go to the smaller child.
fn choose_subtree<K, T: Scalar>(children: &[Node<K, T>], bbox: &Aabb2D<T>) -> usize {
    let mut best = 0;
    let mut best_cost: Option<(T::Acc, T::Acc)> = None;
    for (i, c) in children.iter().enumerate() {
        let area = c.bbox.area();
        let growth = c.bbox.union(bbox).area() - area;
        let better = match best_cost {
            None => true,
            Some((g, a)) => growth < g || (growth == g && area < a),
        };
        if better {
            best = i;
            best_cost = Some((growth, area));
        }
    }
    best
}

/// Split an overflowing entry list in two along the cheapest axis and position.
fn split<E, T: Scalar>(
    entries: Vec<E>,
    fanout: usize,
    bbox_of: impl Fn(&E) -> Aabb2D<T>,
) -> (Vec<E>, Vec<E>) {
    let n = entries.len();
    let min_fill = (fanout / 4).max(1);
    let boxes: Vec<Aabb2D<T>> = entries.iter().map(&bbox_of).collect();

    let mut best: Option<(T::Acc, Vec<usize>, usize)> = None;
    for axis in 0..2 {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            let (ca, cb) = (boxes[a].center(), boxes[b].center());
            if axis == 0 {
                cmp_t(&ca.0, &cb.0)
            } else {
                cmp_t(&ca.1, &cb.1)
            }
        });

        let mut prefix = Vec::with_capacity(n);
        for &i in &order {
            let b = prefix
                .last()
                .map_or(boxes[i], |p: &Aabb2D<T>| p.union(&boxes[i]));
            prefix.push(b);
        }
        let mut suffix = vec![boxes[order[n - 1]]; n];
        for j in (0..n - 1).rev() {
            suffix[j] = suffix[j + 1].union(&boxes[order[j]]);
        }

        for k in min_fill..=(n - min_fill) {
            let cost = prefix[k - 1].area() * T::acc_from_usize(k)
                + suffix[k].area() * T::acc_from_usize(n - k);
            if best.as_ref().is_none_or(|(c, _, _)| cost < *c) {
                best = Some((cost, order.clone(), k));
            }
        }
    }

    let (order, k) = match best {
        Some((_, order, k)) => (order, k),
        // Unreachable for n > fanout >= 2; fall back to an even split.
        None => ((0..n).collect(), n / 2),
    };
    let mut slots: Vec<Option<E>> = entries.into_iter().map(Some).collect();
    let mut left = Vec::with_capacity(k);
    let mut right = Vec::with_capacity(n - k);
    for (pos, i) in order.into_iter().enumerate() {
        if let Some(e) = slots[i].take() {
            if pos < k {
                left.push(e);
            } else {
                right.push(e);
            }
        }
    }
    (left, right)
}
