// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sort-Tile-Recursive bulk loading.
//!
//! Items are sorted by box center X and cut into `⌈√(n / fanout)⌉` vertical strips of
//! roughly equal count. Each strip is sorted by center Y and cut into runs of at most
//! `fanout`; every run becomes a leaf. The leaves are then tiled the same way, using
//! their own boxes, until one node remains.

use alloc::vec::Vec;

use crate::node::Node;
use crate::types::{Aabb2D, Scalar, SpatialItem, cmp_t};

/// Build a packed tree. Returns `None` for empty input.
pub(crate) fn build<K, T: Scalar>(
    items: Vec<SpatialItem<K, T>>,
    fanout: usize,
) -> Option<Node<K, T>> {
    if items.is_empty() {
        return None;
    }
    let mut level: Vec<Node<K, T>> = tile(items, fanout, |i| i.aabb)
        .into_iter()
        .map(Node::leaf)
        .collect();
    while level.len() > 1 {
        level = tile(level, fanout, |n| n.bbox)
            .into_iter()
            .map(Node::internal)
            .collect();
    }
    level.pop()
}

/// Number of vertical strips: the smallest `s` with `s² · fanout >= n`, i.e. `⌈√(n / fanout)⌉`.
pub(crate) fn strip_count(n: usize, fanout: usize) -> usize {
    let mut s = 1_usize;
    while s * s * fanout < n {
        s += 1;
    }
    s
}

/// Partition `entries` into STR groups of at most `fanout` entries each.
fn tile<E, T: Scalar>(
    mut entries: Vec<E>,
    fanout: usize,
    bbox_of: impl Fn(&E) -> Aabb2D<T>,
) -> Vec<Vec<E>> {
    let n = entries.len();
    let strips = strip_count(n, fanout);
    let strip_len = n.div_ceil(strips);

    entries.sort_by(|a, b| {
        let (ax, bx) = (bbox_of(a).center().0, bbox_of(b).center().0);
        cmp_t(&ax, &bx)
    });

    let mut groups = Vec::with_capacity(n.div_ceil(fanout));
    let mut rest = entries.into_iter();
    loop {
        let mut strip: Vec<E> = rest.by_ref().take(strip_len).collect();
        if strip.is_empty() {
            break;
        }
        strip.sort_by(|a, b| {
            let (ay, by) = (bbox_of(a).center().1, bbox_of(b).center().1);
            cmp_t(&ay, &by)
        });
        let mut run = strip.into_iter();
        loop {
            let group: Vec<E> = run.by_ref().take(fanout).collect();
            if group.is_empty() {
                break;
            }
            groups.push(group);
        }
    }
    groups
}
