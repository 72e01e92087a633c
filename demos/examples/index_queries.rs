// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial index queries.
//!
//! Bulk-load a grid of cells with a custom fanout, then compare rectangle and point
//! queries against the tree's shape.
//!
//! Run:
//! - `cargo run -p panorama_demos --example index_queries`

use panorama_index::{Aabb2D, SpatialIndex, SpatialItem};

fn main() {
    let mut idx = SpatialIndex::with_fanout(8);
    let mut items = Vec::new();
    for y in 0..50_u32 {
        for x in 0..50_u32 {
            let r = Aabb2D::from_xywh(f64::from(x) * 10.0, f64::from(y) * 10.0, 8.0, 8.0);
            items.push(SpatialItem::new((x, y), r, f64::from(x + y)));
        }
    }
    idx.load(items);
    println!(
        "{} items, fanout {}, height {}, bounds {:?}",
        idx.len(),
        idx.fanout(),
        idx.height(),
        idx.bounds()
    );

    let hits = idx.search(Aabb2D::new(95.0, 95.0, 125.0, 105.0));
    let mut ids: Vec<(u32, u32)> = hits.iter().map(|i| i.id).collect();
    ids.sort_unstable();
    println!("rect hits: {ids:?}");

    // Edges touch: the corner of cell (0, 0) meets the query point.
    let at_corner: Vec<(u32, u32)> = idx
        .search_point(8.0, 8.0)
        .into_iter()
        .map(|i| i.id)
        .collect();
    println!("point hits at (8, 8): {at_corner:?}");

    // Gaps between cells answer nothing.
    assert!(idx.search_point(9.0, 9.0).is_empty());
}
