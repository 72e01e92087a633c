// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Panorama Index: bulk load, move an item, and query.

use panorama_index::{Aabb2D, SpatialIndex, SpatialItem};

fn main() {
    let mut idx: SpatialIndex<u32, i64> = SpatialIndex::new();
    idx.load(vec![
        SpatialItem::new(1, Aabb2D::new(0, 0, 10, 10), 1.0),
        SpatialItem::new(2, Aabb2D::new(5, 5, 15, 15), 2.0),
    ]);
    println!("loaded {} items, height {}", idx.len(), idx.height());

    // Move box 1
    idx.remove(&1);
    idx.insert(SpatialItem::new(1, Aabb2D::new(20, 0, 30, 10), 1.0));
    println!("bounds after move: {:?}", idx.bounds());

    // Query a point
    let hits: Vec<u32> = idx.search_point(6, 6).into_iter().map(|i| i.id).collect();
    println!("hits at (6,6): {hits:?}");
    assert_eq!(hits, vec![2]);
}
