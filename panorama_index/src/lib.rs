// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panorama Index: a bulk-loaded 2D bounding-box tree.
//!
//! Panorama Index answers "which boxes intersect this rectangle" for tens of thousands of
//! boxes, fast enough to run every frame of a pannable, zoomable viewport.
//!
//! - Bulk-load a packed tree with Sort-Tile-Recursive (STR) in `O(n log n)`.
//! - Insert and remove single items by id.
//! - Query by rectangle or point; queries never fail and an empty tree answers nothing.
//!
//! It is generic over the id type `K` and the coordinate type `T` (`f32`, `f64`, `i64`)
//! and knows nothing about graphs, viewports or rendering.
//!
//! # Example
//!
//! ```rust
//! use panorama_index::{Aabb2D, SpatialIndex, SpatialItem};
//!
//! let mut idx: SpatialIndex<&str> = SpatialIndex::new();
//! idx.load(vec![
//!     SpatialItem::new("a", Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1.0),
//!     SpatialItem::new("b", Aabb2D::new(50.0, 50.0, 60.0, 60.0), 2.0),
//! ]);
//!
//! let hits = idx.search(Aabb2D::new(5.0, 5.0, 20.0, 20.0));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id, "a");
//!
//! assert!(idx.remove(&"a"));
//! assert!(idx.search_point(5.0, 5.0).is_empty());
//! ```
//!
//! ## Mutation strategy
//!
//! By default every [`SpatialIndex::insert`] and [`SpatialIndex::remove`] rebuilds the tree
//! with the bulk loader. That keeps the tree optimally packed and the code obviously
//! correct, and an STR rebuild of a few thousand items is sub-millisecond. Workloads with
//! many single-item mutations per frame can enable the `incremental` feature, which
//! switches both calls to in-place R-tree insertion (least-enlargement descent and
//! SAH-like node splits) and deletion, with the same observable results.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs. Item boxes must satisfy `min <= max`; debug builds assert
//! this, release builds index whatever they are given.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod bulk;
#[cfg(feature = "incremental")]
mod incremental;
mod index;
mod node;
pub mod types;

pub use index::{DEFAULT_FANOUT, SpatialIndex};
pub use types::{Aabb2D, Scalar, SpatialItem};
