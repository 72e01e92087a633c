// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panorama Window: viewport windowing for large graph views.
//!
//! A layout engine produces positions for thousands of elements; the renderer should only
//! ever see the few hundred that matter for the current view. [`WindowManager`] sits in
//! between:
//!
//! - It keeps element bounds in a [`panorama_index::SpatialIndex`].
//! - It ignores viewport jitter below a zoom-scaled threshold and debounces the rest.
//! - It caps the visible set at a budget, preferring large and well-connected elements.
//! - It reports what entered and left the view, which edges touch it, and which
//!   elements sit near the pointer.
//!
//! The engine never spawns threads or timers. The host forwards viewport changes, calls
//! [`WindowManager::poll`] when [`WindowManager::next_deadline`] passes, and calls
//! [`WindowManager::on_frame`] from its animation frame.
//!
//! # Example
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use panorama_window::{Edge, Element, EventKind, ViewportWindow, WindowEvent, WindowManager, WindowOptions};
//!
//! let mut wm = WindowManager::with_options(WindowOptions {
//!     max_visible_nodes: 2,
//!     buffer_size: 0.0,
//!     ..Default::default()
//! });
//! wm.set_graph_data(
//!     [
//!         Element::new("a", 10.0, 10.0),
//!         Element::new("b", 40.0, 10.0),
//!         Element::new("c", 900.0, 900.0),
//!     ],
//!     [Edge::new("ab", "a", "b"), Edge::new("bc", "b", "c")],
//! );
//! wm.on(EventKind::VisibilityChange, |event| {
//!     if let WindowEvent::VisibilityChange(change) = event {
//!         assert_eq!(change.added_node_ids.len(), 2);
//!     }
//! });
//!
//! let t0 = Instant::now();
//! wm.update_viewport_at(ViewportWindow::new(0.0, 0.0, 100.0, 100.0, 1.0), t0);
//! assert_eq!(wm.next_deadline(), Some(t0 + Duration::from_millis(16)));
//! assert!(wm.poll(t0 + Duration::from_millis(16)));
//!
//! assert!(wm.is_node_visible("a") && wm.is_node_visible("b"));
//! assert!(!wm.is_node_visible("c"));
//! // "bc" has one visible endpoint.
//! assert!(wm.is_edge_visible("bc"));
//! ```
//!
//! For plain rectangle culling without scheduling or budgets, see [`ViewportCuller`].
//!
//! ## Features
//!
//! - `serde`: serialize [`WindowOptions`], [`OptionsPatch`], [`ViewportWindow`] and
//!   [`WindowStats`].
//! - `incremental`: forward in-place tree mutation to `panorama_index`.

mod culler;
mod events;
mod geometry;
mod manager;
mod options;
mod prediction;
mod scheduler;
mod stats;
mod types;
mod visibility;

pub use culler::ViewportCuller;
pub use events::{EventKind, Listener, Subscription, VisibilityChange, WindowEvent};
pub use manager::WindowManager;
pub use options::{OptionsPatch, WindowOptions};
pub use prediction::PREDICTION_HORIZON;
pub use scheduler::Pending;
pub use stats::WindowStats;
pub use types::{DEFAULT_NODE_RADIUS, Edge, Element, ElementId, PositionUpdate, ViewportWindow};
pub use visibility::{VisibilityDelta, VisibilityFlags};
