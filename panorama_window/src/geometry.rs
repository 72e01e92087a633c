// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small geometry and ranking helpers shared by the manager and the culler.

use kurbo::Rect;
use panorama_index::Aabb2D;

use crate::types::ViewportWindow;

/// Smallest zoom change treated as significant.
pub(crate) const ZOOM_EPSILON: f64 = 0.01;

pub(crate) fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

/// Whether moving from `old` to `new` is worth a recompute.
///
/// Pan and resize distances are compared against `threshold / zoom` so the threshold is
/// constant on screen. All comparisons are strict.
pub(crate) fn is_significant_change(
    old: &ViewportWindow,
    new: &ViewportWindow,
    threshold: f64,
) -> bool {
    let limit = threshold / old.safe_zoom();
    (new.x - old.x).abs() > limit
        || (new.y - old.y).abs() > limit
        || (new.width - old.width).abs() > limit
        || (new.height - old.height).abs() > limit
        || (new.zoom - old.zoom).abs() > ZOOM_EPSILON
}

/// Windowing priority of an element: bigger and better-connected ranks higher.
pub(crate) fn element_priority(radius: f64, connections: usize) -> f64 {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Connection counts stay far below the f64 mantissa limit."
    )]
    let connections = connections as f64;
    radius / 10.0 + connections * 0.5
}
