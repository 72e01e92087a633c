// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Statistics snapshot published with every computation.

use std::time::Duration;

/// Counters describing the most recent windowing pass.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WindowStats {
    /// Elements known to the manager.
    pub total_nodes: usize,
    /// Edges known to the manager.
    pub total_edges: usize,
    /// Elements in the visible set.
    pub visible_nodes: usize,
    /// Visible elements outside the core viewport.
    pub buffered_nodes: usize,
    /// Visible elements near the pointer.
    pub priority_nodes: usize,
    /// Edges with at least one visible endpoint.
    pub visible_edges: usize,
    /// Elements left out of the visible set.
    pub culled_nodes: usize,
    /// Whether the last pass queried the index (as opposed to showing everything).
    pub windowing_active: bool,
    /// Wall time of the last pass.
    pub last_update: Duration,
    /// Completed passes since creation or the last clear.
    pub update_count: u64,
}

impl WindowStats {
    /// Fraction of elements culled, in `[0, 1]`; 0 for an empty graph.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Element counts stay far below the f64 mantissa limit."
    )]
    pub fn cull_ratio(&self) -> f64 {
        if self.total_nodes == 0 {
            0.0
        } else {
            self.culled_nodes as f64 / self.total_nodes as f64
        }
    }
}
