// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live configuration of a [`WindowManager`](crate::WindowManager).
//!
//! The numeric defaults are tuned heuristics for interactive graph views of a few
//! thousand elements; re-tune them against real workloads.

use std::time::Duration;

/// Windowing configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct WindowOptions {
    /// Margin around the viewport, in screen units (divided by zoom), kept warm.
    pub buffer_size: f64,
    /// Minimum pan, in screen units (divided by zoom), that triggers a recompute.
    pub update_threshold: f64,
    /// Debounce delay in milliseconds; `0` defers to the next frame instead.
    pub debounce_ms: u64,
    /// Render budget: the most elements reported visible at once.
    pub max_visible_nodes: usize,
    /// Pointer radius, in screen units (divided by zoom), for render-priority flags.
    pub priority_radius: f64,
    /// Rank by priority when the budget is exceeded; otherwise keep query order.
    pub use_priority: bool,
    /// Below this zoom every element is reported visible.
    pub min_zoom_for_windowing: f64,
    /// Record viewport samples for [`predicted_position`](crate::WindowManager::predicted_position).
    pub predictive_loading: bool,
    /// Number of viewport samples retained for prediction.
    pub prediction_frames: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            buffer_size: 200.0,
            update_threshold: 10.0,
            debounce_ms: 16,
            max_visible_nodes: 1000,
            priority_radius: 100.0,
            use_priority: true,
            min_zoom_for_windowing: 0.1,
            predictive_loading: true,
            prediction_frames: 5,
        }
    }
}

impl WindowOptions {
    /// The debounce delay as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Merge every field set in `patch` into these options.
    pub fn apply(&mut self, patch: &OptionsPatch) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = patch.$field {
                    self.$field = v;
                })*
            };
        }
        merge!(
            buffer_size,
            update_threshold,
            debounce_ms,
            max_visible_nodes,
            priority_radius,
            use_priority,
            min_zoom_for_windowing,
            predictive_loading,
            prediction_frames,
        );
    }
}

/// A partial [`WindowOptions`]; unset fields are left unchanged by
/// [`WindowManager::set_options`](crate::WindowManager::set_options).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[allow(missing_docs, reason = "Fields mirror WindowOptions one to one.")]
pub struct OptionsPatch {
    pub buffer_size: Option<f64>,
    pub update_threshold: Option<f64>,
    pub debounce_ms: Option<u64>,
    pub max_visible_nodes: Option<usize>,
    pub priority_radius: Option<f64>,
    pub use_priority: Option<bool>,
    pub min_zoom_for_windowing: Option<f64>,
    pub predictive_loading: Option<bool>,
    pub prediction_frames: Option<usize>,
}

impl OptionsPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
