// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll history and linear position prediction.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use kurbo::{Point, Vec2};

/// How far ahead [`ScrollHistory::predict`] extrapolates.
pub const PREDICTION_HORIZON: Duration = Duration::from_millis(100);

#[derive(Copy, Clone, Debug, PartialEq)]
struct Sample {
    position: Point,
    at: Instant,
}

/// Bounded queue of viewport origins; the oldest sample is dropped first.
#[derive(Clone, Debug, Default)]
pub(crate) struct ScrollHistory {
    samples: VecDeque<Sample>,
}

impl ScrollHistory {
    pub(crate) fn push(&mut self, position: Point, at: Instant, capacity: usize) {
        self.samples.push_back(Sample { position, at });
        self.truncate(capacity);
    }

    pub(crate) fn truncate(&mut self, capacity: usize) {
        while self.samples.len() > capacity {
            self.samples.pop_front();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }

    /// Velocity in world units per second between the two latest samples.
    pub(crate) fn velocity(&self) -> Option<Vec2> {
        let n = self.samples.len();
        if n < 2 {
            return None;
        }
        let (prev, last) = (self.samples[n - 2], self.samples[n - 1]);
        let dt = last.at.checked_duration_since(prev.at)?.as_secs_f64();
        if dt <= 0.0 {
            return None;
        }
        Some((last.position - prev.position) / dt)
    }

    /// Latest position pushed forward by [`PREDICTION_HORIZON`] at the current velocity;
    /// the latest position itself when no velocity is known.
    pub(crate) fn predict(&self) -> Option<Point> {
        let last = self.samples.back()?.position;
        Some(match self.velocity() {
            Some(v) => last + v * PREDICTION_HORIZON.as_secs_f64(),
            None => last,
        })
    }
}
