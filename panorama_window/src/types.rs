// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public data types: element and edge records, ids, and the viewport window.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use kurbo::{Point, Rect};
use panorama_index::Aabb2D;

/// Radius assumed for elements that do not specify one.
pub const DEFAULT_NODE_RADIUS: f64 = 5.0;

/// Identifier of an element or edge.
///
/// An opaque string handle; clones are cheap, so snapshots handed to listeners and
/// callers can copy ids freely.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(Arc<str>);

impl ElementId {
    /// Create an id from a string.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&String> for ElementId {
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl From<&ElementId> for ElementId {
    fn from(id: &ElementId) -> Self {
        id.clone()
    }
}

/// Edge endpoints may name an element directly.
impl From<&Element> for ElementId {
    fn from(e: &Element) -> Self {
        e.id.clone()
    }
}

/// A positioned element supplied by the layout driver.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Element id.
    pub id: ElementId,
    /// Center x in world coordinates.
    pub x: f64,
    /// Center y in world coordinates.
    pub y: f64,
    /// Radius; [`DEFAULT_NODE_RADIUS`] when `None`.
    pub radius: Option<f64>,
}

impl Element {
    /// Create an element with the default radius.
    pub fn new(id: impl Into<ElementId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            radius: None,
        }
    }

    /// Set an explicit radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Radius used for bounds and priority. Negative and NaN radii count as zero.
    pub fn effective_radius(&self) -> f64 {
        self.radius.map_or(DEFAULT_NODE_RADIUS, |r| r.max(0.0))
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Square bounding box around the center.
    pub fn bounds(&self) -> Aabb2D<f64> {
        Aabb2D::around(self.x, self.y, self.effective_radius())
    }
}

/// A connection between two elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Edge id.
    pub id: ElementId,
    /// Source element id.
    pub source: ElementId,
    /// Target element id.
    pub target: ElementId,
}

impl Edge {
    /// Create an edge. Endpoints accept ids or `&Element`.
    pub fn new(
        id: impl Into<ElementId>,
        source: impl Into<ElementId>,
        target: impl Into<ElementId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A new position for one element.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionUpdate {
    /// Element to move.
    pub id: ElementId,
    /// New center x.
    pub x: f64,
    /// New center y.
    pub y: f64,
}

impl PositionUpdate {
    /// Create a position update.
    pub fn new(id: impl Into<ElementId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
        }
    }
}

/// The visible world-space rectangle and the current scale.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportWindow {
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    /// Width in world units.
    pub width: f64,
    /// Height in world units.
    pub height: f64,
    /// Scale factor; larger means zoomed in.
    pub zoom: f64,
}

impl ViewportWindow {
    /// Create a viewport window.
    pub const fn new(x: f64, y: f64, width: f64, height: f64, zoom: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            zoom,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The core viewport rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// The viewport rectangle grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Rect {
        self.rect().inflate(margin, margin)
    }

    /// Zoom with non-positive or non-finite values treated as 1.
    pub(crate) fn safe_zoom(&self) -> f64 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }
}
