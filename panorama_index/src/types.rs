// Copyright 2025 the Panorama Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry primitives: the [`Aabb2D`] box, the [`Scalar`] coordinate abstraction,
//! and the [`SpatialItem`] entries stored in the tree.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// Bounds are inclusive on both ends, so boxes that only touch still intersect and
/// zero-area boxes (points, segments) take part in queries like any other box.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// Create an AABB from an origin and a size.
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self::new(x, y, T::add(x, w), T::add(y, h))
    }

    /// Create an AABB centered on `(cx, cy)` extending `r` in every direction.
    pub fn around(cx: T, cy: T, r: T) -> Self {
        Self::new(T::sub(cx, r), T::sub(cy, r), T::add(cx, r), T::add(cy, r))
    }

    /// Create a degenerate AABB covering a single point.
    pub fn point(x: T, y: T) -> Self {
        Self::new(x, y, x, y)
    }

    /// Whether this AABB contains the point (inclusive).
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether `other` lies entirely inside this AABB.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
    }

    /// Whether the two AABBs overlap or touch.
    ///
    /// Always false when either box is inverted.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
    }

    /// The smallest AABB containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            min_y: min_t(self.min_y, other.min_y),
            max_x: max_t(self.max_x, other.max_x),
            max_y: max_t(self.max_y, other.max_y),
        }
    }

    /// Return true if the AABB is inverted. Zero-area boxes are not empty. Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }

    /// Center of the box, used as the sort key by the bulk loader.
    pub fn center(&self) -> (T, T) {
        (
            T::mid(self.min_x, self.max_x),
            T::mid(self.min_y, self.max_y),
        )
    }

    /// Area in the scalar's widened accumulator type. Inverted boxes have zero area.
    pub fn area(&self) -> T::Acc {
        let w = T::max_zero(T::sub(self.max_x, self.min_x));
        let h = T::max_zero(T::sub(self.max_y, self.min_y));
        T::widen(w) * T::widen(h)
    }
}

/// Numeric coordinate type usable in an [`Aabb2D`] and a [`SpatialIndex`](crate::SpatialIndex).
///
/// `Acc` is a widened accumulator (`f32`→`f64`, `i64`→`i128`) used when comparing areas
/// during incremental splits.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type for area computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// `a + b`
    fn add(a: Self, b: Self) -> Self;

    /// `a - b`
    fn sub(a: Self, b: Self) -> Self;

    /// Zero value.
    fn zero() -> Self;

    /// `max(v, 0)`
    fn max_zero(v: Self) -> Self;

    /// Midpoint between `a` and `b`.
    fn mid(a: Self, b: Self) -> Self;

    /// Convert to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert a count to the accumulator type.
    fn acc_from_usize(n: usize) -> Self::Acc;
}

macro_rules! float_scalar {
    ($t:ty, $acc:ty) => {
        impl Scalar for $t {
            type Acc = $acc;

            #[inline]
            fn add(a: Self, b: Self) -> Self {
                a + b
            }

            #[inline]
            fn sub(a: Self, b: Self) -> Self {
                a - b
            }

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn max_zero(v: Self) -> Self {
                if v > 0.0 { v } else { 0.0 }
            }

            #[inline]
            fn mid(a: Self, b: Self) -> Self {
                0.5 * (a + b)
            }

            #[inline]
            fn widen(v: Self) -> Self::Acc {
                <$acc>::from(v)
            }

            #[inline]
            #[allow(
                clippy::cast_precision_loss,
                reason = "Item counts stay far below the float mantissa limit."
            )]
            fn acc_from_usize(n: usize) -> Self::Acc {
                n as $acc
            }
        }
    };
}

float_scalar!(f32, f64);
float_scalar!(f64, f64);

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Overflow-free average.
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        i128::from(v)
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as i128
    }
}

/// An entry in a [`SpatialIndex`](crate::SpatialIndex).
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialItem<K, T = f64> {
    /// Caller-supplied handle.
    pub id: K,
    /// Bounding box; must satisfy `min <= max` on both axes.
    pub aabb: Aabb2D<T>,
    /// Ranking used by consumers that cap result sets. The index itself ignores it.
    pub priority: f64,
}

impl<K, T> SpatialItem<K, T> {
    /// Create an item.
    pub const fn new(id: K, aabb: Aabb2D<T>, priority: f64) -> Self {
        Self { id, aabb, priority }
    }
}

/// Total order on scalars for sorting; incomparable values compare equal.
pub(crate) fn cmp_t<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    if lt(b, a) { b } else { a }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    if lt(a, b) { b } else { a }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    matches!(a.partial_cmp(&b), Some(Ordering::Less | Ordering::Equal))
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    matches!(a.partial_cmp(&b), Some(Ordering::Less))
}
