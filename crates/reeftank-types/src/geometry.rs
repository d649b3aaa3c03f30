//! Planar geometry primitives shared by every simulation layer.
//!
//! All motion in the tank is a kinematic approximation: positions advance by
//! a per-tick displacement vector and nothing carries mass or momentum.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Squared lengths at or below this value are treated as zero.
pub const EPSILON: f64 = 1.0e-9;

/// A position in the tank, in arena units (pixels in the reference renderer).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Self) -> f64 {
        self.vector_to(other).length()
    }

    /// Displacement from `self` to `other`.
    pub fn vector_to(self, other: Self) -> Vector {
        Vector::new(other.x - self.x, other.y - self.y)
    }

    /// Translate the point by `v`.
    pub fn offset(self, v: Vector) -> Self {
        Self::new(self.x + v.dx, self.y + v.dy)
    }

    /// Whether both coordinates are finite numbers.
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A velocity or displacement, in arena units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vector {
    /// Horizontal component.
    pub dx: f64,
    /// Vertical component.
    pub dy: f64,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Create a vector from its components.
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// Multiply both components by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.dx * factor, self.dy * factor)
    }

    /// Component-wise sum.
    pub fn add(self, other: Self) -> Self {
        Self::new(self.dx + other.dx, self.dy + other.dy)
    }

    /// Component-wise difference `self - other`.
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.dx - other.dx, self.dy - other.dy)
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length vector is divided by `1` instead of its length, so the
    /// result is the zero vector rather than `NaN`.
    pub fn normalized(self) -> Self {
        let len = self.length();
        let divisor = if len * len <= EPSILON { 1.0 } else { len };
        Self::new(self.dx / divisor, self.dy / divisor)
    }

    /// Same direction, rescaled to `magnitude`. Zero stays zero.
    pub fn with_length(self, magnitude: f64) -> Self {
        self.normalized().scale(magnitude)
    }

    /// Shrink the vector to at most `max` length; shorter vectors pass through.
    pub fn limited(self, max: f64) -> Self {
        if max <= 0.0 {
            return Self::ZERO;
        }
        let len = self.length();
        if len <= max {
            return self;
        }
        self.scale(max / len)
    }

    /// Whether both components are finite numbers.
    pub const fn is_finite(self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

/// Horizontal orientation of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Facing {
    /// Looking towards decreasing x (sign `-1`).
    Left,
    /// Looking towards increasing x (sign `+1`).
    Right,
}

impl Facing {
    /// `-1.0` for [`Facing::Left`], `1.0` for [`Facing::Right`].
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The opposite orientation.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Orientation matching the sign of a horizontal displacement.
    ///
    /// Returns `None` when `dx` is zero (or not a number).
    pub fn from_dx(dx: f64) -> Option<Self> {
        if dx > 0.0 {
            Some(Self::Right)
        } else if dx < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }

    /// Whether a horizontal displacement points the way this sprite faces.
    ///
    /// A zero displacement never matches.
    pub fn points_along(self, dx: f64) -> bool {
        Self::from_dx(dx) == Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!(approx(a.distance_to(b), 5.0));
    }

    #[test]
    fn zero_vector_normalizes_to_zero() {
        let n = Vector::ZERO.normalized();
        assert!(n.is_finite());
        assert!(approx(n.length(), 0.0));
    }

    #[test]
    fn with_length_rescales() {
        let v = Vector::new(3.0, 4.0).with_length(10.0);
        assert!(approx(v.dx, 6.0));
        assert!(approx(v.dy, 8.0));
    }

    #[test]
    fn limited_caps_only_long_vectors() {
        let short = Vector::new(0.3, 0.4);
        assert_eq!(short.limited(1.0), short);
        let long = Vector::new(30.0, 40.0).limited(5.0);
        assert!(approx(long.length(), 5.0));
    }

    #[test]
    fn facing_matches_dx_sign() {
        assert_eq!(Facing::from_dx(2.0), Some(Facing::Right));
        assert_eq!(Facing::from_dx(-0.1), Some(Facing::Left));
        assert_eq!(Facing::from_dx(0.0), None);
        assert!(Facing::Right.points_along(1.0));
        assert!(!Facing::Right.points_along(0.0));
        assert!(!Facing::Left.points_along(1.0));
        assert_eq!(Facing::Left.flipped(), Facing::Right);
    }
}
