//! The bounded rectangle every entity lives in.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geometry::Point;

/// Which axes a clamp had to correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClampedAxes {
    /// The x coordinate was moved back inside the arena.
    pub x: bool,
    /// The y coordinate was moved back inside the arena.
    pub y: bool,
}

/// Dimensions of the tank.
///
/// Positions are sprite top-left corners, so an entity with footprint `W`
/// may occupy `x` in `[0, width - W]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Arena {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Arena {
    /// Create an arena of the given size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest allowed x for an entity of the given footprint.
    pub fn max_x(self, footprint: f64) -> f64 {
        (self.width - footprint).max(0.0)
    }

    /// Largest allowed y for an entity of the given footprint.
    pub fn max_y(self, footprint: f64) -> f64 {
        (self.height - footprint).max(0.0)
    }

    /// Clamp `point` so an entity of `footprint` stays inside the arena.
    ///
    /// Non-finite coordinates are pulled to `0`.
    pub fn clamp(self, point: Point, footprint: f64) -> (Point, ClampedAxes) {
        let x = clamp_axis(point.x, self.max_x(footprint));
        let y = clamp_axis(point.y, self.max_y(footprint));
        let axes = ClampedAxes {
            x: (x - point.x).abs() > 0.0 || !point.x.is_finite(),
            y: (y - point.y).abs() > 0.0 || !point.y.is_finite(),
        };
        (Point::new(x, y), axes)
    }

    /// Whether an entity of `footprint` at `point` is inside the arena.
    pub fn contains(self, point: Point, footprint: f64) -> bool {
        (0.0..=self.max_x(footprint)).contains(&point.x)
            && (0.0..=self.max_y(footprint)).contains(&point.y)
    }

    /// Centre of the arena.
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, max)
}
