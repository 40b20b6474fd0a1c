//! Geometric primitives and measurement math.
//!
//! All functions operate on points in image-pixel space; callers are
//! responsible for converting pointer positions first (see
//! [`crate::transform`]).

use serde::{Deserialize, Serialize};

/// A 2D point in image-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between this point and another.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Included angle at vertex `p2` formed by the arms `p2->p1` and `p2->p3`,
/// in degrees.
///
/// The result is normalized to `[0, 180]`: a reflex sweep is reflected
/// (`360 - angle`) so the smaller of the two possible angles is returned.
pub fn angle_at_vertex(p1: Point, p2: Point, p3: Point) -> f32 {
    let angle1 = (p1.y - p2.y).atan2(p1.x - p2.x);
    let angle2 = (p3.y - p2.y).atan2(p3.x - p2.x);
    let mut angle = (angle2 - angle1).to_degrees();

    if angle < 0.0 {
        angle += 360.0;
    }

    if angle > 180.0 { 360.0 - angle } else { angle }
}

/// Area of a circle with the given radius, in squared radius units.
pub fn circle_area(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}
