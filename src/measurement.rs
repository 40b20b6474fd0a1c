//! Measurement data model.
//!
//! A measurement is created only by a completed gesture, never mutated
//! afterwards, and removed only by explicit delete or full reset. The
//! shape variants are discriminated at compile time so rendering and
//! export never have to guess a record's layout.

use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::constants::PIXEL_TO_MM_RATIO;
use crate::geometry::{Point, circle_area};

/// The geometry of a completed measurement, in image-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeasurementShape {
    /// A straight segment between two points.
    Line { start: Point, end: Point },
    /// A circle; the radius is stored in image-pixel units.
    Circle { center: Point, radius: f32 },
    /// Three points; the reported angle sits at the middle vertex `p2`.
    Angle { p1: Point, p2: Point, p3: Point },
}

impl MeasurementShape {
    /// Stable lowercase tag for results panels and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MeasurementShape::Line { .. } => "line",
            MeasurementShape::Circle { .. } => "circle",
            MeasurementShape::Angle { .. } => "angle",
        }
    }

    /// Format the human-readable magnitude string for this shape.
    pub fn format_value(&self, pixels_per_mm: f32) -> String {
        match self {
            MeasurementShape::Line { start, end } => {
                format_line_value(start.distance_to(end), pixels_per_mm)
            }
            MeasurementShape::Circle { radius, .. } => format_circle_value(*radius),
            MeasurementShape::Angle { p1, p2, p3 } => {
                format_angle_value(crate::geometry::angle_at_vertex(*p1, *p2, *p3))
            }
        }
    }
}

/// A completed measurement record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Unique, time-derived token.
    pub id: String,
    /// Pre-formatted magnitude string, e.g. `"12.3 mm"` or `"37.5°"`.
    pub value: String,
    /// The measured geometry.
    pub shape: MeasurementShape,
    /// Completion time, epoch milliseconds.
    pub timestamp_ms: u64,
}

/// Format a line magnitude.
///
/// Until calibration resolves, distances read in raw pixels; afterwards
/// in millimeters via the fixed ratio.
pub fn format_line_value(pixel_distance: f32, pixels_per_mm: f32) -> String {
    if pixels_per_mm > 0.0 {
        format!("{:.1} mm", pixel_distance * PIXEL_TO_MM_RATIO)
    } else {
        format!("{pixel_distance:.1} px")
    }
}

/// Format a circle magnitude from its image-pixel radius.
///
/// The radius figure is the pixel radius and the area figure is the pixel
/// area; both carry millimeter labels without conversion, matching the
/// shipped behavior. TODO: apply the mm-per-pixel ratio here once product
/// confirms the intended units.
pub fn format_circle_value(radius: f32) -> String {
    format!("R: {:.1}mm, A: {:.1}mm²", radius, circle_area(radius))
}

/// Format an angle magnitude in degrees.
pub fn format_angle_value(degrees: f32) -> String {
    format!("{degrees:.1}°")
}

/// Generator for unique, monotonically-distinguishing measurement ids.
///
/// Ids are epoch milliseconds; completing two measurements within the
/// same millisecond bumps the later one forward so ids stay strictly
/// increasing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementIds {
    last_ms: u64,
}

impl MeasurementIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next `(id, timestamp_ms)` pair from the wall clock.
    pub fn next(&mut self) -> (String, u64) {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.next_from(now_ms)
    }

    fn next_from(&mut self, now_ms: u64) -> (String, u64) {
        let ms = if now_ms <= self.last_ms {
            self.last_ms + 1
        } else {
            now_ms
        };
        self.last_ms = ms;
        (ms.to_string(), ms)
    }
}
