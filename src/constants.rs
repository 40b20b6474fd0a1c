//! Global constants for the mediview core.
//!
//! This module centralizes the fixed calibration ratio, zoom behavior,
//! and overlay styling values so they are not scattered across modules.

/// Millimeters represented by one image pixel. Fixed for this design;
/// calibration does not derive it from image metadata.
pub const PIXEL_TO_MM_RATIO: f32 = 0.4;

/// Zoom constants.
///
/// Wheel zoom and button zoom share the same step factors but carry
/// distinct upper caps.
pub mod zoom {
    /// Factor applied per step when zooming in.
    pub const STEP_IN: f32 = 1.1;
    /// Factor applied per step when zooming out.
    pub const STEP_OUT: f32 = 0.9;
    /// Minimum zoom level (both triggers).
    pub const MIN: f32 = 0.1;
    /// Maximum zoom level for modifier + wheel zoom.
    pub const WHEEL_MAX: f32 = 10.0;
    /// Maximum zoom level for the toolbar zoom buttons.
    pub const BUTTON_MAX: f32 = 5.0;
    /// Above this scale the magnification grid overlay is shown.
    pub const GRID_THRESHOLD: f32 = 1.0;
}

/// Image adjustment constants (percentage units, 100 = neutral).
pub mod adjust {
    /// Lower bound for brightness/contrast sliders.
    pub const MIN: f32 = 0.0;
    /// Upper bound for brightness/contrast sliders.
    pub const MAX: f32 = 200.0;
    /// Neutral value (no filtering applied).
    pub const NEUTRAL: f32 = 100.0;
}

/// Overlay styling for exported measurement graphics.
pub mod overlay {
    /// Measurement stroke/label color (RGBA).
    pub const COLOR: [u8; 4] = [0, 255, 0, 255];
    /// Default stroke width in natural pixels.
    pub const STROKE_WIDTH: f32 = 2.0;
    /// Radius of the endpoint markers drawn on line measurements.
    pub const ENDPOINT_RADIUS: i32 = 4;
    /// Default label font size in points.
    pub const LABEL_SIZE: f32 = 14.0;
    /// Vertical lift of a line label above the segment midpoint.
    pub const LABEL_LIFT: f32 = 15.0;
}
