//! Viewer messages.
//!
//! Every operation the toolbar, dock, dialogs, and pointer overlay can
//! perform on the core is a message; the composition root applies them
//! synchronously in [`crate::viewer::ViewerState::update`].

use crate::tools::Tool;

/// Messages that can be sent to update viewer state.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Toolbar
    /// A tool was picked in the toolbar or measurement dock
    ToolSelected(Tool),
    /// Toolbar zoom-in button
    ZoomIn,
    /// Toolbar zoom-out button
    ZoomOut,
    /// Reset view, crop, measurements, and history
    Reset,
    /// Undo last measurement change
    Undo,
    /// Redo previously undone measurement change
    Redo,
    /// Open the adjustments panel
    OpenAdjustments,
    /// Close the adjustments panel
    CloseAdjustments,

    // Pointer overlay
    /// Wheel gesture over the surface; zooms only with the modifier held
    Wheel {
        cursor_x: f32,
        cursor_y: f32,
        delta_y: f32,
        zoom_modifier: bool,
    },
    /// Pointer pressed at container-local coordinates
    PointerDown { x: f32, y: f32 },
    /// Pointer moved
    PointerMoved { x: f32, y: f32 },
    /// Pointer released
    PointerUp { x: f32, y: f32 },
    /// Pointer left the surface
    PointerLeft,
    /// The surface reported a new size
    SurfaceResized { width: f32, height: f32 },

    // Measurement results panel
    /// Delete a measurement by id
    DeleteMeasurement(String),

    // Adjustments panel
    /// Brightness slider changed (0-200, 100 neutral)
    BrightnessChanged(f32),
    /// Contrast slider changed (0-200, 100 neutral)
    ContrastChanged(f32),
    /// Reset adjustments to neutral
    ResetAdjustments,

    // Calibration dialog
    /// Known distance accepted, in millimeters
    CalibrationAccepted(f32),
    /// Calibration dismissed
    CalibrationCancelled,

    // Crop overlay
    /// Apply the selected crop box
    CropApplied,
    /// Leave crop mode without cropping
    CropCancelled,
}
