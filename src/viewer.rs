//! The composition root: owns all viewer state for one loaded image.
//!
//! Rendering chrome drives this struct through [`Message`] values and
//! reads its accessors; nothing here draws. All state is transient and
//! discarded when the image is replaced or the viewer is reset.

use image::DynamicImage;

use crate::adjustments::ImageAdjustments;
use crate::calibration::Calibration;
use crate::config::ViewerConfig;
use crate::constants::zoom;
use crate::crop::{CropBox, CropDraft};
use crate::error::ViewerError;
use crate::export;
use crate::handlers;
use crate::history::MeasurementHistory;
use crate::measurement::{Measurement, MeasurementIds, MeasurementShape};
use crate::message::Message;
use crate::tools::{MeasureDraft, Tool};
use crate::transform::ViewerMetrics;
use crate::viewport::{PanState, Viewport};

/// The raster handed over by the image-intake collaborator, plus the
/// pre-crop original so reset can restore it.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub(crate) original: DynamicImage,
    pub(crate) current: DynamicImage,
    pub(crate) cropped: bool,
}

impl LoadedImage {
    fn new(image: DynamicImage) -> Self {
        Self {
            original: image.clone(),
            current: image,
            cropped: false,
        }
    }

    /// The raster currently displayed (cropped or original).
    pub fn current(&self) -> &DynamicImage {
        &self.current
    }

    /// Whether a crop has replaced the original.
    pub fn is_cropped(&self) -> bool {
        self.cropped
    }
}

/// All viewer state for the lifetime of one loaded image.
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    pub(crate) image: Option<LoadedImage>,
    pub(crate) container: (f32, f32),
    pub(crate) viewport: Viewport,
    pub(crate) selected_tool: Option<Tool>,
    pub(crate) pan: PanState,
    pub(crate) draft: MeasureDraft,
    pub(crate) crop_draft: CropDraft,
    pub(crate) measurements: Vec<Measurement>,
    pub(crate) history: MeasurementHistory,
    pub(crate) calibration: Calibration,
    pub(crate) adjustments: ImageAdjustments,
    pub(crate) adjustments_open: bool,
    pub(crate) ids: MeasurementIds,
    pub(crate) config: ViewerConfig,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Load a decoded image, discarding every piece of per-image state.
    pub fn set_image(&mut self, image: DynamicImage) {
        log::info!(
            "Image loaded: {}x{} px",
            image.width(),
            image.height()
        );
        let config = self.config.clone();
        let container = self.container;
        *self = Self {
            image: Some(LoadedImage::new(image)),
            container,
            config,
            ..Self::default()
        };
    }

    /// Apply one state transition.
    pub fn update(&mut self, message: Message) {
        handlers::handle_message(self, message);
    }

    // ========================================================================
    // Read state for the toolbar / dock / panels
    // ========================================================================

    /// The currently selected tool, if any.
    pub fn selected_tool(&self) -> Option<Tool> {
        self.selected_tool
    }

    /// Current zoom scale.
    pub fn scale(&self) -> f32 {
        self.viewport.scale
    }

    /// Current pan offset.
    pub fn offset(&self) -> (f32, f32) {
        self.viewport.offset()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Completed measurements, oldest first.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Whether the calibration dialog should be shown.
    pub fn is_calibrating(&self) -> bool {
        self.calibration.is_calibrating()
    }

    /// Resolved pixels-per-millimeter ratio; 0 while uncalibrated.
    pub fn pixels_per_mm(&self) -> f32 {
        self.calibration.pixels_per_mm()
    }

    /// Display-filter settings for the rendering collaborator.
    pub fn adjustments(&self) -> &ImageAdjustments {
        &self.adjustments
    }

    /// Whether the adjustments panel is open.
    pub fn adjustments_open(&self) -> bool {
        self.adjustments_open
    }

    /// Whether the magnification grid overlay should be shown.
    pub fn show_grid(&self) -> bool {
        self.viewport.scale > zoom::GRID_THRESHOLD
    }

    /// The loaded image, if any.
    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    /// The crop selection box, in container coordinates.
    pub fn crop_box(&self) -> CropBox {
        self.crop_draft.region()
    }

    /// Preview of the in-progress measurement gesture, for drawing.
    pub fn draft_preview(&self) -> Option<MeasurementShape> {
        self.draft.preview(self.viewport.scale)
    }

    /// Mapping sizes for the current surface and image, once both are
    /// known. Everything coordinate-related no-ops while this is `None`.
    pub fn metrics(&self) -> Option<ViewerMetrics> {
        let image = self.image.as_ref()?;
        let natural = (
            image.current.width() as f32,
            image.current.height() as f32,
        );
        let metrics = ViewerMetrics::at_natural_size(self.container, natural);
        metrics.is_ready().then_some(metrics)
    }

    // ========================================================================
    // Explicit operations
    // ========================================================================

    /// Flatten the image and measurement overlay and encode PNG bytes for
    /// download. Always renders at natural resolution.
    pub fn export_png(&self) -> Result<Vec<u8>, ViewerError> {
        let image = self.image.as_ref().ok_or(ViewerError::NoImage)?;
        let factors = self
            .metrics()
            .map(|m| m.natural_factors())
            .unwrap_or((1.0, 1.0));
        let flattened = export::flatten(&image.current, &self.measurements, factors, &self.config)?;
        export::encode_png(&flattened)
    }

    /// Serialize the measurement list as JSON for the results panel.
    pub fn measurements_to_json(&self) -> Result<String, ViewerError> {
        Ok(serde_json::to_string_pretty(&self.measurements)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    /// A viewer with a 400x300 image in an 800x600 surface.
    fn ready_viewer() -> ViewerState {
        let mut state = ViewerState::new();
        state.set_image(DynamicImage::ImageRgba8(RgbaImage::new(400, 300)));
        state.update(Message::SurfaceResized {
            width: 800.0,
            height: 600.0,
        });
        state
    }

    fn draw_line(state: &mut ViewerState, from: (f32, f32), to: (f32, f32)) {
        state.update(Message::ToolSelected(Tool::Line));
        state.update(Message::PointerDown { x: from.0, y: from.1 });
        state.update(Message::PointerMoved { x: to.0, y: to.1 });
        state.update(Message::PointerUp { x: to.0, y: to.1 });
    }

    #[test]
    fn test_events_noop_before_image_and_surface() {
        let mut state = ViewerState::new();
        state.update(Message::ToolSelected(Tool::Line));
        state.update(Message::PointerDown { x: 10.0, y: 10.0 });
        state.update(Message::PointerUp { x: 50.0, y: 50.0 });
        state.update(Message::Wheel {
            cursor_x: 10.0,
            cursor_y: 10.0,
            delta_y: -1.0,
            zoom_modifier: true,
        });
        assert!(state.measurements().is_empty());
        assert_eq!(state.scale(), 1.0);
    }

    #[test]
    fn test_line_gesture_produces_measurement() {
        let mut state = ready_viewer();
        // Image origin is (200, 150): a 100 px horizontal drag.
        draw_line(&mut state, (250.0, 200.0), (350.0, 200.0));

        assert_eq!(state.measurements().len(), 1);
        let m = &state.measurements()[0];
        assert_eq!(m.shape.kind_name(), "line");
        // Uncalibrated: raw pixel readout.
        assert_eq!(m.value, "100.0 px");
        assert!(state.can_undo());
    }

    #[test]
    fn test_first_measurement_opens_calibration_then_mm_values() {
        let mut state = ready_viewer();
        draw_line(&mut state, (250.0, 200.0), (350.0, 200.0));
        assert!(state.is_calibrating());

        state.update(Message::CalibrationAccepted(40.0));
        assert!(!state.is_calibrating());
        assert!(approx_eq(state.pixels_per_mm(), 2.5));

        draw_line(&mut state, (250.0, 220.0), (350.0, 220.0));
        assert_eq!(state.measurements()[1].value, "40.0 mm");
        // The prompt does not come back.
        assert!(!state.is_calibrating());
    }

    #[test]
    fn test_wheel_without_modifier_passes_through() {
        let mut state = ready_viewer();
        state.update(Message::Wheel {
            cursor_x: 400.0,
            cursor_y: 300.0,
            delta_y: -1.0,
            zoom_modifier: false,
        });
        assert_eq!(state.scale(), 1.0);
    }

    #[test]
    fn test_wheel_zoom_with_modifier() {
        let mut state = ready_viewer();
        state.update(Message::Wheel {
            cursor_x: 400.0,
            cursor_y: 300.0,
            delta_y: -1.0,
            zoom_modifier: true,
        });
        assert!(approx_eq(state.scale(), 1.1));
    }

    #[test]
    fn test_button_zoom_caps_at_five() {
        let mut state = ready_viewer();
        for _ in 0..60 {
            state.update(Message::ZoomIn);
        }
        assert!(approx_eq(state.scale(), 5.0));
    }

    #[test]
    fn test_pan_only_with_pan_tool_and_clamped() {
        let mut state = ready_viewer();
        // Zoom in far enough that the image overflows the container.
        for _ in 0..9 {
            state.update(Message::Wheel {
                cursor_x: 400.0,
                cursor_y: 300.0,
                delta_y: -1.0,
                zoom_modifier: true,
            });
        }
        assert!(state.scale() > 2.0);

        // Without the pan tool, dragging does nothing.
        state.update(Message::PointerDown { x: 100.0, y: 100.0 });
        state.update(Message::PointerMoved { x: 200.0, y: 140.0 });
        state.update(Message::PointerUp { x: 200.0, y: 140.0 });
        assert_eq!(state.offset(), (0.0, 0.0));

        state.update(Message::ToolSelected(Tool::Pan));
        state.update(Message::PointerDown { x: 100.0, y: 100.0 });
        state.update(Message::PointerMoved { x: 160.0, y: 130.0 });
        state.update(Message::PointerUp { x: 160.0, y: 130.0 });
        let (ox, oy) = state.offset();
        assert!(approx_eq(ox, 60.0));
        assert!(approx_eq(oy, 30.0));

        // A huge drag clamps to the overflow slack.
        let metrics = state.metrics().unwrap();
        let (max_x, max_y) = metrics.max_pan(state.scale());
        state.update(Message::PointerDown { x: 0.0, y: 0.0 });
        state.update(Message::PointerMoved { x: 5000.0, y: 5000.0 });
        let (ox, oy) = state.offset();
        assert!(approx_eq(ox, max_x));
        assert!(approx_eq(oy, max_y));
    }

    #[test]
    fn test_undo_redo_and_delete() {
        let mut state = ready_viewer();
        draw_line(&mut state, (250.0, 200.0), (350.0, 200.0));
        state.update(Message::CalibrationCancelled);
        draw_line(&mut state, (250.0, 220.0), (350.0, 220.0));
        assert_eq!(state.measurements().len(), 2);

        state.update(Message::Undo);
        assert_eq!(state.measurements().len(), 1);
        assert!(state.can_redo());

        state.update(Message::Redo);
        assert_eq!(state.measurements().len(), 2);

        let id = state.measurements()[0].id.clone();
        state.update(Message::DeleteMeasurement(id.clone()));
        assert_eq!(state.measurements().len(), 1);
        assert!(state.measurements().iter().all(|m| m.id != id));

        // Delete was recorded: undo restores both.
        state.update(Message::Undo);
        assert_eq!(state.measurements().len(), 2);
    }

    #[test]
    fn test_reset_clears_core_state() {
        let mut state = ready_viewer();
        draw_line(&mut state, (250.0, 200.0), (350.0, 200.0));
        state.update(Message::CalibrationAccepted(10.0));
        state.update(Message::ZoomIn);
        state.update(Message::Reset);

        assert_eq!(state.scale(), 1.0);
        assert_eq!(state.offset(), (0.0, 0.0));
        assert!(state.measurements().is_empty());
        assert!(!state.can_undo() && !state.can_redo());
        assert!(state.history.is_empty());
        assert!(!state.is_calibrating());
        assert!(!state.image().unwrap().is_cropped());
    }

    #[test]
    fn test_circle_and_angle_measurements() {
        let mut state = ready_viewer();
        state.update(Message::CalibrationCancelled);

        state.update(Message::ToolSelected(Tool::Circle));
        state.update(Message::PointerDown { x: 400.0, y: 300.0 });
        state.update(Message::PointerMoved { x: 450.0, y: 300.0 });
        state.update(Message::PointerUp { x: 450.0, y: 300.0 });
        assert_eq!(state.measurements().len(), 1);
        // 50 px on-screen radius at scale 1.
        assert_eq!(state.measurements()[0].value, "R: 50.0mm, A: 7854.0mm²");

        state.update(Message::ToolSelected(Tool::Angle));
        for (x, y) in [(300.0, 200.0), (250.0, 200.0), (250.0, 150.0)] {
            state.update(Message::PointerDown { x, y });
            state.update(Message::PointerUp { x, y });
        }
        assert_eq!(state.measurements().len(), 2);
        assert_eq!(state.measurements()[1].value, "90.0°");
    }

    #[test]
    fn test_crop_apply_replaces_image_and_resets_view() {
        let mut state = ready_viewer();
        state.update(Message::ToolSelected(Tool::Crop));
        state.update(Message::PointerDown { x: 200.0, y: 150.0 });
        state.update(Message::PointerMoved { x: 300.0, y: 250.0 });
        state.update(Message::PointerUp { x: 300.0, y: 250.0 });
        state.update(Message::CropApplied);

        let image = state.image().unwrap();
        assert!(image.is_cropped());
        assert_eq!(
            (image.current().width(), image.current().height()),
            (100, 100)
        );
        assert_eq!(state.selected_tool(), None);
        assert_eq!(state.scale(), 1.0);
        assert!(!state.crop_box().has_area());
    }

    #[test]
    fn test_crop_cancel_keeps_image() {
        let mut state = ready_viewer();
        state.update(Message::ToolSelected(Tool::Crop));
        state.update(Message::PointerDown { x: 200.0, y: 150.0 });
        state.update(Message::PointerMoved { x: 300.0, y: 250.0 });
        state.update(Message::CropCancelled);

        assert!(!state.image().unwrap().is_cropped());
        assert_eq!(state.selected_tool(), None);
    }

    #[test]
    fn test_adjustments_flow() {
        let mut state = ready_viewer();
        state.update(Message::OpenAdjustments);
        assert!(state.adjustments_open());
        state.update(Message::BrightnessChanged(150.0));
        state.update(Message::ContrastChanged(250.0));
        assert_eq!(state.adjustments().brightness(), 150.0);
        assert_eq!(state.adjustments().contrast(), 200.0);
        state.update(Message::ResetAdjustments);
        assert!(state.adjustments().is_neutral());
        state.update(Message::CloseAdjustments);
        assert!(!state.adjustments_open());
    }

    #[test]
    fn test_tool_switch_cancels_draft() {
        let mut state = ready_viewer();
        state.update(Message::ToolSelected(Tool::Line));
        state.update(Message::PointerDown { x: 250.0, y: 200.0 });
        state.update(Message::PointerMoved { x: 300.0, y: 200.0 });
        state.update(Message::ToolSelected(Tool::Pan));
        state.update(Message::PointerUp { x: 350.0, y: 200.0 });
        assert!(state.measurements().is_empty());
    }

    #[test]
    fn test_set_image_discards_previous_state() {
        let mut state = ready_viewer();
        draw_line(&mut state, (250.0, 200.0), (350.0, 200.0));
        state.update(Message::CalibrationAccepted(1.0));

        state.set_image(DynamicImage::ImageRgba8(RgbaImage::new(100, 100)));
        assert!(state.measurements().is_empty());
        assert!(!state.can_undo());
        assert_eq!(state.pixels_per_mm(), 0.0);
        // Surface size survives the swap.
        assert!(state.metrics().is_some());
    }

    #[test]
    fn test_show_grid_above_unity_scale() {
        let mut state = ready_viewer();
        assert!(!state.show_grid());
        state.update(Message::ZoomIn);
        assert!(state.show_grid());
    }

    #[test]
    fn test_export_and_json() {
        let mut state = ready_viewer();
        draw_line(&mut state, (250.0, 200.0), (350.0, 200.0));

        let png = state.export_png().expect("export should succeed");
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);

        let json = state.measurements_to_json().expect("json");
        assert!(json.contains("\"Line\""));
    }

    #[test]
    fn test_export_without_image_fails() {
        let state = ViewerState::new();
        assert!(matches!(state.export_png(), Err(ViewerError::NoImage)));
    }
}
