//! Viewport state: zoom-to-cursor, bounded panning, reset.
//!
//! The viewport owns the scale and pan offset applied to the displayed
//! image. Wheel zoom keeps the image point under the cursor fixed; button
//! zoom rescales around the center. After any offset change the offset is
//! clamped so a zoomed-in image cannot be panned fully out of view.

use crate::constants::zoom;
use crate::transform::ViewerMetrics;

/// Pan/zoom transform state for the displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Viewport {
    /// Create an identity viewport (scale 1, no pan).
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Current pan offset as a pair.
    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    /// Wheel zoom anchored at the cursor.
    ///
    /// A positive `delta_y` (wheel away) zooms out by 0.9, negative zooms
    /// in by 1.1. The offset is recomputed so the image point under the
    /// cursor stays under the cursor, then clamped. The wheel path allows
    /// zoom up to 10x.
    ///
    /// No-ops until the surface has reported its size.
    pub fn zoom_at(&mut self, cursor: (f32, f32), delta_y: f32, metrics: &ViewerMetrics) {
        if !metrics.is_ready() {
            return;
        }

        let factor = if delta_y > 0.0 {
            zoom::STEP_OUT
        } else {
            zoom::STEP_IN
        };
        let new_scale = (self.scale * factor).clamp(zoom::MIN, zoom::WHEEL_MAX);

        // Keep the image point under the cursor fixed across the rescale.
        // The offset lives in the centered-image frame, so the cursor is
        // taken relative to the container center.
        let rel_x = cursor.0 - metrics.container_width / 2.0;
        let rel_y = cursor.1 - metrics.container_height / 2.0;
        let ratio = new_scale / self.scale;
        self.offset_x = rel_x - (rel_x - self.offset_x) * ratio;
        self.offset_y = rel_y - (rel_y - self.offset_y) * ratio;
        self.scale = new_scale;

        self.clamp_offset(metrics);
        log::debug!(
            "Zoom-to-cursor: {:.2}x at ({:.1}, {:.1}), offset ({:.1}, {:.1})",
            self.scale,
            cursor.0,
            cursor.1,
            self.offset_x,
            self.offset_y
        );
    }

    /// Button zoom in, anchored at no particular point. Caps at 5x.
    pub fn zoom_in_step(&mut self) {
        self.scale = (self.scale * zoom::STEP_IN).min(zoom::BUTTON_MAX);
        log::debug!("Zoom in: {:.2}x", self.scale);
    }

    /// Button zoom out. Floors at 0.1x.
    pub fn zoom_out_step(&mut self) {
        self.scale = (self.scale * zoom::STEP_OUT).max(zoom::MIN);
        log::debug!("Zoom out: {:.2}x", self.scale);
    }

    /// Replace the offset, then clamp it.
    pub fn set_offset(&mut self, offset: (f32, f32), metrics: &ViewerMetrics) {
        self.offset_x = offset.0;
        self.offset_y = offset.1;
        self.clamp_offset(metrics);
    }

    /// Clamp the offset so the scaled image cannot leave empty space past
    /// its edge on an axis where it overflows the container. Idempotent.
    pub fn clamp_offset(&mut self, metrics: &ViewerMetrics) {
        let (max_x, max_y) = metrics.max_pan(self.scale);
        self.offset_x = self.offset_x.clamp(-max_x, max_x);
        self.offset_y = self.offset_y.clamp(-max_y, max_y);
    }

    /// Back to scale 1, no pan.
    pub fn reset(&mut self) {
        *self = Self::identity();
        log::debug!("View reset");
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transient drag state for the pan tool.
///
/// The anchor records `pointer - offset` at gesture start, so each move
/// maps the pointer straight to a new offset without accumulating deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanState {
    anchor: Option<(f32, f32)>,
}

impl PanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a pan drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Start a drag at the given pointer position.
    pub fn start(&mut self, pointer: (f32, f32), viewport: &Viewport) {
        self.anchor = Some((pointer.0 - viewport.offset_x, pointer.1 - viewport.offset_y));
    }

    /// Offset implied by the current pointer position, if dragging.
    pub fn update(&self, pointer: (f32, f32)) -> Option<(f32, f32)> {
        self.anchor
            .map(|anchor| (pointer.0 - anchor.0, pointer.1 - anchor.1))
    }

    /// End the drag.
    pub fn end(&mut self) {
        self.anchor = None;
    }
}
