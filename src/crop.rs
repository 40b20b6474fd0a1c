//! Crop selection and application.
//!
//! The crop tool drags a rectangle in container coordinates over the
//! overlay. On apply, the rectangle is converted into the displayed
//! image's pixel grid (dividing out the on-screen origin and scale),
//! scaled up to natural resolution, clamped to the raster bounds, and
//! cut out of the backing image.

use image::DynamicImage;

use crate::error::ViewerError;
use crate::transform::ViewerMetrics;
use crate::viewport::Viewport;

/// Axis-aligned drag rectangle in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropBox {
    /// Build a normalized box from two drag corners.
    pub fn from_corners(a: (f32, f32), b: (f32, f32)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (a.0 - b.0).abs(),
            height: (a.1 - b.1).abs(),
        }
    }

    /// Whether the box has positive area.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// In-progress crop selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropDraft {
    start: Option<(f32, f32)>,
    region: CropBox,
}

impl CropDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the drag button is currently down.
    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    /// The selected box so far.
    pub fn region(&self) -> CropBox {
        self.region
    }

    /// Start a drag, collapsing the box onto the anchor corner.
    pub fn begin(&mut self, pos: (f32, f32)) {
        self.start = Some(pos);
        self.region = CropBox::from_corners(pos, pos);
    }

    /// Stretch the box to the current pointer position.
    pub fn update(&mut self, pos: (f32, f32)) {
        if let Some(start) = self.start {
            self.region = CropBox::from_corners(start, pos);
        }
    }

    /// Release the drag button; the selected box stays visible until the
    /// crop is applied or cancelled.
    pub fn end_drag(&mut self) {
        self.start = None;
    }

    /// Drop the selection entirely.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A crop region in natural-pixel units, clamped to the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaturalRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Convert a container-space crop box into a natural-pixel region.
///
/// The box is first moved into the displayed image's own pixel grid by
/// subtracting the on-screen image origin (centering plus pan) and
/// dividing out the scale, then scaled by the natural/display factors
/// and intersected with the raster bounds.
pub fn to_natural_region(
    region: CropBox,
    metrics: &ViewerMetrics,
    viewport: &Viewport,
) -> Result<NaturalRegion, ViewerError> {
    if !metrics.is_ready() {
        return Err(ViewerError::SurfaceNotReady);
    }
    if !region.has_area() {
        return Err(ViewerError::invalid_crop("selection has no area"));
    }

    let origin = metrics.image_origin(viewport.scale);
    let image_left = origin.0 + viewport.offset_x;
    let image_top = origin.1 + viewport.offset_y;

    let display_x = (region.x - image_left) / viewport.scale;
    let display_y = (region.y - image_top) / viewport.scale;
    let display_w = region.width / viewport.scale;
    let display_h = region.height / viewport.scale;

    let (fx, fy) = metrics.natural_factors();
    let left = (display_x * fx).max(0.0);
    let top = (display_y * fy).max(0.0);
    let right = ((display_x + display_w) * fx).min(metrics.natural_width);
    let bottom = ((display_y + display_h) * fy).min(metrics.natural_height);

    if right - left < 1.0 || bottom - top < 1.0 {
        return Err(ViewerError::invalid_crop(
            "selection lies outside the image",
        ));
    }

    Ok(NaturalRegion {
        x: left as u32,
        y: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}

/// Cut the region out of the backing raster.
pub fn apply(image: &DynamicImage, region: NaturalRegion) -> DynamicImage {
    image.crop_imm(region.x, region.y, region.width, region.height)
}
