//! Coordinate transforms between the interactive surface and the image.
//!
//! Three spaces are involved:
//! - container space: pointer positions local to the viewer surface,
//! - on-screen image space: the image as displayed, scaled and panned,
//! - image-pixel space: the displayed image's own pixel grid.
//!
//! The image sits centered in the container before any transform, so the
//! forward mapping subtracts the centering origin and the pan offset and
//! divides out the scale. The inverse is the exact algebraic inverse, so
//! round-tripping a point reproduces it within float tolerance.

use crate::geometry::Point;

/// Sizes needed to map pointer positions onto the image.
///
/// `display` is the image's on-screen layout size at scale 1; `natural`
/// is the backing raster size. They coincide unless the embedding shell
/// lays the image out at a different size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewerMetrics {
    pub container_width: f32,
    pub container_height: f32,
    pub display_width: f32,
    pub display_height: f32,
    pub natural_width: f32,
    pub natural_height: f32,
}

impl ViewerMetrics {
    pub fn new(
        container: (f32, f32),
        display: (f32, f32),
        natural: (f32, f32),
    ) -> Self {
        Self {
            container_width: container.0,
            container_height: container.1,
            display_width: display.0,
            display_height: display.1,
            natural_width: natural.0,
            natural_height: natural.1,
        }
    }

    /// Metrics for an image displayed at its natural size.
    pub fn at_natural_size(container: (f32, f32), natural: (f32, f32)) -> Self {
        Self::new(container, natural, natural)
    }

    /// Whether both the surface and the image have reported a usable size.
    ///
    /// Transform operations must no-op until this holds; mount timing is
    /// not guaranteed relative to the first pointer events.
    pub fn is_ready(&self) -> bool {
        self.container_width > 0.0
            && self.container_height > 0.0
            && self.display_width > 0.0
            && self.display_height > 0.0
    }

    /// Top-left corner of the scaled image within the container, before
    /// the pan offset is applied. The image is centered.
    pub fn image_origin(&self, scale: f32) -> (f32, f32) {
        (
            (self.container_width - self.display_width * scale) / 2.0,
            (self.container_height - self.display_height * scale) / 2.0,
        )
    }

    /// Map a container-local pointer position to image-pixel space,
    /// clamped to the image bounds.
    pub fn to_image(&self, canvas: (f32, f32), scale: f32, offset: (f32, f32)) -> Point {
        let origin = self.image_origin(scale);
        let image_x = (canvas.0 - origin.0 - offset.0) / scale;
        let image_y = (canvas.1 - origin.1 - offset.1) / scale;

        Point::new(
            image_x.clamp(0.0, self.display_width),
            image_y.clamp(0.0, self.display_height),
        )
    }

    /// Map an image-pixel point back to container-local coordinates.
    ///
    /// Exact inverse of [`Self::to_image`] for in-bounds points; used for
    /// drawing, never for hit testing.
    pub fn to_canvas(&self, point: Point, scale: f32, offset: (f32, f32)) -> (f32, f32) {
        let origin = self.image_origin(scale);
        (
            point.x * scale + origin.0 + offset.0,
            point.y * scale + origin.1 + offset.1,
        )
    }

    /// Per-axis factors converting display-space lengths to natural
    /// (backing raster) lengths. Used by crop and export, which always
    /// work at natural resolution regardless of the live viewport.
    pub fn natural_factors(&self) -> (f32, f32) {
        (
            self.natural_width / self.display_width,
            self.natural_height / self.display_height,
        )
    }

    /// Largest pan offset per axis that still keeps the scaled image
    /// covering the container on that axis. Zero while the scaled image
    /// fits entirely inside.
    pub fn max_pan(&self, scale: f32) -> (f32, f32) {
        (
            ((self.display_width * scale - self.container_width) / 2.0).max(0.0),
            ((self.display_height * scale - self.container_height) / 2.0).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.01;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn metrics() -> ViewerMetrics {
        ViewerMetrics::at_natural_size((800.0, 600.0), (400.0, 300.0))
    }

    #[test]
    fn test_not_ready_until_sized() {
        assert!(!ViewerMetrics::default().is_ready());
        assert!(metrics().is_ready());
    }

    #[test]
    fn test_origin_centers_image() {
        let m = metrics();
        assert_eq!(m.image_origin(1.0), (200.0, 150.0));
        // Image larger than the container: origin goes negative.
        let origin = m.image_origin(3.0);
        assert_eq!(origin, (-200.0, -300.0));
    }

    #[test]
    fn test_forward_maps_center_to_center() {
        let m = metrics();
        let p = m.to_image((400.0, 300.0), 1.0, (0.0, 0.0));
        assert!(approx_eq(p.x, 200.0));
        assert!(approx_eq(p.y, 150.0));
    }

    #[test]
    fn test_forward_accounts_for_offset_and_scale() {
        let m = metrics();
        // Offset moves the image right/down, so the same pointer position
        // lands further left/up in image space.
        let p = m.to_image((400.0, 300.0), 2.0, (50.0, -30.0));
        assert!(approx_eq(p.x, (400.0 - 0.0 - 50.0) / 2.0));
        assert!(approx_eq(p.y, (300.0 - 0.0 + 30.0) / 2.0));
    }

    #[test]
    fn test_forward_clamps_to_image_bounds() {
        let m = metrics();
        let p = m.to_image((0.0, 0.0), 1.0, (0.0, 0.0));
        assert_eq!((p.x, p.y), (0.0, 0.0));
        let p = m.to_image((800.0, 600.0), 1.0, (0.0, 0.0));
        assert_eq!((p.x, p.y), (400.0, 300.0));
    }

    #[test]
    fn test_round_trip_across_scales_and_offsets() {
        let m = metrics();
        let scales = [0.1, 0.5, 1.0, 2.5, 10.0];
        let offsets = [(0.0, 0.0), (120.0, -45.0), (-33.3, 77.7)];
        let points = [
            Point::new(0.0, 0.0),
            Point::new(200.0, 150.0),
            Point::new(399.0, 299.0),
            Point::new(12.5, 250.25),
        ];

        for &scale in &scales {
            for &offset in &offsets {
                for &p in &points {
                    let canvas = m.to_canvas(p, scale, offset);
                    let back = m.to_image(canvas, scale, offset);
                    assert!(
                        approx_eq(back.x, p.x) && approx_eq(back.y, p.y),
                        "round trip failed at scale {scale}: {p:?} -> {back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_natural_factors() {
        let m = ViewerMetrics::new((800.0, 600.0), (400.0, 300.0), (1600.0, 1200.0));
        assert_eq!(m.natural_factors(), (4.0, 4.0));
    }

    #[test]
    fn test_max_pan_zero_when_image_fits() {
        let m = metrics();
        assert_eq!(m.max_pan(1.0), (0.0, 0.0));
    }

    #[test]
    fn test_max_pan_grows_with_scale() {
        let m = metrics();
        // 400 * 4 = 1600 wide against an 800 container: 400 slack each side.
        assert_eq!(m.max_pan(4.0), (400.0, 300.0));
    }
}
