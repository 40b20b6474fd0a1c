//! Flattening measurements onto the image for export.
//!
//! Export always renders at natural resolution: measurement coordinates
//! (stored in the displayed image's pixel grid) are scaled by the
//! natural/display factors, never by the live viewport. Shapes are
//! stroked with tiny-skia; value labels are rasterized with imageproc on
//! top. The result encodes as PNG bytes for download.

use ab_glyph::{FontArc, PxScale};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::config::ViewerConfig;
use crate::constants::overlay;
use crate::error::ViewerError;
use crate::geometry::Point;
use crate::measurement::{Measurement, MeasurementShape};

/// Flatten the measurement overlay onto the image at natural resolution.
///
/// `factors` are the per-axis natural/display scale factors (see
/// [`crate::transform::ViewerMetrics::natural_factors`]).
pub fn flatten(
    image: &DynamicImage,
    measurements: &[Measurement],
    factors: (f32, f32),
    config: &ViewerConfig,
) -> Result<DynamicImage, ViewerError> {
    let mut pixmap = Pixmap::new(image.width(), image.height())
        .ok_or_else(|| ViewerError::export("cannot allocate pixmap"))?;

    copy_image_to_pixmap(image, &mut pixmap)?;

    for measurement in measurements {
        draw_measurement_shape(&mut pixmap, &measurement.shape, factors, config)?;
    }

    let mut output = RgbaImage::from_raw(image.width(), image.height(), pixmap.data().to_vec())
        .ok_or_else(|| ViewerError::export("cannot construct output image"))?;

    draw_measurement_labels(&mut output, measurements, factors, config);

    Ok(DynamicImage::ImageRgba8(output))
}

/// Encode a flattened image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ViewerError> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

fn copy_image_to_pixmap(image: &DynamicImage, pixmap: &mut Pixmap) -> Result<(), ViewerError> {
    let rgba = image.to_rgba8();
    let data = pixmap.data_mut();
    if data.len() != rgba.len() {
        return Err(ViewerError::export("source image and pixmap size mismatch"));
    }
    data.copy_from_slice(rgba.as_raw());
    Ok(())
}

fn overlay_paint<'a>() -> Paint<'a> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(
        overlay::COLOR[0],
        overlay::COLOR[1],
        overlay::COLOR[2],
        overlay::COLOR[3],
    );
    paint.anti_alias = true;
    paint
}

fn draw_measurement_shape(
    pixmap: &mut Pixmap,
    shape: &MeasurementShape,
    factors: (f32, f32),
    config: &ViewerConfig,
) -> Result<(), ViewerError> {
    let paint = overlay_paint();
    let stroke = Stroke {
        width: config.stroke_width,
        ..Default::default()
    };
    let (fx, fy) = factors;

    match shape {
        MeasurementShape::Line { start, end } => {
            stroke_segments(pixmap, &[*start, *end], factors, &paint, &stroke)?;
            fill_endpoint(pixmap, *start, factors, &paint)?;
            fill_endpoint(pixmap, *end, factors, &paint)?;
        }
        MeasurementShape::Circle { center, radius } => {
            let mut pb = PathBuilder::new();
            pb.push_circle(center.x * fx, center.y * fy, (radius * fx).max(1.0));
            let path = pb
                .finish()
                .ok_or_else(|| ViewerError::export("cannot build circle path"))?;
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
        MeasurementShape::Angle { p1, p2, p3 } => {
            stroke_segments(pixmap, &[*p1, *p2, *p3], factors, &paint, &stroke)?;
        }
    }

    Ok(())
}

fn stroke_segments(
    pixmap: &mut Pixmap,
    points: &[Point],
    factors: (f32, f32),
    paint: &Paint<'_>,
    stroke: &Stroke,
) -> Result<(), ViewerError> {
    let (fx, fy) = factors;
    let mut pb = PathBuilder::new();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            pb.move_to(p.x * fx, p.y * fy);
        } else {
            pb.line_to(p.x * fx, p.y * fy);
        }
    }
    let path = pb
        .finish()
        .ok_or_else(|| ViewerError::export("cannot build polyline path"))?;
    pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
    Ok(())
}

fn fill_endpoint(
    pixmap: &mut Pixmap,
    point: Point,
    factors: (f32, f32),
    paint: &Paint<'_>,
) -> Result<(), ViewerError> {
    let mut pb = PathBuilder::new();
    pb.push_circle(
        point.x * factors.0,
        point.y * factors.1,
        overlay::ENDPOINT_RADIUS as f32,
    );
    let path = pb
        .finish()
        .ok_or_else(|| ViewerError::export("cannot build endpoint path"))?;
    pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    Ok(())
}

fn draw_measurement_labels(
    image: &mut RgbaImage,
    measurements: &[Measurement],
    factors: (f32, f32),
    config: &ViewerConfig,
) {
    let Some(font) = load_system_font() else {
        log::warn!("No system font found; exporting without measurement labels");
        return;
    };

    let color = Rgba(overlay::COLOR);
    let scale = PxScale::from(config.label_size);
    let (fx, fy) = factors;

    for measurement in measurements {
        let anchor = match &measurement.shape {
            MeasurementShape::Line { start, end } => {
                let mid = start.midpoint(end);
                Point::new(mid.x * fx, mid.y * fy - overlay::LABEL_LIFT)
            }
            MeasurementShape::Circle { center, .. } => {
                Point::new(center.x * fx + 5.0, center.y * fy - 5.0)
            }
            MeasurementShape::Angle { p2, .. } => Point::new(p2.x * fx + 10.0, p2.y * fy + 10.0),
        };

        draw_text_mut(
            image,
            color,
            anchor.x as i32,
            anchor.y as i32,
            scale,
            &font,
            &measurement.value,
        );
    }
}

fn load_system_font() -> Option<FontArc> {
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/SFNS.ttf",
    ];

    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }

    None
}
