//! Tool selection and per-tool gesture state machines.
//!
//! Each measurement tool runs a small `Idle -> Drawing -> Idle` machine
//! driven by pointer events on the overlay surface. Drafts hold only the
//! in-progress gesture; completed shapes are emitted upwards and the
//! draft forgets them. The composition root's measurement list is the
//! single source of truth for rendering.

use crate::geometry::Point;
use crate::measurement::MeasurementShape;

/// The interaction tool currently selected in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Plain selection, no gesture handling.
    #[default]
    Cursor,
    /// Drag to pan the image.
    Pan,
    /// Drag a rectangle to crop.
    Crop,
    /// Two-point distance measurement.
    Line,
    /// Center-and-radius circle measurement.
    Circle,
    /// Three-point angle measurement.
    Angle,
}

impl Tool {
    /// Stable id used across the toolbar boundary.
    pub fn id(&self) -> &'static str {
        match self {
            Tool::Cursor => "cursor",
            Tool::Pan => "pan",
            Tool::Crop => "crop",
            Tool::Line => "line",
            Tool::Circle => "circle",
            Tool::Angle => "angle",
        }
    }

    /// Resolve a toolbar id.
    pub fn from_id(id: &str) -> Option<Tool> {
        match id {
            "cursor" => Some(Tool::Cursor),
            "pan" => Some(Tool::Pan),
            "crop" => Some(Tool::Crop),
            "line" => Some(Tool::Line),
            "circle" => Some(Tool::Circle),
            "angle" => Some(Tool::Angle),
            _ => None,
        }
    }

    /// Whether this tool produces measurements.
    pub fn is_measure(&self) -> bool {
        matches!(self, Tool::Line | Tool::Circle | Tool::Angle)
    }
}

/// In-progress line gesture, in image-pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineDraft {
    pub start: Point,
    pub end: Point,
}

impl LineDraft {
    pub fn new(point: Point) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    pub fn update(&mut self, point: Point) {
        self.end = point;
    }

    /// Complete the gesture. A zero-length drag is degenerate and yields
    /// nothing.
    pub fn finish(self) -> Option<MeasurementShape> {
        if self.start == self.end {
            return None;
        }
        Some(MeasurementShape::Line {
            start: self.start,
            end: self.end,
        })
    }
}

/// In-progress circle gesture.
///
/// The center is fixed in image-pixel space at pointer-down; the radius
/// is tracked in container units while the pointer drags and divided out
/// by the viewport scale only on completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleDraft {
    pub center: Point,
    anchor: (f32, f32),
    pub canvas_radius: f32,
}

impl CircleDraft {
    pub fn new(center: Point, anchor: (f32, f32)) -> Self {
        Self {
            center,
            anchor,
            canvas_radius: 0.0,
        }
    }

    pub fn update(&mut self, pointer: (f32, f32)) {
        let dx = pointer.0 - self.anchor.0;
        let dy = pointer.1 - self.anchor.1;
        self.canvas_radius = (dx * dx + dy * dy).sqrt();
    }

    /// Complete the gesture, converting the on-screen radius to
    /// image-pixel units. A zero radius is degenerate.
    pub fn finish(self, scale: f32) -> Option<MeasurementShape> {
        if self.canvas_radius == 0.0 {
            return None;
        }
        Some(MeasurementShape::Circle {
            center: self.center,
            radius: self.canvas_radius / scale,
        })
    }
}

/// In-progress angle gesture: up to three clicked points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AngleDraft {
    points: Vec<Point>,
}

impl AngleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a clicked vertex. Extra clicks past the third are ignored.
    pub fn add_point(&mut self, point: Point) {
        if self.points.len() < 3 {
            self.points.push(point);
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Complete the gesture once all three points are placed. With fewer
    /// points the set stays pending for the next click.
    pub fn finish(&mut self) -> Option<MeasurementShape> {
        if self.points.len() < 3 {
            return None;
        }
        let shape = MeasurementShape::Angle {
            p1: self.points[0],
            p2: self.points[1],
            p3: self.points[2],
        };
        self.points.clear();
        Some(shape)
    }
}

/// The active measurement gesture, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MeasureDraft {
    #[default]
    Idle,
    Line(LineDraft),
    Circle(CircleDraft),
    Angle(AngleDraft),
}

impl MeasureDraft {
    /// Whether a gesture is in progress (an angle draft counts while it
    /// holds pending points).
    pub fn is_active(&self) -> bool {
        match self {
            MeasureDraft::Idle => false,
            MeasureDraft::Line(_) | MeasureDraft::Circle(_) => true,
            MeasureDraft::Angle(draft) => !draft.points().is_empty(),
        }
    }

    /// Feed a pointer-down. `image_point` is the transformed position,
    /// `canvas_point` the raw container-local one.
    pub fn pointer_down(&mut self, tool: Tool, image_point: Point, canvas_point: (f32, f32)) {
        match tool {
            Tool::Line => *self = MeasureDraft::Line(LineDraft::new(image_point)),
            Tool::Circle => {
                *self = MeasureDraft::Circle(CircleDraft::new(image_point, canvas_point));
            }
            Tool::Angle => {
                if let MeasureDraft::Angle(draft) = self {
                    draft.add_point(image_point);
                } else {
                    let mut draft = AngleDraft::new();
                    draft.add_point(image_point);
                    *self = MeasureDraft::Angle(draft);
                }
            }
            _ => {}
        }
    }

    /// Feed a pointer-move while drawing.
    pub fn pointer_move(&mut self, image_point: Point, canvas_point: (f32, f32)) {
        match self {
            MeasureDraft::Line(draft) => draft.update(image_point),
            MeasureDraft::Circle(draft) => draft.update(canvas_point),
            _ => {}
        }
    }

    /// Feed a pointer-up, yielding a completed shape when the gesture
    /// finished. Degenerate gestures yield nothing and clear the draft.
    pub fn pointer_up(&mut self, scale: f32) -> Option<MeasurementShape> {
        match std::mem::take(self) {
            MeasureDraft::Idle => None,
            MeasureDraft::Line(draft) => draft.finish(),
            MeasureDraft::Circle(draft) => draft.finish(scale),
            MeasureDraft::Angle(mut draft) => {
                let shape = draft.finish();
                // Fewer than three points: keep accumulating.
                *self = MeasureDraft::Angle(draft);
                shape
            }
        }
    }

    /// The pointer left the surface: abandon a line/circle gesture.
    /// Pending angle points survive.
    pub fn pointer_leave(&mut self) {
        if matches!(self, MeasureDraft::Line(_) | MeasureDraft::Circle(_)) {
            log::debug!("Measurement gesture abandoned (pointer left surface)");
            *self = MeasureDraft::Idle;
        }
    }

    /// Drop any in-progress gesture (tool switch, reset).
    pub fn cancel(&mut self) {
        *self = MeasureDraft::Idle;
    }

    /// Preview shape for the rendering collaborator, if one is drawable.
    pub fn preview(&self, scale: f32) -> Option<MeasurementShape> {
        match self {
            MeasureDraft::Idle => None,
            MeasureDraft::Line(draft) => Some(MeasurementShape::Line {
                start: draft.start,
                end: draft.end,
            }),
            MeasureDraft::Circle(draft) => Some(MeasurementShape::Circle {
                center: draft.center,
                radius: draft.canvas_radius / scale,
            }),
            MeasureDraft::Angle(draft) => {
                let p = draft.points();
                if p.len() == 3 {
                    Some(MeasurementShape::Angle {
                        p1: p[0],
                        p2: p[1],
                        p3: p[2],
                    })
                } else {
                    None
                }
            }
        }
    }
}
