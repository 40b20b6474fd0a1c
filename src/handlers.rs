//! Message handlers for the viewer.
//!
//! Each handler processes one category of messages, keeping the
//! [`ViewerState::update`] dispatch clean. Handlers that need the
//! coordinate mapping no-op while the surface or image is missing;
//! pointer events can arrive before either is mounted.

use crate::crop;
use crate::measurement::{Measurement, MeasurementShape};
use crate::message::Message;
use crate::tools::Tool;
use crate::viewer::ViewerState;

/// Apply one message to the viewer state.
pub fn handle_message(state: &mut ViewerState, message: Message) {
    match message {
        Message::ToolSelected(tool) => handle_tool_select(state, tool),
        Message::ZoomIn => state.viewport.zoom_in_step(),
        Message::ZoomOut => state.viewport.zoom_out_step(),
        Message::Reset => handle_reset(state),
        Message::Undo => handle_undo(state),
        Message::Redo => handle_redo(state),
        Message::OpenAdjustments => state.adjustments_open = true,
        Message::CloseAdjustments => state.adjustments_open = false,

        Message::Wheel {
            cursor_x,
            cursor_y,
            delta_y,
            zoom_modifier,
        } => handle_wheel(state, (cursor_x, cursor_y), delta_y, zoom_modifier),
        Message::PointerDown { x, y } => handle_pointer_down(state, (x, y)),
        Message::PointerMoved { x, y } => handle_pointer_moved(state, (x, y)),
        Message::PointerUp { x, y } => handle_pointer_up(state, (x, y)),
        Message::PointerLeft => handle_pointer_left(state),
        Message::SurfaceResized { width, height } => {
            state.container = (width, height);
        }

        Message::DeleteMeasurement(id) => handle_delete(state, &id),

        Message::BrightnessChanged(value) => state.adjustments.set_brightness(value),
        Message::ContrastChanged(value) => state.adjustments.set_contrast(value),
        Message::ResetAdjustments => state.adjustments.reset(),

        Message::CalibrationAccepted(known_distance) => state.calibration.accept(known_distance),
        Message::CalibrationCancelled => state.calibration.cancel(),

        Message::CropApplied => handle_crop_applied(state),
        Message::CropCancelled => handle_crop_cancelled(state),
    }
}

/// Handle tool selection. Switching tools abandons any in-progress
/// gesture; the measurement list itself is untouched.
fn handle_tool_select(state: &mut ViewerState, tool: Tool) {
    log::debug!("Tool selected: {}", tool.id());
    state.selected_tool = Some(tool);
    state.draft.cancel();
    state.pan.end();
    if tool != Tool::Crop {
        state.crop_draft.clear();
    }
}

/// Handle a wheel gesture. Only a modifier-held wheel zooms; otherwise
/// the event is left to the surrounding page to scroll.
fn handle_wheel(state: &mut ViewerState, cursor: (f32, f32), delta_y: f32, zoom_modifier: bool) {
    if !zoom_modifier {
        return;
    }
    let Some(metrics) = state.metrics() else {
        return;
    };
    state.viewport.zoom_at(cursor, delta_y, &metrics);
}

fn handle_pointer_down(state: &mut ViewerState, pos: (f32, f32)) {
    match state.selected_tool {
        Some(Tool::Pan) => state.pan.start(pos, &state.viewport),
        Some(Tool::Crop) => state.crop_draft.begin(pos),
        Some(tool) if tool.is_measure() => {
            let Some(metrics) = state.metrics() else {
                return;
            };
            let image_point = metrics.to_image(pos, state.viewport.scale, state.viewport.offset());
            state.draft.pointer_down(tool, image_point, pos);
        }
        _ => {}
    }
}

fn handle_pointer_moved(state: &mut ViewerState, pos: (f32, f32)) {
    match state.selected_tool {
        Some(Tool::Pan) => {
            let Some(metrics) = state.metrics() else {
                return;
            };
            if let Some(offset) = state.pan.update(pos) {
                state.viewport.set_offset(offset, &metrics);
            }
        }
        Some(Tool::Crop) => state.crop_draft.update(pos),
        Some(tool) if tool.is_measure() => {
            let Some(metrics) = state.metrics() else {
                return;
            };
            let image_point = metrics.to_image(pos, state.viewport.scale, state.viewport.offset());
            state.draft.pointer_move(image_point, pos);
        }
        _ => {}
    }
}

fn handle_pointer_up(state: &mut ViewerState, _pos: (f32, f32)) {
    state.pan.end();
    state.crop_draft.end_drag();
    if let Some(shape) = state.draft.pointer_up(state.viewport.scale) {
        complete_measurement(state, shape);
    }
}

/// The pointer left the surface: end drags and abandon unfinished
/// line/circle gestures. Pending angle points stay for the next click.
fn handle_pointer_left(state: &mut ViewerState) {
    state.pan.end();
    state.crop_draft.end_drag();
    state.draft.pointer_leave();
}

/// Mint a measurement record from a completed gesture, append it, and
/// record a history snapshot. The very first completion may open the
/// calibration prompt.
fn complete_measurement(state: &mut ViewerState, shape: MeasurementShape) {
    let count_before = state.measurements.len();
    let (id, timestamp_ms) = state.ids.next();
    let value = shape.format_value(state.calibration.pixels_per_mm());
    log::info!("Measurement completed: {} = {}", shape.kind_name(), value);

    state.measurements.push(Measurement {
        id,
        value,
        shape,
        timestamp_ms,
    });
    state.history.record(state.measurements.clone());
    state.calibration.on_measurement_completed(count_before);
}

fn handle_delete(state: &mut ViewerState, id: &str) {
    let before = state.measurements.len();
    state.measurements.retain(|m| m.id != id);
    if state.measurements.len() == before {
        log::warn!("Delete requested for unknown measurement id {id}");
        return;
    }
    log::debug!("Measurement {id} deleted");
    state.history.record(state.measurements.clone());
}

fn handle_undo(state: &mut ViewerState) {
    if let Some(set) = state.history.undo() {
        state.measurements = set.to_vec();
    }
}

fn handle_redo(state: &mut ViewerState) {
    if let Some(set) = state.history.redo() {
        state.measurements = set.to_vec();
    }
}

/// Full reset: view transform, crop, measurements, history, and the
/// calibration prompt all return to their initial states.
fn handle_reset(state: &mut ViewerState) {
    state.viewport.reset();
    state.selected_tool = None;
    state.pan.end();
    state.draft.cancel();
    state.crop_draft.clear();
    state.measurements.clear();
    state.history.reset();
    state.calibration.reset();
    if let Some(image) = state.image.as_mut() {
        if image.cropped {
            image.current = image.original.clone();
            image.cropped = false;
        }
    }
    log::debug!("Viewer reset");
}

/// Apply the selected crop box to the backing raster. The conversion can
/// fail (degenerate or out-of-image selection); that leaves everything
/// unchanged apart from a log line.
fn handle_crop_applied(state: &mut ViewerState) {
    let Some(metrics) = state.metrics() else {
        return;
    };
    let region = match crop::to_natural_region(state.crop_draft.region(), &metrics, &state.viewport)
    {
        Ok(region) => region,
        Err(err) => {
            log::warn!("Crop not applied: {err}");
            return;
        }
    };

    if let Some(image) = state.image.as_mut() {
        image.current = crop::apply(&image.current, region);
        image.cropped = true;
        log::info!(
            "Cropped to {}x{} px at ({}, {})",
            region.width,
            region.height,
            region.x,
            region.y
        );
    }
    state.crop_draft.clear();
    state.selected_tool = None;
    state.viewport.reset();
}

fn handle_crop_cancelled(state: &mut ViewerState) {
    state.crop_draft.clear();
    state.selected_tool = None;
}
