//! mediview - medical image viewer core
//!
//! Pan/zoom, crop, brightness/contrast, calibrated geometric
//! measurements (line, circle, angle) with undo/redo history, and a
//! PNG export that flattens the measurement overlay onto the image.
//! Rendering chrome lives outside this crate and drives it through
//! [`Message`] values.

pub mod adjustments;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod crop;
pub mod error;
pub mod export;
pub mod geometry;
mod handlers;
pub mod history;
pub mod measurement;
pub mod message;
pub mod tools;
pub mod transform;
pub mod viewer;
pub mod viewport;

pub use error::ViewerError;
pub use measurement::{Measurement, MeasurementShape};
pub use message::Message;
pub use tools::Tool;
pub use viewer::ViewerState;
