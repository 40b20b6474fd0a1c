//! Pixel-to-millimeter calibration state.
//!
//! The calibration prompt opens exactly once: when the first measurement
//! completes while the ratio is still unset. Accepting or canceling
//! resolves it for the lifetime of the loaded image; it is never asked
//! again, even if the measurement set later empties out.

use crate::constants::PIXEL_TO_MM_RATIO;

/// Calibration state for the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Calibration {
    /// Pixels per millimeter; 0 means uncalibrated.
    pixels_per_mm: f32,
    /// Whether the calibration prompt is open.
    is_calibrating: bool,
    /// Latched once the prompt has been shown.
    prompted: bool,
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current ratio; 0 while uncalibrated.
    pub fn pixels_per_mm(&self) -> f32 {
        self.pixels_per_mm
    }

    /// Whether the calibration prompt should be shown.
    pub fn is_calibrating(&self) -> bool {
        self.is_calibrating
    }

    /// Whether a ratio has been resolved.
    pub fn is_calibrated(&self) -> bool {
        self.pixels_per_mm > 0.0
    }

    /// Notify that a measurement just completed. Opens the prompt only on
    /// the 0 -> 1 transition of the completed-measurement count while the
    /// ratio is unset, and only once ever.
    pub fn on_measurement_completed(&mut self, count_before: usize) {
        if count_before == 0 && self.pixels_per_mm == 0.0 && !self.prompted {
            self.is_calibrating = true;
            self.prompted = true;
            log::debug!("Calibration prompt opened");
        }
    }

    /// Accept calibration against a known distance in millimeters.
    ///
    /// The ratio is fixed at 1/0.4 px per mm; the entered distance is
    /// recorded in the log only. TODO: derive the ratio from
    /// `known_distance_mm` and the calibration line once product settles
    /// the intended behavior.
    pub fn accept(&mut self, known_distance_mm: f32) {
        self.pixels_per_mm = 1.0 / PIXEL_TO_MM_RATIO;
        self.is_calibrating = false;
        log::debug!(
            "Calibration accepted (known distance {:.1} mm, ratio {:.2} px/mm)",
            known_distance_mm,
            self.pixels_per_mm
        );
    }

    /// Dismiss the prompt without setting a ratio. Measurements keep
    /// reading in raw pixels and the prompt does not return.
    pub fn cancel(&mut self) {
        self.is_calibrating = false;
        log::debug!("Calibration cancelled, staying uncalibrated");
    }

    /// Discard calibration (image replaced or viewer fully reset).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
