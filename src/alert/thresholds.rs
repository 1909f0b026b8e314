/// Inundation threshold evaluation.
///
/// Compares an elevation reading against the projected sea-level rise.
/// Stateless and without hysteresis: every reading is judged on its own, so
/// standing on low ground re-raises the alarm on every evaluation.

use crate::model::AlarmState;

/// Most extreme credible sea-level rise found for 2100, in meters.
pub const INUNDATION_THRESHOLD_M: f64 = 2.0;

/// `Alarm` iff the elevation is strictly below the threshold; an elevation
/// exactly at the threshold is still safe.
pub fn evaluate(elevation_m: f64, threshold_m: f64) -> AlarmState {
    if elevation_m < threshold_m {
        AlarmState::Alarm
    } else {
        AlarmState::Safe
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
