//! State-event detection.

/// Windows no longer than this are stepped over without integrating.
pub const EPS: f64 = 1e-13;

/// Returns `true` if any event indicator changed sign between two samples.
///
/// A crossing needs `previous[i] * current[i] < 0`, so touching or leaving
/// zero is not an event until the sign actually flips.
pub fn state_event_detected(previous: &[f64], current: &[f64]) -> bool {
    previous
        .iter()
        .zip(current)
        .any(|(before, after)| before * after < 0.0)
}
