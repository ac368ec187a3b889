/// Display multiplier for a probability expressed as a percentage.
/// `None` means the probability is shown unchanged.
///
/// The 30-35 and 35-40 bands share the same multiplier.
#[allow(clippy::if_same_then_else)]
pub fn confidence_multiplier(percent: f64) -> Option<f64> {
    if percent < 30.0 {
        Some(3.25)
    } else if (30.0..35.0).contains(&percent) {
        Some(2.5)
    } else if (35.0..=40.0).contains(&percent) {
        Some(2.5)
    } else {
        None
    }
}

/// Remaps a raw probability for display. Not a calibration.
///
/// Computed in f64 on the widened model score. An f32 `0.4` widens to
/// `0.40000000596...`, which lands above 40 and is shown unchanged.
pub fn adjust_confidence(probability: f64) -> f64 {
    match confidence_multiplier(probability * 100.0) {
        Some(multiplier) => (probability * multiplier).min(1.0),
        None => probability,
    }
}
