//! Amplitude post-processing for synthesized PCM.
//!
//! Single-pass, stateless operations on mono f32 samples in [-1.0, 1.0].

/// Convert a decibel offset to a linear amplitude factor.
pub fn db_to_linear(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Scale sample amplitude by `gain_db` decibels, clamping the result to
/// [-1.0, 1.0] to prevent clipping on encode.
///
/// Callers skip this entirely for a 0.0 dB gain so the unadjusted path
/// stays byte-identical.
pub fn apply_gain(samples: &mut [f32], gain_db: f32) {
    let linear = db_to_linear(gain_db);
    for sample in samples.iter_mut() {
        *sample = (*sample * linear).clamp(-1.0, 1.0);
    }
}

/// Normalize the signal toward a target RMS level in dBFS.
///
/// Silent input (zero RMS) is returned unchanged.
pub fn normalize_rms(samples: &mut [f32], target_db: f32) {
    if samples.is_empty() {
        return;
    }

    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let current_rms = (sum_squares / samples.len() as f64).sqrt() as f32;
    if current_rms <= 0.0 {
        return;
    }

    let target_rms = db_to_linear(target_db);
    let factor = target_rms / current_rms;
    for sample in samples.iter_mut() {
        *sample = (*sample * factor).clamp(-1.0, 1.0);
    }
}
