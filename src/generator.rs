//! Synthetic test signals built from pure tones.
//!
//! Signals are sampled at [`frame_count`](crate::pow2::frame_count) instants
//! spread evenly over `[0, seconds]` (both ends included), normalized by
//! their peak magnitude and scaled to the full 16-bit range.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::DftError;
use crate::num::Float;
use crate::pow2::{frame_count, validate_timing};

/// Largest magnitude of a normalized 16-bit sample.
const FULL_SCALE: f64 = i16::MAX as f64;

fn tone(frequency: f64, t: f64) -> f64 {
    libm::sin(2.0 * <f64 as Float>::pi() * frequency * t)
}

/// Sample instants for `seconds` (rounded to two decimals) at `rate`,
/// captured in whole chunks of `chunk` frames.
fn sample_times(seconds: f64, rate: u32, chunk: u32) -> Result<Vec<f64>, DftError> {
    validate_timing(seconds, rate, chunk)?;
    let seconds = libm::round(seconds * 100.0) / 100.0;
    let n = frame_count(seconds, rate, chunk)
        .ok_or(DftError::InvalidParameter("duration too long"))?;
    match n {
        0 => Err(DftError::Shape { min: 1, found: 0 }),
        1 => Ok(vec![0.0]),
        _ => {
            let step = seconds / (n - 1) as f64;
            Ok((0..n).map(|i| i as f64 * step).collect())
        }
    }
}

fn normalize(data: &[f64]) -> Vec<i16> {
    let peak = data.iter().fold(0.0f64, |m, &x| m.max(libm::fabs(x)));
    if peak == 0.0 {
        return vec![0; data.len()];
    }
    let scale = FULL_SCALE / peak;
    data.iter().map(|&x| (x * scale) as i16).collect()
}

fn check_frequencies(frequencies: &[f64]) -> Result<(), DftError> {
    if frequencies.is_empty() {
        return Err(DftError::InvalidParameter("at least one frequency is required"));
    }
    if frequencies.iter().any(|f| !f.is_finite()) {
        return Err(DftError::InvalidParameter("frequencies must be finite"));
    }
    Ok(())
}

/// Superposition of unit sines at every frequency in `frequencies`.
///
/// # Errors
///
/// [`DftError::InvalidParameter`] for an empty or non-finite frequency list
/// or invalid timing parameters, [`DftError::Shape`] when the duration is
/// shorter than one chunk.
pub fn sum_of_tones(
    frequencies: &[f64],
    seconds: f64,
    rate: u32,
    chunk: u32,
) -> Result<Vec<i16>, DftError> {
    check_frequencies(frequencies)?;
    let times = sample_times(seconds, rate, chunk)?;
    let data: Vec<f64> = times
        .iter()
        .map(|&t| frequencies.iter().map(|&f| tone(f, t)).sum::<f64>())
        .collect();
    Ok(normalize(&data))
}

/// One tone after another, each filling an equal share of the signal; the
/// last tone also fills the remainder. A frequency of `0` is silence.
///
/// # Errors
///
/// As [`sum_of_tones`].
pub fn sequence_of_tones(
    frequencies: &[f64],
    seconds: f64,
    rate: u32,
    chunk: u32,
) -> Result<Vec<i16>, DftError> {
    check_frequencies(frequencies)?;
    let times = sample_times(seconds, rate, chunk)?;
    let segment = times.len() / frequencies.len();
    let last = frequencies.len() - 1;
    let data: Vec<f64> = times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let idx = if segment == 0 { last } else { (i / segment).min(last) };
            tone(frequencies[idx], t)
        })
        .collect();
    Ok(normalize(&data))
}
