//! Half/full spectrum conversion and spectrum labelling.
//!
//! A real signal of `n` samples has a conjugate-symmetric spectrum, so the
//! forward transforms only produce the bins `0..=n/2` (DC up to Nyquist).
//! [`mirror`] rebuilds the full spectrum required by the inverse transforms.

use alloc::vec::Vec;

use crate::error::DftError;
use crate::num::Complex64;

/// Number of bins in the half spectrum of an `n`-sample signal.
#[inline]
pub fn half_len(n: usize) -> usize {
    n / 2 + 1
}

/// Append the reversed complex conjugates of the interior bins.
///
/// The first bin (DC) and the last bin of `half` (Nyquist for even lengths)
/// are not duplicated, so a half spectrum of `n/2 + 1` bins yields `n` bins.
///
/// # Errors
///
/// [`DftError::Shape`] if `half` holds fewer than two bins.
///
/// # Examples
/// ```
/// use wavedft::spectrum::mirror;
/// use wavedft::Complex64;
/// let half = [
///     Complex64::new(1.0, 0.0),
///     Complex64::new(2.0, 3.0),
///     Complex64::new(4.0, 0.0),
/// ];
/// let full = mirror(&half).unwrap();
/// assert_eq!(full.len(), 4);
/// assert_eq!(full[3], Complex64::new(2.0, -3.0));
/// ```
pub fn mirror(half: &[Complex64]) -> Result<Vec<Complex64>, DftError> {
    if half.len() < 2 {
        return Err(DftError::Shape {
            min: 2,
            found: half.len(),
        });
    }
    let interior = &half[1..half.len() - 1];
    let mut full = Vec::with_capacity(half.len() + interior.len());
    full.extend_from_slice(half);
    full.extend(interior.iter().rev().map(|c| c.conj()));
    Ok(full)
}

/// Keep the bins `0..=n/2` of a full `n`-bin spectrum.
pub fn truncate_to_half(mut full: Vec<Complex64>) -> Vec<Complex64> {
    let keep = half_len(full.len()).min(full.len());
    full.truncate(keep);
    full
}

/// Normalized amplitude and bin frequency for each bin of `half`.
///
/// `amplitude[i] = 2·|half[i]| / n_frames` and
/// `frequency[i] = i · rate / n_frames`.
///
/// # Errors
///
/// [`DftError::Shape`] if `n_frames` is zero.
pub fn amplitude_and_frequency(
    half: &[Complex64],
    rate: u32,
    n_frames: usize,
) -> Result<(Vec<f64>, Vec<f64>), DftError> {
    if n_frames == 0 {
        return Err(DftError::Shape { min: 1, found: 0 });
    }
    let n = n_frames as f64;
    let amplitude = half.iter().map(|c| 2.0 * c.norm() / n).collect();
    let frequency = (0..half.len())
        .map(|i| i as f64 * rate as f64 / n)
        .collect();
    Ok((amplitude, frequency))
}

/// `n_frames` evenly spaced instants from `0` to `n_frames / rate` seconds,
/// both ends included.
pub fn time_axis(n_frames: usize, rate: u32) -> Vec<f64> {
    if n_frames == 0 || rate == 0 {
        return Vec::new();
    }
    if n_frames == 1 {
        return alloc::vec![0.0];
    }
    let end = n_frames as f64 / rate as f64;
    let step = end / (n_frames - 1) as f64;
    (0..n_frames).map(|i| i as f64 * step).collect()
}

/// Result of a forward analysis: the half spectrum and its labelling.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub spectrum: Vec<Complex64>,
    pub amplitude: Vec<f64>,
    pub frequency: Vec<f64>,
}

impl Analysis {
    /// Label `spectrum`, the half spectrum of `n_frames` samples at `rate` Hz.
    pub fn new(spectrum: Vec<Complex64>, rate: u32, n_frames: usize) -> Result<Self, DftError> {
        let (amplitude, frequency) = amplitude_and_frequency(&spectrum, rate, n_frames)?;
        Ok(Self {
            spectrum,
            amplitude,
            frequency,
        })
    }

    /// Frequency and amplitude of the strongest non-DC bin.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.amplitude
            .iter()
            .zip(self.frequency.iter())
            .skip(1)
            .fold(None, |best: Option<(f64, f64)>, (&a, &f)| match best {
                Some((_, best_a)) if best_a >= a => best,
                _ => Some((f, a)),
            })
    }
}
