//! Radix-2 fast Fourier transform.
//!
//! This module implements the
//! [Cooley–Tukey algorithm](https://en.wikipedia.org/wiki/Cooley%E2%80%93Tukey_FFT_algorithm)
//! for power-of-two lengths. The recursion "split into even and odd samples,
//! transform both halves, combine with `out[i] = E[i] + ω^i·O[i]` and
//! `out[i + n/2] = E[i] − ω^i·O[i]`" is evaluated bottom-up on a single
//! buffer: a bit-reversal permutation puts every sub-sequence in place, then
//! one butterfly pass per level combines them. A [`FftPlanner`] caches the
//! twiddle factors per length.
//!
//! Lengths that are not powers of two are rejected with
//! [`DftError::NotPowerOfTwo`]; nothing is padded or truncated.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;

use crate::dft::{prepare_spectrum, to_f64_samples, Reconstruction};
use crate::error::DftError;
use crate::num::{Complex64, Float, Sample};
use crate::pow2::is_power_of_two;
use crate::spectrum::truncate_to_half;

/// Caches the twiddle factors `exp(-2πi·m/n)`, `m ∈ 0..n/2`, per length.
#[derive(Debug, Default)]
pub struct FftPlanner {
    cache: HashMap<usize, Arc<[Complex64]>>,
}

impl FftPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_twiddles(&mut self, n: usize) -> Arc<[Complex64]> {
        self.cache
            .entry(n)
            .or_insert_with(|| {
                let step = -2.0 * <f64 as Float>::pi() / n as f64;
                (0..n / 2)
                    .map(|m| Complex64::expi(step * m as f64))
                    .collect::<Vec<_>>()
                    .into()
            })
            .clone()
    }

    /// Number of lengths with cached twiddles.
    pub fn cached_lengths(&self) -> usize {
        self.cache.len()
    }
}

fn check_len(n: usize) -> Result<(), DftError> {
    if !is_power_of_two(n as i64) {
        return Err(DftError::NotPowerOfTwo { len: n });
    }
    Ok(())
}

fn bit_reverse_permute(buf: &mut [Complex64]) {
    let n = buf.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            buf.swap(i, j);
        }
    }
}

/// Unscaled radix-2 transform; `inverse` conjugates the twiddles.
fn butterflies(buf: &mut [Complex64], twiddles: &[Complex64], inverse: bool) {
    let n = buf.len();
    if n <= 1 {
        return;
    }
    bit_reverse_permute(buf);
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let stride = n / len;
        for block in buf.chunks_exact_mut(len) {
            let (even, odd) = block.split_at_mut(half);
            for (i, (e, o)) in even.iter_mut().zip(odd.iter_mut()).enumerate() {
                let w = twiddles[i * stride];
                let w = if inverse { w.conj() } else { w };
                let u = *e;
                let v = o.mul(w);
                *e = u.add(v);
                *o = u.sub(v);
            }
        }
        len <<= 1;
    }
}

/// Radix-2 transform with a per-instance twiddle cache.
#[derive(Debug, Default)]
pub struct FastDft {
    planner: RefCell<FftPlanner>,
}

impl FastDft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_planner(planner: FftPlanner) -> Self {
        Self {
            planner: RefCell::new(planner),
        }
    }

    fn twiddles(&self, n: usize) -> Arc<[Complex64]> {
        self.planner.borrow_mut().get_twiddles(n)
    }

    /// In-place forward transform of a power-of-two-length buffer.
    pub fn fft(&self, buf: &mut [Complex64]) -> Result<(), DftError> {
        check_len(buf.len())?;
        let twiddles = self.twiddles(buf.len());
        butterflies(buf, &twiddles, false);
        Ok(())
    }

    /// In-place inverse transform, scaled by `1/n`.
    pub fn ifft(&self, buf: &mut [Complex64]) -> Result<(), DftError> {
        check_len(buf.len())?;
        let n = buf.len();
        let twiddles = self.twiddles(n);
        butterflies(buf, &twiddles, true);
        let scale = 1.0 / n as f64;
        for c in buf.iter_mut() {
            *c = c.scale(scale);
        }
        Ok(())
    }

    /// Full `N`-bin spectrum of `signal`.
    ///
    /// # Errors
    ///
    /// [`DftError::NotPowerOfTwo`] unless `signal.len()` is a power of two.
    pub fn forward<S: Sample>(&self, signal: &[S]) -> Result<Vec<Complex64>, DftError> {
        check_len(signal.len())?;
        verbose!("fast forward: {} samples", signal.len());
        let mut buf: Vec<Complex64> = to_f64_samples(signal)
            .into_iter()
            .map(Complex64::from_real)
            .collect();
        self.fft(&mut buf)?;
        Ok(buf)
    }

    /// [`forward`](Self::forward) truncated to the half spectrum `0..=N/2`.
    pub fn forward_half<S: Sample>(&self, signal: &[S]) -> Result<Vec<Complex64>, DftError> {
        self.forward(signal).map(truncate_to_half)
    }

    /// Inverse of a full power-of-two-length spectrum.
    ///
    /// # Errors
    ///
    /// [`DftError::NotPowerOfTwo`] for other lengths,
    /// [`DftError::InvalidSpectrumType`] for non-finite coefficients.
    pub fn inverse(&self, full: &[Complex64]) -> Result<Vec<Complex64>, DftError> {
        check_len(full.len())?;
        let mut buf = prepare_spectrum(full, false)?;
        verbose!("fast inverse: {} bins", buf.len());
        self.ifft(&mut buf)?;
        Ok(buf)
    }

    /// Inverse of `spectrum`, mirrored first when `mirror_half` is set, with
    /// the real parts rounded to samples.
    ///
    /// A half spectrum of `N/2 + 1` bins mirrors to `N` bins, so the
    /// power-of-two requirement applies to the mirrored length.
    pub fn inverse_samples(
        &self,
        spectrum: &[Complex64],
        mirror_half: bool,
    ) -> Result<Reconstruction, DftError> {
        let full = prepare_spectrum(spectrum, mirror_half)?;
        self.inverse(&full).map(Reconstruction::from_values)
    }
}

/// Full spectrum of `signal`; see [`FastDft::forward`].
pub fn forward<S: Sample>(signal: &[S]) -> Result<Vec<Complex64>, DftError> {
    FastDft::new().forward(signal)
}

/// Half spectrum of `signal`; see [`FastDft::forward_half`].
///
/// # Examples
/// ```
/// let fast = wavedft::fft::forward_half(&[1i32, 2, 3, 4, 5, 6, 7, 8]).unwrap();
/// let direct = wavedft::dft::forward(&[1i32, 2, 3, 4, 5, 6, 7, 8]).unwrap();
/// assert_eq!(fast.len(), 5);
/// for (a, b) in fast.iter().zip(direct.iter()) {
///     assert!((a.re - b.re).abs() < 1e-9 && (a.im - b.im).abs() < 1e-9);
/// }
/// ```
pub fn forward_half<S: Sample>(signal: &[S]) -> Result<Vec<Complex64>, DftError> {
    FastDft::new().forward_half(signal)
}

/// Inverse of a full spectrum; see [`FastDft::inverse`].
pub fn inverse(full: &[Complex64]) -> Result<Vec<Complex64>, DftError> {
    FastDft::new().inverse(full)
}

/// Inverse to samples; see [`FastDft::inverse_samples`].
pub fn inverse_samples(
    spectrum: &[Complex64],
    mirror_half: bool,
) -> Result<Reconstruction, DftError> {
    FastDft::new().inverse_samples(spectrum, mirror_half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn close(a: Complex64, b: Complex64, tol: f64) -> bool {
        (a.re - b.re).abs() <= tol && (a.im - b.im).abs() <= tol
    }

    #[test]
    fn test_fft_impulse() {
        let mut data = vec![Complex64::zero(); 8];
        data[0] = Complex64::new(1.0, 0.0);
        FastDft::new().fft(&mut data).unwrap();
        for c in &data {
            assert!(close(*c, Complex64::new(1.0, 0.0), 1e-12));
        }
    }

    #[test]
    fn test_fft_all_ones() {
        let out = forward(&[1i32; 16]).unwrap();
        assert!(close(out[0], Complex64::new(16.0, 0.0), 1e-12));
        for c in &out[1..] {
            assert!(close(*c, Complex64::zero(), 1e-12));
        }
    }

    #[test]
    fn test_single_sample_is_identity() {
        let out = forward(&[7i16]).unwrap();
        assert_eq!(out, vec![Complex64::new(7.0, 0.0)]);
    }

    #[test]
    fn test_ramp_matches_direct() {
        let signal = [1i32, 2, 3, 4, 5, 6, 7, 8];
        let fast = forward_half(&signal).unwrap();
        let direct = crate::dft::forward(&signal).unwrap();
        assert_eq!(fast.len(), 5);
        assert!(close(fast[0], Complex64::new(36.0, 0.0), 1e-12));
        for (a, b) in fast.iter().zip(direct.iter()) {
            assert!(close(*a, *b, 1e-9), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_hermitian_symmetry() {
        let out = forward(&[3i32, -7, 12, 0, 5, 5, -2, 9]).unwrap();
        for k in 1..8 {
            assert!(close(out[k], out[8 - k].conj(), 1e-9));
        }
    }

    #[test]
    fn test_not_power_of_two() {
        assert_eq!(
            forward(&[1i32, 2, 3]),
            Err(DftError::NotPowerOfTwo { len: 3 })
        );
        assert_eq!(forward::<i32>(&[]), Err(DftError::NotPowerOfTwo { len: 0 }));
        assert_eq!(
            inverse(&[Complex64::zero(); 6]),
            Err(DftError::NotPowerOfTwo { len: 6 })
        );
    }

    #[test]
    fn test_mirrored_half_of_nine_bins_is_sixteen() {
        let signal: Vec<i32> = (0..16).map(|i| (i * 37 % 23) - 11).collect();
        let half = forward_half(&signal).unwrap();
        assert_eq!(half.len(), 9);
        let rec = inverse_samples(&half, true).unwrap();
        assert_eq!(rec.samples, signal);
    }

    #[test]
    fn test_mirrored_length_must_be_power_of_two() {
        // 6 bins mirror to 10
        let half = vec![Complex64::new(1.0, 0.0); 6];
        assert_eq!(
            inverse_samples(&half, true),
            Err(DftError::NotPowerOfTwo { len: 10 })
        );
    }

    #[test]
    fn test_inverse_rejects_nan() {
        let mut full = vec![Complex64::zero(); 4];
        full[2] = Complex64::new(0.0, f64::INFINITY);
        assert_eq!(inverse(&full), Err(DftError::InvalidSpectrumType));
    }

    #[test]
    fn test_planner_reuses_twiddles() {
        let fft = FastDft::new();
        let mut a = vec![Complex64::new(1.0, 0.0); 32];
        let mut b = a.clone();
        fft.fft(&mut a).unwrap();
        fft.ifft(&mut b).unwrap();
        fft.fft(&mut b).unwrap();
        assert_eq!(fft.planner.borrow().cached_lengths(), 1);
    }
}
