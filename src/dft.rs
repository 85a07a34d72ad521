//! Direct discrete Fourier transform by explicit summation.
//!
//! The forward transform evaluates
//! `X[k] = Σ_j x[j]·(cos(2πkj/N) − i·sin(2πkj/N))` for the half spectrum
//! `k ∈ 0..=N/2`; the inverse evaluates
//! `x[k] = Σ_j X[j]·(cos(2πkj/N) + i·sin(2πkj/N)) / N` for `k ∈ 0..N`.
//! Both cost O(N²). The per-bin kernels are shared with
//! [`parallel`](crate::parallel), which evaluates the same sums over
//! partitions of the output range.
//!
//! All exponentials come from a [`TwiddleTable`] of the `N` roots of unity,
//! indexed by `(k·j) mod N`, so no angle grows past `2π`.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::DftError;
use crate::num::{Complex64, Float, Sample};
use crate::progress::{Direction, Milestones, ProgressObserver};
use crate::spectrum::{half_len, mirror};

/// The `n` roots of unity `exp(-2πi·m/n)` for `m ∈ 0..n`.
#[derive(Debug, Clone)]
pub struct TwiddleTable {
    roots: Vec<Complex64>,
}

impl TwiddleTable {
    pub fn new(n: usize) -> Self {
        let step = -2.0 * <f64 as Float>::pi() / n.max(1) as f64;
        let roots = (0..n).map(|m| Complex64::expi(step * m as f64)).collect();
        Self { roots }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// `exp(-2πi·m/n)`; `m` must be below `n`.
    #[inline(always)]
    pub fn get(&self, m: usize) -> Complex64 {
        self.roots[m]
    }
}

/// Output of an inverse transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// Complex inverse transform; the imaginary parts are rounding noise for
    /// spectra of real signals.
    pub values: Vec<Complex64>,
    /// Real parts rounded half-to-even and narrowed to `i32` (saturating).
    pub samples: Vec<i32>,
}

impl Reconstruction {
    pub fn from_values(values: Vec<Complex64>) -> Self {
        let samples = values.iter().map(|c| round_to_i32(c.re)).collect();
        Self { values, samples }
    }
}

/// Round half to even, saturating at the `i32` bounds; NaN becomes 0.
#[inline]
pub fn round_to_i32(x: f64) -> i32 {
    libm::rint(x) as i32
}

pub(crate) fn to_f64_samples<S: Sample>(signal: &[S]) -> Vec<f64> {
    signal.iter().map(|&s| s.to_f64()).collect()
}

/// Forward bin `k` of `samples`.
#[inline]
pub(crate) fn forward_bin(samples: &[f64], table: &TwiddleTable, k: usize) -> Complex64 {
    let n = samples.len();
    let mut acc = Complex64::zero();
    let mut m = 0usize;
    for &x in samples {
        acc += table.get(m).scale(x);
        m += k;
        if m >= n {
            m -= n;
        }
    }
    acc
}

/// Inverse sample `k` of the full spectrum `spectrum`, including the `1/N`.
#[inline]
pub(crate) fn inverse_bin(spectrum: &[Complex64], table: &TwiddleTable, k: usize) -> Complex64 {
    let n = spectrum.len();
    let mut acc = Complex64::zero();
    let mut m = 0usize;
    for &c in spectrum {
        acc += c.mul(table.get(m).conj());
        m += k;
        if m >= n {
            m -= n;
        }
    }
    acc.scale(1.0 / n as f64)
}

pub(crate) fn check_signal_len(len: usize) -> Result<(), DftError> {
    if len == 0 {
        return Err(DftError::Shape { min: 1, found: 0 });
    }
    Ok(())
}

/// Validate a spectrum handed to an inverse transform and mirror it when
/// requested.
pub(crate) fn prepare_spectrum(
    spectrum: &[Complex64],
    mirror_half: bool,
) -> Result<Vec<Complex64>, DftError> {
    if spectrum.iter().any(|c| !c.is_finite()) {
        return Err(DftError::InvalidSpectrumType);
    }
    let full = if mirror_half {
        mirror(spectrum)?
    } else {
        spectrum.to_vec()
    };
    check_signal_len(full.len())?;
    Ok(full)
}

/// Direct transform with optional progress reporting.
#[derive(Clone, Default)]
pub struct DirectDft {
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl core::fmt::Debug for DirectDft {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DirectDft")
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl DirectDft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report progress at every tenth of the output range.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Half spectrum (`N/2 + 1` bins) of `signal`.
    ///
    /// # Errors
    ///
    /// [`DftError::Shape`] if `signal` is empty.
    pub fn forward<S: Sample>(&self, signal: &[S]) -> Result<Vec<Complex64>, DftError> {
        check_signal_len(signal.len())?;
        let samples = to_f64_samples(signal);
        let table = TwiddleTable::new(samples.len());
        let bins = half_len(samples.len());
        verbose!("direct forward: {} samples -> {} bins", samples.len(), bins);
        let milestones = Milestones::new(self.observer.as_deref(), Direction::Forward, bins);
        let mut out = Vec::with_capacity(bins);
        for k in 0..bins {
            out.push(forward_bin(&samples, &table, k));
            milestones.reached(k + 1);
        }
        Ok(out)
    }

    /// Inverse transform of `spectrum`.
    ///
    /// With `mirror_half` set, `spectrum` is a half spectrum and is mirrored
    /// first; otherwise it must already hold all `N` bins.
    ///
    /// # Errors
    ///
    /// [`DftError::InvalidSpectrumType`] for non-finite coefficients,
    /// [`DftError::Shape`] for an empty spectrum or a half spectrum shorter
    /// than two bins.
    pub fn inverse(
        &self,
        spectrum: &[Complex64],
        mirror_half: bool,
    ) -> Result<Reconstruction, DftError> {
        let full = prepare_spectrum(spectrum, mirror_half)?;
        let n = full.len();
        let table = TwiddleTable::new(n);
        verbose!("direct inverse: {} bins (mirrored: {})", n, mirror_half);
        let milestones = Milestones::new(self.observer.as_deref(), Direction::Inverse, n);
        let mut values = Vec::with_capacity(n);
        for k in 0..n {
            values.push(inverse_bin(&full, &table, k));
            milestones.reached(k + 1);
        }
        Ok(Reconstruction::from_values(values))
    }
}

/// Half spectrum of `signal` by direct summation.
///
/// # Examples
/// ```
/// let spectrum = wavedft::dft::forward(&[1i32, 2, 3, 4, 5, 6, 7, 8]).unwrap();
/// assert_eq!(spectrum.len(), 5);
/// assert!((spectrum[0].re - 36.0).abs() < 1e-9);
/// ```
pub fn forward<S: Sample>(signal: &[S]) -> Result<Vec<Complex64>, DftError> {
    DirectDft::new().forward(signal)
}

/// Inverse of `spectrum` by direct summation, mirroring it first when
/// `mirror_half` is set.
pub fn inverse(spectrum: &[Complex64], mirror_half: bool) -> Result<Reconstruction, DftError> {
    DirectDft::new().inverse(spectrum, mirror_half)
}
