//! Interchangeable transform strategies behind one interface.
//!
//! [`DirectDft`], [`FastDft`] and, with the `parallel` feature,
//! [`ParallelDft`](crate::parallel::ParallelDft) all implement [`Transform`]:
//! the forward direction yields the half spectrum `0..=N/2`, the inverse
//! direction accepts a half (mirrored) or full spectrum. Which strategy runs
//! is always the caller's choice; a [`DftError::NotPowerOfTwo`] from the fast
//! path is returned, never papered over.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::dft::{DirectDft, Reconstruction};
use crate::error::DftError;
use crate::fft::FastDft;
use crate::num::Complex64;
use crate::progress::ProgressObserver;
use crate::signal::Signal;
use crate::spectrum::Analysis;

pub trait Transform {
    /// Short human-readable name.
    fn name(&self) -> &'static str;
    /// Half spectrum of `signal`.
    fn forward_half(&self, signal: &[i32]) -> Result<Vec<Complex64>, DftError>;
    /// Inverse of `spectrum`, mirroring it first when `mirror_half` is set.
    fn inverse(&self, spectrum: &[Complex64], mirror_half: bool)
        -> Result<Reconstruction, DftError>;
}

impl Transform for DirectDft {
    fn name(&self) -> &'static str {
        "direct"
    }
    fn forward_half(&self, signal: &[i32]) -> Result<Vec<Complex64>, DftError> {
        self.forward(signal)
    }
    fn inverse(
        &self,
        spectrum: &[Complex64],
        mirror_half: bool,
    ) -> Result<Reconstruction, DftError> {
        DirectDft::inverse(self, spectrum, mirror_half)
    }
}

impl Transform for FastDft {
    fn name(&self) -> &'static str {
        "fast"
    }
    fn forward_half(&self, signal: &[i32]) -> Result<Vec<Complex64>, DftError> {
        FastDft::forward_half(self, signal)
    }
    fn inverse(
        &self,
        spectrum: &[Complex64],
        mirror_half: bool,
    ) -> Result<Reconstruction, DftError> {
        self.inverse_samples(spectrum, mirror_half)
    }
}

#[cfg(feature = "parallel")]
impl Transform for crate::parallel::ParallelDft {
    fn name(&self) -> &'static str {
        "parallel"
    }
    fn forward_half(&self, signal: &[i32]) -> Result<Vec<Complex64>, DftError> {
        self.forward(signal)
    }
    fn inverse(
        &self,
        spectrum: &[Complex64],
        mirror_half: bool,
    ) -> Result<Reconstruction, DftError> {
        crate::parallel::ParallelDft::inverse(self, spectrum, mirror_half)
    }
}

/// Selects one of the transform implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Direct,
    Fast,
    /// `threads: None` sizes the pool to the logical CPU count.
    #[cfg(feature = "parallel")]
    Parallel {
        partitions: usize,
        threads: Option<usize>,
    },
}

impl Strategy {
    /// Instantiate the selected transform.
    ///
    /// # Errors
    ///
    /// Only the parallel strategy can fail, see
    /// [`ParallelDft::with_threads`](crate::parallel::ParallelDft::with_threads).
    pub fn build(self) -> Result<Box<dyn Transform>, DftError> {
        self.build_observed(None)
    }

    /// Like [`build`](Self::build), attaching `observer` to the transforms
    /// that report progress (direct and parallel).
    pub fn build_observed(
        self,
        observer: Option<Arc<dyn ProgressObserver>>,
    ) -> Result<Box<dyn Transform>, DftError> {
        Ok(match self {
            Strategy::Direct => {
                let direct = DirectDft::new();
                Box::new(match observer {
                    Some(o) => direct.with_observer(o),
                    None => direct,
                })
            }
            Strategy::Fast => Box::new(FastDft::new()),
            #[cfg(feature = "parallel")]
            Strategy::Parallel {
                partitions,
                threads,
            } => {
                let pool = match threads {
                    Some(n) => crate::parallel::ParallelDft::with_threads(partitions, n)?,
                    None => crate::parallel::ParallelDft::new(partitions)?,
                };
                Box::new(match observer {
                    Some(o) => pool.with_observer(o),
                    None => pool,
                })
            }
        })
    }
}

/// Forward transform of `signal` with amplitude and frequency labels.
///
/// # Examples
/// ```
/// use wavedft::{analyze, DirectDft, SampleFormat, Signal};
/// let signal = Signal::new(vec![1, 2, 3, 4, 5, 6, 7, 8], 8, SampleFormat::I32);
/// let analysis = analyze(&signal, &DirectDft::new()).unwrap();
/// assert_eq!(analysis.frequency, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
/// ```
pub fn analyze(signal: &Signal, transform: &dyn Transform) -> Result<Analysis, DftError> {
    let spectrum = transform.forward_half(&signal.samples)?;
    verbose!(
        "{} analysis of {} samples at {} Hz",
        transform.name(),
        signal.len(),
        signal.sample_rate
    );
    Analysis::new(spectrum, signal.sample_rate, signal.len())
}

/// Inverse transform of a half spectrum (`mirror_half = true`) or a full one.
pub fn synthesize(
    spectrum: &[Complex64],
    transform: &dyn Transform,
    mirror_half: bool,
) -> Result<Reconstruction, DftError> {
    transform.inverse(spectrum, mirror_half)
}
