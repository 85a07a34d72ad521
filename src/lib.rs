//! # wavedft - discrete Fourier analysis of integer PCM signals
//!
//! Forward and inverse DFT of 8/16/32-bit integer sample streams, with three
//! interchangeable strategies that agree on every input they all accept:
//!
//! - **Direct**: `O(N^2)` summation, any length ([`dft`])
//! - **Fast**: iterative radix-2 FFT, power-of-two lengths only ([`fft`])
//! - **Parallel**: the direct transform split into disjoint bin ranges and
//!   evaluated on a thread pool ([`parallel`], feature `parallel`)
//!
//! Forward transforms keep the half spectrum `0..=N/2`; inverse transforms
//! mirror it back to `N` bins and round the real part to integers. Around the
//! transforms sit helpers for amplitude/frequency labelling ([`spectrum`]),
//! PCM narrowing ([`pcm`]), duration suggestions ([`pow2`]), synthetic
//! signals ([`generator`]) and WAV I/O (`wav`, feature `wav`).
//!
//! ## Cargo Features
//!
//! - `std` (default): standard library, `std::error::Error`, worker panics
//!   caught per partition
//! - `parallel` (default): rayon-backed [`parallel::ParallelDft`]
//! - `wav`: read and write WAV files through `hound`
//! - `verbose-logging`: `log::debug!` tracing of every transform
//! - `internal-tests`: property tests (`proptest`, `rand`)
//!
//! ## Example
//!
//! ```
//! use wavedft::{analyze, synthesize, FastDft, SampleFormat, Signal};
//!
//! let signal = Signal::new(vec![0, 3, 0, -3, 0, 3, 0, -3], 8, SampleFormat::I16);
//! let fast = FastDft::new();
//! let analysis = analyze(&signal, &fast).unwrap();
//! assert_eq!(analysis.peak().map(|(f, _)| f), Some(2.0));
//! let back = synthesize(&analysis.spectrum, &fast, true).unwrap();
//! assert_eq!(back.samples, signal.samples);
//! ```

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Debug tracing that compiles away unless `verbose-logging` is enabled.
macro_rules! verbose {
    ($($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        log::debug!($($arg)*);
    };
}

pub mod num;

/// Error type shared by every transform.
pub mod error;

/// Power-of-two checks and duration suggestions.
pub mod pow2;

/// Spectrum mirroring, amplitude and frequency labels.
pub mod spectrum;

pub mod progress;

/// Direct `O(N^2)` DFT for arbitrary lengths.
pub mod dft;

pub mod fft;

/// Partitioned direct DFT on a rayon thread pool.
#[cfg(feature = "parallel")]
pub mod parallel;

pub mod pcm;

pub mod generator;

pub mod signal;

pub mod strategy;

/// WAV file bridge.
#[cfg(feature = "wav")]
pub mod wav;

pub use dft::{DirectDft, Reconstruction, TwiddleTable};
pub use error::DftError;
pub use fft::{FastDft, FftPlanner};
pub use num::{Complex, Complex64, Float, Sample};
#[cfg(feature = "parallel")]
pub use parallel::ParallelDft;
pub use pow2::{is_power_of_two, suggest_duration, DurationSuggestion};
pub use progress::{Direction, Progress, ProgressObserver};
pub use signal::{SampleFormat, Signal};
pub use spectrum::Analysis;
pub use strategy::{analyze, synthesize, Strategy, Transform};
