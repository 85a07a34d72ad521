//! Power-of-two checks and recording-length suggestions.
//!
//! The fast transform only accepts power-of-two lengths. When a signal is
//! captured in fixed-size chunks, the sample count is
//! `floor(rate / chunk * seconds) * chunk`; [`suggest_duration`] proposes the
//! two nearest durations that make that count a power of two. Picking one of
//! them is left to the caller.

use crate::error::DftError;

/// Durations are rounded up to this many steps per second (two decimals).
const DURATION_STEPS_PER_SECOND: f64 = 100.0;

/// Returns `true` iff `n` is a positive power of two.
#[inline]
pub fn is_power_of_two(n: i64) -> bool {
    n > 0 && n & (n - 1) == 0
}

/// Outcome of [`suggest_duration`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationSuggestion {
    /// The requested duration already yields a power-of-two sample count.
    Exact(f64),
    /// Durations bracketing the request whose sample counts are powers of two.
    Candidates { shorter: f64, longer: f64 },
}

impl DurationSuggestion {
    /// `true` when no adjustment is needed.
    pub fn is_exact(&self) -> bool {
        matches!(self, DurationSuggestion::Exact(_))
    }
}

/// Number of whole chunks captured in `seconds`, `None` past `usize::MAX`.
fn chunk_count(seconds: f64, rate: u32, chunk: u32) -> Option<usize> {
    let chunks = libm::floor(rate as f64 / chunk as f64 * seconds);
    (chunks < usize::MAX as f64).then_some(chunks as usize)
}

/// Number of samples captured in `seconds` when reading whole chunks.
///
/// `None` when the count does not fit in a `usize`.
pub fn frame_count(seconds: f64, rate: u32, chunk: u32) -> Option<usize> {
    if chunk == 0 {
        return Some(0);
    }
    chunk_count(seconds, rate, chunk)?.checked_mul(chunk as usize)
}

const TOO_LONG: DftError = DftError::InvalidParameter("duration too long");

pub(crate) fn validate_timing(seconds: f64, rate: u32, chunk: u32) -> Result<(), DftError> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(DftError::InvalidParameter(
            "duration must be finite and positive",
        ));
    }
    if rate == 0 {
        return Err(DftError::InvalidParameter("sample rate must be positive"));
    }
    if !is_power_of_two(chunk as i64) {
        return Err(DftError::InvalidParameter(
            "chunk size must be a power of two",
        ));
    }
    Ok(())
}

fn round_up_duration(seconds: f64) -> f64 {
    libm::ceil(seconds * DURATION_STEPS_PER_SECOND) / DURATION_STEPS_PER_SECOND
}

/// Suggest recording durations whose sample count is a power of two.
///
/// Returns [`DurationSuggestion::Exact`] with `seconds` unchanged when
/// [`frame_count`] is already a power of two. Otherwise the chunk count is
/// bracketed by `2^k` and `2^(k+1)` and both are converted back to seconds,
/// rounded up to two decimals. A chunk count of zero brackets as `k = 0`.
///
/// # Errors
///
/// [`DftError::InvalidParameter`] if `seconds` is not finite and positive,
/// `rate` is zero, `chunk` is not a power of two, or the sample count would
/// not fit in an `i64`.
///
/// # Examples
/// ```
/// use wavedft::pow2::{suggest_duration, DurationSuggestion};
/// match suggest_duration(1.0, 44100, 1024).unwrap() {
///     DurationSuggestion::Candidates { shorter, longer } => {
///         assert!((shorter - 0.75).abs() < 1e-9);
///         assert!((longer - 1.49).abs() < 1e-9);
///     }
///     DurationSuggestion::Exact(_) => unreachable!(),
/// }
/// ```
pub fn suggest_duration(
    seconds: f64,
    rate: u32,
    chunk: u32,
) -> Result<DurationSuggestion, DftError> {
    validate_timing(seconds, rate, chunk)?;
    let len = frame_count(seconds, rate, chunk)
        .and_then(|n| i64::try_from(n).ok())
        .ok_or(TOO_LONG)?;
    if is_power_of_two(len) {
        return Ok(DurationSuggestion::Exact(seconds));
    }
    let chunks_per_second = rate as f64 / chunk as f64;
    let k = chunk_count(seconds, rate, chunk).ok_or(TOO_LONG)?.max(1).ilog2();
    let lower = 1u64.checked_shl(k).ok_or(TOO_LONG)? as f64;
    let upper = 1u64.checked_shl(k + 1).ok_or(TOO_LONG)? as f64;
    Ok(DurationSuggestion::Candidates {
        shorter: round_up_duration(lower / chunks_per_second),
        longer: round_up_duration(upper / chunks_per_second),
    })
}
