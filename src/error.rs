use alloc::string::String;
use core::fmt;

/// Errors reported by the transforms and their helpers.
///
/// Every condition is local and recoverable: the transforms never switch
/// algorithms on their own, so a caller receiving
/// [`DftError::NotPowerOfTwo`] decides whether to fall back to the direct
/// transform or to adjust the recording length with
/// [`suggest_duration`](crate::pow2::suggest_duration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DftError {
    /// The fast transform was given a length that is not a power of two.
    NotPowerOfTwo { len: usize },
    /// The input is shorter than the operation requires (empty signal,
    /// spectrum too short to mirror).
    Shape { min: usize, found: usize },
    /// A spectrum coefficient is not a finite complex number.
    InvalidSpectrumType,
    /// A worker of the parallel transform failed; nothing was assembled.
    PartitionFailed {
        partition: usize,
        start: usize,
        end: usize,
        message: String,
    },
    /// A configuration value is out of range.
    InvalidParameter(&'static str),
    /// The worker pool could not be created.
    ThreadPool(String),
}

impl fmt::Display for DftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DftError::NotPowerOfTwo { len } => {
                write!(f, "length {len} is not a power of two")
            }
            DftError::Shape { min, found } => {
                write!(f, "expected at least {min} elements, found {found}")
            }
            DftError::InvalidSpectrumType => {
                write!(f, "spectrum must contain only finite complex values")
            }
            DftError::PartitionFailed {
                partition,
                start,
                end,
                message,
            } => write!(
                f,
                "partition {partition} (indices {start}..{end}) failed: {message}"
            ),
            DftError::InvalidParameter(what) => write!(f, "invalid parameter: {what}"),
            DftError::ThreadPool(e) => write!(f, "failed to build worker pool: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DftError {}
