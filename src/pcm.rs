//! Narrowing reconstructed samples to 16-bit PCM.
//!
//! Out-of-range values are clamped to `[-32768, 32767]`; clamping is the
//! defined policy, so none of these functions fail.

use alloc::vec::Vec;

/// 16-bit samples together with the number of values that had to be clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcm16 {
    pub samples: Vec<i16>,
    pub clamped: usize,
}

impl Pcm16 {
    /// `true` when every input value fit without clamping.
    pub fn is_lossless(&self) -> bool {
        self.clamped == 0
    }
}

#[inline]
fn clamp_i64(x: i64) -> (i16, bool) {
    if x > i16::MAX as i64 {
        (i16::MAX, true)
    } else if x < i16::MIN as i64 {
        (i16::MIN, true)
    } else {
        (x as i16, false)
    }
}

/// Convert integer samples to `i16`, reporting how many were clamped.
pub fn convert_signed16<T>(samples: &[T]) -> Pcm16
where
    T: Copy + Into<i64>,
{
    let mut clamped = 0;
    let out = samples
        .iter()
        .map(|&s| {
            let (v, hit) = clamp_i64(s.into());
            clamped += hit as usize;
            v
        })
        .collect();
    verbose!(
        "pcm16: {} samples, {} clamped",
        samples.len(),
        clamped
    );
    Pcm16 {
        samples: out,
        clamped,
    }
}

/// Convert integer samples to `i16`, clamping out-of-range values.
///
/// # Examples
/// ```
/// assert_eq!(
///     wavedft::pcm::to_signed16(&[40000i32, -40000, 100]),
///     vec![32767, -32768, 100]
/// );
/// ```
pub fn to_signed16<T>(samples: &[T]) -> Vec<i16>
where
    T: Copy + Into<i64>,
{
    convert_signed16(samples).samples
}

/// Convert floating-point samples to `i16`: round half to even, then clamp.
/// NaN maps to 0.
pub fn to_signed16_f64(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&x| {
            let r = libm::rint(x);
            if r.is_nan() {
                0
            } else {
                r.clamp(i16::MIN as f64, i16::MAX as f64) as i16
            }
        })
        .collect()
}
