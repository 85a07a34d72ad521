//! Scalar and complex number primitives shared by every transform.
//!
//! All transcendental functions route through [`libm`] so the crate builds
//! without `std`.

// Minimal float trait for the transforms (no_std, no num-traits)
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    fn sin_cos(self) -> (Self, Self);
    fn hypot(self, other: Self) -> Self;
    fn is_finite(self) -> bool;
    fn pi() -> Self;
}

impl Float for f64 {
    fn zero() -> Self {
        0.0
    }
    fn sin_cos(self) -> (Self, Self) {
        libm::sincos(self)
    }
    fn hypot(self, other: Self) -> Self {
        libm::hypot(self, other)
    }
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
    fn pi() -> Self {
        core::f64::consts::PI
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
    pub fn zero() -> Self {
        Self {
            re: T::zero(),
            im: T::zero(),
        }
    }
    /// Real value lifted onto the real axis.
    pub fn from_real(re: T) -> Self {
        Self { re, im: T::zero() }
    }
    /// `cos(theta) + i·sin(theta)`.
    #[inline(always)]
    pub fn expi(theta: T) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { re: cos, im: sin }
    }
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }
    #[inline(always)]
    pub fn scale(self, k: T) -> Self {
        Self {
            re: self.re * k,
            im: self.im * k,
        }
    }
    #[inline(always)]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }
    /// Magnitude `|z|`, computed without intermediate overflow.
    pub fn norm(self) -> T {
        self.re.hypot(self.im)
    }
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl<T: Float> core::ops::Neg for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl<T: Float> core::ops::Add for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Complex::<T>::add(self, other)
    }
}

impl<T: Float> core::ops::Sub for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Complex::<T>::sub(self, other)
    }
}

impl<T: Float> core::ops::Mul for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Complex::<T>::mul(self, other)
    }
}

impl<T: Float> core::ops::AddAssign for Complex<T> {
    #[inline(always)]
    fn add_assign(&mut self, other: Self) {
        *self = Complex::<T>::add(*self, other);
    }
}

pub type Complex64 = Complex<f64>;

/// Integer PCM sample accepted by the forward transforms.
///
/// Implemented for the three widths a WAV source can deliver (8, 16 and
/// 32 bit). Conversion to `f64` is exact for all of them.
pub trait Sample: Copy + Send + Sync + 'static {
    fn to_f64(self) -> f64;
}

impl Sample for i8 {
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for i16 {
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for i32 {
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }
}
