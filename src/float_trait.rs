use conv::prelude::*;

/// Floating-point types the crate can fit in: `f32` and `f64`
///
/// The whole pipeline is generic over this trait, so single- and double-precision fits
/// share one code path and differ in results by rounding only.
pub trait Float:
    ndarray::NdFloat + num_traits::FloatConst + ApproxFrom<usize> + Send + Sync
{
    fn half() -> Self;

    fn two() -> Self;

    fn three() -> Self;

    fn from_f64(x: f64) -> Self;

    fn into_f64(self) -> f64;

    /// Numerically stable logistic sigmoid, `1 / (1 + exp(-x))`
    ///
    /// Saturates to exactly zero or unity for large arguments instead of producing NaN.
    #[inline]
    fn logistic(x: Self) -> Self {
        (Self::one() + Self::exp(-x)).recip()
    }
}

impl Float for f32 {
    #[inline]
    fn half() -> Self {
        0.5
    }

    #[inline]
    fn two() -> Self {
        2.0
    }

    #[inline]
    fn three() -> Self {
        3.0
    }

    #[inline]
    fn from_f64(x: f64) -> Self {
        x as f32
    }

    #[inline]
    fn into_f64(self) -> f64 {
        self as f64
    }
}

impl Float for f64 {
    #[inline]
    fn half() -> Self {
        0.5
    }

    #[inline]
    fn two() -> Self {
        2.0
    }

    #[inline]
    fn three() -> Self {
        3.0
    }

    #[inline]
    fn from_f64(x: f64) -> Self {
        x
    }

    #[inline]
    fn into_f64(self) -> f64 {
        self
    }
}
