//! Fast Fourier and cosine transforms.
//!
//! Complex data is interleaved `[re, im]`. Floating point transforms are
//! unscaled in the forward direction. Fixed-point transforms divide by four
//! in every radix-4 stage, so a forward transform of length `N` yields the
//! DFT divided by `N`. Their inverse transforms compute the inverse DFT,
//! including its `1 / N` factor.

use alloc::boxed::Box;
use alloc::vec;

#[allow(unused_imports)]
use num_traits::float::Float;

use super::{Sample, Q15, Q31};

pub mod cfft;
pub mod dct4;
pub mod rfft;

pub use cfft::{digit_reverse, Cfft, CFFT_LENGTHS};
pub use dct4::{Dct4, DCT4_LENGTHS};
pub use rfft::{Rfft, RFFT_LENGTHS};

/// Formats with FFT butterfly arithmetic.
pub trait FftSample: Sample {
    /// Converts a twiddle factor in `[-1, 1]`, saturating at the top.
    fn twiddle(value: f64) -> Self;

    /// Input scaling of every radix-4 stage.
    fn stage_scale(x: Self) -> Self;

    /// Input scaling of the real FFT split step.
    fn split_scale(x: Self) -> Self;

    /// Halves a value.
    fn half(x: Self) -> Self;

    /// Headroom taken before the DCT pre-rotation.
    fn headroom(x: Self) -> Self;

    /// Floating point formats multiply by `factor`, fixed-point formats
    /// keep their scaling.
    fn normalize(x: Self, factor: f32) -> Self;

    /// `(re + i im) * (c - i s)`
    fn mul_conj(re: Self, im: Self, c: Self, s: Self) -> (Self, Self);
}

impl FftSample for f32 {
    #[inline]
    fn twiddle(value: f64) -> f32 {
        value as f32
    }

    #[inline]
    fn stage_scale(x: f32) -> f32 {
        x
    }

    #[inline]
    fn split_scale(x: f32) -> f32 {
        0.5 * x
    }

    #[inline]
    fn half(x: f32) -> f32 {
        0.5 * x
    }

    #[inline]
    fn headroom(x: f32) -> f32 {
        x
    }

    #[inline]
    fn normalize(x: f32, factor: f32) -> f32 {
        x * factor
    }

    #[inline]
    fn mul_conj(re: f32, im: f32, c: f32, s: f32) -> (f32, f32) {
        (re * c + im * s, im * c - re * s)
    }
}

macro_rules! fft_fixed {
    ($ty:ty, $scale:expr) => {
        impl FftSample for $ty {
            #[inline]
            fn twiddle(value: f64) -> $ty {
                (value * $scale)
                    .round()
                    .clamp(<$ty>::MIN as f64, <$ty>::MAX as f64) as $ty
            }

            #[inline]
            fn stage_scale(x: $ty) -> $ty {
                x >> 2
            }

            #[inline]
            fn split_scale(x: $ty) -> $ty {
                x >> 2
            }

            #[inline]
            fn half(x: $ty) -> $ty {
                x >> 1
            }

            #[inline]
            fn headroom(x: $ty) -> $ty {
                x >> 1
            }

            #[inline]
            fn normalize(x: $ty, _factor: f32) -> $ty {
                x
            }

            #[inline]
            fn mul_conj(re: $ty, im: $ty, c: $ty, s: $ty) -> ($ty, $ty) {
                let (re, im, c, s) = (re as i128, im as i128, c as i128, s as i128);
                let shift = <$ty as Sample>::FRAC_BITS;
                let clamp = |x: i128| (x >> shift).clamp(<$ty>::MIN as i128, <$ty>::MAX as i128) as $ty;
                (clamp(re * c + im * s), clamp(im * c - re * s))
            }
        }
    };
}

fft_fixed!(Q15, 32768.0);
fft_fixed!(Q31, 2147483648.0);

/// Table of `cos(angle(k))` and `sin(angle(k))` for `k` in `0..count`.
pub(crate) fn rotation_table<T: FftSample>(count: usize, angle: impl Fn(usize) -> f64) -> Box<[T]> {
    let mut table = vec![T::ZERO; 2 * count];
    for (k, entry) in table.chunks_exact_mut(2).enumerate() {
        let theta = angle(k);
        entry[0] = T::twiddle(theta.cos());
        entry[1] = T::twiddle(theta.sin());
    }
    table.into_boxed_slice()
}
