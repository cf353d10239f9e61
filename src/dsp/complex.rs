//! Complex vector math on interleaved `[re, im]` buffers.
//!
//! A buffer of `n` complex numbers holds `2n` values. Fixed-point outputs
//! of magnitudes and products carry extra integer bits so that they cannot
//! overflow:
//!
//! | kernel | Q15 output | Q31 output |
//! |---|---|---|
//! | `cmplx_mag` | 2.14 | 2.30 |
//! | `cmplx_mag_squared` | 3.13 | 3.29 |
//! | `cmplx_mult_cmplx` | 3.13 | 3.29 |
//! | `cmplx_dot_prod` | 8.24 | 16.48 |

#[allow(unused_imports)]
use num_traits::float::Float;

use super::fast_math::{sqrt_q15, sqrt_q31};
use super::{Sample, Q15, Q31};

/// Formats with complex magnitude and product kernels.
pub trait ComplexMath: Sample {
    /// Format of the dot product result.
    type DotOutput: Copy;

    /// Dot product of two complex vectors, returned as `(re, im)`.
    fn dot_prod(a: &[Self], b: &[Self]) -> (Self::DotOutput, Self::DotOutput);

    /// Magnitude of `re + i im`.
    fn mag(re: Self, im: Self) -> Self;

    /// Squared magnitude of `re + i im`.
    fn mag_squared(re: Self, im: Self) -> Self;

    /// Product of `(a + i b)` and `(c + i d)`.
    fn mult(a: Self, b: Self, c: Self, d: Self) -> (Self, Self);
}

impl ComplexMath for f32 {
    type DotOutput = f32;

    fn dot_prod(a: &[f32], b: &[f32]) -> (f32, f32) {
        let mut re = 0.0;
        let mut im = 0.0;
        for (x, y) in a.chunks_exact(2).zip(b.chunks_exact(2)) {
            re += x[0] * y[0] - x[1] * y[1];
            im += x[0] * y[1] + x[1] * y[0];
        }
        (re, im)
    }

    #[inline]
    fn mag(re: f32, im: f32) -> f32 {
        (re * re + im * im).sqrt()
    }

    #[inline]
    fn mag_squared(re: f32, im: f32) -> f32 {
        re * re + im * im
    }

    #[inline]
    fn mult(a: f32, b: f32, c: f32, d: f32) -> (f32, f32) {
        (a * c - b * d, a * d + b * c)
    }
}

impl ComplexMath for Q15 {
    type DotOutput = Q31;

    fn dot_prod(a: &[Q15], b: &[Q15]) -> (Q31, Q31) {
        let mut re = 0i64;
        let mut im = 0i64;
        for (x, y) in a.chunks_exact(2).zip(b.chunks_exact(2)) {
            let (xr, xi, yr, yi) = (x[0] as i64, x[1] as i64, y[0] as i64, y[1] as i64);
            re += xr * yr - xi * yi;
            im += xr * yi + xi * yr;
        }
        ((re >> 6) as i32, (im >> 6) as i32)
    }

    #[inline]
    fn mag(re: Q15, im: Q15) -> Q15 {
        let sum = (re as i64 * re as i64 + im as i64 * im as i64) >> 17;
        // The sum is non-negative, so the root always exists.
        sqrt_q15(sum as i16).unwrap_or(0)
    }

    #[inline]
    fn mag_squared(re: Q15, im: Q15) -> Q15 {
        ((re as i64 * re as i64 + im as i64 * im as i64) >> 17) as i16
    }

    #[inline]
    fn mult(a: Q15, b: Q15, c: Q15, d: Q15) -> (Q15, Q15) {
        let (a, b, c, d) = (a as i32, b as i32, c as i32, d as i32);
        (
            (((a * c) >> 17) - ((b * d) >> 17)) as i16,
            (((a * d) >> 17) + ((b * c) >> 17)) as i16,
        )
    }
}

impl ComplexMath for Q31 {
    type DotOutput = i64;

    fn dot_prod(a: &[Q31], b: &[Q31]) -> (i64, i64) {
        let mut re = 0i64;
        let mut im = 0i64;
        for (x, y) in a.chunks_exact(2).zip(b.chunks_exact(2)) {
            let (xr, xi, yr, yi) = (x[0] as i64, x[1] as i64, y[0] as i64, y[1] as i64);
            re = re
                .wrapping_add((xr * yr) >> 14)
                .wrapping_sub((xi * yi) >> 14);
            im = im
                .wrapping_add((xr * yi) >> 14)
                .wrapping_add((xi * yr) >> 14);
        }
        (re, im)
    }

    #[inline]
    fn mag(re: Q31, im: Q31) -> Q31 {
        let sum = ((re as i64 * re as i64) >> 33) + ((im as i64 * im as i64) >> 33);
        sqrt_q31(sum as i32).unwrap_or(0)
    }

    #[inline]
    fn mag_squared(re: Q31, im: Q31) -> Q31 {
        (((re as i64 * re as i64) >> 33) + ((im as i64 * im as i64) >> 33)) as i32
    }

    #[inline]
    fn mult(a: Q31, b: Q31, c: Q31, d: Q31) -> (Q31, Q31) {
        let (a, b, c, d) = (a as i64, b as i64, c as i64, d as i64);
        (
            (((a * c) >> 33) - ((b * d) >> 33)) as i32,
            (((a * d) >> 33) + ((b * c) >> 33)) as i32,
        )
    }
}

/// Complex conjugate.
pub fn cmplx_conj<T: Sample>(src: &[T], dst: &mut [T]) {
    assert_eq!(src.len(), dst.len());
    for (d, s) in dst.chunks_exact_mut(2).zip(src.chunks_exact(2)) {
        d[0] = s[0];
        d[1] = s[1].sat_neg();
    }
}

/// Complex dot product, `(re, im)`.
pub fn cmplx_dot_prod<T: ComplexMath>(a: &[T], b: &[T]) -> (T::DotOutput, T::DotOutput) {
    assert_eq!(a.len(), b.len());
    T::dot_prod(a, b)
}

/// Complex magnitude. `dst` holds one value per complex input.
pub fn cmplx_mag<T: ComplexMath>(src: &[T], dst: &mut [T]) {
    assert_eq!(src.len(), 2 * dst.len());
    for (d, s) in dst.iter_mut().zip(src.chunks_exact(2)) {
        *d = T::mag(s[0], s[1]);
    }
}

/// Complex magnitude squared. `dst` holds one value per complex input.
pub fn cmplx_mag_squared<T: ComplexMath>(src: &[T], dst: &mut [T]) {
    assert_eq!(src.len(), 2 * dst.len());
    for (d, s) in dst.iter_mut().zip(src.chunks_exact(2)) {
        *d = T::mag_squared(s[0], s[1]);
    }
}

/// Element-wise complex product.
pub fn cmplx_mult_cmplx<T: ComplexMath>(a: &[T], b: &[T], dst: &mut [T]) {
    assert!(a.len() == b.len() && a.len() == dst.len());
    for ((d, x), y) in dst
        .chunks_exact_mut(2)
        .zip(a.chunks_exact(2))
        .zip(b.chunks_exact(2))
    {
        let (re, im) = T::mult(x[0], x[1], y[0], y[1]);
        d[0] = re;
        d[1] = im;
    }
}

/// Multiplies each complex value by a real value. `real` holds one value
/// per complex input.
pub fn cmplx_mult_real<T: Sample>(src: &[T], real: &[T], dst: &mut [T]) {
    assert!(src.len() == dst.len() && src.len() == 2 * real.len());
    for ((d, s), r) in dst.chunks_exact_mut(2).zip(src.chunks_exact(2)).zip(real) {
        d[0] = s[0].sat_mul(*r);
        d[1] = s[1].sat_mul(*r);
    }
}
