//! Statistics over a block of samples.
//!
//! Every function rejects an empty block with [`Error::LengthError`].
//! Variance and standard deviation use the `n - 1` denominator and need at
//! least two samples.

#[allow(unused_imports)]
use num_traits::float::Float;

use super::fast_math::{sqrt_q15, sqrt_q31};
use super::fixed::{clip_q63_to_q31, ssat64};
use super::{Sample, Q15, Q31, Q7};
use crate::error::{Error, Result};

/// Formats with mean, power and variance kernels.
pub trait Stats: Sample {
    /// Format of the sum of squares.
    type Power: Copy;

    /// Mean of a non-empty block.
    fn mean_of(src: &[Self]) -> Self;

    /// Sum of squares.
    fn power_of(src: &[Self]) -> Self::Power;

    /// Root mean square of a non-empty block.
    fn rms_of(src: &[Self]) -> Self;

    /// Variance of a block of at least two samples.
    fn var_of(src: &[Self]) -> Self;

    /// Square root of a non-negative value.
    fn root(x: Self) -> Self;
}

impl Stats for f32 {
    type Power = f32;

    fn mean_of(src: &[f32]) -> f32 {
        src.iter().sum::<f32>() / src.len() as f32
    }

    fn power_of(src: &[f32]) -> f32 {
        src.iter().map(|x| x * x).sum()
    }

    fn rms_of(src: &[f32]) -> f32 {
        (Self::power_of(src) / src.len() as f32).sqrt()
    }

    fn var_of(src: &[f32]) -> f32 {
        let mean = Self::mean_of(src);
        let sum: f32 = src.iter().map(|x| (x - mean) * (x - mean)).sum();
        sum / (src.len() - 1) as f32
    }

    fn root(x: f32) -> f32 {
        x.sqrt()
    }
}

impl Stats for Q7 {
    /// 18.14 format.
    type Power = i32;

    fn mean_of(src: &[Q7]) -> Q7 {
        let sum: i32 = src.iter().map(|x| *x as i32).sum();
        (sum / src.len() as i32) as i8
    }

    fn power_of(src: &[Q7]) -> i32 {
        src.iter()
            .fold(0i32, |acc, x| acc.wrapping_add(*x as i32 * *x as i32))
    }

    fn rms_of(src: &[Q7]) -> Q7 {
        let mean_square = Self::power_of(src) as i64 / src.len() as i64;
        let root = sqrt_q15(ssat64(mean_square << 1, 16) as i16).unwrap_or(0);
        (root >> 8) as i8
    }

    fn var_of(src: &[Q7]) -> Q7 {
        let (sum, sum_of_squares) = sums(src.iter().map(|x| *x as i64));
        ssat64(variance(src.len(), sum, sum_of_squares) >> 7, 8) as i8
    }

    fn root(x: Q7) -> Q7 {
        (sqrt_q15((x as i16) << 8).unwrap_or(0) >> 8) as i8
    }
}

impl Stats for Q15 {
    /// 34.30 format.
    type Power = i64;

    fn mean_of(src: &[Q15]) -> Q15 {
        let sum: i64 = src.iter().map(|x| *x as i64).sum();
        (sum / src.len() as i64) as i16
    }

    fn power_of(src: &[Q15]) -> i64 {
        src.iter().map(|x| *x as i64 * *x as i64).sum()
    }

    fn rms_of(src: &[Q15]) -> Q15 {
        let mean_square = Self::power_of(src) / src.len() as i64;
        sqrt_q15(ssat64(mean_square >> 15, 16) as i16).unwrap_or(0)
    }

    fn var_of(src: &[Q15]) -> Q15 {
        let (sum, sum_of_squares) = sums(src.iter().map(|x| *x as i64));
        ssat64(variance(src.len(), sum, sum_of_squares) >> 15, 16) as i16
    }

    fn root(x: Q15) -> Q15 {
        sqrt_q15(x).unwrap_or(0)
    }
}

impl Stats for Q31 {
    /// 16.48 format, each square is truncated to 2.48 first.
    type Power = i64;

    fn mean_of(src: &[Q31]) -> Q31 {
        let sum: i64 = src.iter().map(|x| *x as i64).sum();
        (sum / src.len() as i64) as i32
    }

    fn power_of(src: &[Q31]) -> i64 {
        src.iter().fold(0i64, |acc, x| {
            acc.wrapping_add((*x as i64 * *x as i64) >> 14)
        })
    }

    fn rms_of(src: &[Q31]) -> Q31 {
        let mean_square = src
            .iter()
            .fold(0i128, |acc, x| acc + (*x as i64 * *x as i64) as i128)
            / src.len() as i128;
        sqrt_q31(clip_q63_to_q31((mean_square >> 31) as i64)).unwrap_or(0)
    }

    fn var_of(src: &[Q31]) -> Q31 {
        // Inputs are scaled to 9.23 first.
        let (sum, sum_of_squares) = sums(src.iter().map(|x| (*x >> 8) as i64));
        clip_q63_to_q31(variance(src.len(), sum, sum_of_squares) >> 15)
    }

    fn root(x: Q31) -> Q31 {
        sqrt_q31(x).unwrap_or(0)
    }
}

// Sum and sum of squares of a block, wide enough for any slice length.
fn sums(src: impl Iterator<Item = i64>) -> (i128, i128) {
    src.fold((0, 0), |(sum, squares), x| {
        (sum + x as i128, squares + (x * x) as i128)
    })
}

// `(sum_of_squares - sum^2 / n) / (n - 1)`, computed as the difference of
// the two quotients. The result is never negative.
fn variance(len: usize, sum: i128, sum_of_squares: i128) -> i64 {
    let n = len as i128;
    let mean_of_squares = sum_of_squares / (n - 1);
    let square_of_mean = sum * sum / (n * (n - 1));
    (mean_of_squares - square_of_mean).clamp(0, i64::MAX as i128) as i64
}

fn check_len<T>(src: &[T], min: usize) -> Result<()> {
    if src.len() < min {
        log::debug!("statistics need {} samples, got {}", min, src.len());
        return Err(Error::LengthError);
    }
    Ok(())
}

/// Largest value and the index of its first occurrence.
pub fn max<T: Sample>(src: &[T]) -> Result<(T, usize)> {
    check_len(src, 1)?;
    let mut best = (src[0], 0);
    for (i, x) in src.iter().enumerate().skip(1) {
        if *x > best.0 {
            best = (*x, i);
        }
    }
    Ok(best)
}

/// Smallest value and the index of its first occurrence.
pub fn min<T: Sample>(src: &[T]) -> Result<(T, usize)> {
    check_len(src, 1)?;
    let mut best = (src[0], 0);
    for (i, x) in src.iter().enumerate().skip(1) {
        if *x < best.0 {
            best = (*x, i);
        }
    }
    Ok(best)
}

/// Arithmetic mean.
pub fn mean<T: Stats>(src: &[T]) -> Result<T> {
    check_len(src, 1)?;
    Ok(T::mean_of(src))
}

/// Sum of squares, in the wide format of the sample type.
pub fn power<T: Stats>(src: &[T]) -> Result<T::Power> {
    check_len(src, 1)?;
    Ok(T::power_of(src))
}

/// Root mean square.
pub fn rms<T: Stats>(src: &[T]) -> Result<T> {
    check_len(src, 1)?;
    Ok(T::rms_of(src))
}

/// Sample variance.
pub fn var<T: Stats>(src: &[T]) -> Result<T> {
    check_len(src, 2)?;
    Ok(T::var_of(src))
}

/// Sample standard deviation.
pub fn std<T: Stats>(src: &[T]) -> Result<T> {
    check_len(src, 2)?;
    Ok(T::root(T::var_of(src)))
}
