//! Element-wise vector arithmetic.
//!
//! Paired slices must have equal lengths. Fixed-point results saturate.

use super::{Sample, Q15, Q31, Q7};

/// `dst[n] = |src[n]|`
pub fn abs<T: Sample>(src: &[T], dst: &mut [T]) {
    assert_eq!(src.len(), dst.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s.sat_abs();
    }
}

/// `dst[n] = a[n] + b[n]`
pub fn add<T: Sample>(a: &[T], b: &[T], dst: &mut [T]) {
    assert!(a.len() == b.len() && a.len() == dst.len());
    for ((d, a), b) in dst.iter_mut().zip(a).zip(b) {
        *d = a.sat_add(*b);
    }
}

/// `dst[n] = a[n] - b[n]`
pub fn sub<T: Sample>(a: &[T], b: &[T], dst: &mut [T]) {
    assert!(a.len() == b.len() && a.len() == dst.len());
    for ((d, a), b) in dst.iter_mut().zip(a).zip(b) {
        *d = a.sat_sub(*b);
    }
}

/// `dst[n] = a[n] * b[n]`
pub fn mult<T: Sample>(a: &[T], b: &[T], dst: &mut [T]) {
    assert!(a.len() == b.len() && a.len() == dst.len());
    for ((d, a), b) in dst.iter_mut().zip(a).zip(b) {
        *d = a.sat_mul(*b);
    }
}

/// `dst[n] = -src[n]`
pub fn negate<T: Sample>(src: &[T], dst: &mut [T]) {
    assert_eq!(src.len(), dst.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s.sat_neg();
    }
}

/// `dst[n] = src[n] + offset`
pub fn offset<T: Sample>(src: &[T], offset: T, dst: &mut [T]) {
    assert_eq!(src.len(), dst.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s.sat_add(offset);
    }
}

/// `dst[n] = src[n] * fract * 2^shift`
///
/// Fixed-point formats multiply by the fraction in full precision and
/// shift the product before saturating, so gains above one are expressed
/// with a positive `shift`.
pub fn scale<T: Sample>(src: &[T], fract: T, shift: i8, dst: &mut [T]) {
    assert_eq!(src.len(), dst.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s.scale(fract, shift);
    }
}

/// `dst[n] = src[n] * 2^bits`
///
/// Positive `bits` shift left with saturation, negative `bits` shift right.
pub fn shift<T: Sample>(src: &[T], bits: i8, dst: &mut [T]) {
    assert_eq!(src.len(), dst.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s.shift(bits);
    }
}

/// Formats with a dot product.
pub trait DotProd: Sample {
    /// Result format.
    type Output;

    /// Sum of products of `a` and `b`.
    fn dot_prod(a: &[Self], b: &[Self]) -> Self::Output;
}

impl DotProd for f32 {
    type Output = f32;

    fn dot_prod(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(a, b)| a * b).sum()
    }
}

impl DotProd for Q7 {
    /// 18.14 format.
    type Output = i32;

    fn dot_prod(a: &[Q7], b: &[Q7]) -> i32 {
        a.iter()
            .zip(b)
            .fold(0i32, |acc, (a, b)| acc.wrapping_add(*a as i32 * *b as i32))
    }
}

impl DotProd for Q15 {
    /// 34.30 format.
    type Output = i64;

    fn dot_prod(a: &[Q15], b: &[Q15]) -> i64 {
        a.iter()
            .zip(b)
            .fold(0i64, |acc, (a, b)| acc.wrapping_add(*a as i64 * *b as i64))
    }
}

impl DotProd for Q31 {
    /// 16.48 format, each product is truncated to 2.48 first.
    type Output = i64;

    fn dot_prod(a: &[Q31], b: &[Q31]) -> i64 {
        a.iter().zip(b).fold(0i64, |acc, (a, b)| {
            acc.wrapping_add((*a as i64 * *b as i64) >> 14)
        })
    }
}

/// Sum of products of `a` and `b`, in the wide format of the sample type.
pub fn dot_prod<T: DotProd>(a: &[T], b: &[T]) -> T::Output {
    assert_eq!(a.len(), b.len());
    T::dot_prod(a, b)
}
