//! Arithmetic shared by all sample formats.

use core::fmt::Debug;

#[allow(unused_imports)]
use num_traits::float::Float;

use super::fixed::{clip_q63_to_q31, ssat};
use super::{Q15, Q31, Q7};

/// A sample format supported by the generic kernels.
///
/// Fixed-point implementations saturate every result. Products are
/// accumulated in [`Sample::Acc`], which is wide enough to hold a sum of
/// full-scale products without overflow for realistic filter lengths.
pub trait Sample: Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static {
    /// Accumulator for sums of products.
    type Acc: Copy + Debug;

    /// Number of fractional bits, `0` for floating point.
    const FRAC_BITS: u32;

    /// Zero.
    const ZERO: Self;

    /// Largest value.
    const MAX: Self;

    /// Smallest value.
    const MIN: Self;

    /// Empty accumulator.
    fn acc_zero() -> Self::Acc;

    /// Returns `acc + a * b`.
    fn mac(acc: Self::Acc, a: Self, b: Self) -> Self::Acc;

    /// Returns `acc - a * b`.
    fn msc(acc: Self::Acc, a: Self, b: Self) -> Self::Acc;

    /// Converts an accumulator back to the sample format.
    fn from_acc(acc: Self::Acc) -> Self;

    /// Saturating addition.
    fn sat_add(self, rhs: Self) -> Self;

    /// Saturating subtraction.
    fn sat_sub(self, rhs: Self) -> Self;

    /// Saturating fractional multiplication.
    fn sat_mul(self, rhs: Self) -> Self;

    /// Saturating negation.
    fn sat_neg(self) -> Self;

    /// Saturating absolute value.
    fn sat_abs(self) -> Self;

    /// Multiplies by the fraction `fract` and by `2^shift`, saturating.
    fn scale(self, fract: Self, shift: i8) -> Self;

    /// Multiplies by `2^bits`, saturating. Fixed-point formats shift
    /// arithmetically.
    fn shift(self, bits: i8) -> Self;

    /// Converts to a float in `[-1, 1)` for fixed-point formats.
    fn to_f32(self) -> f32;

    /// Converts from a float, saturating out of range values.
    ///
    /// Truncates toward zero, or rounds to nearest with the `rounding`
    /// feature.
    fn from_f32(value: f32) -> Self;
}

#[inline]
fn quantize(value: f32, scale: f32) -> f64 {
    let scaled = value as f64 * scale as f64;
    if cfg!(feature = "rounding") {
        scaled.round()
    } else {
        scaled
    }
}

fn scale_fixed(x: i64, fract: i64, frac_bits: u32, shift: i8, min: i64, max: i64) -> i64 {
    let product = (x * fract) as i128;
    let k = frac_bits as i32 - shift as i32;
    let scaled = if k >= 0 {
        product >> k.min(127)
    } else {
        product << (-k).min(64)
    };
    scaled.clamp(min as i128, max as i128) as i64
}

fn shift_fixed(x: i64, bits: i8, min: i64, max: i64) -> i64 {
    let x = x as i128;
    let shifted = if bits >= 0 {
        x << bits.min(64)
    } else {
        x >> (-(bits as i32)).min(127)
    };
    shifted.clamp(min as i128, max as i128) as i64
}

macro_rules! fixed_scale_shift {
    ($ty:ty) => {
        #[inline]
        fn scale(self, fract: Self, shift: i8) -> Self {
            scale_fixed(
                self as i64,
                fract as i64,
                Self::FRAC_BITS,
                shift,
                <$ty>::MIN as i64,
                <$ty>::MAX as i64,
            ) as $ty
        }

        #[inline]
        fn shift(self, bits: i8) -> Self {
            shift_fixed(self as i64, bits, <$ty>::MIN as i64, <$ty>::MAX as i64) as $ty
        }
    };
}

impl Sample for f32 {
    type Acc = f32;

    const FRAC_BITS: u32 = 0;
    const ZERO: Self = 0.0;
    const MAX: Self = f32::MAX;
    const MIN: Self = f32::MIN;

    #[inline]
    fn acc_zero() -> f32 {
        0.0
    }

    #[inline]
    fn mac(acc: f32, a: f32, b: f32) -> f32 {
        acc + a * b
    }

    #[inline]
    fn msc(acc: f32, a: f32, b: f32) -> f32 {
        acc - a * b
    }

    #[inline]
    fn from_acc(acc: f32) -> f32 {
        acc
    }

    #[inline]
    fn sat_add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline]
    fn sat_sub(self, rhs: Self) -> Self {
        self - rhs
    }

    #[inline]
    fn sat_mul(self, rhs: Self) -> Self {
        self * rhs
    }

    #[inline]
    fn sat_neg(self) -> Self {
        -self
    }

    #[inline]
    fn sat_abs(self) -> Self {
        self.abs()
    }

    #[inline]
    fn scale(self, fract: Self, shift: i8) -> Self {
        self * fract * 2.0f32.powi(shift as i32)
    }

    #[inline]
    fn shift(self, bits: i8) -> Self {
        self * 2.0f32.powi(bits as i32)
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }
}

impl Sample for Q7 {
    type Acc = i32;

    const FRAC_BITS: u32 = 7;
    const ZERO: Self = 0;
    const MAX: Self = i8::MAX;
    const MIN: Self = i8::MIN;

    #[inline]
    fn acc_zero() -> i32 {
        0
    }

    #[inline]
    fn mac(acc: i32, a: Q7, b: Q7) -> i32 {
        acc.wrapping_add(a as i32 * b as i32)
    }

    #[inline]
    fn msc(acc: i32, a: Q7, b: Q7) -> i32 {
        acc.wrapping_sub(a as i32 * b as i32)
    }

    #[inline]
    fn from_acc(acc: i32) -> Q7 {
        ssat(acc >> 7, 8) as i8
    }

    #[inline]
    fn sat_add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }

    #[inline]
    fn sat_sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }

    #[inline]
    fn sat_mul(self, rhs: Self) -> Self {
        ssat((self as i32 * rhs as i32) >> 7, 8) as i8
    }

    #[inline]
    fn sat_neg(self) -> Self {
        self.saturating_neg()
    }

    #[inline]
    fn sat_abs(self) -> Self {
        self.saturating_abs()
    }

    fixed_scale_shift!(i8);

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 128.0
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        quantize(value, 128.0) as i8
    }
}

impl Sample for Q15 {
    type Acc = i64;

    const FRAC_BITS: u32 = 15;
    const ZERO: Self = 0;
    const MAX: Self = i16::MAX;
    const MIN: Self = i16::MIN;

    #[inline]
    fn acc_zero() -> i64 {
        0
    }

    #[inline]
    fn mac(acc: i64, a: Q15, b: Q15) -> i64 {
        acc.wrapping_add(a as i64 * b as i64)
    }

    #[inline]
    fn msc(acc: i64, a: Q15, b: Q15) -> i64 {
        acc.wrapping_sub(a as i64 * b as i64)
    }

    #[inline]
    fn from_acc(acc: i64) -> Q15 {
        (acc >> 15).clamp(i16::MIN as i64, i16::MAX as i64) as i16
    }

    #[inline]
    fn sat_add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }

    #[inline]
    fn sat_sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }

    #[inline]
    fn sat_mul(self, rhs: Self) -> Self {
        ssat((self as i32 * rhs as i32) >> 15, 16) as i16
    }

    #[inline]
    fn sat_neg(self) -> Self {
        self.saturating_neg()
    }

    #[inline]
    fn sat_abs(self) -> Self {
        self.saturating_abs()
    }

    fixed_scale_shift!(i16);

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 32768.0
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        quantize(value, 32768.0) as i16
    }
}

impl Sample for Q31 {
    type Acc = i64;

    const FRAC_BITS: u32 = 31;
    const ZERO: Self = 0;
    const MAX: Self = i32::MAX;
    const MIN: Self = i32::MIN;

    #[inline]
    fn acc_zero() -> i64 {
        0
    }

    #[inline]
    fn mac(acc: i64, a: Q31, b: Q31) -> i64 {
        acc.wrapping_add(a as i64 * b as i64)
    }

    #[inline]
    fn msc(acc: i64, a: Q31, b: Q31) -> i64 {
        acc.wrapping_sub(a as i64 * b as i64)
    }

    #[inline]
    fn from_acc(acc: i64) -> Q31 {
        clip_q63_to_q31(acc >> 31)
    }

    #[inline]
    fn sat_add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }

    #[inline]
    fn sat_sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }

    #[inline]
    fn sat_mul(self, rhs: Self) -> Self {
        let product = (self as i64 * rhs as i64) >> 32;
        (ssat(product as i32, 31)) << 1
    }

    #[inline]
    fn sat_neg(self) -> Self {
        self.saturating_neg()
    }

    #[inline]
    fn sat_abs(self) -> Self {
        self.saturating_abs()
    }

    fixed_scale_shift!(i32);

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 2147483648.0
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        quantize(value, 2147483648.0) as i32
    }
}
