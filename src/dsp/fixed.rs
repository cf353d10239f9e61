//! Saturation, clipping and reciprocal helpers for fractional arithmetic.

// Based on CMSIS DSP Library code (c) 2010 by ARM Limited

use spin::Once;

use super::{Q15, Q31, Q63, Q7};

/// Clips a Q63 value to Q31 range.
#[inline]
pub fn clip_q63_to_q31(x: Q63) -> Q31 {
    if (x >> 32) as i32 != (x as i32) >> 31 {
        0x7FFF_FFFF ^ ((x >> 63) as i32)
    } else {
        x as i32
    }
}

/// Clips a Q63 value to Q15 range, taking bits 15..31 of `x`.
#[inline]
pub fn clip_q63_to_q15(x: Q63) -> Q15 {
    if (x >> 32) as i32 != (x as i32) >> 31 {
        0x7FFF ^ ((x >> 63) as i16)
    } else {
        (x >> 15) as i16
    }
}

/// Clips a Q31 value to Q7 range.
#[inline]
pub fn clip_q31_to_q7(x: Q31) -> Q7 {
    if x >> 8 != x >> 7 {
        0x7F ^ ((x >> 31) as i8)
    } else {
        x as i8
    }
}

/// Clips a Q31 value to Q15 range.
#[inline]
pub fn clip_q31_to_q15(x: Q31) -> Q15 {
    if x >> 16 != x >> 15 {
        0x7FFF ^ ((x >> 31) as i16)
    } else {
        x as i16
    }
}

/// Multiplies a 64-bit value by a 32-bit value and keeps the upper 64 bits
/// of the 96-bit product.
#[inline]
pub fn mult32x64(x: Q63, y: Q31) -> Q63 {
    (((x & 0xFFFF_FFFF) * y as i64) >> 32).wrapping_add((x >> 32).wrapping_mul(y as i64))
}

/// Signed saturation of `x` to a `bits` wide signed range, `1..=32`.
#[inline]
pub fn ssat(x: i32, bits: u32) -> i32 {
    let max = ((1i64 << (bits - 1)) - 1) as i32;
    let min = (-(1i64 << (bits - 1))) as i32;
    x.clamp(min, max)
}

/// Signed saturation of a 64-bit value to a `bits` wide signed range.
#[inline]
pub fn ssat64(x: i64, bits: u32) -> i64 {
    let max = (1i64 << (bits - 1)) - 1;
    x.clamp(-max - 1, max)
}

/// Unsigned saturation of `x` to a `bits` wide range, `0..=31`.
#[inline]
pub fn usat(x: i32, bits: u32) -> u32 {
    let max = ((1u64 << bits) - 1) as i64;
    (x as i64).clamp(0, max) as u32
}

const RECIP_TABLE_SIZE: usize = 64;
const INDEX_MASK: u32 = 0x3F;

static RECIP_Q31_TABLE: Once<[Q31; RECIP_TABLE_SIZE]> = Once::new();
static RECIP_Q15_TABLE: Once<[Q15; RECIP_TABLE_SIZE]> = Once::new();

// Seeds hold 1 / x for the centre of each of the 64 intervals of x in
// [0.5, 1), halved so that they fit the fractional range.
fn recip_seed(index: usize) -> f64 {
    64.0 / (64.5 + index as f64)
}

fn recip_q31_table() -> &'static [Q31; RECIP_TABLE_SIZE] {
    RECIP_Q31_TABLE.call_once(|| {
        let mut table = [0; RECIP_TABLE_SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = (recip_seed(i) * 2147483648.0) as i32;
        }
        table
    })
}

fn recip_q15_table() -> &'static [Q15; RECIP_TABLE_SIZE] {
    RECIP_Q15_TABLE.call_once(|| {
        let mut table = [0; RECIP_TABLE_SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = (recip_seed(i) * 32768.0) as i16;
        }
        table
    })
}

/// Approximates `1 / x` for a Q31 value.
///
/// Returns `(reciprocal, shift)` with `1 / x == reciprocal * 2^shift` in
/// fractional terms. Zero yields the largest positive value.
pub fn recip_q31(x: Q31) -> (Q31, u32) {
    if x == 0 {
        return (Q31::MAX, 0);
    }
    if x == Q31::MIN {
        return (Q31::MIN, 0);
    }
    let magnitude = x.abs();
    let sign_bits = magnitude.leading_zeros() - 1;
    let normalized = magnitude << sign_bits;
    let index = ((normalized >> 24) as u32 & INDEX_MASK) as usize;
    let mut out = recip_q31_table()[index];
    for _ in 0..2 {
        let temp = ((normalized as i64 * out as i64) >> 31) as i32;
        let temp = 0x7FFF_FFFF - temp;
        out = clip_q63_to_q31((out as i64 * temp as i64) >> 30);
    }
    (if x < 0 { -out } else { out }, sign_bits + 1)
}

/// Approximates `1 / x` for a Q15 value, see [`recip_q31`].
pub fn recip_q15(x: Q15) -> (Q15, u32) {
    if x == 0 {
        return (Q15::MAX, 0);
    }
    if x == Q15::MIN {
        return (Q15::MIN, 0);
    }
    let magnitude = x.abs() as i32;
    let sign_bits = magnitude.leading_zeros() - 17;
    let normalized = magnitude << sign_bits;
    let index = ((normalized >> 8) as u32 & INDEX_MASK) as usize;
    let mut out = recip_q15_table()[index] as i32;
    for _ in 0..2 {
        let temp = (normalized * out) >> 15;
        let temp = 0x7FFF - temp;
        out = ssat((out * temp) >> 14, 16);
    }
    let out = out as i16;
    (if x < 0 { -out } else { out }, sign_bits + 1)
}
