//! Portable versions of the packed (SIMD within a register) instructions.
//!
//! Words hold two Q15 half words (low half first) or four Q7 bytes (lowest
//! byte first). Each function behaves like the Cortex-M4 instruction of the
//! same name.

use super::fixed::{clip_q31_to_q15, clip_q63_to_q31, ssat};

#[inline]
fn lo(x: i32) -> i32 {
    x as i16 as i32
}

#[inline]
fn hi(x: i32) -> i32 {
    x >> 16
}

#[inline]
fn byte(x: i32, n: u32) -> i32 {
    (x << (24 - 8 * n)) >> 24
}

#[inline]
fn pack16(high: i32, low: i32) -> i32 {
    ((high << 16) as u32 & 0xFFFF_0000) as i32 | (low & 0xFFFF)
}

/// Packs the low half word of `x` and the shifted `y` into one word
/// (`__PKHBT`).
#[inline]
pub fn pkhbt(x: i32, y: i32, shift: u32) -> i32 {
    (x & 0xFFFF) | ((y << shift) as u32 & 0xFFFF_0000) as i32
}

/// Packs four Q7 values into one word, `v0` in the lowest byte
/// (`__PACKq7`).
#[inline]
pub fn pack_q7(v0: i8, v1: i8, v2: i8, v3: i8) -> i32 {
    (v0 as u8 as u32 | (v1 as u8 as u32) << 8 | (v2 as u8 as u32) << 16 | (v3 as u8 as u32) << 24)
        as i32
}

/// Saturating addition of four bytes.
#[inline]
pub fn qadd8(x: i32, y: i32) -> i32 {
    let mut out = 0u32;
    for n in 0..4 {
        let sum = ssat(byte(x, n) + byte(y, n), 8);
        out |= (sum as u32 & 0xFF) << (8 * n);
    }
    out as i32
}

/// Saturating subtraction of four bytes.
#[inline]
pub fn qsub8(x: i32, y: i32) -> i32 {
    let mut out = 0u32;
    for n in 0..4 {
        let diff = ssat(byte(x, n) - byte(y, n), 8);
        out |= (diff as u32 & 0xFF) << (8 * n);
    }
    out as i32
}

/// Saturating addition of two half words.
#[inline]
pub fn qadd16(x: i32, y: i32) -> i32 {
    pack16(ssat(hi(x) + hi(y), 16), ssat(lo(x) + lo(y), 16))
}

/// Saturating subtraction of two half words.
#[inline]
pub fn qsub16(x: i32, y: i32) -> i32 {
    pack16(ssat(hi(x) - hi(y), 16), ssat(lo(x) - lo(y), 16))
}

/// Halving addition of two half words.
#[inline]
pub fn shadd16(x: i32, y: i32) -> i32 {
    pack16((x >> 17) + (y >> 17), (lo(x) >> 1) + (lo(y) >> 1))
}

/// Halving subtraction of two half words.
#[inline]
pub fn shsub16(x: i32, y: i32) -> i32 {
    pack16((x >> 17) - (y >> 17), (lo(x) >> 1) - (lo(y) >> 1))
}

/// Saturating add of the high half words and subtract of the low half
/// words, with `y` exchanged.
#[inline]
pub fn qasx(x: i32, y: i32) -> i32 {
    let high = clip_q31_to_q15(hi(x) + lo(y)) as i32;
    let low = clip_q31_to_q15(lo(x) - hi(y)) as i32;
    pack16(high, low)
}

/// Saturating subtract of the high half words and add of the low half
/// words, with `y` exchanged.
#[inline]
pub fn qsax(x: i32, y: i32) -> i32 {
    let high = clip_q31_to_q15(hi(x) - lo(y)) as i32;
    let low = clip_q31_to_q15(lo(x) + hi(y)) as i32;
    pack16(high, low)
}

/// Halving version of [`qasx`].
#[inline]
pub fn shasx(x: i32, y: i32) -> i32 {
    pack16((x >> 17) + (lo(y) >> 1), (lo(x) >> 1) - (y >> 17))
}

/// Halving version of [`qsax`].
#[inline]
pub fn shsax(x: i32, y: i32) -> i32 {
    pack16((x >> 17) - (lo(y) >> 1), (lo(x) >> 1) + (y >> 17))
}

/// Dual multiply, products added.
#[inline]
pub fn smuad(x: i32, y: i32) -> i32 {
    (hi(x) * hi(y)).wrapping_add(lo(x) * lo(y))
}

/// Dual multiply, high product subtracted from the low product.
#[inline]
pub fn smusd(x: i32, y: i32) -> i32 {
    (lo(x) * lo(y)).wrapping_sub(hi(x) * hi(y))
}

/// Dual multiply with `y` exchanged, products added.
#[inline]
pub fn smuadx(x: i32, y: i32) -> i32 {
    (lo(x) * hi(y)).wrapping_add(hi(x) * lo(y))
}

/// Dual multiply with `y` exchanged, products subtracted.
#[inline]
pub fn smusdx(x: i32, y: i32) -> i32 {
    (lo(x) * hi(y)).wrapping_sub(hi(x) * lo(y))
}

/// Dual multiply accumulate.
#[inline]
pub fn smlad(x: i32, y: i32, sum: i32) -> i32 {
    sum.wrapping_add(hi(x) * hi(y)).wrapping_add(lo(x) * lo(y))
}

/// Dual multiply accumulate with `y` exchanged.
#[inline]
pub fn smladx(x: i32, y: i32, sum: i32) -> i32 {
    sum.wrapping_add(hi(x) * lo(y)).wrapping_add(lo(x) * hi(y))
}

/// Dual multiply subtract accumulate with `y` exchanged.
#[inline]
pub fn smlsdx(x: i32, y: i32, sum: i32) -> i32 {
    sum.wrapping_sub(hi(x) * lo(y)).wrapping_add(lo(x) * hi(y))
}

/// Dual multiply accumulate into a 64-bit sum.
#[inline]
pub fn smlald(x: i32, y: i32, sum: i64) -> i64 {
    sum.wrapping_add((hi(x) * hi(y)) as i64)
        .wrapping_add((lo(x) * lo(y)) as i64)
}

/// Dual multiply accumulate with `y` exchanged into a 64-bit sum.
#[inline]
pub fn smlaldx(x: i32, y: i32, sum: i64) -> i64 {
    sum.wrapping_add((hi(x) * lo(y)) as i64)
        .wrapping_add((lo(x) * hi(y)) as i64)
}

/// Saturating 32-bit addition.
#[inline]
pub fn qadd(x: i32, y: i32) -> i32 {
    clip_q63_to_q31(x as i64 + y as i64)
}

/// Saturating 32-bit subtraction.
#[inline]
pub fn qsub(x: i32, y: i32) -> i32 {
    clip_q63_to_q31(x as i64 - y as i64)
}
