//! Table based trigonometry and square roots.
//!
//! Sine and cosine interpolate linearly in a 256 point table covering one
//! period. The tables are generated on first use.

#[allow(unused_imports)]
use num_traits::float::Float;
use spin::Once;

use super::{Q15, Q31};
use crate::error::{Error, Result};

const TABLE_SIZE: usize = 256;

static SIN_TABLE_F32: Once<[f32; TABLE_SIZE + 1]> = Once::new();
static SIN_TABLE_Q31: Once<[Q31; TABLE_SIZE + 1]> = Once::new();
static SIN_TABLE_Q15: Once<[Q15; TABLE_SIZE + 1]> = Once::new();

fn table_point(i: usize) -> f64 {
    (2.0 * core::f64::consts::PI * i as f64 / TABLE_SIZE as f64).sin()
}

fn sin_table_f32() -> &'static [f32; TABLE_SIZE + 1] {
    SIN_TABLE_F32.call_once(|| {
        let mut table = [0.0; TABLE_SIZE + 1];
        for (i, value) in table.iter_mut().enumerate() {
            *value = table_point(i) as f32;
        }
        table
    })
}

fn sin_table_q31() -> &'static [Q31; TABLE_SIZE + 1] {
    SIN_TABLE_Q31.call_once(|| {
        let mut table = [0; TABLE_SIZE + 1];
        for (i, value) in table.iter_mut().enumerate() {
            *value = (table_point(i) * 2147483648.0).round() as i32;
        }
        table
    })
}

fn sin_table_q15() -> &'static [Q15; TABLE_SIZE + 1] {
    SIN_TABLE_Q15.call_once(|| {
        let mut table = [0; TABLE_SIZE + 1];
        for (i, value) in table.iter_mut().enumerate() {
            *value = (table_point(i) * 32768.0).round() as i16;
        }
        table
    })
}

// `turns` is the phase in periods.
fn sin_turns_f32(turns: f32) -> f32 {
    let phase = turns - turns.floor();
    let position = phase * TABLE_SIZE as f32;
    let index = (position as usize).min(TABLE_SIZE - 1);
    let fract = position - index as f32;
    let table = sin_table_f32();
    let a = table[index];
    let b = table[index + 1];
    a + (b - a) * fract
}

/// Sine of `x` radians.
pub fn sin_f32(x: f32) -> f32 {
    sin_turns_f32(x * (0.5 / core::f32::consts::PI))
}

/// Cosine of `x` radians.
pub fn cos_f32(x: f32) -> f32 {
    sin_turns_f32(x * (0.5 / core::f32::consts::PI) + 0.25)
}

/// Sine of a normalized phase, `[0, 1)` mapping to `[0, 2pi)`.
///
/// Negative phases wrap into the period.
pub fn sin_q31(x: Q31) -> Q31 {
    let phase = (x & 0x7FFF_FFFF) as u32;
    let index = (phase >> 23) as usize;
    let fract = (phase & 0x7F_FFFF) as i64;
    let table = sin_table_q31();
    let a = table[index] as i64;
    let b = table[index + 1] as i64;
    (a + (((b - a) * fract) >> 23)).clamp(Q31::MIN as i64, Q31::MAX as i64) as i32
}

/// Cosine of a normalized phase, see [`sin_q31`].
pub fn cos_q31(x: Q31) -> Q31 {
    sin_q31(x.wrapping_add(0x2000_0000))
}

/// Sine of a normalized phase, `[0, 1)` mapping to `[0, 2pi)`.
///
/// Negative phases wrap into the period.
pub fn sin_q15(x: Q15) -> Q15 {
    let phase = (x & 0x7FFF) as u32;
    let index = (phase >> 7) as usize;
    let fract = (phase & 0x7F) as i32;
    let table = sin_table_q15();
    let a = table[index] as i32;
    let b = table[index + 1] as i32;
    (a + (((b - a) * fract) >> 7)).clamp(Q15::MIN as i32, Q15::MAX as i32) as i16
}

/// Cosine of a normalized phase, see [`sin_q15`].
pub fn cos_q15(x: Q15) -> Q15 {
    sin_q15(x.wrapping_add(0x2000))
}

/// Sine and cosine of `theta` degrees.
pub fn sin_cos_f32(theta: f32) -> (f32, f32) {
    let turns = theta / 360.0;
    (sin_turns_f32(turns), sin_turns_f32(turns + 0.25))
}

/// Sine and cosine of `theta`, where `[-1, 1)` maps to `[-180, 180)`
/// degrees.
pub fn sin_cos_q31(theta: Q31) -> (Q31, Q31) {
    let phase = theta >> 1;
    (sin_q31(phase), cos_q31(phase))
}

/// Square root. Negative input is an [`Error::ArgumentError`].
pub fn sqrt_f32(x: f32) -> Result<f32> {
    if x < 0.0 {
        return Err(Error::ArgumentError);
    }
    Ok(x.sqrt())
}

// Largest r with r * r <= n.
fn isqrt(n: u64) -> u64 {
    let mut rem = n;
    let mut root = 0u64;
    let mut bit = 1u64 << 62;
    while bit > n {
        bit >>= 2;
    }
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

/// Square root of a Q31 value. Negative input is an
/// [`Error::ArgumentError`].
pub fn sqrt_q31(x: Q31) -> Result<Q31> {
    if x < 0 {
        return Err(Error::ArgumentError);
    }
    Ok(isqrt((x as u64) << 31).min(Q31::MAX as u64) as i32)
}

/// Square root of a Q15 value. Negative input is an
/// [`Error::ArgumentError`].
pub fn sqrt_q15(x: Q15) -> Result<Q15> {
    if x < 0 {
        return Err(Error::ArgumentError);
    }
    Ok(isqrt((x as u64) << 15).min(Q15::MAX as u64) as i16)
}
