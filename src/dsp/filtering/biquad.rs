//! Cascaded biquad sections in direct form I.
//!
//! Every stage takes five coefficients `{b0, b1, b2, a1, a2}` and computes
//!
//! ```text
//! y[n] = b0 x[n] + b1 x[n-1] + b2 x[n-2] + a1 y[n-1] + a2 y[n-2]
//! ```
//!
//! The feedback coefficients are added, so they are the negated
//! denominator coefficients of the usual transfer function notation.
//! Fixed-point coefficients that exceed the fractional range are scaled down
//! by `2^post_shift`, and the accumulator is scaled back up before it is
//! saturated.

// Based on CMSIS DSP Library code (c) 2010 by ARM Limited

use alloc::boxed::Box;
use alloc::vec;

use super::{FastMac, FilterSample};
use crate::dsp::fixed::{clip_q63_to_q31, mult32x64};
use crate::dsp::{Q31, Q63};
use crate::error::{Error, Result};

const COEFFS_PER_STAGE: usize = 5;

fn split_stages<T: Copy + Default>(coeffs: &[T]) -> Result<Box<[[T; 5]]>> {
    if coeffs.is_empty() || coeffs.len() % COEFFS_PER_STAGE != 0 {
        log::debug!("{} biquad coefficients are not whole stages", coeffs.len());
        return Err(Error::LengthError);
    }
    Ok(coeffs
        .chunks_exact(COEFFS_PER_STAGE)
        .map(|c| [c[0], c[1], c[2], c[3], c[4]])
        .collect())
}

fn check_post_shift(post_shift: u8, frac_bits: u32) -> Result<()> {
    if post_shift as u32 > frac_bits {
        log::debug!("post shift {} exceeds {} fractional bits", post_shift, frac_bits);
        return Err(Error::ArgumentError);
    }
    Ok(())
}

/// Biquad cascade with per-stage state `[x[n-1], x[n-2], y[n-1], y[n-2]]`.
#[derive(Debug, Clone)]
pub struct BiquadDf1<T> {
    coeffs: Box<[[T; 5]]>,
    state: Box<[[T; 4]]>,
    post_shift: u8,
}

impl<T: FilterSample> BiquadDf1<T> {
    /// Creates a cascade from `5 * num_stages` coefficients.
    ///
    /// Floating point filters must use a `post_shift` of zero.
    pub fn new(coeffs: &[T], post_shift: u8) -> Result<Self> {
        let coeffs = split_stages(coeffs)?;
        check_post_shift(post_shift, T::FRAC_BITS)?;
        log::trace!("biquad cascade with {} stages, post shift {}", coeffs.len(), post_shift);
        Ok(Self {
            state: vec![[T::ZERO; 4]; coeffs.len()].into_boxed_slice(),
            coeffs,
            post_shift,
        })
    }

    /// Number of stages.
    pub fn num_stages(&self) -> usize {
        self.coeffs.len()
    }

    /// Clears the state.
    pub fn reset(&mut self) {
        self.state.fill([T::ZERO; 4]);
    }

    /// Filters `src` into `dst`.
    pub fn process(&mut self, src: &[T], dst: &mut [T]) {
        self.run(src, dst, |b, s, x, post_shift| {
            let mut acc = T::mac(T::acc_zero(), b[0], x);
            acc = T::mac(acc, b[1], s[0]);
            acc = T::mac(acc, b[2], s[1]);
            acc = T::mac(acc, b[3], s[2]);
            acc = T::mac(acc, b[4], s[3]);
            T::from_acc_shifted(acc, post_shift)
        });
    }

    fn run(&mut self, src: &[T], dst: &mut [T], step: impl Fn(&[T; 5], &[T; 4], T, u8) -> T) {
        assert_eq!(src.len(), dst.len());
        dst.copy_from_slice(src);
        for (b, s) in self.coeffs.iter().zip(self.state.iter_mut()) {
            for sample in dst.iter_mut() {
                let x = *sample;
                let y = step(b, s, x, self.post_shift);
                *s = [x, s[0], y, s[2]];
                *sample = y;
            }
        }
    }
}

impl<T: FastMac> BiquadDf1<T> {
    /// Filters with the 32-bit accumulator of [`FastMac`].
    pub fn process_fast(&mut self, src: &[T], dst: &mut [T]) {
        self.run(src, dst, |b, s, x, post_shift| {
            let mut acc = T::fast_mac(0, b[0], x);
            acc = T::fast_mac(acc, b[1], s[0]);
            acc = T::fast_mac(acc, b[2], s[1]);
            acc = T::fast_mac(acc, b[3], s[2]);
            acc = T::fast_mac(acc, b[4], s[3]);
            T::fast_result(acc, post_shift)
        });
    }
}

/// Q31 biquad cascade that keeps its output history in Q63.
///
/// The wide feedback path keeps low frequency sections with poles close to
/// the unit circle stable.
#[derive(Debug, Clone)]
pub struct BiquadCas32x64 {
    coeffs: Box<[[Q31; 5]]>,
    state: Box<[(Q31, Q31, Q63, Q63)]>,
    post_shift: u8,
}

impl BiquadCas32x64 {
    /// Creates a cascade from `5 * num_stages` coefficients.
    pub fn new(coeffs: &[Q31], post_shift: u8) -> Result<Self> {
        let coeffs = split_stages(coeffs)?;
        check_post_shift(post_shift, 30)?;
        log::trace!("biquad 32x64 cascade with {} stages", coeffs.len());
        Ok(Self {
            state: vec![(0, 0, 0, 0); coeffs.len()].into_boxed_slice(),
            coeffs,
            post_shift,
        })
    }

    /// Number of stages.
    pub fn num_stages(&self) -> usize {
        self.coeffs.len()
    }

    /// Clears the state.
    pub fn reset(&mut self) {
        self.state.fill((0, 0, 0, 0));
    }

    /// Filters `src` into `dst`.
    pub fn process(&mut self, src: &[Q31], dst: &mut [Q31]) {
        assert_eq!(src.len(), dst.len());
        dst.copy_from_slice(src);
        let shift = 1 + self.post_shift as u32;
        for (b, s) in self.coeffs.iter().zip(self.state.iter_mut()) {
            let (mut x1, mut x2, mut y1, mut y2) = *s;
            for sample in dst.iter_mut() {
                let x = *sample;
                // Both paths accumulate in 2.62.
                let mut acc = x as i128 * b[0] as i128
                    + x1 as i128 * b[1] as i128
                    + x2 as i128 * b[2] as i128;
                acc += mult32x64(y1, b[3]) as i128 + mult32x64(y2, b[4]) as i128;
                let y = (acc << shift).clamp(Q63::MIN as i128, Q63::MAX as i128) as i64;
                x2 = x1;
                x1 = x;
                y2 = y1;
                y1 = y;
                *sample = clip_q63_to_q31(y >> 32);
            }
            *s = (x1, x2, y1, y2);
        }
    }
}
