//! FIR, IIR and adaptive filters, convolution and correlation.
//!
//! Filter instances own their coefficients and state. Coefficients are
//! given in natural order, `b[0]` multiplies the newest input sample.
//! Instances accept blocks of any length and work through them in chunks of
//! the `block_size` they were created with.

use alloc::boxed::Box;
use alloc::vec;

use super::fixed::{clip_q63_to_q31, ssat};
use super::{Sample, Q15, Q31, Q7};
use crate::error::{Error, Result};

pub mod biquad;
pub mod conv;
pub mod fir;
pub mod fir_decimate;
pub mod fir_interpolate;
pub mod fir_lattice;
pub mod fir_sparse;
pub mod iir_lattice;
pub mod lms;

pub use biquad::{BiquadCas32x64, BiquadDf1};
pub use conv::{conv, conv_fast, conv_partial, conv_partial_fast, correlate, correlate_fast};
pub use fir::Fir;
pub use fir_decimate::FirDecimate;
pub use fir_interpolate::FirInterpolate;
pub use fir_lattice::FirLattice;
pub use fir_sparse::FirSparse;
pub use iir_lattice::IirLattice;
pub use lms::{Lms, LmsNorm, NormalizedStep};

/// Formats usable in the filter kernels.
pub trait FilterSample: Sample {
    /// Converts an accumulator to a sample, multiplying by `2^post_shift`.
    fn from_acc_shifted(acc: Self::Acc, post_shift: u8) -> Self;
}

impl FilterSample for f32 {
    #[inline]
    fn from_acc_shifted(acc: f32, post_shift: u8) -> f32 {
        acc * (1u32 << post_shift) as f32
    }
}

impl FilterSample for Q7 {
    #[inline]
    fn from_acc_shifted(acc: i32, post_shift: u8) -> Q7 {
        ssat(acc >> (7 - post_shift as u32), 8) as i8
    }
}

impl FilterSample for Q15 {
    #[inline]
    fn from_acc_shifted(acc: i64, post_shift: u8) -> Q15 {
        (acc >> (15 - post_shift as u32)).clamp(i16::MIN as i64, i16::MAX as i64) as i16
    }
}

impl FilterSample for Q31 {
    #[inline]
    fn from_acc_shifted(acc: i64, post_shift: u8) -> Q31 {
        clip_q63_to_q31(acc >> (31 - post_shift as u32))
    }
}

/// Fixed-point formats with a reduced precision 32-bit accumulator.
///
/// Q15 accumulates full products in 32 bits and may wrap on long sums. Q31
/// keeps only the upper word of each product, so the accumulator is in
/// 2.30 format.
pub trait FastMac: FilterSample {
    /// Returns `acc + a * b` in the reduced precision format.
    fn fast_mac(acc: i32, a: Self, b: Self) -> i32;

    /// Converts the reduced accumulator to a sample, multiplying by
    /// `2^post_shift`.
    fn fast_result(acc: i32, post_shift: u8) -> Self;
}

impl FastMac for Q15 {
    #[inline]
    fn fast_mac(acc: i32, a: Q15, b: Q15) -> i32 {
        acc.wrapping_add(a as i32 * b as i32)
    }

    #[inline]
    fn fast_result(acc: i32, post_shift: u8) -> Q15 {
        ssat(acc >> (15 - post_shift as u32), 16) as i16
    }
}

impl FastMac for Q31 {
    #[inline]
    fn fast_mac(acc: i32, a: Q31, b: Q31) -> i32 {
        acc.wrapping_add(((a as i64 * b as i64) >> 32) as i32)
    }

    #[inline]
    fn fast_result(acc: i32, post_shift: u8) -> Q31 {
        clip_q63_to_q31((acc as i64) << (1 + post_shift as u32))
    }
}

/// `sum(coeffs[k] * window[len - 1 - k])`, the newest sample being the last
/// one of `window`.
#[inline]
pub(crate) fn dot_reversed<T: Sample>(coeffs: &[T], window: &[T]) -> T::Acc {
    coeffs
        .iter()
        .zip(window.iter().rev())
        .fold(T::acc_zero(), |acc, (c, x)| T::mac(acc, *c, *x))
}

#[inline]
pub(crate) fn dot_reversed_fast<T: FastMac>(coeffs: &[T], window: &[T]) -> i32 {
    coeffs
        .iter()
        .zip(window.iter().rev())
        .fold(0, |acc, (c, x)| T::fast_mac(acc, *c, *x))
}

pub(crate) fn check_block_size(block_size: usize) -> Result<()> {
    if block_size == 0 {
        log::debug!("filter block size must not be zero");
        return Err(Error::LengthError);
    }
    Ok(())
}

pub(crate) fn check_taps<T>(coeffs: &[T]) -> Result<()> {
    if coeffs.is_empty() {
        log::debug!("filter needs at least one coefficient");
        return Err(Error::LengthError);
    }
    Ok(())
}

/// Input history followed by room for one block of new samples.
///
/// A block is appended with [`History::load`], which returns the history
/// and the block as one contiguous slice. [`History::advance`] then keeps the
/// newest `len` samples for the next block.
#[derive(Debug, Clone)]
pub(crate) struct History<T> {
    buffer: Box<[T]>,
    len: usize,
}

impl<T: Sample> History<T> {
    pub fn new(len: usize, block_size: usize) -> Self {
        Self {
            buffer: vec![T::ZERO; len + block_size].into_boxed_slice(),
            len,
        }
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.buffer.len() - self.len
    }

    #[inline]
    pub fn load(&mut self, block: &[T]) -> &[T] {
        let end = self.len + block.len();
        self.buffer[self.len..end].copy_from_slice(block);
        &self.buffer[..end]
    }

    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.buffer.copy_within(count..count + self.len, 0);
    }

    pub fn reset(&mut self) {
        self.buffer.fill(T::ZERO);
    }
}
