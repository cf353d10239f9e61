//! Direct form FIR filter.

use alloc::boxed::Box;

use super::{check_block_size, check_taps, dot_reversed, dot_reversed_fast, FastMac, History};
use crate::dsp::Sample;
use crate::error::Result;

/// FIR filter, `y[n] = sum(b[k] * x[n - k])`.
///
/// Fixed-point formats accumulate in [`Sample::Acc`] and saturate the
/// result.
#[derive(Debug, Clone)]
pub struct Fir<T> {
    coeffs: Box<[T]>,
    history: History<T>,
}

impl<T: Sample> Fir<T> {
    /// Creates a filter with cleared state.
    pub fn new(coeffs: &[T], block_size: usize) -> Result<Self> {
        check_taps(coeffs)?;
        check_block_size(block_size)?;
        log::trace!("fir with {} taps, block size {}", coeffs.len(), block_size);
        Ok(Self {
            coeffs: coeffs.into(),
            history: History::new(coeffs.len() - 1, block_size),
        })
    }

    /// Number of taps.
    pub fn num_taps(&self) -> usize {
        self.coeffs.len()
    }

    /// Coefficients in natural order.
    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Clears the state.
    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Filters `src` into `dst`.
    pub fn process(&mut self, src: &[T], dst: &mut [T]) {
        self.run(src, dst, |coeffs, window| T::from_acc(dot_reversed(coeffs, window)));
    }

    fn run(&mut self, src: &[T], dst: &mut [T], kernel: impl Fn(&[T], &[T]) -> T) {
        assert_eq!(src.len(), dst.len());
        let taps = self.coeffs.len();
        let block_size = self.history.block_size();
        for (src, dst) in src.chunks(block_size).zip(dst.chunks_mut(block_size)) {
            let buffer = self.history.load(src);
            for (i, y) in dst.iter_mut().enumerate() {
                *y = kernel(&self.coeffs, &buffer[i..i + taps]);
            }
            self.history.advance(src.len());
        }
    }
}

impl<T: FastMac> Fir<T> {
    /// Filters with the 32-bit accumulator of [`FastMac`].
    pub fn process_fast(&mut self, src: &[T], dst: &mut [T]) {
        self.run(src, dst, |coeffs, window| {
            T::fast_result(dot_reversed_fast(coeffs, window), 0)
        });
    }
}

