//! FIR decimator.

use alloc::boxed::Box;

use super::{check_block_size, check_taps, dot_reversed, History};
use crate::dsp::Sample;
use crate::error::{Error, Result};

/// Anti-alias FIR filter followed by keeping every `factor`-th sample.
///
/// Only the retained outputs are computed. Output `m` is the filter output
/// at input sample `(m + 1) * factor - 1`.
#[derive(Debug, Clone)]
pub struct FirDecimate<T> {
    coeffs: Box<[T]>,
    factor: usize,
    history: History<T>,
}

impl<T: Sample> FirDecimate<T> {
    /// Creates a decimator.
    ///
    /// A zero factor is an [`Error::ArgumentError`], a block size that is not
    /// a multiple of the factor an [`Error::LengthError`].
    pub fn new(coeffs: &[T], factor: usize, block_size: usize) -> Result<Self> {
        check_taps(coeffs)?;
        check_block_size(block_size)?;
        if factor == 0 {
            log::debug!("decimation factor must not be zero");
            return Err(Error::ArgumentError);
        }
        if block_size % factor != 0 {
            log::debug!("block size {} not a multiple of factor {}", block_size, factor);
            return Err(Error::LengthError);
        }
        log::trace!(
            "fir decimator with {} taps, factor {}, block size {}",
            coeffs.len(),
            factor,
            block_size
        );
        Ok(Self {
            coeffs: coeffs.into(),
            factor,
            history: History::new(coeffs.len() - 1, block_size),
        })
    }

    /// Decimation factor.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Clears the state.
    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Filters and decimates `src` into `dst`.
    ///
    /// `src` must hold `factor` samples for every sample of `dst`.
    pub fn process(&mut self, src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), dst.len() * self.factor);
        let taps = self.coeffs.len();
        let factor = self.factor;
        let block_size = self.history.block_size();
        for (src, dst) in src
            .chunks(block_size)
            .zip(dst.chunks_mut(block_size / factor))
        {
            let buffer = self.history.load(src);
            for (m, y) in dst.iter_mut().enumerate() {
                let start = m * factor + factor - 1;
                *y = T::from_acc(dot_reversed(&self.coeffs, &buffer[start..start + taps]));
            }
            self.history.advance(src.len());
        }
    }
}
