//! Sparse FIR filter.

use alloc::boxed::Box;

use super::{check_block_size, check_taps, History};
use crate::dsp::Sample;
use crate::error::{Error, Result};

/// FIR filter whose taps sit at arbitrary delays,
/// `y[n] = sum(b[k] * x[n - delay[k]])`.
#[derive(Debug, Clone)]
pub struct FirSparse<T> {
    coeffs: Box<[T]>,
    delays: Box<[u16]>,
    max_delay: usize,
    history: History<T>,
}

impl<T: Sample> FirSparse<T> {
    /// Creates a filter with one delay per coefficient.
    ///
    /// Mismatched lengths are an [`Error::LengthError`], a delay above
    /// `max_delay` an [`Error::ArgumentError`].
    pub fn new(coeffs: &[T], delays: &[u16], max_delay: u16, block_size: usize) -> Result<Self> {
        check_taps(coeffs)?;
        check_block_size(block_size)?;
        if coeffs.len() != delays.len() {
            log::debug!("{} coefficients but {} delays", coeffs.len(), delays.len());
            return Err(Error::LengthError);
        }
        if let Some(delay) = delays.iter().find(|d| **d > max_delay) {
            log::debug!("tap delay {} exceeds maximum {}", delay, max_delay);
            return Err(Error::ArgumentError);
        }
        log::trace!("sparse fir with {} taps, max delay {}", coeffs.len(), max_delay);
        Ok(Self {
            coeffs: coeffs.into(),
            delays: delays.into(),
            max_delay: max_delay as usize,
            history: History::new(max_delay as usize, block_size),
        })
    }

    /// Tap delays.
    pub fn delays(&self) -> &[u16] {
        &self.delays
    }

    /// Clears the state.
    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Filters `src` into `dst`.
    pub fn process(&mut self, src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), dst.len());
        let block_size = self.history.block_size();
        for (src, dst) in src.chunks(block_size).zip(dst.chunks_mut(block_size)) {
            let buffer = self.history.load(src);
            for (i, y) in dst.iter_mut().enumerate() {
                let newest = self.max_delay + i;
                let acc = self
                    .coeffs
                    .iter()
                    .zip(self.delays.iter())
                    .fold(T::acc_zero(), |acc, (c, d)| {
                        T::mac(acc, *c, buffer[newest - *d as usize])
                    });
                *y = T::from_acc(acc);
            }
            self.history.advance(src.len());
        }
    }
}
