//! Polyphase FIR interpolator.

use alloc::boxed::Box;

use super::{check_block_size, check_taps, History};
use crate::dsp::Sample;
use crate::error::{Error, Result};

/// Upsamples by `factor` and filters with a polyphase decomposition of the
/// coefficients.
///
/// For input `x[n]` the outputs are
/// `y[n * factor + j] = sum(b[j + p * factor] * x[n - p])`, no gain
/// compensation is applied.
#[derive(Debug, Clone)]
pub struct FirInterpolate<T> {
    coeffs: Box<[T]>,
    factor: usize,
    phase_length: usize,
    history: History<T>,
}

impl<T: Sample> FirInterpolate<T> {
    /// Creates an interpolator.
    ///
    /// A zero factor is an [`Error::ArgumentError`], a number of taps that is
    /// not a multiple of the factor an [`Error::LengthError`].
    pub fn new(coeffs: &[T], factor: usize, block_size: usize) -> Result<Self> {
        check_taps(coeffs)?;
        check_block_size(block_size)?;
        if factor == 0 {
            log::debug!("interpolation factor must not be zero");
            return Err(Error::ArgumentError);
        }
        if coeffs.len() % factor != 0 {
            log::debug!("{} taps not a multiple of factor {}", coeffs.len(), factor);
            return Err(Error::LengthError);
        }
        let phase_length = coeffs.len() / factor;
        log::trace!(
            "fir interpolator with {} phases of {} taps, block size {}",
            factor,
            phase_length,
            block_size
        );
        Ok(Self {
            coeffs: coeffs.into(),
            factor,
            phase_length,
            history: History::new(phase_length - 1, block_size),
        })
    }

    /// Interpolation factor.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Taps per polyphase branch.
    pub fn phase_length(&self) -> usize {
        self.phase_length
    }

    /// Clears the state.
    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Interpolates `src` into `dst`, which holds `factor` samples for every
    /// input sample.
    pub fn process(&mut self, src: &[T], dst: &mut [T]) {
        assert_eq!(dst.len(), src.len() * self.factor);
        let factor = self.factor;
        let phase_length = self.phase_length;
        let block_size = self.history.block_size();
        for (src, dst) in src
            .chunks(block_size)
            .zip(dst.chunks_mut(block_size * factor))
        {
            let buffer = self.history.load(src);
            for (n, outputs) in dst.chunks_exact_mut(factor).enumerate() {
                let window = &buffer[n..n + phase_length];
                for (j, y) in outputs.iter_mut().enumerate() {
                    let acc = self.coeffs[j..]
                        .iter()
                        .step_by(factor)
                        .zip(window.iter().rev())
                        .fold(T::acc_zero(), |acc, (c, x)| T::mac(acc, *c, *x));
                    *y = T::from_acc(acc);
                }
            }
            self.history.advance(src.len());
        }
    }
}
