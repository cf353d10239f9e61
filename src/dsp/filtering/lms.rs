//! Adaptive LMS and normalized LMS filters.
//!
//! Both filters compute `y[n] = sum(w[k] * x[n - k])`, the error
//! `e[n] = d[n] - y[n]` against a reference signal, and update
//! `w[k] += step * e[n] * x[n - k]` after every sample. The normalized
//! variant divides the step by the energy of the samples in the filter.

// Based on CMSIS DSP Library code (c) 2010 by ARM Limited

use alloc::boxed::Box;

use super::{check_block_size, check_taps, dot_reversed, FilterSample, History};
use crate::dsp::fixed::{clip_q63_to_q31, recip_q15, recip_q31, ssat};
use crate::dsp::{Q15, Q31};
use crate::error::{Error, Result};

fn check_post_shift(post_shift: u8, frac_bits: u32) -> Result<()> {
    if post_shift as u32 > frac_bits {
        log::debug!("post shift {} exceeds {} fractional bits", post_shift, frac_bits);
        return Err(Error::ArgumentError);
    }
    Ok(())
}

#[inline]
fn update<T: FilterSample>(weights: &mut [T], window: &[T], step: T) {
    for (w, x) in weights.iter_mut().zip(window.iter().rev()) {
        *w = w.sat_add(step.sat_mul(*x));
    }
}

/// LMS adaptive filter.
#[derive(Debug, Clone)]
pub struct Lms<T> {
    coeffs: Box<[T]>,
    mu: T,
    post_shift: u8,
    history: History<T>,
}

impl<T: FilterSample> Lms<T> {
    /// Creates a filter with initial coefficients and step size `mu`.
    ///
    /// Fixed-point outputs are multiplied by `2^post_shift`.
    pub fn new(coeffs: &[T], mu: T, post_shift: u8, block_size: usize) -> Result<Self> {
        check_taps(coeffs)?;
        check_block_size(block_size)?;
        check_post_shift(post_shift, T::FRAC_BITS)?;
        log::trace!("lms with {} taps, mu {:?}", coeffs.len(), mu);
        Ok(Self {
            coeffs: coeffs.into(),
            mu,
            post_shift,
            history: History::new(coeffs.len() - 1, block_size),
        })
    }

    /// Current coefficients in natural order.
    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Step size.
    pub fn mu(&self) -> T {
        self.mu
    }

    /// Clears the input history, keeping the adapted coefficients.
    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Filters `src`, adapting towards `reference`. Writes the filter output
    /// to `out` and the error to `err`.
    pub fn process(&mut self, src: &[T], reference: &[T], out: &mut [T], err: &mut [T]) {
        assert!(src.len() == reference.len() && src.len() == out.len() && src.len() == err.len());
        let taps = self.coeffs.len();
        let block_size = self.history.block_size();
        for (((src, reference), out), err) in src
            .chunks(block_size)
            .zip(reference.chunks(block_size))
            .zip(out.chunks_mut(block_size))
            .zip(err.chunks_mut(block_size))
        {
            let buffer = self.history.load(src);
            for i in 0..src.len() {
                let window = &buffer[i..i + taps];
                let y = T::from_acc_shifted(dot_reversed(&self.coeffs, window), self.post_shift);
                let e = reference[i].sat_sub(y);
                out[i] = y;
                err[i] = e;
                update(&mut self.coeffs, window, self.mu.sat_mul(e));
            }
            self.history.advance(src.len());
        }
    }
}

/// Formats with a normalized LMS step.
pub trait NormalizedStep: FilterSample {
    /// Divides `err_mu` by the input energy.
    fn normalize(err_mu: Self, energy: Self) -> Self;
}

impl NormalizedStep for f32 {
    #[inline]
    fn normalize(err_mu: f32, energy: f32) -> f32 {
        err_mu / (energy + 0.000_000_119_209_29)
    }
}

impl NormalizedStep for Q15 {
    #[inline]
    fn normalize(err_mu: Q15, energy: Q15) -> Q15 {
        let (recip, shift) = recip_q15(energy.saturating_add(5));
        ssat((err_mu as i32 * recip as i32) >> (15 - shift), 16) as i16
    }
}

impl NormalizedStep for Q31 {
    #[inline]
    fn normalize(err_mu: Q31, energy: Q31) -> Q31 {
        let (recip, shift) = recip_q31(energy.saturating_add(0x100));
        clip_q63_to_q31((err_mu as i64 * recip as i64) >> (31 - shift))
    }
}

/// Normalized LMS adaptive filter.
#[derive(Debug, Clone)]
pub struct LmsNorm<T> {
    coeffs: Box<[T]>,
    mu: T,
    post_shift: u8,
    energy: T,
    history: History<T>,
}

impl<T: NormalizedStep> LmsNorm<T> {
    /// Creates a filter with initial coefficients and step size `mu`.
    pub fn new(coeffs: &[T], mu: T, post_shift: u8, block_size: usize) -> Result<Self> {
        check_taps(coeffs)?;
        check_block_size(block_size)?;
        check_post_shift(post_shift, T::FRAC_BITS)?;
        log::trace!("normalized lms with {} taps, mu {:?}", coeffs.len(), mu);
        Ok(Self {
            coeffs: coeffs.into(),
            mu,
            post_shift,
            energy: T::ZERO,
            // One extra sample to remove the oldest one from the energy.
            history: History::new(coeffs.len(), block_size),
        })
    }

    /// Current coefficients in natural order.
    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Energy of the samples in the filter.
    pub fn energy(&self) -> T {
        self.energy
    }

    /// Clears the input history and the energy, keeping the adapted
    /// coefficients.
    pub fn reset(&mut self) {
        self.history.reset();
        self.energy = T::ZERO;
    }

    /// Filters `src`, adapting towards `reference`. Writes the filter output
    /// to `out` and the error to `err`.
    pub fn process(&mut self, src: &[T], reference: &[T], out: &mut [T], err: &mut [T]) {
        assert!(src.len() == reference.len() && src.len() == out.len() && src.len() == err.len());
        let taps = self.coeffs.len();
        let block_size = self.history.block_size();
        for (((src, reference), out), err) in src
            .chunks(block_size)
            .zip(reference.chunks(block_size))
            .zip(out.chunks_mut(block_size))
            .zip(err.chunks_mut(block_size))
        {
            let buffer = self.history.load(src);
            for i in 0..src.len() {
                let oldest = buffer[i];
                let newest = buffer[i + taps];
                self.energy = self
                    .energy
                    .sat_sub(oldest.sat_mul(oldest))
                    .sat_add(newest.sat_mul(newest));
                let window = &buffer[i + 1..i + 1 + taps];
                let y = T::from_acc_shifted(dot_reversed(&self.coeffs, window), self.post_shift);
                let e = reference[i].sat_sub(y);
                out[i] = y;
                err[i] = e;
                let step = T::normalize(self.mu.sat_mul(e), self.energy);
                update(&mut self.coeffs, window, step);
            }
            self.history.advance(src.len());
        }
    }
}
