//! Real FFT built on a half-length complex FFT.

use alloc::boxed::Box;
use alloc::vec;

use super::{rotation_table, Cfft, FftSample};
use crate::error::{Error, Result};

/// Supported transform lengths in real samples.
pub const RFFT_LENGTHS: [usize; 3] = [128, 512, 2048];

/// Real FFT of `N` samples.
///
/// The forward transform packs even and odd samples into an `N / 2` point
/// complex FFT and splits the result into the full spectrum of `N` complex
/// bins. The inverse transform takes the full spectrum and returns `N` real
/// samples.
///
/// Fixed-point forward output is the DFT divided by `N`, and the inverse
/// computes the inverse DFT, so a fixed-point round trip divides by `N`.
#[derive(Debug, Clone)]
pub struct Rfft<T> {
    fft_len: usize,
    inverse: bool,
    cfft: Cfft<T>,
    twiddle: Box<[T]>,
    scratch: Box<[T]>,
}

impl<T: FftSample> Rfft<T> {
    /// Creates a transform of `fft_len` real samples.
    ///
    /// Lengths other than [`RFFT_LENGTHS`] are an [`Error::ArgumentError`].
    pub fn new(fft_len: usize, inverse: bool) -> Result<Self> {
        if !RFFT_LENGTHS.contains(&fft_len) {
            log::debug!("unsupported rfft length {}", fft_len);
            return Err(Error::ArgumentError);
        }
        log::trace!("rfft of length {}, inverse {}", fft_len, inverse);
        let half = fft_len / 2;
        let step = 2.0 * core::f64::consts::PI / fft_len as f64;
        Ok(Self {
            fft_len,
            inverse,
            cfft: Cfft::with_len(half, inverse, true),
            twiddle: rotation_table(half, |k| step * k as f64),
            scratch: vec![T::ZERO; fft_len].into_boxed_slice(),
        })
    }

    /// Transform length in real samples.
    pub fn fft_len(&self) -> usize {
        self.fft_len
    }

    /// Whether this is an inverse transform.
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Forward: `src` holds `N` real samples, `dst` receives `2 * N` values.
    /// Inverse: `src` holds `2 * N` values, `dst` receives `N` samples.
    pub fn process(&mut self, src: &[T], dst: &mut [T]) {
        if self.inverse {
            self.process_inverse(src, dst);
        } else {
            self.process_forward(src, dst);
        }
    }

    fn process_forward(&mut self, src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), self.fft_len);
        assert_eq!(dst.len(), 2 * self.fft_len);
        let half = self.fft_len / 2;
        // Even samples are the real parts, odd samples the imaginary parts.
        self.scratch.copy_from_slice(src);
        self.cfft.process(&mut self.scratch);
        let z = &self.scratch;
        for k in 0..half {
            let r = (half - k) % half;
            let (ar, ai) = (T::split_scale(z[2 * k]), T::split_scale(z[2 * k + 1]));
            // Conjugate of the mirrored bin.
            let (br, bi) = (T::split_scale(z[2 * r]), T::split_scale(z[2 * r + 1]).sat_neg());
            let (er, ei) = (ar.sat_add(br), ai.sat_add(bi));
            let (dr, di) = (ar.sat_sub(br), ai.sat_sub(bi));
            // Odd part, -i * d.
            let (or, oi) = T::mul_conj(di, dr.sat_neg(), self.twiddle[2 * k], self.twiddle[2 * k + 1]);
            dst[2 * k] = er.sat_add(or);
            dst[2 * k + 1] = ei.sat_add(oi);
            dst[2 * (k + half)] = er.sat_sub(or);
            dst[2 * (k + half) + 1] = ei.sat_sub(oi);
        }
    }

    fn process_inverse(&mut self, src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), 2 * self.fft_len);
        assert_eq!(dst.len(), self.fft_len);
        let half = self.fft_len / 2;
        for k in 0..half {
            let (ar, ai) = (T::half(src[2 * k]), T::half(src[2 * k + 1]));
            let (br, bi) = (T::half(src[2 * (k + half)]), T::half(src[2 * (k + half) + 1]));
            let (er, ei) = (ar.sat_add(br), ai.sat_add(bi));
            let (or, oi) = T::mul_conj(
                ar.sat_sub(br),
                ai.sat_sub(bi),
                self.twiddle[2 * k],
                self.twiddle[2 * k + 1].sat_neg(),
            );
            // Even part plus i times the odd part.
            self.scratch[2 * k] = er.sat_sub(oi);
            self.scratch[2 * k + 1] = ei.sat_add(or);
        }
        self.cfft.process(&mut self.scratch);
        dst.copy_from_slice(&self.scratch);
    }
}
