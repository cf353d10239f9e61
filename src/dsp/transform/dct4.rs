//! Type IV discrete cosine transform.

// Based on CMSIS DSP Library code (c) 2010 by ARM Limited

use alloc::boxed::Box;
use alloc::vec;

#[allow(unused_imports)]
use num_traits::float::Float;

use super::{rotation_table, Cfft, FftSample};
use crate::error::{Error, Result};

/// Supported transform lengths.
pub const DCT4_LENGTHS: [usize; 4] = [128, 512, 2048, 8192];

/// DCT-IV, `X[k] = sum(x[n] * cos(pi / N * (n + 1/2) * (k + 1/2)))`.
///
/// The transform rotates pairs of samples into an `N / 2` point complex
/// FFT. Floating point output is normalized by `sqrt(2 / N)`, which makes
/// the transform its own inverse. Fixed-point output is the unnormalized
/// transform divided by `N`.
#[derive(Debug, Clone)]
pub struct Dct4<T> {
    len: usize,
    normalize: f32,
    cfft: Cfft<T>,
    pre: Box<[T]>,
    post: Box<[T]>,
    scratch: Box<[T]>,
}

impl<T: FftSample> Dct4<T> {
    /// Creates a transform of `len` samples.
    ///
    /// Lengths other than [`DCT4_LENGTHS`] are an [`Error::ArgumentError`].
    pub fn new(len: usize) -> Result<Self> {
        if !DCT4_LENGTHS.contains(&len) {
            log::debug!("unsupported dct4 length {}", len);
            return Err(Error::ArgumentError);
        }
        log::trace!("dct4 of length {}", len);
        let half = len / 2;
        let step = core::f64::consts::PI / len as f64;
        Ok(Self {
            len,
            normalize: (2.0 / len as f32).sqrt(),
            cfft: Cfft::with_len(half, false, true),
            pre: rotation_table(half, |n| step * (n as f64 + 0.25)),
            post: rotation_table(half, |k| step * k as f64),
            scratch: vec![T::ZERO; len].into_boxed_slice(),
        })
    }

    /// Transform length.
    pub fn dct_len(&self) -> usize {
        self.len
    }

    /// Transforms `data` in place.
    pub fn process(&mut self, data: &mut [T]) {
        assert_eq!(data.len(), self.len);
        let n = self.len;
        let half = n / 2;
        for k in 0..half {
            let re = T::headroom(data[2 * k]);
            let im = T::headroom(data[n - 1 - 2 * k]);
            let (vr, vi) = T::mul_conj(re, im, self.pre[2 * k], self.pre[2 * k + 1]);
            self.scratch[2 * k] = vr;
            self.scratch[2 * k + 1] = vi;
        }
        self.cfft.process(&mut self.scratch);
        for k in 0..half {
            let (ur, ui) = T::mul_conj(
                self.scratch[2 * k],
                self.scratch[2 * k + 1],
                self.post[2 * k],
                self.post[2 * k + 1],
            );
            data[2 * k] = T::normalize(ur, self.normalize);
            data[n - 1 - 2 * k] = T::normalize(ui.sat_neg(), self.normalize);
        }
    }
}
