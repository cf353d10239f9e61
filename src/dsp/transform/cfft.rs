//! Radix-4 complex FFT.

// Based on CMSIS DSP Library code (c) 2010 by ARM Limited

use alloc::boxed::Box;

use super::{rotation_table, FftSample};
use crate::error::{Error, Result};

/// Supported transform lengths in complex samples.
pub const CFFT_LENGTHS: [usize; 4] = [16, 64, 256, 1024];

/// Reorders `fft_len` complex values from base-4 digit-reversed order to
/// natural order, or back.
///
/// `fft_len` must be a power of four and `data` hold `2 * fft_len` values.
pub fn digit_reverse<T>(data: &mut [T], fft_len: usize) {
    assert!(fft_len.is_power_of_two() && fft_len.trailing_zeros() % 2 == 0);
    assert_eq!(data.len(), 2 * fft_len);
    let digits = fft_len.trailing_zeros() / 2;
    for i in 0..fft_len {
        let mut index = i;
        let mut reversed = 0;
        for _ in 0..digits {
            reversed = (reversed << 2) | (index & 3);
            index >>= 2;
        }
        if reversed > i {
            data.swap(2 * i, 2 * reversed);
            data.swap(2 * i + 1, 2 * reversed + 1);
        }
    }
}

/// In-place radix-4 decimation in frequency FFT.
///
/// The floating point inverse transform is scaled by `1 / N`. Without
/// digit reversal the output stays in base-4 digit-reversed order, see
/// [`digit_reverse`].
#[derive(Debug, Clone)]
pub struct Cfft<T> {
    fft_len: usize,
    inverse: bool,
    digit_reversal: bool,
    twiddle: Box<[T]>,
}

impl<T: FftSample> Cfft<T> {
    /// Creates a transform of `fft_len` complex samples.
    ///
    /// Lengths other than [`CFFT_LENGTHS`] are an [`Error::ArgumentError`].
    pub fn new(fft_len: usize, inverse: bool, digit_reversal: bool) -> Result<Self> {
        if !CFFT_LENGTHS.contains(&fft_len) {
            log::debug!("unsupported cfft length {}", fft_len);
            return Err(Error::ArgumentError);
        }
        Ok(Self::with_len(fft_len, inverse, digit_reversal))
    }

    // Any power of four, used by the real transforms.
    pub(crate) fn with_len(fft_len: usize, inverse: bool, digit_reversal: bool) -> Self {
        log::trace!("cfft of length {}, inverse {}", fft_len, inverse);
        let step = 2.0 * core::f64::consts::PI / fft_len as f64;
        Self {
            fft_len,
            inverse,
            digit_reversal,
            twiddle: rotation_table(fft_len, |k| step * k as f64),
        }
    }

    /// Transform length in complex samples.
    pub fn fft_len(&self) -> usize {
        self.fft_len
    }

    /// Whether this is an inverse transform.
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Transforms `data`, which holds `2 * fft_len` interleaved values.
    pub fn process(&self, data: &mut [T]) {
        assert_eq!(data.len(), 2 * self.fft_len);
        self.butterflies(data);
        if self.digit_reversal {
            digit_reverse(data, self.fft_len);
        }
        if self.inverse {
            let factor = 1.0 / self.fft_len as f32;
            for x in data.iter_mut() {
                *x = T::normalize(*x, factor);
            }
        }
    }

    #[inline]
    fn rotate(&self, (re, im): (T, T), m: usize) -> (T, T) {
        if m == 0 {
            return (re, im);
        }
        let c = self.twiddle[2 * m];
        let s = self.twiddle[2 * m + 1];
        if self.inverse {
            T::mul_conj(re, im, c, s.sat_neg())
        } else {
            T::mul_conj(re, im, c, s)
        }
    }

    fn butterflies(&self, data: &mut [T]) {
        let n = self.fft_len;
        let load = |data: &[T], i: usize| (T::stage_scale(data[2 * i]), T::stage_scale(data[2 * i + 1]));
        let mut span = n;
        while span >= 4 {
            let quarter = span / 4;
            let stride = n / span;
            for group in (0..n).step_by(span) {
                for j in 0..quarter {
                    let i0 = group + j;
                    let (i1, i2, i3) = (i0 + quarter, i0 + 2 * quarter, i0 + 3 * quarter);
                    let (ar, ai) = load(data, i0);
                    let (br, bi) = load(data, i1);
                    let (cr, ci) = load(data, i2);
                    let (dr, di) = load(data, i3);

                    let (t0r, t0i) = (ar.sat_add(cr), ai.sat_add(ci));
                    let (t1r, t1i) = (ar.sat_sub(cr), ai.sat_sub(ci));
                    let (t2r, t2i) = (br.sat_add(dr), bi.sat_add(di));
                    let (t3r, t3i) = (br.sat_sub(dr), bi.sat_sub(di));

                    let y0 = (t0r.sat_add(t2r), t0i.sat_add(t2i));
                    let y2 = (t0r.sat_sub(t2r), t0i.sat_sub(t2i));
                    // t1 -+ i t3
                    let minus = (t1r.sat_add(t3i), t1i.sat_sub(t3r));
                    let plus = (t1r.sat_sub(t3i), t1i.sat_add(t3r));
                    let (y1, y3) = if self.inverse { (plus, minus) } else { (minus, plus) };

                    let y1 = self.rotate(y1, j * stride);
                    let y2 = self.rotate(y2, 2 * j * stride);
                    let y3 = self.rotate(y3, 3 * j * stride);
                    for (i, (re, im)) in [(i0, y0), (i1, y1), (i2, y2), (i3, y3)] {
                        data[2 * i] = re;
                        data[2 * i + 1] = im;
                    }
                }
            }
            span /= 4;
        }
    }
}
