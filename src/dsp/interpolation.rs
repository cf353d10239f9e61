//! Linear and bilinear table interpolation.
//!
//! Fixed-point lookups take their coordinate in 12.20 format: the upper 12
//! bits select the table entry and the lower 20 bits are the fraction
//! between it and the next one.

use alloc::boxed::Box;

use super::{Q15, Q31, Q7};
use crate::error::{Error, Result};

const FRACT_BITS: u32 = 20;
const FRACT_MASK: i32 = 0xF_FFFF;

// Splits a 12.20 coordinate into index and 20-bit fraction. Negative
// coordinates yield `None`.
#[inline]
fn split_12_20(x: Q31) -> Option<(usize, i64)> {
    if x < 0 {
        None
    } else {
        Some(((x >> FRACT_BITS) as usize, (x & FRACT_MASK) as i64))
    }
}

/// Linear interpolation in a table of samples `y(x1 + n * spacing)`.
#[derive(Debug, Clone)]
pub struct LinearInterp<T = f32> {
    x1: f32,
    spacing: f32,
    table: Box<[T]>,
}

impl LinearInterp<f32> {
    /// Creates an interpolator over `table`, whose first entry lies at `x1`.
    ///
    /// An empty table is an [`Error::LengthError`], a spacing that is not
    /// positive an [`Error::ArgumentError`].
    pub fn new(x1: f32, spacing: f32, table: &[f32]) -> Result<Self> {
        if table.is_empty() {
            log::debug!("interpolation table is empty");
            return Err(Error::LengthError);
        }
        if spacing.is_nan() || spacing <= 0.0 {
            log::debug!("interpolation spacing {} not positive", spacing);
            return Err(Error::ArgumentError);
        }
        Ok(Self {
            x1,
            spacing,
            table: table.into(),
        })
    }

    /// Value at `x`. Positions before the first or after the last entry
    /// return that entry.
    pub fn interpolate(&self, x: f32) -> f32 {
        let last = self.table.len() - 1;
        if x < self.x1 {
            return self.table[0];
        }
        let position = (x - self.x1) / self.spacing;
        let i = position as usize;
        if i >= last {
            return self.table[last];
        }
        let x0 = self.x1 + i as f32 * self.spacing;
        let y0 = self.table[i];
        let y1 = self.table[i + 1];
        y0 + (x - x0) * ((y1 - y0) / self.spacing)
    }

    /// Interpolates every value of `src` into `dst`.
    pub fn process(&self, src: &[f32], dst: &mut [f32]) {
        assert_eq!(src.len(), dst.len());
        for (d, x) in dst.iter_mut().zip(src) {
            *d = self.interpolate(*x);
        }
    }

    /// Table entries.
    pub fn table(&self) -> &[f32] {
        &self.table
    }
}

/// Linear interpolation of a Q31 table at the 12.20 position `x`.
///
/// Positions outside the table clamp to the first or last entry. An empty
/// table yields zero.
pub fn linear_interp_q31(table: &[Q31], x: Q31) -> Q31 {
    let Some(last) = table.len().checked_sub(1) else {
        return 0;
    };
    match split_12_20(x) {
        None => table[0],
        Some((i, _)) if i >= last => table[last],
        Some((i, fract)) => {
            let fract = fract << 11;
            let y0 = table[i] as i64;
            let y1 = table[i + 1] as i64;
            let y = ((y0 * (0x7FFF_FFFF - fract)) >> 32) + ((y1 * fract) >> 32);
            (y << 1) as i32
        }
    }
}

/// Linear interpolation of a Q15 table at the 12.20 position `x`.
pub fn linear_interp_q15(table: &[Q15], x: Q31) -> Q15 {
    let Some(last) = table.len().checked_sub(1) else {
        return 0;
    };
    match split_12_20(x) {
        None => table[0],
        Some((i, _)) if i >= last => table[last],
        Some((i, fract)) => {
            let y0 = table[i] as i64;
            let y1 = table[i + 1] as i64;
            let y = y0 * (FRACT_MASK as i64 - fract) + y1 * fract;
            (y >> FRACT_BITS) as i16
        }
    }
}

/// Linear interpolation of a Q7 table at the 12.20 position `x`.
pub fn linear_interp_q7(table: &[Q7], x: Q31) -> Q7 {
    let Some(last) = table.len().checked_sub(1) else {
        return 0;
    };
    match split_12_20(x) {
        None => table[0],
        Some((i, _)) if i >= last => table[last],
        Some((i, fract)) => {
            let y0 = table[i] as i64;
            let y1 = table[i + 1] as i64;
            let y = y0 * (FRACT_MASK as i64 - fract) + y1 * fract;
            (y >> FRACT_BITS) as i8
        }
    }
}

/// Bilinear interpolation in a row-major table of `rows` x `cols` samples.
///
/// The `x` coordinate runs along a row, the `y` coordinate selects the row.
/// Coordinates outside the table return zero.
#[derive(Debug, Clone)]
pub struct BilinearInterp<T> {
    rows: usize,
    cols: usize,
    data: Box<[T]>,
}

impl<T: Copy> BilinearInterp<T> {
    /// Creates an interpolator. `data` must hold `rows * cols` samples.
    pub fn new(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            log::debug!(
                "bilinear table of {} samples does not match {}x{}",
                data.len(),
                rows,
                cols
            );
            return Err(Error::LengthError);
        }
        Ok(Self {
            rows,
            cols,
            data: data.into(),
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    // The four corners around integer coordinates, `None` when outside.
    #[inline]
    fn corners(&self, xi: usize, yi: usize) -> Option<[T; 4]> {
        if xi >= self.cols || yi >= self.rows {
            return None;
        }
        let x1 = (xi + 1).min(self.cols - 1);
        let y1 = (yi + 1).min(self.rows - 1);
        let at = |x: usize, y: usize| self.data[y * self.cols + x];
        Some([at(xi, yi), at(x1, yi), at(xi, y1), at(x1, y1)])
    }
}

impl BilinearInterp<f32> {
    /// Value at `(x, y)`.
    pub fn interpolate(&self, x: f32, y: f32) -> f32 {
        if x < 0.0 || y < 0.0 {
            return 0.0;
        }
        let (xi, yi) = (x as usize, y as usize);
        let Some([f00, f10, f01, f11]) = self.corners(xi, yi) else {
            return 0.0;
        };
        let xf = x - xi as f32;
        let yf = y - yi as f32;
        f00 * (1.0 - xf) * (1.0 - yf) + f10 * xf * (1.0 - yf) + f01 * (1.0 - xf) * yf + f11 * xf * yf
    }
}

macro_rules! bilinear_fixed {
    ($ty:ty) => {
        impl BilinearInterp<$ty> {
            /// Value at the 12.20 coordinates `(x, y)`.
            pub fn interpolate(&self, x: Q31, y: Q31) -> $ty {
                let (Some((xi, xf)), Some((yi, yf))) = (split_12_20(x), split_12_20(y)) else {
                    return 0;
                };
                let Some([f00, f10, f01, f11]) = self.corners(xi, yi) else {
                    return 0;
                };
                let one = 1i128 << FRACT_BITS;
                let (xf, yf) = (xf as i128, yf as i128);
                let acc = f00 as i128 * (one - xf) * (one - yf)
                    + f10 as i128 * xf * (one - yf)
                    + f01 as i128 * (one - xf) * yf
                    + f11 as i128 * xf * yf;
                (acc >> (2 * FRACT_BITS)) as $ty
            }
        }
    };
}

bilinear_fixed!(Q31);
bilinear_fixed!(Q15);
bilinear_fixed!(Q7);
