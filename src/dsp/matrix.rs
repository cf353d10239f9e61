//! Row-major matrices.
//!
//! Operations write into a destination matrix of the right shape and check
//! every dimension, returning [`Error::SizeMismatch`] otherwise.

use alloc::boxed::Box;
use alloc::vec;

#[allow(unused_imports)]
use num_traits::float::Float;

use super::filtering::FastMac;
use super::Sample;
use crate::error::{Error, Result};

/// Matrix with owned row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Box<[T]>,
}

fn check(condition: bool, operation: &str) -> Result<()> {
    if !condition {
        log::debug!("matrix {}: dimensions do not match", operation);
        return Err(Error::SizeMismatch);
    }
    Ok(())
}

impl<T: Sample> Matrix<T> {
    /// Creates a matrix from `rows * cols` values.
    pub fn new(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        if data.len() != rows * cols {
            log::debug!("{} values for a {}x{} matrix", data.len(), rows, cols);
            return Err(Error::LengthError);
        }
        Ok(Self {
            rows,
            cols,
            data: data.into(),
        })
    }

    /// Creates a matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::ZERO; rows * cols].into_boxed_slice(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Values in row-major order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable values in row-major order.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Value at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Sets the value at `row`, `col`.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// `dst = self + rhs`
    pub fn add(&self, rhs: &Self, dst: &mut Self) -> Result<()> {
        check(self.same_shape(rhs) && self.same_shape(dst), "add")?;
        for ((d, a), b) in dst.data.iter_mut().zip(self.data.iter()).zip(rhs.data.iter()) {
            *d = a.sat_add(*b);
        }
        Ok(())
    }

    /// `dst = self - rhs`
    pub fn sub(&self, rhs: &Self, dst: &mut Self) -> Result<()> {
        check(self.same_shape(rhs) && self.same_shape(dst), "sub")?;
        for ((d, a), b) in dst.data.iter_mut().zip(self.data.iter()).zip(rhs.data.iter()) {
            *d = a.sat_sub(*b);
        }
        Ok(())
    }

    fn check_mult(&self, rhs: &Self, dst: &Self) -> Result<()> {
        check(
            self.cols == rhs.rows && dst.rows == self.rows && dst.cols == rhs.cols,
            "mult",
        )
    }

    /// `dst = self * rhs`
    pub fn mult(&self, rhs: &Self, dst: &mut Self) -> Result<()> {
        self.check_mult(rhs, dst)?;
        for r in 0..self.rows {
            for c in 0..rhs.cols {
                let acc = (0..self.cols).fold(T::acc_zero(), |acc, k| {
                    T::mac(acc, self.get(r, k), rhs.get(k, c))
                });
                dst.set(r, c, T::from_acc(acc));
            }
        }
        Ok(())
    }

    /// `dst = self * fract * 2^shift`, see [`Sample::scale`].
    pub fn scale(&self, fract: T, shift: i8, dst: &mut Self) -> Result<()> {
        check(self.same_shape(dst), "scale")?;
        for (d, s) in dst.data.iter_mut().zip(self.data.iter()) {
            *d = s.scale(fract, shift);
        }
        Ok(())
    }

    /// `dst = self^T`
    pub fn trans(&self, dst: &mut Self) -> Result<()> {
        check(dst.rows == self.cols && dst.cols == self.rows, "trans")?;
        for r in 0..self.rows {
            for c in 0..self.cols {
                dst.set(c, r, self.get(r, c));
            }
        }
        Ok(())
    }
}

impl<T: FastMac> Matrix<T> {
    /// `dst = self * rhs` with the 32-bit accumulator of [`FastMac`].
    pub fn mult_fast(&self, rhs: &Self, dst: &mut Self) -> Result<()> {
        self.check_mult(rhs, dst)?;
        for r in 0..self.rows {
            for c in 0..rhs.cols {
                let acc = (0..self.cols).fold(0, |acc, k| T::fast_mac(acc, self.get(r, k), rhs.get(k, c)));
                dst.set(r, c, T::fast_result(acc, 0));
            }
        }
        Ok(())
    }
}

impl Matrix<f32> {
    /// Identity matrix of size `n`.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// `dst = self^-1` by Gauss-Jordan elimination with partial pivoting.
    ///
    /// A matrix without a usable pivot in some column is
    /// [`Error::Singular`].
    pub fn inverse(&self, dst: &mut Self) -> Result<()> {
        check(self.rows == self.cols && self.same_shape(dst), "inverse")?;
        let n = self.rows;
        let mut work = self.clone();
        *dst = Self::identity(n);
        for col in 0..n {
            let mut pivot = col;
            for row in col + 1..n {
                if work.get(row, col).abs() > work.get(pivot, col).abs() {
                    pivot = row;
                }
            }
            let value = work.get(pivot, col);
            if value == 0.0 || !value.is_finite() {
                log::debug!("matrix is singular in column {}", col);
                return Err(Error::Singular);
            }
            if pivot != col {
                work.swap_rows(pivot, col);
                dst.swap_rows(pivot, col);
            }
            let scale = 1.0 / value;
            work.scale_row(col, scale);
            dst.scale_row(col, scale);
            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = work.get(row, col);
                if factor != 0.0 {
                    work.sub_scaled_row(row, col, factor);
                    dst.sub_scaled_row(row, col, factor);
                }
            }
        }
        Ok(())
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    fn scale_row(&mut self, row: usize, factor: f32) {
        for value in &mut self.data[row * self.cols..(row + 1) * self.cols] {
            *value *= factor;
        }
    }

    // row -= factor * source
    fn sub_scaled_row(&mut self, row: usize, source: usize, factor: f32) {
        for c in 0..self.cols {
            let value = self.get(source, c);
            self.data[row * self.cols + c] -= factor * value;
        }
    }
}
