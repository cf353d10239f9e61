//! Copy, fill, format conversion and circular buffers.

use alloc::boxed::Box;
use alloc::vec;

use super::fixed::{clip_q63_to_q31, ssat};
use super::{Sample, Q15, Q31, Q7};
use crate::error::{Error, Result};

/// Copies `src` into `dst`. Both slices must have the same length.
#[inline]
pub fn copy<T: Sample>(src: &[T], dst: &mut [T]) {
    dst.copy_from_slice(src);
}

/// Sets every element of `dst` to `value`.
#[inline]
pub fn fill<T: Sample>(value: T, dst: &mut [T]) {
    dst.fill(value);
}

fn convert<S: Copy, D>(src: &[S], dst: &mut [D], f: impl Fn(S) -> D) {
    assert_eq!(src.len(), dst.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d = f(*s);
    }
}

/// Converts floats to Q7, saturating values outside `[-1, 1)`.
pub fn float_to_q7(src: &[f32], dst: &mut [Q7]) {
    convert(src, dst, Q7::from_f32);
}

/// Converts floats to Q15, saturating values outside `[-1, 1)`.
pub fn float_to_q15(src: &[f32], dst: &mut [Q15]) {
    convert(src, dst, Q15::from_f32);
}

/// Converts floats to Q31, saturating values outside `[-1, 1)`.
pub fn float_to_q31(src: &[f32], dst: &mut [Q31]) {
    convert(src, dst, Q31::from_f32);
}

/// Converts Q7 values to floats.
pub fn q7_to_float(src: &[Q7], dst: &mut [f32]) {
    convert(src, dst, Q7::to_f32);
}

/// Converts Q15 values to floats.
pub fn q15_to_float(src: &[Q15], dst: &mut [f32]) {
    convert(src, dst, Q15::to_f32);
}

/// Converts Q31 values to floats.
pub fn q31_to_float(src: &[Q31], dst: &mut [f32]) {
    convert(src, dst, Q31::to_f32);
}

/// Widens Q7 to Q15.
pub fn q7_to_q15(src: &[Q7], dst: &mut [Q15]) {
    convert(src, dst, |x| (x as i16) << 8);
}

/// Widens Q7 to Q31.
pub fn q7_to_q31(src: &[Q7], dst: &mut [Q31]) {
    convert(src, dst, |x| (x as i32) << 24);
}

/// Narrows Q15 to Q7 by truncation.
pub fn q15_to_q7(src: &[Q15], dst: &mut [Q7]) {
    convert(src, dst, |x| (x >> 8) as i8);
}

/// Widens Q15 to Q31.
pub fn q15_to_q31(src: &[Q15], dst: &mut [Q31]) {
    convert(src, dst, |x| (x as i32) << 16);
}

/// Narrows Q31 to Q7 by truncation.
pub fn q31_to_q7(src: &[Q31], dst: &mut [Q7]) {
    convert(src, dst, |x| (x >> 24) as i8);
}

/// Narrows Q31 to Q15 by truncation.
pub fn q31_to_q15(src: &[Q31], dst: &mut [Q15]) {
    convert(src, dst, |x| (x >> 16) as i16);
}

/// Converts a Q31 value with `shift` integer bits of headroom back to Q31,
/// saturating.
#[inline]
pub fn q31_shl_sat(x: Q31, shift: u32) -> Q31 {
    clip_q63_to_q31((x as i64) << shift)
}

/// Converts a Q15 value with `shift` integer bits of headroom back to Q15,
/// saturating.
#[inline]
pub fn q15_shl_sat(x: Q15, shift: u32) -> Q15 {
    ssat((x as i32) << shift, 16) as i16
}

/// Ring buffer with a fixed stride between consecutive samples.
///
/// Writes and reads advance their own offset by `stride` after every sample,
/// wrapping at the end of the buffer.
#[derive(Debug)]
pub struct CircularBuffer<T> {
    buffer: Box<[T]>,
    stride: usize,
    write_offset: usize,
    read_offset: usize,
}

impl<T: Sample> CircularBuffer<T> {
    /// Creates a zeroed buffer of `len` samples.
    ///
    /// An empty buffer is a [`Error::LengthError`], a stride of zero or not
    /// below `len` an [`Error::ArgumentError`].
    pub fn new(len: usize, stride: usize) -> Result<Self> {
        if len == 0 {
            log::debug!("circular buffer needs at least one sample");
            return Err(Error::LengthError);
        }
        if stride == 0 || stride >= len {
            log::debug!("circular buffer stride {} invalid for length {}", stride, len);
            return Err(Error::ArgumentError);
        }
        Ok(Self {
            buffer: vec![T::ZERO; len].into_boxed_slice(),
            stride,
            write_offset: 0,
            read_offset: 0,
        })
    }

    /// Writes every `src_stride`-th sample of `src`.
    pub fn write(&mut self, src: &[T], src_stride: usize) {
        let len = self.buffer.len();
        let mut offset = self.write_offset;
        for sample in src.iter().step_by(src_stride.max(1)) {
            self.buffer[offset] = *sample;
            offset += self.stride;
            if offset >= len {
                offset -= len;
            }
        }
        self.write_offset = offset;
    }

    /// Reads `count` samples into `dst`, placing them `dst_stride` apart and
    /// wrapping at the end of `dst`.
    pub fn read(&mut self, dst: &mut [T], dst_stride: usize, count: usize) {
        if dst.is_empty() {
            return;
        }
        let len = self.buffer.len();
        let mut offset = self.read_offset;
        let mut d = 0;
        for _ in 0..count {
            dst[d] = self.buffer[offset];
            d += dst_stride;
            if d >= dst.len() {
                d = 0;
            }
            offset += self.stride;
            if offset >= len {
                offset -= len;
            }
        }
        self.read_offset = offset;
    }

    /// Current write offset.
    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// Current read offset.
    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    /// Underlying storage.
    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }
}
