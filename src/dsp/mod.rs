//! Signal processing kernels for fixed-point and floating-point data.
//!
//! Fixed-point data uses fractional formats: [`Q7`], [`Q15`] and [`Q31`]
//! hold values in `[-1, 1)` with 7, 15 and 31 fractional bits. Kernels are
//! generic over [`Sample`] where the arithmetic is the same for every format
//! and implemented per format where the output format or the intermediate
//! precision differs.

pub mod basic;
pub mod complex;
pub mod controller;
pub mod fast_math;
pub mod filtering;
pub mod fixed;
pub mod interpolation;
pub mod matrix;
pub mod sample;
pub mod simd;
pub mod stats;
pub mod support;
pub mod transform;

pub use sample::Sample;

/// 8-bit fractional data type in 1.7 format.
pub type Q7 = i8;

/// 16-bit fractional data type in 1.15 format.
pub type Q15 = i16;

/// 32-bit fractional data type in 1.31 format.
pub type Q31 = i32;

/// 64-bit fractional data type in 1.63 format.
pub type Q63 = i64;

/// 32-bit floating-point type.
pub type Float32 = f32;

/// 64-bit floating-point type.
pub type Float64 = f64;

/// Pi as used by the floating-point kernels.
pub const PI: f32 = core::f32::consts::PI;
