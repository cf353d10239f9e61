//! Tests for vector math, statistics, fast math, complex math and support
//! functions


use cortex_cmsis::dsp::basic::{self, dot_prod};
use cortex_cmsis::dsp::complex::*;
use cortex_cmsis::dsp::fast_math::*;
use cortex_cmsis::dsp::stats;
use cortex_cmsis::dsp::support::*;
use cortex_cmsis::dsp::{Sample, Q15, Q31, Q7};
use cortex_cmsis::Error;

use signals::assert_close;

#[test]
fn vector_arithmetic_f32() {
    let a = [1.0f32, -2.0, 3.5];
    let b = [0.5f32, 2.0, -1.5];
    let mut dst = [0.0; 3];

    basic::add(&a, &b, &mut dst);
    assert_eq!(dst, [1.5, 0.0, 2.0]);
    basic::sub(&a, &b, &mut dst);
    assert_eq!(dst, [0.5, -4.0, 5.0]);
    basic::mult(&a, &b, &mut dst);
    assert_eq!(dst, [0.5, -4.0, -5.25]);
    basic::negate(&a, &mut dst);
    assert_eq!(dst, [-1.0, 2.0, -3.5]);
    basic::abs(&a, &mut dst);
    assert_eq!(dst, [1.0, 2.0, 3.5]);
    basic::offset(&a, 1.0, &mut dst);
    assert_eq!(dst, [2.0, -1.0, 4.5]);
    basic::scale(&a, 0.5, 2, &mut dst);
    assert_eq!(dst, [2.0, -4.0, 7.0]);
    basic::shift(&a, -1, &mut dst);
    assert_eq!(dst, [0.5, -1.0, 1.75]);

    assert_eq!(dot_prod(&[1.0f32, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
}

#[test]
fn vector_arithmetic_saturates() {
    let mut dst = [0i16; 3];
    basic::add(&[30000, -30000, 100], &[10000, -10000, 1], &mut dst);
    assert_eq!(dst, [i16::MAX, i16::MIN, 101]);

    basic::mult(&[16384, i16::MIN, -16384], &[16384, i16::MIN, 16384], &mut dst);
    assert_eq!(dst, [8192, i16::MAX, -8192]);

    basic::negate(&[i16::MIN, 5, 0], &mut dst);
    assert_eq!(dst, [i16::MAX, -5, 0]);
    basic::abs(&[i16::MIN, -5, 7], &mut dst);
    assert_eq!(dst, [i16::MAX, 5, 7]);

    // 0.5 * 0.5 * 2
    basic::scale(&[16384, -16384, 32767], 16384, 1, &mut dst);
    assert_eq!(dst, [16384, -16384, 32767]);

    let mut wide = [0i32; 2];
    basic::shift(&[0x4000_0000, -8], 1, &mut wide);
    assert_eq!(wide, [i32::MAX, -16]);
    basic::shift(&[0x4000_0000, -8], -2, &mut wide);
    assert_eq!(wide, [0x1000_0000, -2]);

    let mut narrow = [0i8; 2];
    basic::offset(&[120, -120], 64, &mut narrow);
    assert_eq!(narrow, [127, -56]);
    basic::sub(&[-100, 100], &[100, -100], &mut narrow);
    assert_eq!(narrow, [i8::MIN, i8::MAX]);
}

#[test]
fn dot_products_fixed() {
    assert_eq!(dot_prod::<Q15>(&[16384, 16384], &[16384, -32768]), -(1 << 28));
    assert_eq!(dot_prod::<Q31>(&[1 << 30, 1 << 30], &[1 << 30, 0]), 1 << 46);
    assert_eq!(dot_prod::<Q7>(&[64, -64, 127], &[64, 64, 1]), 127);
}

#[test]
fn statistics_f32() {
    let data = [1.0f32, 2.0, 3.0, 4.0];
    assert_eq!(stats::max(&[1.0f32, 5.0, 5.0, -2.0]), Ok((5.0, 1)));
    assert_eq!(stats::min(&[1.0f32, 5.0, 5.0, -2.0]), Ok((-2.0, 3)));
    assert_eq!(stats::mean(&data), Ok(2.5));
    assert_eq!(stats::power(&data), Ok(30.0));
    assert!((stats::rms(&data).unwrap() - 7.5f32.sqrt()).abs() < 1e-6);
    assert!((stats::var(&data).unwrap() - 5.0 / 3.0).abs() < 1e-6);
    assert!((stats::std(&data).unwrap() - (5.0f32 / 3.0).sqrt()).abs() < 1e-6);
}

#[test]
fn statistics_reject_short_blocks() {
    let empty: [f32; 0] = [];
    assert_eq!(stats::max(&empty), Err(Error::LengthError));
    assert_eq!(stats::mean(&empty), Err(Error::LengthError));
    assert_eq!(stats::rms::<Q15>(&[]), Err(Error::LengthError));
    assert_eq!(stats::var(&[1.0f32]), Err(Error::LengthError));
    assert_eq!(stats::std::<Q31>(&[5]), Err(Error::LengthError));
}

#[test]
fn statistics_fixed() {
    assert_eq!(stats::mean::<Q15>(&[1000, 2000, 3000]), Ok(2000));
    assert_eq!(stats::max::<Q31>(&[-3, 7, 2]), Ok((7, 1)));

    // 0.5 and -0.5
    let q15 = [0x4000i16, -0x4000];
    assert_eq!(stats::var(&q15), Ok(0x4000));
    assert_eq!(stats::rms(&q15), Ok(0x4000));
    assert_eq!(stats::std(&q15), Ok(23170));
    assert_eq!(stats::power(&q15), Ok(1 << 29));

    let q31 = [0x4000_0000i32, -0x4000_0000];
    assert_eq!(stats::var(&q31), Ok(0x4000_0000));
    assert_eq!(stats::rms(&q31), Ok(0x4000_0000));

    assert_eq!(stats::rms::<Q7>(&[64, -64]), Ok(64));
}

#[test]
fn statistics_of_long_loud_blocks() {
    // constant blocks have no variance
    assert_eq!(stats::var(&vec![i16::MIN; 100_000]), Ok(0));
    assert_eq!(stats::var(&vec![i32::MIN; 140_000]), Ok(0));
    assert_eq!(stats::var(&vec![i8::MIN; 200_000]), Ok(0));

    // alternating +-0.5 approaches a variance of 0.25
    let q15: Vec<Q15> = (0..100_000)
        .map(|n| if n % 2 == 0 { 0x4000 } else { -0x4000 })
        .collect();
    assert_eq!(stats::var(&q15), Ok(0x2000));
    assert_eq!(stats::std(&q15), Ok(0x4000));

    let q31: Vec<Q31> = (0..140_000)
        .map(|n| if n % 2 == 0 { 0x4000_0000 } else { -0x4000_0000 })
        .collect();
    let var = stats::var(&q31).unwrap();
    assert!((var - 0x2000_0000).abs() < 1 << 13, "{var:#x}");
}

#[test]
fn sine_and_cosine_f32() {
    for n in -200..200 {
        let x = n as f32 * 0.05;
        assert!((sin_f32(x) - x.sin()).abs() < 2e-4, "sin({x})");
        assert!((cos_f32(x) - x.cos()).abs() < 2e-4, "cos({x})");
    }

    let (s, c) = sin_cos_f32(90.0);
    assert!((s - 1.0).abs() < 1e-6 && c.abs() < 1e-6);
    let (s, c) = sin_cos_f32(-45.0);
    assert!((s + 0.5f32.sqrt()).abs() < 1e-4 && (c - 0.5f32.sqrt()).abs() < 1e-4);
}

#[test]
fn sine_and_cosine_fixed() {
    assert_eq!(sin_q31(0), 0);
    assert_eq!(sin_q31(0x2000_0000), i32::MAX);
    assert_eq!(cos_q31(0), i32::MAX);
    assert_eq!(sin_q15(0x2000), i16::MAX);

    for n in 0..997 {
        let phase = n as f64 / 997.0;
        let expected = (2.0 * std::f64::consts::PI * phase).sin();
        let q31 = sin_q31((phase * 2147483648.0) as i32) as f64 / 2147483648.0;
        assert!((q31 - expected).abs() < 2e-4, "sin_q31 at {phase}");
        let q15 = sin_q15((phase * 32768.0) as i16) as f64 / 32768.0;
        assert!((q15 - expected).abs() < 5e-4, "sin_q15 at {phase}");
    }

    // negative phases wrap into the period
    assert_eq!(sin_q31(-0x2000_0000), sin_q31(0x6000_0000));

    // 90 degrees
    let (s, c) = sin_cos_q31(0x4000_0000);
    assert_eq!(s, i32::MAX);
    assert!(c.abs() < 1 << 12);
}

#[test]
fn square_roots() {
    assert_eq!(sqrt_f32(0.0), Ok(0.0));
    assert_eq!(sqrt_f32(2.25), Ok(1.5));
    assert_eq!(sqrt_f32(-1.0), Err(Error::ArgumentError));

    assert_eq!(sqrt_q31(0x2000_0000), Ok(0x4000_0000));
    assert_eq!(sqrt_q31(0), Ok(0));
    assert_eq!(sqrt_q31(i32::MAX), Ok(i32::MAX));
    assert_eq!(sqrt_q31(-1), Err(Error::ArgumentError));

    assert_eq!(sqrt_q15(0x2000), Ok(0x4000));
    assert_eq!(sqrt_q15(-5), Err(Error::ArgumentError));
}

#[test]
fn complex_f32() {
    let a = [1.0f32, 2.0, 3.0, -4.0];
    let b = [3.0f32, 4.0, 0.5, 0.0];
    let mut dst = [0.0; 4];

    cmplx_conj(&a, &mut dst);
    assert_eq!(dst, [1.0, -2.0, 3.0, 4.0]);

    cmplx_mult_cmplx(&a, &b, &mut dst);
    assert_eq!(dst, [-5.0, 10.0, 1.5, -2.0]);

    cmplx_mult_real(&a, &[2.0, 0.5], &mut dst);
    assert_eq!(dst, [2.0, 4.0, 1.5, -2.0]);

    let mut mag = [0.0; 2];
    cmplx_mag(&[3.0f32, 4.0, 0.0, -2.0], &mut mag);
    assert_eq!(mag, [5.0, 2.0]);
    cmplx_mag_squared(&[3.0f32, 4.0, 0.0, -2.0], &mut mag);
    assert_eq!(mag, [25.0, 4.0]);

    assert_eq!(cmplx_dot_prod(&a, &b), (-5.0 + 1.5, 10.0 - 2.0));
}

#[test]
fn complex_fixed_formats() {
    // 0.5 and 0.5 + 0.5i
    let mut mag = [0i16; 1];
    cmplx_mag::<Q15>(&[16384, 0], &mut mag);
    assert_eq!(mag, [8192]);
    cmplx_mag_squared::<Q15>(&[16384, 16384], &mut mag);
    assert_eq!(mag, [4096]);

    let mut product = [0i16; 2];
    cmplx_mult_cmplx::<Q15>(&[16384, 0], &[16384, 16384], &mut product);
    assert_eq!(product, [2048, 2048]);

    let mut mag = [0i32; 1];
    cmplx_mag::<Q31>(&[1 << 30, 0], &mut mag);
    assert_eq!(mag, [1 << 29]);

    let mut product = [0i32; 2];
    cmplx_mult_cmplx::<Q31>(&[1 << 30, 0], &[1 << 30, 1 << 30], &mut product);
    assert_eq!(product, [1 << 27, 1 << 27]);

    let (re, im) = cmplx_dot_prod::<Q15>(&[16384, 0], &[16384, 16384]);
    assert_eq!((re, im), (1 << 22, 1 << 22));
}

#[test]
fn format_conversion() {
    let mut q15 = [0i16; 4];
    float_to_q15(&[0.5, -1.0, 1.5, -2.0], &mut q15);
    assert_eq!(q15, [16384, -32768, 32767, -32768]);

    let mut q31 = [0i32; 2];
    float_to_q31(&[0.25, -0.5], &mut q31);
    assert_eq!(q31, [1 << 29, -(1 << 30)]);

    let mut q7 = [0i8; 2];
    float_to_q7(&[0.5, 2.0], &mut q7);
    assert_eq!(q7, [64, 127]);

    let mut floats = [0.0f32; 2];
    q15_to_float(&[16384, -32768], &mut floats);
    assert_eq!(floats, [0.5, -1.0]);
    q31_to_float(&[1 << 29, 0], &mut floats);
    assert_eq!(floats, [0.25, 0.0]);
    q7_to_float(&[-64, 32], &mut floats);
    assert_eq!(floats, [-0.5, 0.25]);

    let mut q15 = [0i16; 2];
    q7_to_q15(&[64, -128], &mut q15);
    assert_eq!(q15, [16384, i16::MIN]);
    q31_to_q15(&[0x4000_0000, -1], &mut q15);
    assert_eq!(q15, [0x4000, -1]);

    let mut q31 = [0i32; 2];
    q7_to_q31(&[-128, 1], &mut q31);
    assert_eq!(q31, [i32::MIN, 1 << 24]);
    q15_to_q31(&[0x4000, -1], &mut q31);
    assert_eq!(q31, [0x4000_0000, -(1 << 16)]);

    let mut q7 = [0i8; 2];
    q15_to_q7(&[0x7FFF, -0x4000], &mut q7);
    assert_eq!(q7, [0x7F, -0x40]);
    q31_to_q7(&[0x4000_0000, i32::MIN], &mut q7);
    assert_eq!(q7, [0x40, i8::MIN]);

    let values = [0.125f32, -0.75];
    let mut fixed = [0i32; 2];
    let mut back = [0.0f32; 2];
    float_to_q31(&values, &mut fixed);
    q31_to_float(&fixed, &mut back);
    assert_close(&back, &values, 1e-9);
}

#[test]
fn headroom_removal() {
    assert_eq!(q31_shl_sat(0x1000_0000, 2), 0x4000_0000);
    assert_eq!(q31_shl_sat(0x4000_0000, 1), i32::MAX);
    assert_eq!(q31_shl_sat(-0x4000_0000, 2), i32::MIN);
    assert_eq!(q15_shl_sat(0x0100, 4), 0x1000);
    assert_eq!(q15_shl_sat(-0x4000, 2), i16::MIN);
}

#[test]
fn copy_and_fill() {
    let mut dst = [0i16; 3];
    fill(7, &mut dst);
    assert_eq!(dst, [7, 7, 7]);
    copy(&[1, 2, 3], &mut dst);
    assert_eq!(dst, [1, 2, 3]);
    assert_eq!(<f32 as Sample>::ZERO, 0.0);
}

#[test]
fn circular_buffer() {
    assert_eq!(
        CircularBuffer::<Q15>::new(0, 1).map(|_| ()),
        Err(Error::LengthError)
    );
    assert_eq!(
        CircularBuffer::<Q15>::new(4, 0).map(|_| ()),
        Err(Error::ArgumentError)
    );
    assert_eq!(
        CircularBuffer::<Q15>::new(4, 4).map(|_| ()),
        Err(Error::ArgumentError)
    );

    let mut buffer = CircularBuffer::<Q15>::new(8, 1).unwrap();
    buffer.write(&[1, 2, 3, 4, 5], 1);
    assert_eq!(buffer.as_slice(), &[1, 2, 3, 4, 5, 0, 0, 0]);
    assert_eq!(buffer.write_offset(), 5);

    let mut out = [0; 3];
    buffer.read(&mut out, 1, 3);
    assert_eq!(out, [1, 2, 3]);
    assert_eq!(buffer.read_offset(), 3);

    // wraps at the end of the buffer
    buffer.write(&[6, 7, 8, 9], 1);
    assert_eq!(buffer.as_slice(), &[9, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(buffer.write_offset(), 1);

    let mut out = [0; 5];
    buffer.read(&mut out, 1, 5);
    assert_eq!(out, [4, 5, 6, 7, 8]);
    assert_eq!(buffer.read_offset(), 0);
}

#[test]
fn circular_buffer_strides() {
    let mut buffer = CircularBuffer::<f32>::new(6, 2).unwrap();
    buffer.write(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0], 2);
    assert_eq!(buffer.as_slice(), &[10.0, 0.0, 12.0, 0.0, 14.0, 0.0]);
    assert_eq!(buffer.write_offset(), 0);

    let mut out = [0.0; 4];
    buffer.read(&mut out, 2, 2);
    assert_eq!(out, [10.0, 0.0, 12.0, 0.0]);
}
