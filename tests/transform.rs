//! Tests for the complex FFT, real FFT and DCT-IV


use cortex_cmsis::dsp::transform::*;
use cortex_cmsis::dsp::{Sample, Q15, Q31};
use cortex_cmsis::Error;

fn to_f64<T: Sample>(data: &[T]) -> Vec<f64> {
    data.iter().map(|x| x.to_f32() as f64).collect()
}

fn quantize<T: Sample>(data: &[f32]) -> Vec<T> {
    data.iter().map(|x| T::from_f32(*x)).collect()
}

fn scaled(data: &[f64], factor: f64) -> Vec<f64> {
    data.iter().map(|x| x * factor).collect()
}

// Interleaved real signal with zero imaginary parts.
fn as_complex(real: &[f64]) -> Vec<f64> {
    real.iter().flat_map(|x| [*x, 0.0]).collect()
}

#[test]
fn cfft_f32_matches_dft() {
    let src = signals::noise(1, 1.0, 2 * 64);
    let expected = signals::dft(&to_f64(&src), false);

    let cfft = Cfft::<f32>::new(64, false, true).unwrap();
    assert_eq!(cfft.fft_len(), 64);
    let mut data = src.clone();
    cfft.process(&mut data);
    assert!(signals::max_error(&to_f64(&data), &expected) < 1e-3);
}

#[test]
fn cfft_f32_inverse_is_scaled() {
    let src = signals::noise(2, 1.0, 2 * 256);
    let expected = scaled(&signals::dft(&to_f64(&src), true), 1.0 / 256.0);

    let cfft = Cfft::<f32>::new(256, true, true).unwrap();
    assert!(cfft.is_inverse());
    let mut data = src.clone();
    cfft.process(&mut data);
    assert!(signals::max_error(&to_f64(&data), &expected) < 1e-5);
}

#[test]
fn cfft_round_trip() {
    let src = signals::noise(3, 1.0, 2 * 1024);
    let mut data = src.clone();
    Cfft::<f32>::new(1024, false, true).unwrap().process(&mut data);
    Cfft::<f32>::new(1024, true, true).unwrap().process(&mut data);
    signals::assert_close(&data, &src, 1e-5);
}

#[test]
fn cfft_fixed_point_is_divided_by_length() {
    let src = signals::noise(4, 0.5, 2 * 64);

    let q15: Vec<Q15> = quantize(&src);
    let expected = scaled(&signals::dft(&to_f64(&q15), false), 1.0 / 64.0);
    let mut data = q15.clone();
    Cfft::<Q15>::new(64, false, true).unwrap().process(&mut data);
    assert!(signals::max_error(&to_f64(&data), &expected) < 5e-4);

    let q31: Vec<Q31> = quantize(&src);
    let expected = scaled(&signals::dft(&to_f64(&q31), false), 1.0 / 64.0);
    let mut data = q31.clone();
    Cfft::<Q31>::new(64, false, true).unwrap().process(&mut data);
    assert!(signals::max_error(&to_f64(&data), &expected) < 1e-6);
}

#[test]
fn cfft_fixed_point_inverse() {
    let src = signals::noise(5, 0.5, 2 * 16);
    let q31: Vec<Q31> = quantize(&src);
    let expected = scaled(&signals::dft(&to_f64(&q31), true), 1.0 / 16.0);
    let mut data = q31.clone();
    Cfft::<Q31>::new(16, true, true).unwrap().process(&mut data);
    assert!(signals::max_error(&to_f64(&data), &expected) < 1e-6);
}

#[test]
fn digit_reversal_is_separate_step() {
    let src = signals::noise(6, 1.0, 2 * 64);

    let mut ordered = src.clone();
    Cfft::<f32>::new(64, false, true).unwrap().process(&mut ordered);

    let mut reversed = src.clone();
    Cfft::<f32>::new(64, false, false).unwrap().process(&mut reversed);
    assert_ne!(reversed, ordered);
    digit_reverse(&mut reversed, 64);
    assert_eq!(reversed, ordered);

    // swapping is its own inverse
    digit_reverse(&mut reversed, 64);
    digit_reverse(&mut reversed, 64);
    assert_eq!(reversed, ordered);
}

#[test]
fn digit_reverse_small() {
    // index 1 (01) swaps with 4 (10 00 in base 4)
    let mut data: Vec<u32> = (0..32).collect();
    digit_reverse(&mut data, 16);
    assert_eq!(&data[2..4], &[8, 9]);
    assert_eq!(&data[8..10], &[2, 3]);
    assert_eq!(&data[0..2], &[0, 1]);
}

#[test]
fn rfft_f32_full_spectrum() {
    let src = signals::noise(7, 1.0, 512);
    let expected = signals::dft(&as_complex(&to_f64(&src)), false);

    let mut rfft = Rfft::<f32>::new(512, false).unwrap();
    let mut spectrum = vec![0.0; 2 * 512];
    rfft.process(&src, &mut spectrum);
    assert!(signals::max_error(&to_f64(&spectrum), &expected) < 2e-3);
}

#[test]
fn rfft_f32_round_trip() {
    let src = signals::noise(8, 1.0, 128);
    let mut spectrum = vec![0.0; 2 * 128];
    let mut restored = vec![0.0; 128];
    Rfft::<f32>::new(128, false).unwrap().process(&src, &mut spectrum);
    let mut inverse = Rfft::<f32>::new(128, true).unwrap();
    assert!(inverse.is_inverse());
    inverse.process(&spectrum, &mut restored);
    signals::assert_close(&restored, &src, 1e-5);
}

#[test]
fn rfft_q31_is_divided_by_length() {
    let src: Vec<Q31> = quantize(&signals::noise(9, 0.5, 128));
    let expected = scaled(&signals::dft(&as_complex(&to_f64(&src)), false), 1.0 / 128.0);

    let mut spectrum = vec![0; 2 * 128];
    Rfft::<Q31>::new(128, false).unwrap().process(&src, &mut spectrum);
    assert!(signals::max_error(&to_f64(&spectrum), &expected) < 1e-6);

    // the round trip divides by the length once more
    let mut restored = vec![0; 128];
    Rfft::<Q31>::new(128, true).unwrap().process(&spectrum, &mut restored);
    let expected = scaled(&to_f64(&src), 1.0 / 128.0);
    assert!(signals::max_error(&to_f64(&restored), &expected) < 1e-6);
}

#[test]
fn rfft_q15_is_divided_by_length() {
    let src: Vec<Q15> = quantize(&signals::noise(9, 0.5, 128));
    let expected = scaled(&signals::dft(&as_complex(&to_f64(&src)), false), 1.0 / 128.0);

    let mut spectrum = vec![0; 2 * 128];
    Rfft::<Q15>::new(128, false).unwrap().process(&src, &mut spectrum);
    assert!(signals::max_error(&to_f64(&spectrum), &expected) < 1e-3);
}

#[test]
fn rfft_finds_sine_bin() {
    let src = signals::sine(8.0 / 128.0, 0.5, 128);
    wav_writer::write("rfft_sine.wav", &src).unwrap();

    let mut spectrum = vec![0.0; 2 * 128];
    Rfft::<f32>::new(128, false).unwrap().process(&src, &mut spectrum);
    let magnitudes: Vec<f32> = spectrum
        .chunks_exact(2)
        .map(|bin| (bin[0] * bin[0] + bin[1] * bin[1]).sqrt())
        .collect();
    let peak = magnitudes[..64]
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(bin, _)| bin);
    assert_eq!(peak, Some(8));
    assert!((magnitudes[8] - 32.0).abs() < 1e-3);
}

#[test]
fn dct4_f32_is_normalized() {
    let src = signals::noise(10, 1.0, 128);
    let factor = (2.0f64 / 128.0).sqrt();
    let expected = scaled(&signals::dct4(&to_f64(&src)), factor);

    let mut dct = Dct4::<f32>::new(128).unwrap();
    assert_eq!(dct.dct_len(), 128);
    let mut data = src.clone();
    dct.process(&mut data);
    assert!(signals::max_error(&to_f64(&data), &expected) < 1e-4);

    // normalized transform is its own inverse
    dct.process(&mut data);
    signals::assert_close(&data, &src, 1e-4);
}

#[test]
fn dct4_q31_is_divided_by_length() {
    let src: Vec<Q31> = quantize(&signals::noise(11, 0.5, 512));
    let expected = scaled(&signals::dct4(&to_f64(&src)), 1.0 / 512.0);

    let mut data = src.clone();
    Dct4::<Q31>::new(512).unwrap().process(&mut data);
    assert!(signals::max_error(&to_f64(&data), &expected) < 1e-6);
}

#[test]
fn dct4_q15_is_divided_by_length() {
    let src: Vec<Q15> = quantize(&signals::noise(9, 0.5, 128));
    let expected = scaled(&signals::dct4(&to_f64(&src)), 1.0 / 128.0);

    let mut data = src.clone();
    Dct4::<Q15>::new(128).unwrap().process(&mut data);
    assert!(signals::max_error(&to_f64(&data), &expected) < 1e-3);
}

#[test]
fn unsupported_lengths() {
    assert_eq!(Cfft::<f32>::new(32, false, true).err(), Some(Error::ArgumentError));
    assert_eq!(Cfft::<Q15>::new(4096, false, true).err(), Some(Error::ArgumentError));
    assert_eq!(Rfft::<Q31>::new(256, false).err(), Some(Error::ArgumentError));
    assert_eq!(Dct4::<f32>::new(100).err(), Some(Error::ArgumentError));
    assert!(CFFT_LENGTHS.iter().all(|n| Cfft::<Q31>::new(*n, true, true).is_ok()));
    assert!(RFFT_LENGTHS.iter().all(|n| Rfft::<f32>::new(*n, false).is_ok()));
}
