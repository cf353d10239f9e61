//! Tests for FIR, biquad, lattice and adaptive filters, convolution and
//! correlation


use cortex_cmsis::dsp::filtering::*;
use cortex_cmsis::dsp::{Sample, Q15, Q31};
use cortex_cmsis::Error;

use signals::assert_close;

#[test]
fn fir_impulse_response() {
    let coeffs = [0.5f32, 0.25, -0.125];
    let mut fir = Fir::new(&coeffs, 2).unwrap();
    assert_eq!(fir.num_taps(), 3);

    let mut dst = [0.0; 6];
    fir.process(&signals::impulse(6), &mut dst);
    assert_eq!(dst, [0.5, 0.25, -0.125, 0.0, 0.0, 0.0]);

    fir.reset();
    let mut again = [0.0; 6];
    fir.process(&signals::impulse(6), &mut again);
    assert_eq!(again, dst);
}

#[test]
fn fir_block_size_does_not_change_output() {
    let coeffs = [0.1f32, 0.2, 0.3, 0.2, 0.1];
    let src = signals::noise(7, 1.0, 50);

    let mut small = Fir::new(&coeffs, 3).unwrap();
    let mut large = Fir::new(&coeffs, 64).unwrap();
    let mut a = vec![0.0; src.len()];
    let mut b = vec![0.0; src.len()];
    small.process(&src, &mut a);
    large.process(&src, &mut b);
    assert_eq!(a, b);

    wav_writer::write("fir_smoothed_noise.wav", &a).unwrap();
}

#[test]
fn fir_fixed_point() {
    let coeffs: [Q15; 2] = [0x4000, 0x2000];
    let src: [Q15; 3] = [0x4000, 0, 0];

    let mut fir = Fir::new(&coeffs, 4).unwrap();
    let mut dst = [0; 3];
    fir.process(&src, &mut dst);
    assert_eq!(dst, [8192, 4096, 0]);

    let mut fast = Fir::new(&coeffs, 4).unwrap();
    let mut dst = [0; 3];
    fast.process_fast(&src, &mut dst);
    assert_eq!(dst, [8192, 4096, 0]);
}

#[test]
fn fir_rejects_empty_setup() {
    logging::init();

    assert_eq!(Fir::<f32>::new(&[], 4).err(), Some(Error::LengthError));
    assert_eq!(Fir::new(&[1.0f32], 0).err(), Some(Error::LengthError));
}

#[test]
fn decimator_keeps_every_factor_th_output() {
    let src = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];

    let mut pick = FirDecimate::new(&[1.0f32], 2, 4).unwrap();
    let mut dst = [0.0; 4];
    pick.process(&src, &mut dst);
    assert_eq!(dst, [2.0, 4.0, 6.0, 8.0]);

    let mut average = FirDecimate::new(&[0.5f32, 0.5], 2, 4).unwrap();
    average.process(&src, &mut dst);
    assert_eq!(dst, [1.5, 3.5, 5.5, 7.5]);
}

#[test]
fn decimator_errors() {
    assert_eq!(
        FirDecimate::new(&[1.0f32], 0, 4).err(),
        Some(Error::ArgumentError)
    );
    assert_eq!(
        FirDecimate::new(&[1.0f32], 2, 5).err(),
        Some(Error::LengthError)
    );
}

#[test]
fn interpolator_polyphase_output() {
    let mut zero_order = FirInterpolate::new(&[1.0f32, 0.5], 2, 4).unwrap();
    assert_eq!(zero_order.phase_length(), 1);
    let mut dst = [0.0; 4];
    zero_order.process(&[1.0, 2.0], &mut dst);
    assert_eq!(dst, [1.0, 0.5, 2.0, 1.0]);

    let mut two_phase = FirInterpolate::new(&[1.0f32, 0.5, 0.25, 0.125], 2, 4).unwrap();
    assert_eq!(two_phase.phase_length(), 2);
    two_phase.process(&[1.0, 0.0], &mut dst);
    assert_eq!(dst, [1.0, 0.5, 0.25, 0.125]);
}

#[test]
fn interpolator_errors() {
    assert_eq!(
        FirInterpolate::new(&[1.0f32, 0.5, 0.25], 2, 4).err(),
        Some(Error::LengthError)
    );
    assert_eq!(
        FirInterpolate::new(&[1.0f32], 0, 4).err(),
        Some(Error::ArgumentError)
    );
}

#[test]
fn fir_lattice_matches_direct_form() {
    let mut single = FirLattice::new(&[0.5f32]).unwrap();
    let mut dst = [0.0; 3];
    single.process(&signals::impulse(3), &mut dst);
    assert_eq!(dst, [1.0, 0.5, 0.0]);

    // 1 + k1 (1 + k2) z^-1 + k2 z^-2
    let mut double = FirLattice::new(&[0.5f32, 0.5]).unwrap();
    assert_eq!(double.num_stages(), 2);
    let mut dst = [0.0; 4];
    double.process(&signals::impulse(4), &mut dst);
    assert_eq!(dst, [1.0, 0.75, 0.5, 0.0]);
}

#[test]
fn sparse_fir_taps() {
    let mut sparse = FirSparse::new(&[1.0f32, 0.5], &[0, 3], 3, 2).unwrap();
    let mut dst = [0.0; 6];
    sparse.process(&signals::impulse(6), &mut dst);
    assert_eq!(dst, [1.0, 0.0, 0.0, 0.5, 0.0, 0.0]);
}

#[test]
fn sparse_fir_errors() {
    assert_eq!(
        FirSparse::new(&[1.0f32, 0.5], &[0], 3, 2).err(),
        Some(Error::LengthError)
    );
    assert_eq!(
        FirSparse::new(&[1.0f32, 0.5], &[0, 4], 3, 2).err(),
        Some(Error::ArgumentError)
    );
}

fn biquad_reference(coeffs: &[f32], src: &[f32]) -> Vec<f32> {
    let mut signal = src.to_vec();
    for stage in coeffs.chunks_exact(5) {
        let (mut x1, mut x2, mut y1, mut y2) = (0.0f32, 0.0, 0.0, 0.0);
        for sample in signal.iter_mut() {
            let x = *sample;
            let y = stage[0] * x + stage[1] * x1 + stage[2] * x2 + stage[3] * y1 + stage[4] * y2;
            x2 = x1;
            x1 = x;
            y2 = y1;
            y1 = y;
            *sample = y;
        }
    }
    signal
}

#[test]
fn biquad_cascade_follows_difference_equation() {
    let coeffs = [
        0.2f32, 0.4, 0.2, 0.6, -0.3, //
        0.5, -0.5, 0.1, 0.2, -0.1,
    ];
    let src = signals::noise(3, 0.5, 200);

    let mut biquad = BiquadDf1::new(&coeffs, 0).unwrap();
    assert_eq!(biquad.num_stages(), 2);
    let mut dst = vec![0.0; src.len()];
    // two calls to carry state across blocks
    biquad.process(&src[..77], &mut dst[..77]);
    biquad.process(&src[77..], &mut dst[77..]);

    assert_close(&dst, &biquad_reference(&coeffs, &src), 1e-5);
}

#[test]
fn biquad_q15_post_shift() {
    // b0 = 0.5 and a1 = 0.5 stored at half scale
    let coeffs: [Q15; 5] = [0x2000, 0, 0, 0x2000, 0];
    let mut biquad = BiquadDf1::new(&coeffs, 1).unwrap();
    let mut dst = [0; 4];
    biquad.process(&[0x4000, 0, 0, 0], &mut dst);
    assert_eq!(dst, [8192, 4096, 2048, 1024]);

    let mut fast = BiquadDf1::new(&coeffs, 1).unwrap();
    fast.process_fast(&[0x4000, 0, 0, 0], &mut dst);
    assert_eq!(dst, [8192, 4096, 2048, 1024]);
}

#[test]
fn biquad_errors() {
    logging::init();

    assert_eq!(
        BiquadDf1::new(&[0i16; 4], 0).err(),
        Some(Error::LengthError)
    );
    assert_eq!(
        BiquadDf1::new(&[0i16; 5], 16).err(),
        Some(Error::ArgumentError)
    );
}

#[test]
fn biquad_q31_fast_accumulator() {
    let coeffs: [Q31; 5] = [0x2000_0000, 0, 0, 0x2000_0000, 0];
    let mut fast = BiquadDf1::new(&coeffs, 1).unwrap();
    let mut dst = [0; 4];
    fast.process_fast(&[0x4000_0000, 0, 0, 0], &mut dst);
    assert_eq!(dst, [1 << 29, 1 << 28, 1 << 27, 1 << 26]);

    // the largest post shift saturates in both directions
    let mut loud = BiquadDf1::<Q31>::new(&[0x100, 0, 0, 0, 0], 31).unwrap();
    let mut dst = [0; 3];
    loud.process_fast(&[0x4000_0000, -0x4000_0000, 0], &mut dst);
    assert_eq!(dst, [i32::MAX, i32::MIN, 0]);
}

#[test]
fn biquad_32x64_keeps_wide_feedback() {
    let coeffs: [Q31; 5] = [0x2000_0000, 0, 0, 0x2000_0000, 0];
    let mut biquad = BiquadCas32x64::new(&coeffs, 1).unwrap();
    let mut dst = [0; 4];
    biquad.process(&[0x4000_0000, 0, 0, 0], &mut dst);
    assert_eq!(dst, [1 << 29, 1 << 28, 1 << 27, 1 << 26]);

    biquad.reset();
    let mut again = [0; 4];
    biquad.process(&[0x4000_0000, 0, 0, 0], &mut again);
    assert_eq!(again, dst);
}

#[test]
fn iir_lattice() {
    // without reflection the ladder is a plain FIR
    let mut ladder = IirLattice::new(&[0.0f32], &[0.5, 1.0]).unwrap();
    let mut dst = [0.0; 3];
    ladder.process(&signals::impulse(3), &mut dst);
    assert_eq!(dst, [1.0, 0.5, 0.0]);

    // y[n] = x[n] - 0.5 y[n-1]
    let mut all_pole = IirLattice::new(&[0.5f32], &[0.0, 1.0]).unwrap();
    let mut dst = [0.0; 4];
    all_pole.process(&signals::impulse(4), &mut dst);
    assert_eq!(dst, [1.0, -0.5, 0.25, -0.125]);

    assert_eq!(
        IirLattice::new(&[0.5f32], &[1.0]).err(),
        Some(Error::LengthError)
    );
}

fn identification_signals(len: usize) -> (Vec<f32>, Vec<f32>) {
    let unknown = [0.5f32, -0.25, 0.1];
    let src = signals::noise(11, 1.0, len);
    let mut reference = vec![0.0; len];
    Fir::new(&unknown, 64).unwrap().process(&src, &mut reference);
    (src, reference)
}

#[test]
fn lms_identifies_unknown_system() {
    let (src, reference) = identification_signals(4000);
    let mut lms = Lms::new(&[0.0f32; 3], 0.05, 0, 32).unwrap();
    let mut out = vec![0.0; src.len()];
    let mut err = vec![0.0; src.len()];
    lms.process(&src, &reference, &mut out, &mut err);

    assert_close(lms.coeffs(), &[0.5, -0.25, 0.1], 1e-3);
    assert!(err[err.len() - 1].abs() < 1e-3);
}

#[test]
fn normalized_lms_identifies_unknown_system() {
    let (src, reference) = identification_signals(2000);
    let mut lms = LmsNorm::new(&[0.0f32; 3], 0.5, 0, 16).unwrap();
    let mut out = vec![0.0; src.len()];
    let mut err = vec![0.0; src.len()];
    lms.process(&src, &reference, &mut out, &mut err);

    assert_close(lms.coeffs(), &[0.5, -0.25, 0.1], 1e-3);
    assert!(lms.energy() > 0.0);
}

fn quantized<T: Sample>(data: &[f32]) -> Vec<T> {
    data.iter().map(|x| T::from_f32(*x)).collect()
}

fn to_f32<T: Sample>(data: &[T]) -> Vec<f32> {
    data.iter().map(|x| x.to_f32()).collect()
}

fn fixed_identification_signals<T: Sample>(len: usize) -> (Vec<T>, Vec<T>) {
    let unknown: Vec<T> = quantized(&[0.5, -0.25, 0.1]);
    let src: Vec<T> = quantized(&signals::noise(11, 0.5, len));
    let mut reference = vec![T::ZERO; len];
    Fir::new(&unknown, 64).unwrap().process(&src, &mut reference);
    (src, reference)
}

fn adapt_lms<T: FilterSample>(mu: f32, post_shift: u8, len: usize) -> Vec<f32> {
    let (src, reference) = fixed_identification_signals::<T>(len);
    let mut lms = Lms::new(&[T::ZERO; 3], T::from_f32(mu), post_shift, 32).unwrap();
    let mut out = vec![T::ZERO; len];
    let mut err = vec![T::ZERO; len];
    lms.process(&src, &reference, &mut out, &mut err);
    to_f32(lms.coeffs())
}

fn adapt_normalized_lms<T: NormalizedStep>(mu: f32, len: usize) -> (Vec<f32>, T) {
    let (src, reference) = fixed_identification_signals::<T>(len);
    let mut lms = LmsNorm::new(&[T::ZERO; 3], T::from_f32(mu), 0, 16).unwrap();
    let mut out = vec![T::ZERO; len];
    let mut err = vec![T::ZERO; len];
    lms.process(&src, &reference, &mut out, &mut err);
    (to_f32(lms.coeffs()), lms.energy())
}

#[test]
fn lms_fixed_point_identifies_unknown_system() {
    assert_close(&adapt_lms::<Q15>(0.5, 0, 4000), &[0.5, -0.25, 0.1], 2e-3);
    assert_close(&adapt_lms::<Q31>(0.5, 0, 4000), &[0.5, -0.25, 0.1], 1e-6);
}

#[test]
fn lms_post_shift_halves_coefficients() {
    // outputs are doubled, so the weights settle at half the system
    assert_close(&adapt_lms::<Q15>(0.5, 1, 4000), &[0.25, -0.125, 0.05], 2e-3);
    assert_close(&adapt_lms::<Q31>(0.5, 1, 4000), &[0.25, -0.125, 0.05], 1e-6);
}

#[test]
fn normalized_lms_fixed_point_identifies_unknown_system() {
    let (coeffs, energy) = adapt_normalized_lms::<Q15>(0.25, 2000);
    assert_close(&coeffs, &[0.5, -0.25, 0.1], 1e-3);
    assert!(energy > 0);

    let (coeffs, energy) = adapt_normalized_lms::<Q31>(0.25, 2000);
    assert_close(&coeffs, &[0.5, -0.25, 0.1], 1e-6);
    assert!(energy > 0);
}

#[test]
fn lms_errors() {
    logging::init();

    assert_eq!(Lms::<f32>::new(&[], 0.1, 0, 4).err(), Some(Error::LengthError));
    assert_eq!(
        LmsNorm::new(&[0i16; 4], 0x100, 16, 4).err(),
        Some(Error::ArgumentError)
    );
}

#[test]
fn convolution() {
    let mut dst = [0.0f32; 4];
    conv(&[1.0, 2.0, 3.0], &[1.0, 1.0], &mut dst);
    assert_eq!(dst, [1.0, 3.0, 5.0, 3.0]);

    let a: [Q15; 2] = [0x4000, 0x4000];
    let b: [Q15; 1] = [0x4000];
    let mut dst = [0; 2];
    conv(&a, &b, &mut dst);
    assert_eq!(dst, [8192, 8192]);
    conv_fast(&a, &b, &mut dst);
    assert_eq!(dst, [8192, 8192]);
}

#[test]
fn partial_convolution() {
    let mut dst = [-1.0f32; 4];
    conv_partial(&[1.0, 2.0, 3.0], &[1.0, 1.0], &mut dst, 1, 2).unwrap();
    assert_eq!(dst, [-1.0, 3.0, 5.0, -1.0]);

    assert_eq!(
        conv_partial(&[1.0f32, 2.0, 3.0], &[1.0, 1.0], &mut dst, 3, 2),
        Err(Error::ArgumentError)
    );
}

#[test]
fn partial_convolution_fast() {
    let a: [Q15; 3] = [0x4000, 0x4000, 0x4000];
    let b: [Q15; 2] = [0x4000, 0x2000];
    let mut dst = [-1; 4];
    conv_partial_fast(&a, &b, &mut dst, 1, 2).unwrap();
    assert_eq!(dst, [-1, 12288, 12288, -1]);

    let mut full = [0; 4];
    conv(&a, &b, &mut full);
    assert_eq!(full, [8192, 12288, 12288, 4096]);

    assert_eq!(
        conv_partial_fast(&a, &b, &mut dst, 2, 3),
        Err(Error::ArgumentError)
    );
}

#[test]
fn correlation_lag_zero_in_the_middle() {
    let mut dst = [0.0f32; 5];
    correlate(&[1.0, 2.0, 3.0], &[1.0, 1.0], &mut dst);
    assert_eq!(dst, [0.0, 1.0, 3.0, 5.0, 3.0]);

    correlate(&[1.0, 1.0], &[1.0, 2.0, 3.0], &mut dst);
    assert_eq!(dst, [3.0, 5.0, 3.0, 1.0, 0.0]);
}

#[test]
fn correlation_fast() {
    let a: [Q31; 2] = [0x4000_0000, 0x2000_0000];
    let b: [Q31; 1] = [0x4000_0000];
    let mut dst = [-1; 3];
    correlate_fast(&a, &b, &mut dst);
    assert_eq!(dst, [0, 0x2000_0000, 0x1000_0000]);

    let mut exact = [-1; 3];
    correlate(&a, &b, &mut exact);
    assert_eq!(exact, dst);

    let a: [Q15; 2] = [0x4000, 0x2000];
    let b: [Q15; 2] = [0x4000, 0x4000];
    let mut dst = [0; 3];
    correlate_fast(&a, &b, &mut dst);
    assert_eq!(dst, [8192, 12288, 4096]);
}
