//! Tests for linear and bilinear table interpolation

use cortex_cmsis::dsp::interpolation::*;
use cortex_cmsis::dsp::{Q15, Q31, Q7};
use cortex_cmsis::Error;

// 12.20 coordinate
fn position(index: i32, fraction: f64) -> Q31 {
    (index << 20) + (fraction * (1 << 20) as f64) as i32
}

#[test]
fn linear_f32() {
    let interp = LinearInterp::new(0.0, 0.5, &[0.0, 1.0, 4.0, 9.0]).unwrap();
    assert_eq!(interp.table().len(), 4);
    assert_eq!(interp.interpolate(0.25), 0.5);
    assert_eq!(interp.interpolate(0.75), 2.5);
    assert_eq!(interp.interpolate(1.25), 6.5);

    let mut dst = [0.0; 2];
    interp.process(&[0.0, 0.5], &mut dst);
    assert_eq!(dst, [0.0, 1.0]);
}

#[test]
fn linear_f32_clamps_at_edges() {
    let interp = LinearInterp::new(1.0, 0.5, &[2.0, 3.0, 5.0]).unwrap();
    assert_eq!(interp.interpolate(-4.0), 2.0);
    assert_eq!(interp.interpolate(2.0), 5.0);
    assert_eq!(interp.interpolate(100.0), 5.0);
}

#[test]
fn linear_f32_errors() {
    assert_eq!(LinearInterp::new(0.0, 1.0, &[]).err(), Some(Error::LengthError));
    assert_eq!(
        LinearInterp::new(0.0, 0.0, &[1.0]).err(),
        Some(Error::ArgumentError)
    );
    assert_eq!(
        LinearInterp::new(0.0, f32::NAN, &[1.0]).err(),
        Some(Error::ArgumentError)
    );
}

#[test]
fn linear_fixed_point() {
    let table: [Q31; 2] = [0, 0x4000_0000];
    assert_eq!(linear_interp_q31(&table, position(0, 0.5)), 0x2000_0000);

    let table: [Q15; 3] = [0, 1000, 2000];
    let y = linear_interp_q15(&table, position(1, 0.5));
    assert!((y - 1500).abs() <= 1);

    let table: [Q7; 2] = [0, 100];
    assert_eq!(linear_interp_q7(&table, position(0, 0.5)), 50);
}

#[test]
fn linear_fixed_point_clamps_at_edges() {
    let table: [Q15; 3] = [-7, 1000, 2000];
    assert_eq!(linear_interp_q15(&table, -1), -7);
    assert_eq!(linear_interp_q15(&table, position(2, 0.5)), 2000);
    assert_eq!(linear_interp_q15(&table, position(40, 0.0)), 2000);

    let table: [Q31; 2] = [5, 6];
    assert_eq!(linear_interp_q31(&table, i32::MIN), 5);
    assert_eq!(linear_interp_q31(&table, i32::MAX), 6);
}

#[test]
fn linear_fixed_point_empty_table() {
    assert_eq!(linear_interp_q31(&[], position(1, 0.5)), 0);
    assert_eq!(linear_interp_q15(&[], 0), 0);
    assert_eq!(linear_interp_q7(&[], -1), 0);
}

#[test]
fn bilinear_f32() {
    // row 0: 0 1, row 1: 2 3
    let interp = BilinearInterp::new(2, 2, &[0.0f32, 1.0, 2.0, 3.0]).unwrap();
    assert_eq!((interp.rows(), interp.cols()), (2, 2));
    assert_eq!(interp.interpolate(0.5, 0.5), 1.5);
    assert_eq!(interp.interpolate(0.5, 0.0), 0.5);
    assert_eq!(interp.interpolate(0.0, 0.5), 1.0);
    assert_eq!(interp.interpolate(1.0, 0.0), 1.0);

    assert_eq!(interp.interpolate(-0.5, 0.5), 0.0);
    assert_eq!(interp.interpolate(0.5, 2.5), 0.0);
}

#[test]
fn bilinear_fixed_point() {
    let interp = BilinearInterp::<Q15>::new(2, 2, &[0, 1000, 2000, 3000]).unwrap();
    assert_eq!(interp.interpolate(position(0, 0.5), position(0, 0.5)), 1500);
    assert_eq!(interp.interpolate(position(0, 0.0), position(1, 0.0)), 2000);
    assert_eq!(interp.interpolate(-1, 0), 0);
    assert_eq!(interp.interpolate(position(3, 0.0), 0), 0);

    let interp = BilinearInterp::<Q7>::new(1, 2, &[0, 100]).unwrap();
    assert_eq!(interp.interpolate(position(0, 0.25), 0), 25);

    let interp = BilinearInterp::<Q31>::new(1, 1, &[0x1234_5678]).unwrap();
    assert_eq!(interp.interpolate(0, 0), 0x1234_5678);
}

#[test]
fn bilinear_errors() {
    assert_eq!(
        BilinearInterp::<f32>::new(2, 2, &[0.0; 3]).err(),
        Some(Error::LengthError)
    );
    assert_eq!(
        BilinearInterp::<f32>::new(0, 2, &[]).err(),
        Some(Error::LengthError)
    );
}
