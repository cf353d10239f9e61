//! Tests for matrix operations


use cortex_cmsis::dsp::matrix::Matrix;
use cortex_cmsis::dsp::{Q15, Q31};
use cortex_cmsis::Error;

use signals::assert_close;

fn square(data: [f32; 4]) -> Matrix<f32> {
    Matrix::new(2, 2, &data).unwrap()
}

#[test]
fn element_wise_operations() {
    let a = square([1.0, 2.0, 3.0, 4.0]);
    let b = square([5.0, 6.0, 7.0, 8.0]);
    let mut dst = Matrix::zeros(2, 2);

    a.add(&b, &mut dst).unwrap();
    assert_eq!(dst.data(), &[6.0, 8.0, 10.0, 12.0]);

    a.sub(&b, &mut dst).unwrap();
    assert_eq!(dst.data(), &[-4.0, -4.0, -4.0, -4.0]);

    a.scale(0.5, 2, &mut dst).unwrap();
    assert_eq!(dst.data(), &[2.0, 4.0, 6.0, 8.0]);
}

#[test]
fn multiplication_and_transpose() {
    let a = square([1.0, 2.0, 3.0, 4.0]);
    let b = square([5.0, 6.0, 7.0, 8.0]);
    let mut dst = Matrix::zeros(2, 2);
    a.mult(&b, &mut dst).unwrap();
    assert_eq!(dst, square([19.0, 22.0, 43.0, 50.0]));

    let wide = Matrix::new(2, 3, &[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let mut tall = Matrix::zeros(3, 2);
    wide.trans(&mut tall).unwrap();
    assert_eq!(tall.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert_eq!(tall.get(2, 1), 6.0);

    let mut product = Matrix::zeros(2, 2);
    wide.mult(&tall, &mut product).unwrap();
    assert_eq!(product.data(), &[14.0, 32.0, 32.0, 77.0]);
}

#[test]
fn dimension_checks() {
    let a = square([1.0, 2.0, 3.0, 4.0]);
    let wide = Matrix::<f32>::zeros(2, 3);
    let mut dst = Matrix::zeros(2, 2);

    assert_eq!(a.add(&wide, &mut dst), Err(Error::SizeMismatch));
    assert_eq!(wide.mult(&a, &mut dst), Err(Error::SizeMismatch));
    assert_eq!(wide.trans(&mut dst), Err(Error::SizeMismatch));
    assert_eq!(wide.inverse(&mut dst), Err(Error::SizeMismatch));
    assert_eq!(
        Matrix::new(2, 2, &[1.0f32; 3]).err(),
        Some(Error::LengthError)
    );
}

#[test]
fn inverse() {
    let a = square([4.0, 7.0, 2.0, 6.0]);
    let mut inv = Matrix::zeros(2, 2);
    a.inverse(&mut inv).unwrap();
    assert_close(inv.data(), &[0.6, -0.7, -0.2, 0.4], 1e-6);

    let mut identity = Matrix::zeros(2, 2);
    inv.mult(&a, &mut identity).unwrap();
    assert_close(identity.data(), Matrix::identity(2).data(), 1e-6);
}

#[test]
fn inverse_needs_pivoting() {
    let a = Matrix::new(3, 3, &[0.0f32, 1.0, 2.0, 1.0, 0.0, 3.0, 4.0, -3.0, 8.0]).unwrap();
    let mut inv = Matrix::zeros(3, 3);
    a.inverse(&mut inv).unwrap();

    let mut identity = Matrix::zeros(3, 3);
    a.mult(&inv, &mut identity).unwrap();
    assert_close(identity.data(), Matrix::identity(3).data(), 1e-5);
}

#[test]
fn singular_matrix() {
    let a = square([1.0, 2.0, 2.0, 4.0]);
    let mut inv = Matrix::zeros(2, 2);
    assert_eq!(a.inverse(&mut inv), Err(Error::Singular));
}

#[test]
fn fixed_point_multiplication() {
    let a = Matrix::<Q15>::new(2, 2, &[0x4000, 0, 0, 0x4000]).unwrap();
    let b = Matrix::<Q15>::new(2, 2, &[0x2000, 0x1000, 0, 0x7FFF]).unwrap();
    let mut dst = Matrix::zeros(2, 2);
    a.mult(&b, &mut dst).unwrap();
    assert_eq!(dst.data(), &[0x1000, 0x0800, 0, 0x3FFF]);
    a.mult_fast(&b, &mut dst).unwrap();
    assert_eq!(dst.data(), &[0x1000, 0x0800, 0, 0x3FFF]);

    let half = Matrix::<Q31>::new(1, 1, &[0x4000_0000]).unwrap();
    let mut dst = Matrix::zeros(1, 1);
    half.mult(&half, &mut dst).unwrap();
    assert_eq!(dst.get(0, 0), 0x2000_0000);
    half.mult_fast(&half, &mut dst).unwrap();
    assert_eq!(dst.get(0, 0), 0x2000_0000);
}

#[test]
fn fixed_point_saturation() {
    let a = Matrix::<Q15>::new(1, 2, &[0x6000, -0x6000]).unwrap();
    let mut dst = Matrix::zeros(1, 2);
    a.add(&a, &mut dst).unwrap();
    assert_eq!(dst.data(), &[i16::MAX, i16::MIN]);

    a.scale(0x4000, 2, &mut dst).unwrap();
    assert_eq!(dst.data(), &[i16::MAX, i16::MIN]);

    let mut dst = Matrix::<Q15>::zeros(1, 2);
    dst.set(0, 1, 5);
    dst.data_mut()[0] = 7;
    assert_eq!(dst.data(), &[7, 5]);
    assert_eq!((dst.rows(), dst.cols()), (1, 2));
}
