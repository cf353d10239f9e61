//! Convolution and correlation of finite sequences.

use super::FastMac;
use crate::dsp::Sample;
use crate::error::{Error, Result};

// `sum(a[k] * b[n - k])` over the overlapping range.
#[inline]
fn conv_point<A>(a_len: usize, b_len: usize, n: usize, zero: A, mac: impl Fn(A, usize, usize) -> A) -> A {
    let k_min = n.saturating_sub(b_len - 1);
    let k_max = n.min(a_len - 1);
    (k_min..=k_max).fold(zero, |acc, k| mac(acc, k, n - k))
}

fn check_conv_output(a_len: usize, b_len: usize, dst_len: usize) {
    assert!(a_len > 0 && b_len > 0);
    assert_eq!(dst_len, a_len + b_len - 1);
}

/// Full convolution, `dst` holds `a.len() + b.len() - 1` samples.
pub fn conv<T: Sample>(a: &[T], b: &[T], dst: &mut [T]) {
    check_conv_output(a.len(), b.len(), dst.len());
    for (n, y) in dst.iter_mut().enumerate() {
        *y = T::from_acc(conv_point(a.len(), b.len(), n, T::acc_zero(), |acc, i, j| {
            T::mac(acc, a[i], b[j])
        }));
    }
}

/// Full convolution with the 32-bit accumulator of [`FastMac`].
pub fn conv_fast<T: FastMac>(a: &[T], b: &[T], dst: &mut [T]) {
    check_conv_output(a.len(), b.len(), dst.len());
    for (n, y) in dst.iter_mut().enumerate() {
        *y = T::fast_result(
            conv_point(a.len(), b.len(), n, 0, |acc, i, j| T::fast_mac(acc, a[i], b[j])),
            0,
        );
    }
}

fn check_partial(a_len: usize, b_len: usize, dst_len: usize, first: usize, count: usize) -> Result<()> {
    if a_len == 0 || b_len == 0 || first + count > a_len + b_len - 1 {
        log::debug!(
            "partial convolution points {}..{} outside output of {}",
            first,
            first + count,
            a_len + b_len - 1
        );
        return Err(Error::ArgumentError);
    }
    assert!(dst_len >= first + count);
    Ok(())
}

/// Computes output points `first..first + count` of the full convolution.
///
/// Results are written to the same positions of `dst`, the other samples are
/// left untouched. Points beyond the full output are an
/// [`Error::ArgumentError`].
pub fn conv_partial<T: Sample>(
    a: &[T],
    b: &[T],
    dst: &mut [T],
    first: usize,
    count: usize,
) -> Result<()> {
    check_partial(a.len(), b.len(), dst.len(), first, count)?;
    for n in first..first + count {
        dst[n] = T::from_acc(conv_point(a.len(), b.len(), n, T::acc_zero(), |acc, i, j| {
            T::mac(acc, a[i], b[j])
        }));
    }
    Ok(())
}

/// [`conv_partial`] with the 32-bit accumulator of [`FastMac`].
pub fn conv_partial_fast<T: FastMac>(
    a: &[T],
    b: &[T],
    dst: &mut [T],
    first: usize,
    count: usize,
) -> Result<()> {
    check_partial(a.len(), b.len(), dst.len(), first, count)?;
    for n in first..first + count {
        dst[n] = T::fast_result(
            conv_point(a.len(), b.len(), n, 0, |acc, i, j| T::fast_mac(acc, a[i], b[j])),
            0,
        );
    }
    Ok(())
}

// Correlation at lag `m`, `sum(a[n + m] * b[n])`, with `m` offset by
// `b.len() - 1` so that it is never negative.
#[inline]
fn corr_point<A>(a_len: usize, b_len: usize, lag: usize, zero: A, mac: impl Fn(A, usize, usize) -> A) -> A {
    // a index i = n + lag - (b_len - 1) for b index n.
    let n_min = (b_len - 1).saturating_sub(lag);
    let n_max = (a_len + b_len - 2 - lag).min(b_len - 1);
    (n_min..=n_max).fold(zero, |acc, n| mac(acc, n + lag + 1 - b_len, n))
}

fn check_corr_output(a_len: usize, b_len: usize, dst_len: usize) -> usize {
    assert!(a_len > 0 && b_len > 0);
    let longest = a_len.max(b_len);
    assert_eq!(dst_len, 2 * longest - 1);
    longest
}

/// Cross-correlation `r[m] = sum(a[n + m] * b[n])`.
///
/// `dst` holds `2 * max(a.len(), b.len()) - 1` samples with lag zero at
/// index `max(a.len(), b.len()) - 1`. Lags outside the overlap are zero.
pub fn correlate<T: Sample>(a: &[T], b: &[T], dst: &mut [T]) {
    let longest = check_corr_output(a.len(), b.len(), dst.len());
    dst.fill(T::ZERO);
    let offset = longest - b.len();
    for lag in 0..a.len() + b.len() - 1 {
        dst[offset + lag] = T::from_acc(corr_point(a.len(), b.len(), lag, T::acc_zero(), |acc, i, j| {
            T::mac(acc, a[i], b[j])
        }));
    }
}

/// [`correlate`] with the 32-bit accumulator of [`FastMac`].
pub fn correlate_fast<T: FastMac>(a: &[T], b: &[T], dst: &mut [T]) {
    let longest = check_corr_output(a.len(), b.len(), dst.len());
    dst.fill(T::ZERO);
    let offset = longest - b.len();
    for lag in 0..a.len() + b.len() - 1 {
        dst[offset + lag] = T::fast_result(
            corr_point(a.len(), b.len(), lag, 0, |acc, i, j| T::fast_mac(acc, a[i], b[j])),
            0,
        );
    }
}
