//! FIR lattice filter.

use alloc::boxed::Box;
use alloc::vec;

use super::check_taps;
use crate::dsp::Sample;
use crate::error::Result;

/// All-zero lattice filter with reflection coefficients `k[m]`.
///
/// Each stage computes `f[m] = f[m-1] + k[m] g[m-1][n-1]` and
/// `g[m] = k[m] f[m-1] + g[m-1][n-1]`, starting from `f[0] = g[0] = x[n]`.
/// The output is the forward error of the last stage.
#[derive(Debug, Clone)]
pub struct FirLattice<T> {
    coeffs: Box<[T]>,
    state: Box<[T]>,
}

impl<T: Sample> FirLattice<T> {
    /// Creates a filter with one stage per reflection coefficient.
    pub fn new(coeffs: &[T]) -> Result<Self> {
        check_taps(coeffs)?;
        log::trace!("fir lattice with {} stages", coeffs.len());
        Ok(Self {
            coeffs: coeffs.into(),
            state: vec![T::ZERO; coeffs.len()].into_boxed_slice(),
        })
    }

    /// Number of stages.
    pub fn num_stages(&self) -> usize {
        self.coeffs.len()
    }

    /// Clears the state.
    pub fn reset(&mut self) {
        self.state.fill(T::ZERO);
    }

    /// Filters `src` into `dst`.
    pub fn process(&mut self, src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), dst.len());
        for (y, x) in dst.iter_mut().zip(src) {
            let mut f = *x;
            let mut g = *x;
            for (k, delayed) in self.coeffs.iter().zip(self.state.iter_mut()) {
                let g_delayed = *delayed;
                *delayed = g;
                let f_next = f.sat_add(k.sat_mul(g_delayed));
                g = k.sat_mul(f).sat_add(g_delayed);
                f = f_next;
            }
            *y = f;
        }
    }
}
