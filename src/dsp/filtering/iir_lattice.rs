//! IIR lattice-ladder filter.

use alloc::boxed::Box;
use alloc::vec;

use super::check_taps;
use crate::dsp::Sample;
use crate::error::{Error, Result};

/// Lattice-ladder IIR filter.
///
/// `k` holds one reflection coefficient per stage, `v` one ladder
/// coefficient per stage plus one. The output is the ladder-weighted sum of
/// the backward errors of every stage and of the final forward error.
#[derive(Debug, Clone)]
pub struct IirLattice<T> {
    k: Box<[T]>,
    v: Box<[T]>,
    state: Box<[T]>,
}

impl<T: Sample> IirLattice<T> {
    /// Creates a filter. `v` must be one longer than `k`.
    pub fn new(k: &[T], v: &[T]) -> Result<Self> {
        check_taps(k)?;
        if v.len() != k.len() + 1 {
            log::debug!("{} ladder coefficients for {} stages", v.len(), k.len());
            return Err(Error::LengthError);
        }
        log::trace!("iir lattice with {} stages", k.len());
        Ok(Self {
            k: k.into(),
            v: v.into(),
            state: vec![T::ZERO; v.len()].into_boxed_slice(),
        })
    }

    /// Number of stages.
    pub fn num_stages(&self) -> usize {
        self.k.len()
    }

    /// Clears the state.
    pub fn reset(&mut self) {
        self.state.fill(T::ZERO);
    }

    /// Filters `src` into `dst`.
    pub fn process(&mut self, src: &[T], dst: &mut [T]) {
        assert_eq!(src.len(), dst.len());
        let stages = self.k.len();
        for (y, x) in dst.iter_mut().zip(src) {
            let mut f = *x;
            let mut acc = T::acc_zero();
            for j in 0..stages {
                let g = self.state[j + 1];
                let k = self.k[j];
                f = f.sat_sub(k.sat_mul(g));
                let g_next = f.sat_mul(k).sat_add(g);
                acc = T::mac(acc, g_next, self.v[j]);
                self.state[j] = g_next;
            }
            acc = T::mac(acc, f, self.v[stages]);
            self.state[stages] = f;
            *y = T::from_acc(acc);
        }
    }
}
