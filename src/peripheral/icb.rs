//! Implementation Control Block

use vcell::VolatileCell;

use super::ICB;
use crate::profile::Mainline;

/// Register block
#[repr(C)]
pub struct RegisterBlock {
    _reserved0: u32,
    /// Interrupt Controller Type
    pub ictr: VolatileCell<u32>,
    /// Auxiliary Control
    pub actlr: VolatileCell<u32>,
}

const ACTLR_DISMCYCINT: u32 = 1 << 0;
const ACTLR_DISDEFWBUF: u32 = 1 << 1;
const ACTLR_DISFOLD: u32 = 1 << 2;

impl<P: Mainline> ICB<P> {
    /// Number of interrupt lines supported by the NVIC, in steps of 32.
    #[inline]
    pub fn interrupt_lines(&self) -> u32 {
        32 * ((self.ictr.get() & 0xF) + 1)
    }

    /// Disables interruption of multi-cycle instructions.
    #[inline]
    pub fn disable_multicycle_interrupt(&mut self, disable: bool) {
        self.modify_actlr(ACTLR_DISMCYCINT, disable);
    }

    /// Disables write buffer use for default memory map stores, which makes
    /// bus faults precise.
    #[inline]
    pub fn disable_write_buffer(&mut self, disable: bool) {
        self.modify_actlr(ACTLR_DISDEFWBUF, disable);
    }

    /// Disables IT folding.
    #[inline]
    pub fn disable_folding(&mut self, disable: bool) {
        self.modify_actlr(ACTLR_DISFOLD, disable);
    }

    fn modify_actlr(&mut self, mask: u32, set: bool) {
        let actlr = self.actlr.get();
        self.actlr.set(if set { actlr | mask } else { actlr & !mask });
    }
}
