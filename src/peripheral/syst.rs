//! SysTick: System Timer

// Based on CMSIS Cortex-M core code (c) 2009-2011 by ARM Limited

use vcell::VolatileCell;

use super::{SCB, SYST};
use crate::error::{Error, Result};
use crate::peripheral::scb::SystemHandler;
use crate::profile::Profile;

/// Register block
#[repr(C)]
pub struct RegisterBlock {
    /// Control and Status
    pub csr: VolatileCell<u32>,
    /// Reload Value
    pub rvr: VolatileCell<u32>,
    /// Current Value
    pub cvr: VolatileCell<u32>,
    /// Calibration Value
    pub calib: VolatileCell<u32>,
}

/// SysTick clock source
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystClkSource {
    /// Core clock
    Core,
    /// External reference clock
    External,
}

const SYST_COUNTER_MASK: u32 = 0x00ff_ffff;

const SYST_CSR_ENABLE: u32 = 1 << 0;
const SYST_CSR_TICKINT: u32 = 1 << 1;
const SYST_CSR_CLKSOURCE: u32 = 1 << 2;
const SYST_CSR_COUNTFLAG: u32 = 1 << 16;

const SYST_CALIB_SKEW: u32 = 1 << 30;
const SYST_CALIB_NOREF: u32 = 1 << 31;

/// Decoded SysTick calibration value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Reload value for a 10 ms period, `0` if unknown.
    pub tenms: u32,
    /// The 10 ms value is not exact due to clock frequency.
    pub skew: bool,
    /// No external reference clock is provided.
    pub noref: bool,
}

impl From<u32> for Calibration {
    fn from(bits: u32) -> Self {
        Self {
            tenms: bits & SYST_COUNTER_MASK,
            skew: bits & SYST_CALIB_SKEW != 0,
            noref: bits & SYST_CALIB_NOREF != 0,
        }
    }
}

impl<P: Profile> SYST<P> {
    /// Largest value accepted as reload value.
    pub const MAX_RELOAD: u32 = SYST_COUNTER_MASK;

    /// Starts the timer with an interrupt every `ticks` core clock cycles.
    ///
    /// The SysTick handler is set to the lowest priority and the counter is
    /// restarted. Returns [`Error::ArgumentError`] when `ticks` is zero or
    /// does not fit the 24-bit reload register; the timer is left untouched
    /// in that case.
    pub fn configure(&mut self, scb: &mut SCB<P>, ticks: u32) -> Result<()> {
        if ticks == 0 || ticks > SYST_COUNTER_MASK {
            log::debug!("SysTick period of {} ticks is out of range", ticks);
            return Err(Error::ArgumentError);
        }
        self.rvr.set((ticks & SYST_COUNTER_MASK) - 1);
        unsafe { scb.set_system_handler_priority(SystemHandler::SysTick, P::lowest_priority())? };
        self.cvr.set(0);
        self.csr
            .set(SYST_CSR_CLKSOURCE | SYST_CSR_TICKINT | SYST_CSR_ENABLE);
        log::trace!("SysTick running with reload {}", ticks - 1);
        Ok(())
    }

    /// Clears the current value and the COUNTFLAG.
    #[inline]
    pub fn clear_current(&mut self) {
        self.cvr.set(0);
    }

    /// Disables the counter.
    #[inline]
    pub fn disable_counter(&mut self) {
        self.csr.set(self.csr.get() & !SYST_CSR_ENABLE);
    }

    /// Disables the SysTick exception.
    #[inline]
    pub fn disable_interrupt(&mut self) {
        self.csr.set(self.csr.get() & !SYST_CSR_TICKINT);
    }

    /// Enables the counter.
    ///
    /// The reload value should be set and the current value cleared first.
    #[inline]
    pub fn enable_counter(&mut self) {
        self.csr.set(self.csr.get() | SYST_CSR_ENABLE);
    }

    /// Enables the SysTick exception.
    #[inline]
    pub fn enable_interrupt(&mut self) {
        self.csr.set(self.csr.get() | SYST_CSR_TICKINT);
    }

    /// Returns the configured clock source.
    #[inline]
    pub fn clock_source(&self) -> SystClkSource {
        if self.csr.get() & SYST_CSR_CLKSOURCE != 0 {
            SystClkSource::Core
        } else {
            SystClkSource::External
        }
    }

    /// Selects the clock source.
    #[inline]
    pub fn set_clock_source(&mut self, clk_source: SystClkSource) {
        match clk_source {
            SystClkSource::External => self.csr.set(self.csr.get() & !SYST_CSR_CLKSOURCE),
            SystClkSource::Core => self.csr.set(self.csr.get() | SYST_CSR_CLKSOURCE),
        }
    }

    /// Current counter value.
    #[inline]
    pub fn current(&self) -> u32 {
        self.cvr.get()
    }

    /// Reload value.
    #[inline]
    pub fn reload(&self) -> u32 {
        self.rvr.get()
    }

    /// Sets the reload value. Only the lower 24 bits are used.
    #[inline]
    pub fn set_reload(&mut self, value: u32) {
        self.rvr.set(value & SYST_COUNTER_MASK);
    }

    /// Reads the calibration register.
    #[inline]
    pub fn calibration(&self) -> Calibration {
        Calibration::from(self.calib.get())
    }

    /// Checks if the counter wrapped since the last read. Reading clears the
    /// flag.
    #[inline]
    pub fn has_wrapped(&mut self) -> bool {
        self.csr.get() & SYST_CSR_COUNTFLAG != 0
    }

    /// Checks if the counter is enabled.
    #[inline]
    pub fn is_counter_enabled(&self) -> bool {
        self.csr.get() & SYST_CSR_ENABLE != 0
    }

    /// Checks if the SysTick exception is enabled.
    #[inline]
    pub fn is_interrupt_enabled(&self) -> bool {
        self.csr.get() & SYST_CSR_TICKINT != 0
    }
}
