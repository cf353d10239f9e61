//! Debug Control Block (CoreDebug)

use vcell::VolatileCell;

use super::DCB;
use crate::profile::Profile;

/// Register block
#[repr(C)]
pub struct RegisterBlock {
    /// Debug Halting Control and Status
    pub dhcsr: VolatileCell<u32>,
    /// Debug Core Register Selector
    pub dcrsr: VolatileCell<u32>,
    /// Debug Core Register Data
    pub dcrdr: VolatileCell<u32>,
    /// Debug Exception and Monitor Control
    pub demcr: VolatileCell<u32>,
}

const DHCSR_DBGKEY: u32 = 0xA05F << 16;
const DHCSR_C_DEBUGEN: u32 = 1 << 0;
const DEMCR_TRCENA: u32 = 1 << 24;

/// Decoded Debug Halting Control and Status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HaltStatus {
    bits: u32,
}

bit_accessors!(HaltStatus {
    /// Halting debug is enabled.
    c_debugen: 0,
    /// Processor halt requested.
    c_halt: 1,
    /// Single stepping requested.
    c_step: 2,
    /// PendSV, SysTick and external interrupts are masked.
    c_maskints: 3,
    /// Imprecise entry to debug state allowed.
    c_snapstall: 5,
    /// A register transfer completed.
    s_regrdy: 16,
    /// Processor is halted.
    s_halt: 17,
    /// Processor is sleeping.
    s_sleep: 18,
    /// Processor is locked up.
    s_lockup: 19,
    /// An instruction retired since the last read.
    s_retire_st: 24,
    /// The core was reset since the last read.
    s_reset_st: 25,
});

/// Vector catch events of DEMCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VectorCatch {
    /// Core reset.
    CoreReset = 0,
    /// MemManage fault.
    MemManage = 4,
    /// UsageFault on coprocessor access.
    NoCoprocessor = 5,
    /// UsageFault on checking errors.
    CheckError = 6,
    /// UsageFault on state information errors.
    StateError = 7,
    /// BusFault.
    BusError = 8,
    /// Fault during exception entry or return.
    InterruptError = 9,
    /// HardFault.
    HardError = 10,
}

impl<P: Profile> DCB<P> {
    /// Reads the halting status.
    #[inline]
    pub fn halt_status(&self) -> HaltStatus {
        HaltStatus {
            bits: self.dhcsr.get(),
        }
    }

    /// Checks if a debugger is attached.
    #[inline]
    pub fn is_debugger_attached(&self) -> bool {
        self.dhcsr.get() & DHCSR_C_DEBUGEN != 0
    }

    /// Writes the control bits of DHCSR with the debug key.
    ///
    /// # Safety
    ///
    /// Halting or stepping the core from software interferes with an
    /// attached debugger.
    #[inline]
    pub unsafe fn set_halt_control(&mut self, control: u16) {
        self.dhcsr.set(DHCSR_DBGKEY | u32::from(control & 0x2F));
    }

    /// Enables the DWT and ITM units.
    #[inline]
    pub fn enable_trace(&mut self) {
        self.demcr.set(self.demcr.get() | DEMCR_TRCENA);
    }

    /// Disables the DWT and ITM units.
    #[inline]
    pub fn disable_trace(&mut self) {
        self.demcr.set(self.demcr.get() & !DEMCR_TRCENA);
    }

    /// Checks if trace is enabled.
    #[inline]
    pub fn is_trace_enabled(&self) -> bool {
        self.demcr.get() & DEMCR_TRCENA != 0
    }

    /// Enables or disables halting on `event`.
    pub fn set_vector_catch(&mut self, event: VectorCatch, enabled: bool) {
        let mask = 1 << (event as u32);
        let demcr = self.demcr.get();
        self.demcr
            .set(if enabled { demcr | mask } else { demcr & !mask });
    }

    /// Checks if halting on `event` is enabled.
    #[inline]
    pub fn is_vector_catch_enabled(&self, event: VectorCatch) -> bool {
        self.demcr.get() & (1 << (event as u32)) != 0
    }
}
