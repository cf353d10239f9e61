//! System Control Block

// Based on CMSIS Cortex-M core code (c) 2009-2011 by ARM Limited

use core::ptr;

use vcell::VolatileCell;

use super::SCB;
use crate::error::{Error, Result};
use crate::profile::{Architecture, Mainline, Profile};

/// Register block
#[repr(C)]
pub struct RegisterBlock {
    /// CPUID base
    pub cpuid: VolatileCell<u32>,
    /// Interrupt Control and State
    pub icsr: VolatileCell<u32>,
    /// Vector Table Offset (not present on ARMv6-M)
    pub vtor: VolatileCell<u32>,
    /// Application Interrupt and Reset Control
    pub aircr: VolatileCell<u32>,
    /// System Control
    pub scr: VolatileCell<u32>,
    /// Configuration and Control
    pub ccr: VolatileCell<u32>,
    /// System Handler Priority (word 0 is reserved on ARMv6-M)
    pub shpr: [VolatileCell<u32>; 3],
    /// System Handler Control and State
    pub shcsr: VolatileCell<u32>,
    /// Configurable Fault Status
    pub cfsr: VolatileCell<u32>,
    /// HardFault Status
    pub hfsr: VolatileCell<u32>,
    /// Debug Fault Status
    pub dfsr: VolatileCell<u32>,
    /// MemManage Fault Address
    pub mmfar: VolatileCell<u32>,
    /// BusFault Address
    pub bfar: VolatileCell<u32>,
    /// Auxiliary Fault Status
    pub afsr: VolatileCell<u32>,
    /// Processor Feature
    pub pfr: [VolatileCell<u32>; 2],
    /// Debug Feature
    pub dfr: VolatileCell<u32>,
    /// Auxiliary Feature
    pub afr: VolatileCell<u32>,
    /// Memory Model Feature
    pub mmfr: [VolatileCell<u32>; 4],
    /// Instruction Set Attribute
    pub isar: [VolatileCell<u32>; 5],
    _reserved0: [u32; 5],
    /// Coprocessor Access Control
    pub cpacr: VolatileCell<u32>,
}

const ICSR_NMIPENDSET: u32 = 1 << 31;
const ICSR_PENDSVSET: u32 = 1 << 28;
const ICSR_PENDSVCLR: u32 = 1 << 27;
const ICSR_PENDSTSET: u32 = 1 << 26;
const ICSR_PENDSTCLR: u32 = 1 << 25;
const ICSR_ISRPENDING: u32 = 1 << 22;
const ICSR_VECTPENDING_POS: u32 = 12;
const ICSR_VECTACTIVE_MASK: u32 = 0x1FF;

const AIRCR_VECTKEY: u32 = 0x05FA << 16;
const AIRCR_PRIGROUP_POS: u32 = 8;
const AIRCR_PRIGROUP_MASK: u32 = 0x7 << AIRCR_PRIGROUP_POS;
const AIRCR_ENDIANNESS: u32 = 1 << 15;
const AIRCR_SYSRESETREQ: u32 = 1 << 2;

const SCR_SEVONPEND: u32 = 1 << 4;
const SCR_SLEEPDEEP: u32 = 1 << 2;
const SCR_SLEEPONEXIT: u32 = 1 << 1;

const CCR_STKALIGN: u32 = 1 << 9;
const CCR_DIV_0_TRP: u32 = 1 << 4;
const CCR_UNALIGN_TRP: u32 = 1 << 3;

const SHCSR_USGFAULTENA: u32 = 1 << 18;
const SHCSR_BUSFAULTENA: u32 = 1 << 17;
const SHCSR_MEMFAULTENA: u32 = 1 << 16;

const VTOR_TBLOFF_MASK: u32 = 0x1FF_FFFF << 7;

/// Decoded CPUID register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cpuid {
    /// Implementer code, `0x41` for ARM.
    pub implementer: u8,
    /// Major revision number.
    pub variant: u8,
    /// `0xF` on ARMv7-M, `0xC` on ARMv6-M.
    pub architecture: u8,
    /// Part number, `0xC20` for Cortex-M0, `0xC23` for Cortex-M3.
    pub part_no: u16,
    /// Minor revision number.
    pub revision: u8,
}

impl From<u32> for Cpuid {
    fn from(bits: u32) -> Self {
        Self {
            implementer: (bits >> 24) as u8,
            variant: ((bits >> 20) & 0xF) as u8,
            architecture: ((bits >> 16) & 0xF) as u8,
            part_no: ((bits >> 4) & 0xFFF) as u16,
            revision: (bits & 0xF) as u8,
        }
    }
}

/// System handlers with a configurable priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemHandler {
    /// Memory management fault (ARMv7-M only).
    MemoryManagement,
    /// Bus fault (ARMv7-M only).
    BusFault,
    /// Usage fault (ARMv7-M only).
    UsageFault,
    /// Supervisor call.
    SVCall,
    /// Debug monitor (ARMv7-M only).
    DebugMonitor,
    /// Pendable service call.
    PendSV,
    /// System tick timer.
    SysTick,
}

impl SystemHandler {
    /// Exception number, i.e. the position in the vector table.
    #[inline]
    pub fn number(self) -> u8 {
        match self {
            SystemHandler::MemoryManagement => 4,
            SystemHandler::BusFault => 5,
            SystemHandler::UsageFault => 6,
            SystemHandler::SVCall => 11,
            SystemHandler::DebugMonitor => 12,
            SystemHandler::PendSV => 14,
            SystemHandler::SysTick => 15,
        }
    }

    /// `IRQn` value as used by device headers (exception number - 16).
    #[inline]
    pub fn irqn(self) -> i8 {
        self.number() as i8 - 16
    }

    fn exists_on(self, arch: Architecture) -> bool {
        match arch {
            Architecture::Armv7m => true,
            Architecture::Armv6m => matches!(
                self,
                SystemHandler::SVCall | SystemHandler::PendSV | SystemHandler::SysTick
            ),
        }
    }
}

/// Decoded Configurable Fault Status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultStatus {
    bits: u32,
}

impl FaultStatus {
    /// MemManage fault status byte.
    #[inline]
    pub fn mmfsr(self) -> u8 {
        self.bits as u8
    }

    /// BusFault status byte.
    #[inline]
    pub fn bfsr(self) -> u8 {
        (self.bits >> 8) as u8
    }

    /// UsageFault status half word.
    #[inline]
    pub fn ufsr(self) -> u16 {
        (self.bits >> 16) as u16
    }

    /// Raw register value.
    #[inline]
    pub fn bits(self) -> u32 {
        self.bits
    }
}

bit_accessors!(FaultStatus {
    /// Instruction access violation.
    iaccviol: 0,
    /// Data access violation.
    daccviol: 1,
    /// MemManage fault on exception return unstacking.
    munstkerr: 3,
    /// MemManage fault on exception entry stacking.
    mstkerr: 4,
    /// MMFAR holds a valid address.
    mmarvalid: 7,
    /// Instruction bus error.
    ibuserr: 8,
    /// Precise data bus error.
    preciserr: 9,
    /// Imprecise data bus error.
    impreciserr: 10,
    /// BusFault on unstacking.
    unstkerr: 11,
    /// BusFault on stacking.
    stkerr: 12,
    /// BFAR holds a valid address.
    bfarvalid: 15,
    /// Undefined instruction.
    undefinstr: 16,
    /// Invalid EPSR state.
    invstate: 17,
    /// Invalid EXC_RETURN.
    invpc: 18,
    /// Coprocessor access.
    nocp: 19,
    /// Unaligned access.
    unaligned: 24,
    /// Divide by zero.
    divbyzero: 25,
});

/// Decoded HardFault Status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardFaultStatus {
    bits: u32,
}

bit_accessors!(HardFaultStatus {
    /// Bus fault on vector table read.
    vecttbl: 1,
    /// Escalated configurable fault.
    forced: 30,
    /// Debug event.
    debugevt: 31,
});

impl<P: Profile> SCB<P> {
    /// Reads and decodes CPUID.
    #[inline]
    pub fn cpuid(&self) -> Cpuid {
        Cpuid::from(self.cpuid.get())
    }

    /// Number of the currently active exception, `0` in thread mode.
    #[inline]
    pub fn vect_active(&self) -> u16 {
        (self.icsr.get() & ICSR_VECTACTIVE_MASK) as u16
    }

    /// Number of the highest priority pending exception, `0` if none.
    #[inline]
    pub fn vect_pending(&self) -> u16 {
        ((self.icsr.get() >> ICSR_VECTPENDING_POS) & 0x1FF) as u16
    }

    /// Checks if an external interrupt is pending.
    #[inline]
    pub fn is_isr_pending(&self) -> bool {
        self.icsr.get() & ICSR_ISRPENDING != 0
    }

    /// Sets the PendSV exception pending.
    #[inline]
    pub fn set_pendsv(&mut self) {
        self.icsr.set(ICSR_PENDSVSET);
    }

    /// Checks if PendSV is pending.
    #[inline]
    pub fn is_pendsv_pending(&self) -> bool {
        self.icsr.get() & ICSR_PENDSVSET != 0
    }

    /// Clears a pending PendSV.
    #[inline]
    pub fn clear_pendsv(&mut self) {
        self.icsr.set(ICSR_PENDSVCLR);
    }

    /// Sets the SysTick exception pending.
    #[inline]
    pub fn set_pendst(&mut self) {
        self.icsr.set(ICSR_PENDSTSET);
    }

    /// Clears a pending SysTick exception.
    #[inline]
    pub fn clear_pendst(&mut self) {
        self.icsr.set(ICSR_PENDSTCLR);
    }

    /// Sets the NMI pending.
    #[inline]
    pub fn pend_nmi(&mut self) {
        self.icsr.set(ICSR_NMIPENDSET);
    }

    /// Checks if the core runs big endian.
    #[inline]
    pub fn is_big_endian(&self) -> bool {
        self.aircr.get() & AIRCR_ENDIANNESS != 0
    }

    /// Requests a system reset and returns once the request is written.
    ///
    /// The priority grouping is preserved. [`system_reset`](Self::system_reset)
    /// additionally waits for the reset to happen.
    pub fn request_reset(&mut self) {
        crate::asm::dsb();
        let prigroup = match P::ARCH {
            Architecture::Armv6m => 0,
            Architecture::Armv7m => self.aircr.get() & AIRCR_PRIGROUP_MASK,
        };
        self.aircr.set(AIRCR_VECTKEY | prigroup | AIRCR_SYSRESETREQ);
        crate::asm::dsb();
    }

    /// Initiates a system reset.
    pub fn system_reset(&mut self) -> ! {
        self.request_reset();
        loop {
            crate::asm::nop();
        }
    }

    /// Enters deep sleep on `wfi`/`wfe`.
    #[inline]
    pub fn set_sleepdeep(&mut self) {
        self.scr.set(self.scr.get() | SCR_SLEEPDEEP);
    }

    /// Enters normal sleep on `wfi`/`wfe`.
    #[inline]
    pub fn clear_sleepdeep(&mut self) {
        self.scr.set(self.scr.get() & !SCR_SLEEPDEEP);
    }

    /// Re-enters sleep when returning from an ISR to thread mode.
    #[inline]
    pub fn set_sleeponexit(&mut self) {
        self.scr.set(self.scr.get() | SCR_SLEEPONEXIT);
    }

    /// Stays awake when returning from an ISR to thread mode.
    #[inline]
    pub fn clear_sleeponexit(&mut self) {
        self.scr.set(self.scr.get() & !SCR_SLEEPONEXIT);
    }

    /// Makes pending interrupts wake the core from `wfe`, even when disabled.
    #[inline]
    pub fn set_sevonpend(&mut self) {
        self.scr.set(self.scr.get() | SCR_SEVONPEND);
    }

    /// Only enabled interrupts wake the core from `wfe`.
    #[inline]
    pub fn clear_sevonpend(&mut self) {
        self.scr.set(self.scr.get() & !SCR_SEVONPEND);
    }

    /// Checks if the stack is 8-byte aligned on exception entry.
    #[inline]
    pub fn has_stack_alignment(&self) -> bool {
        self.ccr.get() & CCR_STKALIGN != 0
    }

    /// Sets the logical priority of a system handler.
    ///
    /// Fails with [`Error::ArgumentError`] for handlers that do not exist on
    /// the profile's architecture.
    ///
    /// # Safety
    ///
    /// Changing priority levels can break priority based critical sections.
    pub unsafe fn set_system_handler_priority(
        &mut self,
        handler: SystemHandler,
        priority: u8,
    ) -> Result<()> {
        if !handler.exists_on(P::ARCH) {
            log::debug!("{:?} has no configurable priority on {:?}", handler, P::ARCH);
            return Err(Error::ArgumentError);
        }
        let index = usize::from(handler.number() - 4);
        let value = (u32::from(priority) << P::priority_shift()) & 0xFF;
        let reg = &self.shpr[index / 4];
        match P::ARCH {
            Architecture::Armv6m => {
                let shift = (index % 4) * 8;
                reg.set((reg.get() & !(0xFF << shift)) | (value << shift));
            }
            Architecture::Armv7m => {
                ptr::write_volatile((reg.as_ptr() as *mut u8).add(index % 4), value as u8);
            }
        }
        Ok(())
    }

    /// Returns the logical priority of a system handler.
    pub fn system_handler_priority(&self, handler: SystemHandler) -> Result<u8> {
        if !handler.exists_on(P::ARCH) {
            return Err(Error::ArgumentError);
        }
        let index = usize::from(handler.number() - 4);
        let reg = &self.shpr[index / 4];
        let raw = match P::ARCH {
            Architecture::Armv6m => (reg.get() >> ((index % 4) * 8)) & 0xFF,
            Architecture::Armv7m => unsafe {
                u32::from(ptr::read_volatile(
                    (reg.as_ptr() as *const u8).add(index % 4),
                ))
            },
        };
        Ok((raw >> P::priority_shift()) as u8)
    }
}

impl<P: Mainline> SCB<P> {
    /// Sets the priority grouping field of AIRCR. Only values `0..=7` are used.
    pub fn set_priority_grouping(&mut self, group: u32) {
        let group = group & 0x07;
        let value = self.aircr.get() & !(0xFFFF << 16 | AIRCR_PRIGROUP_MASK);
        self.aircr
            .set(value | AIRCR_VECTKEY | (group << AIRCR_PRIGROUP_POS));
        log::trace!("priority grouping set to {}", group);
    }

    /// Reads the priority grouping field of AIRCR.
    #[inline]
    pub fn priority_grouping(&self) -> u32 {
        (self.aircr.get() & AIRCR_PRIGROUP_MASK) >> AIRCR_PRIGROUP_POS
    }

    /// Relocates the vector table.
    ///
    /// `offset` must be 128-byte aligned, otherwise [`Error::ArgumentError`]
    /// is returned.
    ///
    /// # Safety
    ///
    /// The new vector table must be valid before the next exception occurs.
    pub unsafe fn set_vector_table_offset(&mut self, offset: u32) -> Result<()> {
        if offset & !VTOR_TBLOFF_MASK != 0 {
            log::debug!("vector table offset {:#010x} is misaligned", offset);
            return Err(Error::ArgumentError);
        }
        self.vtor.set(offset);
        Ok(())
    }

    /// Reads the vector table offset.
    #[inline]
    pub fn vector_table_offset(&self) -> u32 {
        self.vtor.get() & VTOR_TBLOFF_MASK
    }

    /// Enables the MemManage, BusFault and UsageFault handlers.
    pub fn enable_fault_handlers(&mut self) {
        self.shcsr.set(
            self.shcsr.get() | SHCSR_MEMFAULTENA | SHCSR_BUSFAULTENA | SHCSR_USGFAULTENA,
        );
    }

    /// Disables the MemManage, BusFault and UsageFault handlers; those
    /// faults escalate to HardFault.
    pub fn disable_fault_handlers(&mut self) {
        self.shcsr.set(
            self.shcsr.get() & !(SHCSR_MEMFAULTENA | SHCSR_BUSFAULTENA | SHCSR_USGFAULTENA),
        );
    }

    /// Traps divisions by zero.
    #[inline]
    pub fn enable_div_by_zero_trap(&mut self) {
        self.ccr.set(self.ccr.get() | CCR_DIV_0_TRP);
    }

    /// Traps unaligned half word and word accesses.
    #[inline]
    pub fn enable_unaligned_trap(&mut self) {
        self.ccr.set(self.ccr.get() | CCR_UNALIGN_TRP);
    }

    /// Reads the configurable fault status.
    #[inline]
    pub fn fault_status(&self) -> FaultStatus {
        FaultStatus {
            bits: self.cfsr.get(),
        }
    }

    /// Clears the given fault status bits (write one to clear).
    #[inline]
    pub fn clear_fault_status(&mut self, status: FaultStatus) {
        self.cfsr.set(status.bits);
    }

    /// Reads the HardFault status.
    #[inline]
    pub fn hard_fault_status(&self) -> HardFaultStatus {
        HardFaultStatus {
            bits: self.hfsr.get(),
        }
    }

    /// MemManage fault address, if the fault status marks it as valid.
    pub fn mem_manage_fault_address(&self) -> Option<u32> {
        if self.fault_status().mmarvalid() {
            Some(self.mmfar.get())
        } else {
            None
        }
    }

    /// BusFault address, if the fault status marks it as valid.
    pub fn bus_fault_address(&self) -> Option<u32> {
        if self.fault_status().bfarvalid() {
            Some(self.bfar.get())
        } else {
            None
        }
    }
}
