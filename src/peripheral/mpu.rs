//! Memory Protection Unit

use vcell::VolatileCell;

use super::MPU;
use crate::error::{Error, Result};
use crate::profile::Mainline;

/// Register block
#[repr(C)]
pub struct RegisterBlock {
    /// Type
    pub _type: VolatileCell<u32>,
    /// Control
    pub ctrl: VolatileCell<u32>,
    /// Region Number
    pub rnr: VolatileCell<u32>,
    /// Region Base Address
    pub rbar: VolatileCell<u32>,
    /// Region Attribute and Size
    pub rasr: VolatileCell<u32>,
    /// Alias 1 of RBAR
    pub rbar_a1: VolatileCell<u32>,
    /// Alias 1 of RASR
    pub rasr_a1: VolatileCell<u32>,
    /// Alias 2 of RBAR
    pub rbar_a2: VolatileCell<u32>,
    /// Alias 2 of RASR
    pub rasr_a2: VolatileCell<u32>,
    /// Alias 3 of RBAR
    pub rbar_a3: VolatileCell<u32>,
    /// Alias 3 of RASR
    pub rasr_a3: VolatileCell<u32>,
}

const CTRL_ENABLE: u32 = 1 << 0;
const CTRL_HFNMIENA: u32 = 1 << 1;
const CTRL_PRIVDEFENA: u32 = 1 << 2;

const RBAR_VALID: u32 = 1 << 4;
const RBAR_ADDR_MASK: u32 = !0x1F;

const RASR_ENABLE: u32 = 1 << 0;
const RASR_SIZE_POS: u32 = 1;
const RASR_SRD_POS: u32 = 8;
const RASR_XN: u32 = 1 << 28;
const RASR_AP_POS: u32 = 24;
const RASR_TEX_POS: u32 = 19;
const RASR_S: u32 = 1 << 18;
const RASR_C: u32 = 1 << 17;
const RASR_B: u32 = 1 << 16;

/// Decoded MPU type register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MpuType {
    /// Number of instruction regions, `0` for a unified MPU.
    pub iregion: u8,
    /// Number of data regions, `0` if no MPU is present.
    pub dregion: u8,
    /// Separate instruction and data maps.
    pub separate: bool,
}

impl From<u32> for MpuType {
    fn from(bits: u32) -> Self {
        Self {
            iregion: (bits >> 16) as u8,
            dregion: (bits >> 8) as u8,
            separate: bits & 1 != 0,
        }
    }
}

/// Data access permission of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccessPermission {
    /// All accesses fault.
    NoAccess = 0b000,
    /// Privileged read/write only.
    PrivilegedReadWrite = 0b001,
    /// Unprivileged read only.
    UnprivilegedReadOnly = 0b010,
    /// Full access.
    FullAccess = 0b011,
    /// Privileged read only.
    PrivilegedReadOnly = 0b101,
    /// Read only for both privilege levels.
    ReadOnly = 0b110,
}

/// Configuration of a single MPU region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    /// Base address, aligned to `size`.
    pub base: u32,
    /// Region size in bytes, a power of two of at least 32.
    pub size: u32,
    /// Access permission.
    pub access: AccessPermission,
    /// Forbid instruction fetches.
    pub execute_never: bool,
    /// Type extension field.
    pub tex: u8,
    /// Shareable.
    pub shareable: bool,
    /// Cacheable.
    pub cacheable: bool,
    /// Bufferable.
    pub bufferable: bool,
    /// Sub-region disable mask.
    pub subregion_disable: u8,
}

impl Region {
    /// Region with normal memory attributes and no sub-regions disabled.
    pub fn new(base: u32, size: u32, access: AccessPermission) -> Self {
        Self {
            base,
            size,
            access,
            execute_never: false,
            tex: 0,
            shareable: false,
            cacheable: true,
            bufferable: false,
            subregion_disable: 0,
        }
    }
}

/// Encodes a region size into the RASR SIZE field, `log2(size) - 1`.
///
/// Sizes that are not a power of two or below 32 bytes are rejected.
pub fn region_size_bits(size: u32) -> Result<u32> {
    if size < 32 || !size.is_power_of_two() {
        log::debug!("invalid MPU region size {}", size);
        return Err(Error::ArgumentError);
    }
    Ok(size.trailing_zeros() - 1)
}

impl<P: Mainline> MPU<P> {
    /// Reads the type register.
    #[inline]
    pub fn mpu_type(&self) -> MpuType {
        MpuType::from(self._type.get())
    }

    /// Enables the MPU.
    ///
    /// `privileged_default` maps the default memory map as background region
    /// for privileged code, `during_faults` keeps the MPU active in HardFault
    /// and NMI handlers.
    ///
    /// # Safety
    ///
    /// The configured regions must cover all memory used afterwards.
    pub unsafe fn enable(&mut self, privileged_default: bool, during_faults: bool) {
        let mut ctrl = CTRL_ENABLE;
        if privileged_default {
            ctrl |= CTRL_PRIVDEFENA;
        }
        if during_faults {
            ctrl |= CTRL_HFNMIENA;
        }
        crate::asm::dmb();
        self.ctrl.set(ctrl);
        crate::asm::dsb();
        crate::asm::isb();
    }

    /// Disables the MPU.
    pub fn disable(&mut self) {
        crate::asm::dmb();
        self.ctrl.set(0);
    }

    /// Checks if the MPU is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.ctrl.get() & CTRL_ENABLE != 0
    }

    /// Programs region `number`.
    ///
    /// Returns [`Error::ArgumentError`] for a region number the unit does
    /// not implement, an invalid size or a base address not aligned to the
    /// size.
    ///
    /// # Safety
    ///
    /// Reconfiguring an active region changes memory access rules for
    /// running code.
    pub unsafe fn set_region(&mut self, number: u8, region: &Region) -> Result<()> {
        let dregion = self.mpu_type().dregion;
        if dregion != 0 && number >= dregion {
            log::debug!("MPU region {} not implemented ({} regions)", number, dregion);
            return Err(Error::ArgumentError);
        }
        let size_bits = region_size_bits(region.size)?;
        if region.base & (region.size - 1) != 0 {
            log::debug!("MPU region base {:#010x} is not size aligned", region.base);
            return Err(Error::ArgumentError);
        }
        let mut rasr = RASR_ENABLE
            | (size_bits << RASR_SIZE_POS)
            | (u32::from(region.subregion_disable) << RASR_SRD_POS)
            | ((region.access as u32) << RASR_AP_POS)
            | (u32::from(region.tex & 0x7) << RASR_TEX_POS);
        if region.execute_never {
            rasr |= RASR_XN;
        }
        if region.shareable {
            rasr |= RASR_S;
        }
        if region.cacheable {
            rasr |= RASR_C;
        }
        if region.bufferable {
            rasr |= RASR_B;
        }
        self.rnr.set(u32::from(number));
        self.rbar.set(region.base & RBAR_ADDR_MASK);
        self.rasr.set(rasr);
        log::trace!("MPU region {}: base {:#010x} rasr {:#010x}", number, region.base, rasr);
        Ok(())
    }

    /// Disables region `number`.
    pub fn clear_region(&mut self, number: u8) {
        self.rnr.set(u32::from(number));
        self.rasr.set(0);
    }

    /// Writes a base address together with its region number through the
    /// VALID bit of RBAR.
    #[inline]
    pub fn set_region_base(&mut self, number: u8, base: u32) {
        self.rbar
            .set((base & RBAR_ADDR_MASK) | RBAR_VALID | u32::from(number & 0xF));
    }
}
