//! Core profiles.
//!
//! The register layouts of the Cortex-M0 and Cortex-M3 share their addresses
//! but differ in which registers exist and in how priority registers may be
//! accessed. Peripheral proxies are generic over a [`Profile`] so that a
//! single code base serves both cores, and functions only available on
//! ARMv7-M are bounded by [`Mainline`].

/// Architecture version implemented by a core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Architecture {
    /// ARMv6-M (Cortex-M0, M0+, M1). Priority registers are word accessible only.
    Armv6m,
    /// ARMv7-M (Cortex-M3). Byte accessible priority registers.
    Armv7m,
}

/// Static description of a core as seen by the core peripherals.
pub trait Profile {
    /// Architecture version.
    const ARCH: Architecture;

    /// Number of implemented priority bits (`__NVIC_PRIO_BITS`).
    const PRIO_BITS: u8;

    /// Maximum number of external interrupt lines.
    const MAX_IRQS: u16;

    /// Shift applied to a logical priority before it is written to a
    /// priority register.
    #[inline]
    fn priority_shift() -> u32 {
        8 - Self::PRIO_BITS as u32
    }

    /// Lowest (numerically highest) logical priority.
    #[inline]
    fn lowest_priority() -> u8 {
        ((1u16 << Self::PRIO_BITS) - 1) as u8
    }
}

/// Marker for ARMv7-M cores.
pub trait Mainline: Profile {}

/// Cortex-M0 with the default two priority bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CortexM0;

impl Profile for CortexM0 {
    const ARCH: Architecture = Architecture::Armv6m;
    const PRIO_BITS: u8 = 2;
    const MAX_IRQS: u16 = 32;
}

/// Cortex-M3 with four priority bits, the value used by most vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CortexM3;

impl Profile for CortexM3 {
    const ARCH: Architecture = Architecture::Armv7m;
    const PRIO_BITS: u8 = 4;
    const MAX_IRQS: u16 = 240;
}

impl Mainline for CortexM3 {}
