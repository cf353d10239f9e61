//! Processor core registers
//!
//! The decoders are plain values built from a raw word and work on every
//! target. Reading and writing the live registers needs the `mrs`/`msr`
//! instructions and is only available on bare metal ARM targets, with the
//! exception of [`primask::read`] which reports interrupts as enabled
//! elsewhere. BASEPRI and FAULTMASK only exist on ARMv7-M.

pub mod control;
pub mod psr;

pub use control::Control;
pub use psr::{Apsr, Ipsr, Xpsr};

/// Priority mask register
pub mod primask {
    /// State of the priority mask
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Primask {
        /// Active
        Active,
        /// Inactive
        Inactive,
    }

    impl Primask {
        /// Builds the value from the raw register.
        #[inline]
        pub fn from_bits(bits: u32) -> Self {
            if bits & 1 == 1 {
                Primask::Inactive
            } else {
                Primask::Active
            }
        }

        /// All exceptions with configurable priority are active.
        #[inline]
        pub fn is_active(self) -> bool {
            self == Primask::Active
        }

        /// All exceptions with configurable priority are inactive.
        #[inline]
        pub fn is_inactive(self) -> bool {
            self == Primask::Inactive
        }
    }

    /// Reads the CPU register (`__get_PRIMASK`).
    #[inline]
    pub fn read() -> Primask {
        #[cfg(all(target_arch = "arm", target_os = "none"))]
        {
            let bits: u32;
            unsafe {
                core::arch::asm!("mrs {}, PRIMASK", out(reg) bits, options(nomem, nostack, preserves_flags))
            };
            Primask::from_bits(bits)
        }
        #[cfg(not(all(target_arch = "arm", target_os = "none")))]
        Primask::Active
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
macro_rules! special_register {
    ($(#[$attr:meta])* $module:ident, $reg:literal) => {
        $(#[$attr])*
        pub mod $module {
            /// Reads the CPU register.
            #[inline]
            pub fn read() -> u32 {
                let bits: u32;
                unsafe {
                    core::arch::asm!(
                        concat!("mrs {}, ", $reg),
                        out(reg) bits,
                        options(nomem, nostack, preserves_flags)
                    )
                };
                bits
            }

            /// Writes `bits` to the CPU register.
            ///
            /// # Safety
            ///
            /// Changing masks and stack pointers affects all running code.
            #[inline]
            pub unsafe fn write(bits: u32) {
                core::arch::asm!(
                    concat!("msr ", $reg, ", {}"),
                    in(reg) bits,
                    options(nomem, nostack, preserves_flags)
                );
            }
        }
    };
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
special_register!(
    /// Base priority mask register (ARMv7-M)
    basepri,
    "BASEPRI"
);
#[cfg(all(target_arch = "arm", target_os = "none"))]
special_register!(
    /// Fault mask register (ARMv7-M)
    faultmask,
    "FAULTMASK"
);
#[cfg(all(target_arch = "arm", target_os = "none"))]
special_register!(
    /// Main Stack Pointer
    msp,
    "MSP"
);
#[cfg(all(target_arch = "arm", target_os = "none"))]
special_register!(
    /// Process Stack Pointer
    psp,
    "PSP"
);
