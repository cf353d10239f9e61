//! Control register

/// Control register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control {
    bits: u32,
}

/// Thread mode privilege level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Npriv {
    /// Privileged
    Privileged,
    /// Unprivileged
    Unprivileged,
}

/// Currently active stack pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Spsel {
    /// MSP is the current stack pointer
    Msp,
    /// PSP is the current stack pointer
    Psp,
}

const NPRIV: u32 = 1 << 0;
const SPSEL: u32 = 1 << 1;
const FPCA: u32 = 1 << 2;

impl Control {
    /// Creates a `Control` value from raw bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the contents of the register as raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Thread mode privilege level.
    #[inline]
    pub fn npriv(self) -> Npriv {
        if self.bits & NPRIV == NPRIV {
            Npriv::Unprivileged
        } else {
            Npriv::Privileged
        }
    }

    /// Sets the thread mode privilege level.
    #[inline]
    pub fn set_npriv(&mut self, npriv: Npriv) {
        match npriv {
            Npriv::Unprivileged => self.bits |= NPRIV,
            Npriv::Privileged => self.bits &= !NPRIV,
        }
    }

    /// Currently active stack pointer.
    #[inline]
    pub fn spsel(self) -> Spsel {
        if self.bits & SPSEL == SPSEL {
            Spsel::Psp
        } else {
            Spsel::Msp
        }
    }

    /// Selects the thread mode stack pointer.
    #[inline]
    pub fn set_spsel(&mut self, spsel: Spsel) {
        match spsel {
            Spsel::Psp => self.bits |= SPSEL,
            Spsel::Msp => self.bits &= !SPSEL,
        }
    }

    /// Floating point context active. Always clear on cores without FPU.
    #[inline]
    pub fn fpca(self) -> bool {
        self.bits & FPCA == FPCA
    }
}

/// Reads the CONTROL register (`__get_CONTROL`).
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[inline]
pub fn read() -> Control {
    let bits: u32;
    unsafe {
        core::arch::asm!("mrs {}, CONTROL", out(reg) bits, options(nomem, nostack, preserves_flags))
    };
    Control::from_bits(bits)
}

/// Writes the CONTROL register (`__set_CONTROL`).
///
/// # Safety
///
/// Switching the stack pointer or dropping privileges changes the execution
/// environment of the running code.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[inline]
pub unsafe fn write(control: Control) {
    let bits = control.bits();
    core::arch::asm!(
        "msr CONTROL, {}",
        "isb",
        in(reg) bits,
        options(nomem, nostack, preserves_flags)
    );
}
