//! Program Status Registers

/// Application Program Status Register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Apsr {
    bits: u32,
}

impl Apsr {
    /// Decodes a raw register value.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Raw register value.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.bits
    }
}

bit_accessors!(Apsr {
    /// Saturation flag (ARMv7-M).
    q: 27,
    /// Overflow flag.
    v: 28,
    /// Carry or borrow flag.
    c: 29,
    /// Zero flag.
    z: 30,
    /// Negative flag.
    n: 31,
});

/// Interrupt Program Status Register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ipsr {
    bits: u32,
}

impl Ipsr {
    /// Decodes a raw register value.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Raw register value.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Exception number of the running handler, `0` in thread mode.
    #[inline]
    pub const fn isr(self) -> u16 {
        (self.bits & 0x1FF) as u16
    }
}

/// Combined Program Status Register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Xpsr {
    bits: u32,
}

impl Xpsr {
    /// Decodes a raw register value.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Raw register value.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Exception number of the running handler.
    #[inline]
    pub const fn isr(self) -> u16 {
        (self.bits & 0x1FF) as u16
    }

    /// If-Then execution state bits held in bits 25..27.
    #[inline]
    pub const fn it(self) -> u8 {
        ((self.bits >> 25) & 0x3) as u8
    }

    /// Application view of the register.
    #[inline]
    pub const fn apsr(self) -> Apsr {
        Apsr::from_bits(self.bits & 0xF800_0000)
    }

    /// Interrupt view of the register.
    #[inline]
    pub const fn ipsr(self) -> Ipsr {
        Ipsr::from_bits(self.bits & 0x1FF)
    }
}

bit_accessors!(Xpsr {
    /// Thumb state, always set.
    t: 24,
    /// Saturation flag (ARMv7-M).
    q: 27,
    /// Overflow flag.
    v: 28,
    /// Carry or borrow flag.
    c: 29,
    /// Zero flag.
    z: 30,
    /// Negative flag.
    n: 31,
});

macro_rules! psr_reader {
    ($(#[$attr:meta])* $fn:ident, $ty:ident, $reg:literal) => {
        $(#[$attr])*
        #[cfg(all(target_arch = "arm", target_os = "none"))]
        #[inline]
        pub fn $fn() -> $ty {
            let bits: u32;
            unsafe {
                core::arch::asm!(
                    concat!("mrs {}, ", $reg),
                    out(reg) bits,
                    options(nomem, nostack, preserves_flags)
                )
            };
            $ty::from_bits(bits)
        }
    };
}

psr_reader!(
    /// Reads the APSR (`__get_APSR`).
    read_apsr,
    Apsr,
    "APSR"
);
psr_reader!(
    /// Reads the IPSR (`__get_IPSR`).
    read_ipsr,
    Ipsr,
    "IPSR"
);
psr_reader!(
    /// Reads the xPSR (`__get_xPSR`).
    read_xpsr,
    Xpsr,
    "XPSR"
);
