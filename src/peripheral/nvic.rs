//! Nested Vector Interrupt Controller

// Based on CMSIS Cortex-M core code (c) 2009-2011 by ARM Limited

use core::ptr;

use vcell::VolatileCell;

use super::NVIC;
use crate::profile::{Architecture, Mainline, Profile};

/// Register block
#[repr(C)]
pub struct RegisterBlock {
    /// Interrupt Set-Enable
    pub iser: [VolatileCell<u32>; 8],
    _reserved0: [u32; 24],
    /// Interrupt Clear-Enable
    pub icer: [VolatileCell<u32>; 8],
    _reserved1: [u32; 24],
    /// Interrupt Set-Pending
    pub ispr: [VolatileCell<u32>; 8],
    _reserved2: [u32; 24],
    /// Interrupt Clear-Pending
    pub icpr: [VolatileCell<u32>; 8],
    _reserved3: [u32; 24],
    /// Interrupt Active Bit (not present on ARMv6-M)
    pub iabr: [VolatileCell<u32>; 8],
    _reserved4: [u32; 56],
    /// Interrupt Priority
    ///
    /// Each word holds the priority of four interrupts, lowest numbered
    /// interrupt in the least significant byte. ARMv6-M only permits word
    /// accesses and implements the first eight words.
    pub ipr: [VolatileCell<u32>; 60],
    _reserved5: [u32; 644],
    /// Software Trigger Interrupt (not present on ARMv6-M)
    pub stir: VolatileCell<u32>,
}

/// Identifies a device specific interrupt.
///
/// # Safety
///
/// `number` must return a valid interrupt number, the same for every call
/// with the same value.
pub unsafe trait InterruptNumber: Copy {
    /// Position of the interrupt in the vector table, minus 16.
    fn number(self) -> u16;
}

/// A plain interrupt number.
///
/// The NVIC methods ignore numbers at or above the [`Profile::MAX_IRQS`]
/// lines of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Irq(pub u16);

unsafe impl InterruptNumber for Irq {
    #[inline]
    fn number(self) -> u16 {
        self.0
    }
}

// Interrupt number checked against the lines of the core.
#[inline]
fn line<P: Profile, I: InterruptNumber>(interrupt: I) -> Option<u16> {
    let nr = interrupt.number();
    if nr < P::MAX_IRQS {
        Some(nr)
    } else {
        log::debug!("interrupt {} outside the {} lines of the core", nr, P::MAX_IRQS);
        None
    }
}

#[inline]
fn word_and_mask<P: Profile, I: InterruptNumber>(interrupt: I) -> Option<(usize, u32)> {
    line::<P, I>(interrupt).map(|nr| (usize::from(nr / 32), 1 << (nr % 32)))
}

impl<P: Profile> NVIC<P> {
    /// Enables `interrupt`.
    ///
    /// # Safety
    ///
    /// Enabling an interrupt can break critical sections that rely on it
    /// being masked.
    #[inline]
    pub unsafe fn enable<I: InterruptNumber>(&mut self, interrupt: I) {
        if let Some((word, mask)) = word_and_mask::<P, I>(interrupt) {
            self.iser[word].set(mask);
        }
    }

    /// Disables `interrupt`.
    #[inline]
    pub fn disable<I: InterruptNumber>(&mut self, interrupt: I) {
        if let Some((word, mask)) = word_and_mask::<P, I>(interrupt) {
            self.icer[word].set(mask);
        }
    }

    /// Checks if `interrupt` is enabled.
    #[inline]
    pub fn is_enabled<I: InterruptNumber>(&self, interrupt: I) -> bool {
        word_and_mask::<P, I>(interrupt)
            .is_some_and(|(word, mask)| self.iser[word].get() & mask == mask)
    }

    /// Forces `interrupt` into the pending state.
    #[inline]
    pub fn pend<I: InterruptNumber>(&mut self, interrupt: I) {
        if let Some((word, mask)) = word_and_mask::<P, I>(interrupt) {
            self.ispr[word].set(mask);
        }
    }

    /// Clears `interrupt`'s pending state.
    #[inline]
    pub fn unpend<I: InterruptNumber>(&mut self, interrupt: I) {
        if let Some((word, mask)) = word_and_mask::<P, I>(interrupt) {
            self.icpr[word].set(mask);
        }
    }

    /// Checks if `interrupt` is pending.
    #[inline]
    pub fn is_pending<I: InterruptNumber>(&self, interrupt: I) -> bool {
        word_and_mask::<P, I>(interrupt)
            .is_some_and(|(word, mask)| self.ispr[word].get() & mask == mask)
    }

    /// Sets the logical priority of `interrupt`.
    ///
    /// `priority` is in `0..(1 << PRIO_BITS)`, lower values are more urgent.
    /// Bits above the implemented priority bits are discarded.
    ///
    /// # Safety
    ///
    /// Changing priority levels can break priority based critical sections.
    pub unsafe fn set_priority<I: InterruptNumber>(&mut self, interrupt: I, priority: u8) {
        let Some(nr) = line::<P, I>(interrupt).map(usize::from) else {
            return;
        };
        let value = ((u32::from(priority)) << P::priority_shift()) & 0xFF;
        let reg = &self.ipr[nr / 4];
        match P::ARCH {
            Architecture::Armv6m => {
                let shift = (nr % 4) * 8;
                reg.set((reg.get() & !(0xFF << shift)) | (value << shift));
            }
            Architecture::Armv7m => {
                ptr::write_volatile((reg.as_ptr() as *mut u8).add(nr % 4), value as u8);
            }
        }
    }

    /// Returns the logical priority of `interrupt`, zero for numbers beyond
    /// the lines of the core.
    pub fn get_priority<I: InterruptNumber>(&self, interrupt: I) -> u8 {
        let Some(nr) = line::<P, I>(interrupt).map(usize::from) else {
            return 0;
        };
        let reg = &self.ipr[nr / 4];
        let raw = match P::ARCH {
            Architecture::Armv6m => (reg.get() >> ((nr % 4) * 8)) & 0xFF,
            Architecture::Armv7m => unsafe {
                u32::from(ptr::read_volatile(
                    (reg.as_ptr() as *const u8).add(nr % 4),
                ))
            },
        };
        (raw >> P::priority_shift()) as u8
    }
}

impl<P: Mainline> NVIC<P> {
    /// Checks if `interrupt` is active or pre-empted and stacked.
    #[inline]
    pub fn is_active<I: InterruptNumber>(&self, interrupt: I) -> bool {
        word_and_mask::<P, I>(interrupt)
            .is_some_and(|(word, mask)| self.iabr[word].get() & mask == mask)
    }

    /// Requests `interrupt` through the software trigger register.
    #[inline]
    pub fn request<I: InterruptNumber>(&mut self, interrupt: I) {
        if let Some(nr) = line::<P, I>(interrupt) {
            self.stir.set(u32::from(nr));
        }
    }
}

fn group_bits<P: Profile>(group: u32) -> (u32, u32) {
    let group = group & 0x07;
    let prio_bits = u32::from(P::PRIO_BITS);
    let preempt_bits = if 7 - group > prio_bits {
        prio_bits
    } else {
        7 - group
    };
    let sub_bits = if group + prio_bits < 7 {
        0
    } else {
        group + prio_bits - 7
    };
    (preempt_bits, sub_bits)
}

/// Combines a pre-emption priority and a sub priority into a logical
/// priority for the given priority group.
///
/// Values wider than the fields available in `group` are truncated.
pub fn encode_priority<P: Mainline>(group: u32, preempt: u32, sub: u32) -> u8 {
    let (preempt_bits, sub_bits) = group_bits::<P>(group);
    let preempt = preempt & ((1 << preempt_bits) - 1);
    let sub = sub & ((1 << sub_bits) - 1);
    ((preempt << sub_bits) | sub) as u8
}

/// Splits a logical priority into `(preempt, sub)` for the given priority
/// group.
pub fn decode_priority<P: Mainline>(priority: u8, group: u32) -> (u32, u32) {
    let (preempt_bits, sub_bits) = group_bits::<P>(group);
    let priority = u32::from(priority);
    (
        (priority >> sub_bits) & ((1 << preempt_bits) - 1),
        priority & ((1 << sub_bits) - 1),
    )
}
