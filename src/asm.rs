//! Miscellaneous assembly instructions and bit intrinsics.
//!
//! The instruction wrappers compile to the instruction on bare metal ARM
//! targets. On other targets the barriers become compiler fences and the
//! remaining hints do nothing, so code using them stays testable on the host.
//! The bit intrinsics are portable and give the same result everywhere.

#[cfg(all(target_arch = "arm", target_os = "none"))]
use core::arch::asm;
#[cfg(not(all(target_arch = "arm", target_os = "none")))]
use core::sync::atomic::{compiler_fence, Ordering};

/// A no-operation.
#[inline(always)]
pub fn nop() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        asm!("nop", options(nomem, nostack, preserves_flags))
    };
}

/// Wait For Interrupt
#[inline(always)]
pub fn wfi() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        asm!("wfi", options(nomem, nostack, preserves_flags))
    };
}

/// Wait For Event
#[inline(always)]
pub fn wfe() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        asm!("wfe", options(nomem, nostack, preserves_flags))
    };
}

/// Send Event
#[inline(always)]
pub fn sev() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        asm!("sev", options(nomem, nostack, preserves_flags))
    };
}

/// Puts the processor in Debug state. Debuggers can pick this up as a
/// "breakpoint".
#[inline(always)]
pub fn bkpt() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        asm!("bkpt", options(nomem, nostack, preserves_flags))
    };
}

/// Instruction Synchronization Barrier
///
/// Flushes the pipeline so that instructions following it are fetched again
/// after the barrier completes.
#[inline(always)]
pub fn isb() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        asm!("isb", options(nostack, preserves_flags))
    };
    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    compiler_fence(Ordering::SeqCst);
}

/// Data Synchronization Barrier
///
/// No instruction after it executes until all explicit memory accesses
/// before it complete.
#[inline(always)]
pub fn dsb() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        asm!("dsb", options(nostack, preserves_flags))
    };
    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    compiler_fence(Ordering::SeqCst);
}

/// Data Memory Barrier
///
/// Memory accesses before it are observed before memory accesses after it.
#[inline(always)]
pub fn dmb() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        asm!("dmb", options(nostack, preserves_flags))
    };
    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    compiler_fence(Ordering::SeqCst);
}

/// Reverses the byte order of a word (`REV`).
#[inline]
pub fn rev(value: u32) -> u32 {
    value.swap_bytes()
}

/// Reverses the byte order within each half word (`REV16`).
#[inline]
pub fn rev16(value: u32) -> u32 {
    ((value & 0xFF00_FF00) >> 8) | ((value & 0x00FF_00FF) << 8)
}

/// Reverses the byte order of the low half word and sign extends it
/// (`REVSH`).
#[inline]
pub fn revsh(value: i32) -> i32 {
    (value as u16).swap_bytes() as i16 as i32
}

/// Reverses the bit order of a word (`RBIT`).
#[inline]
pub fn rbit(value: u32) -> u32 {
    value.reverse_bits()
}

/// Counts leading zeros (`CLZ`), `32` for zero.
#[inline]
pub fn clz(value: u32) -> u8 {
    value.leading_zeros() as u8
}
