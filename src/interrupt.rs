//! Interrupts

#[cfg(all(target_arch = "arm", target_os = "none"))]
use core::arch::asm;
use core::sync::atomic::{compiler_fence, Ordering};

/// Disables all interrupts (`cpsid i`).
#[inline]
pub fn disable() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    unsafe {
        asm!("cpsid i", options(nomem, nostack, preserves_flags))
    };

    // Prevent subsequent memory accesses from being reordered before
    // interrupts are disabled.
    compiler_fence(Ordering::SeqCst);
}

/// Enables all the interrupts (`cpsie i`).
///
/// # Safety
///
/// Do not call this function inside a critical section.
#[inline]
pub unsafe fn enable() {
    // Prevent preceding memory accesses from being reordered past the
    // point where interrupts are enabled.
    compiler_fence(Ordering::SeqCst);

    #[cfg(all(target_arch = "arm", target_os = "none"))]
    asm!("cpsie i", options(nomem, nostack, preserves_flags));
}

/// Execute closure `f` in an interrupt-free context.
///
/// Interrupts are re-enabled on exit only if they were enabled on entry.
#[inline]
pub fn free<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let primask = crate::register::primask::read();

    disable();

    let r = f();

    if primask.is_active() {
        unsafe { enable() }
    }

    r
}
