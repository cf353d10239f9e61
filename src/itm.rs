//! Text output through ITM stimulus ports and the debugger receive mailbox.
//!
//! Stimulus ports only exist on ARMv7-M.

use core::sync::atomic::{AtomicI32, Ordering};
use core::{fmt, ptr, slice};

use crate::peripheral::itm::Stim;

/// Value of an empty receive mailbox (`ITM_RXBUFFER_EMPTY`).
pub const RX_BUFFER_EMPTY: i32 = 0x5AA5_5AA5;

/// Receive mailbox written by the debugger.
///
/// The debugger stores one character at a time into the mailbox and waits
/// until the target marks it empty again.
#[derive(Debug)]
pub struct RxMailbox(AtomicI32);

impl RxMailbox {
    /// Creates an empty mailbox.
    pub const fn new() -> Self {
        Self(AtomicI32::new(RX_BUFFER_EMPTY))
    }

    /// Takes the pending character, `None` if the mailbox is empty.
    #[inline]
    pub fn receive_char(&self) -> Option<i32> {
        let ch = self.0.swap(RX_BUFFER_EMPTY, Ordering::AcqRel);
        if ch == RX_BUFFER_EMPTY {
            None
        } else {
            Some(ch)
        }
    }

    /// Checks if a character is available without taking it.
    #[inline]
    pub fn check_char(&self) -> bool {
        self.0.load(Ordering::Acquire) != RX_BUFFER_EMPTY
    }

    /// Stores a character as the debugger would.
    #[inline]
    pub fn post(&self, ch: i32) {
        self.0.store(ch, Ordering::Release);
    }
}

impl Default for RxMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Mailbox polled by debuggers under its well known symbol name.
#[export_name = "ITM_RxBuffer"]
pub static RX_BUFFER: RxMailbox = RxMailbox::new();

// `words` is 32-bit aligned by construction
fn write_words(stim: &mut Stim, words: &[u32]) {
    for word in words {
        while !stim.is_fifo_ready() {}
        stim.write_u32(*word);
    }
}

/// Writes a 4-byte aligned byte slice.
///
/// # Safety
///
/// `buffer` must start on a 4-byte boundary.
unsafe fn write_aligned_impl(port: &mut Stim, buffer: &[u8]) {
    let len = buffer.len();
    if len == 0 {
        return;
    }

    let split = len & !0b11;
    #[allow(clippy::cast_ptr_alignment)]
    write_words(
        port,
        slice::from_raw_parts(buffer.as_ptr() as *const u32, split >> 2),
    );

    // tail of up to three bytes
    let mut rest = &buffer[split..];
    if rest.len() > 1 {
        while !port.is_fifo_ready() {}
        #[allow(clippy::cast_ptr_alignment)]
        port.write_u16(ptr::read(rest.as_ptr() as *const u16));
        rest = &rest[2..];
    }
    if let Some(&byte) = rest.first() {
        while !port.is_fifo_ready() {}
        port.write_u8(byte);
    }
}

struct Port<'p>(&'p mut Stim);

impl fmt::Write for Port<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write_all(self.0, s.as_bytes());
        Ok(())
    }
}

/// Byte buffer placed on a 4-byte boundary for [`write_aligned`].
#[repr(align(4))]
pub struct Aligned<T: ?Sized>(pub T);

/// Writes `buffer` to an ITM port, using the widest writes the alignment
/// allows.
pub fn write_all(port: &mut Stim, buffer: &[u8]) {
    let mut rest = buffer;
    if rest.is_empty() {
        return;
    }

    if rest.as_ptr() as usize % 2 == 1 {
        while !port.is_fifo_ready() {}
        port.write_u8(rest[0]);
        rest = &rest[1..];
    }

    if rest.as_ptr() as usize % 4 == 2 {
        match rest.len() {
            0 => return,
            1 => {
                while !port.is_fifo_ready() {}
                port.write_u8(rest[0]);
                return;
            }
            _ => {
                while !port.is_fifo_ready() {}
                // Aligned to two bytes by the checks above.
                #[allow(clippy::cast_ptr_alignment)]
                port.write_u16(unsafe { ptr::read(rest.as_ptr() as *const u16) });
                rest = &rest[2..];
            }
        }
    }

    unsafe { write_aligned_impl(port, rest) }
}

/// Writes a 4-byte aligned `buffer` to an ITM port.
pub fn write_aligned(port: &mut Stim, buffer: &Aligned<[u8]>) {
    unsafe { write_aligned_impl(port, &buffer.0) }
}

/// Formats `args` into the stimulus port.
#[inline]
pub fn write_fmt(port: &mut Stim, args: fmt::Arguments) {
    use core::fmt::Write;

    Port(port).write_fmt(args).ok();
}

/// Writes the bytes of `string` to the stimulus port.
#[inline]
pub fn write_str(port: &mut Stim, string: &str) {
    write_all(port, string.as_bytes())
}
