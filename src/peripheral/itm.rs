//! Instrumentation Trace Macrocell

use core::cell::UnsafeCell;
use core::ptr;

use vcell::VolatileCell;

use super::ITM;
use crate::profile::Mainline;

/// Register block
#[repr(C)]
pub struct RegisterBlock {
    /// Stimulus Port
    pub stim: [Stim; 32],
    _reserved0: [u32; 864],
    /// Trace Enable
    pub ter: VolatileCell<u32>,
    _reserved1: [u32; 15],
    /// Trace Privilege
    pub tpr: VolatileCell<u32>,
    _reserved2: [u32; 15],
    /// Trace Control
    pub tcr: VolatileCell<u32>,
}

/// Stimulus Port
#[repr(transparent)]
pub struct Stim {
    register: UnsafeCell<u32>,
}

impl Stim {
    /// Writes an `u8` payload into the stimulus port.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        unsafe { ptr::write_volatile(self.register.get() as *mut u8, value) }
    }

    /// Writes an `u16` payload into the stimulus port.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        unsafe { ptr::write_volatile(self.register.get() as *mut u16, value) }
    }

    /// Writes an `u32` payload into the stimulus port.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        unsafe { ptr::write_volatile(self.register.get(), value) }
    }

    /// Returns `true` if the stimulus port can accept new data.
    #[inline]
    pub fn is_fifo_ready(&self) -> bool {
        unsafe { ptr::read_volatile(self.register.get()) & 0b1 == 1 }
    }

    /// Reads the raw port value.
    #[inline]
    pub fn read(&self) -> u32 {
        unsafe { ptr::read_volatile(self.register.get()) }
    }
}

const TCR_ITMENA: u32 = 1 << 0;
const TCR_TSENA: u32 = 1 << 1;
const TCR_SYNCENA: u32 = 1 << 2;
const TCR_TXENA: u32 = 1 << 3;
const TCR_SWOENA: u32 = 1 << 4;
const TCR_TSPRESCALE_POS: u32 = 8;
const TCR_GTSFREQ_POS: u32 = 10;
const TCR_TRACEBUSID_POS: u32 = 16;
const TCR_BUSY: u32 = 1 << 23;

/// Decoded Trace Control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TraceControl {
    bits: u32,
}

bit_accessors!(TraceControl {
    /// ITM enabled.
    itmena: 0,
    /// Local timestamps enabled.
    tsena: 1,
    /// Synchronization packets enabled.
    syncena: 2,
    /// Forwarding of DWT packets enabled.
    txena: 3,
    /// Timestamp counter clocked by the SWO line.
    swoena: 4,
    /// ITM is processing events.
    busy: 23,
});

impl TraceControl {
    /// Local timestamp prescaler.
    #[inline]
    pub fn ts_prescale(self) -> u8 {
        ((self.bits >> TCR_TSPRESCALE_POS) & 0x3) as u8
    }

    /// Global timestamp frequency.
    #[inline]
    pub fn gts_freq(self) -> u8 {
        ((self.bits >> TCR_GTSFREQ_POS) & 0x3) as u8
    }

    /// Trace bus identifier.
    #[inline]
    pub fn trace_bus_id(self) -> u8 {
        ((self.bits >> TCR_TRACEBUSID_POS) & 0x7F) as u8
    }
}

impl<P: Mainline> ITM<P> {
    /// Reads the trace control register.
    #[inline]
    pub fn trace_control(&self) -> TraceControl {
        TraceControl {
            bits: self.tcr.get(),
        }
    }

    /// Enables the ITM with synchronization packets and the given trace bus
    /// id.
    pub fn enable(&mut self, trace_bus_id: u8) {
        self.tcr.set(
            (u32::from(trace_bus_id & 0x7F) << TCR_TRACEBUSID_POS)
                | TCR_SYNCENA
                | TCR_ITMENA,
        );
        log::trace!("ITM enabled on trace bus {}", trace_bus_id);
    }

    /// Disables the ITM and waits until it stops processing events.
    pub fn disable(&mut self) {
        self.tcr
            .set(self.tcr.get() & !(TCR_ITMENA | TCR_TSENA | TCR_TXENA | TCR_SWOENA));
        while self.tcr.get() & TCR_BUSY != 0 {}
    }

    /// Enables or disables stimulus port `port`.
    pub fn set_port_enabled(&mut self, port: usize, enabled: bool) {
        let mask = 1 << (port % 32);
        let ter = self.ter.get();
        self.ter.set(if enabled { ter | mask } else { ter & !mask });
    }

    /// Checks if stimulus port `port` is enabled.
    #[inline]
    pub fn is_port_enabled(&self, port: usize) -> bool {
        self.ter.get() & (1 << (port % 32)) != 0
    }

    /// Sets the privilege mask; each bit guards eight stimulus ports.
    #[inline]
    pub fn set_privilege_mask(&mut self, mask: u8) {
        self.tpr.set(u32::from(mask & 0x0F));
    }

    /// Transmits a character on stimulus port 0 and returns it.
    ///
    /// Nothing is sent while the ITM or port 0 is disabled. Blocks until
    /// the port FIFO is ready otherwise.
    pub fn send_char(&mut self, ch: u8) -> u8 {
        if self.tcr.get() & TCR_ITMENA != 0 && self.ter.get() & 1 != 0 {
            let port = self.port(0);
            while !port.is_fifo_ready() {}
            port.write_u8(ch);
        }
        ch
    }

    /// Returns stimulus port `n`.
    #[inline]
    pub fn port(&mut self, n: usize) -> &mut Stim {
        // The proxy is the only handle to the block.
        unsafe { &mut (*(self.ptr() as *mut RegisterBlock)).stim[n] }
    }
}
