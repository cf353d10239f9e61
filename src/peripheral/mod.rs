//! Core peripherals of the System Control Space.
//!
//! Each proxy dereferences to the register block at its architectural
//! address. Proxies are generic over the core [`Profile`] so that accessors
//! can pick the access pattern of the architecture; accessors that only exist
//! on ARMv7-M are bounded by [`Mainline`](crate::profile::Mainline).
//!
//! The register blocks are plain `#[repr(C)]` structs, so a proxy can also be
//! pointed at a block in RAM with `from_ptr`.

use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::profile::Profile;

pub mod dcb;
pub mod icb;
pub mod itm;
pub mod mpu;
pub mod nvic;
pub mod scb;
pub mod syst;

peripheral!(
    /// Implementation Control Block
    ICB,
    icb::RegisterBlock,
    0xE000_E000
);
peripheral!(
    /// SysTick: System Timer
    SYST,
    syst::RegisterBlock,
    0xE000_E010
);
peripheral!(
    /// Nested Vector Interrupt Controller
    NVIC,
    nvic::RegisterBlock,
    0xE000_E100
);
peripheral!(
    /// System Control Block
    SCB,
    scb::RegisterBlock,
    0xE000_ED00
);
peripheral!(
    /// Memory Protection Unit
    MPU,
    mpu::RegisterBlock,
    0xE000_ED90
);
peripheral!(
    /// Debug Control Block
    DCB,
    dcb::RegisterBlock,
    0xE000_EDF0
);
peripheral!(
    /// Instrumentation Trace Macrocell
    ITM,
    itm::RegisterBlock,
    0xE000_0000
);

static TAKEN: AtomicBool = AtomicBool::new(false);

/// Core peripherals
///
/// Blocks that only exist on ARMv7-M (ICB, ITM, MPU) are present for every
/// profile, their accessors are only implemented for mainline profiles.
#[allow(non_snake_case)]
pub struct Peripherals<P: Profile> {
    /// Implementation Control Block
    pub ICB: ICB<P>,
    /// Debug Control Block
    pub DCB: DCB<P>,
    /// Instrumentation Trace Macrocell
    pub ITM: ITM<P>,
    /// Memory Protection Unit
    pub MPU: MPU<P>,
    /// Nested Vector Interrupt Controller
    pub NVIC: NVIC<P>,
    /// System Control Block
    pub SCB: SCB<P>,
    /// SysTick: System Timer
    pub SYST: SYST<P>,
    _profile: PhantomData<P>,
}

impl<P: Profile> Peripherals<P> {
    /// Returns all the core peripherals *once*.
    #[inline]
    pub fn take() -> Option<Self> {
        critical_section::with(|_| {
            if TAKEN.load(Ordering::Relaxed) {
                None
            } else {
                Some(unsafe { Peripherals::steal() })
            }
        })
    }

    /// Unchecked version of `Peripherals::take`.
    ///
    /// # Safety
    ///
    /// Each of the returned peripherals must be used at most once.
    #[inline]
    pub unsafe fn steal() -> Self {
        TAKEN.store(true, Ordering::Relaxed);

        Peripherals {
            ICB: ICB::steal(),
            DCB: DCB::steal(),
            ITM: ITM::steal(),
            MPU: MPU::steal(),
            NVIC: NVIC::steal(),
            SCB: SCB::steal(),
            SYST: SYST::steal(),
            _profile: PhantomData,
        }
    }
}
