#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod asm;
pub mod dsp;
pub mod error;
pub mod interrupt;
pub mod itm;
pub mod peripheral;
pub mod profile;
pub mod register;

pub use error::{Error, Result};
pub use peripheral::Peripherals;
pub use profile::{CortexM0, CortexM3};
