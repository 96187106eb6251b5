#![no_std]

extern crate alloc;

mod error;

pub mod bus;
pub mod config;
pub mod device;
pub mod fixed;
pub mod interface;
#[cfg(feature = "rppal")]
pub mod linux;
mod log;
pub mod params;
pub mod registers;
pub mod sigma_studio;
pub mod transfer;
pub mod volume;

pub use crate::bus::BusHandle;
pub use crate::device::SigmaDsp;
pub use crate::error::{Error, Quantity, RangeError, Result};
