//! Strongly typed parameters for the SigmaDSP driver.
//!
//! These types carry the small amount of chip knowledge the transfer engine and the
//! codec need: the 7-bit bus address, the word width of a register class, and the
//! fixed-point layout used by each processor family. Prefer them over raw integers
//! so an invalid address or word size cannot reach the bus.
//!
//! # Examples
//!
//! ```rust
//! use sigmadsp::params::{DeviceAddress, DspModel, FixedPointFormat, WordSize};
//!
//! let address = DeviceAddress::from_8bit(0x70);
//! assert_eq!(address.get(), 0x38);
//! assert_eq!(WordSize::Memory.bytes(), 4);
//! assert_eq!(DspModel::Adau145x.fixed_point_format(), FixedPointFormat::Q8_24);
//! ```

use modular_bitfield::prelude::Specifier;

/// 7-bit I2C slave address of a SigmaDSP.
///
/// The read/write direction is never stored here; it is carried by the bus operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// Largest valid 7-bit address.
    pub const MAX: u8 = 0x7F;

    /// Creates an address from its 7-bit value, returning `None` above `0x7F`.
    pub const fn new(address: u8) -> Option<Self> {
        if address > Self::MAX {
            None
        } else {
            Some(Self(address))
        }
    }

    /// Converts the 8-bit write address quoted by datasheets (e.g. `0x70`) to 7 bits.
    pub const fn from_8bit(address: u8) -> Self {
        Self(address >> 1)
    }

    /// Returns the 7-bit address value.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the 8-bit address byte sent on the wire for a write.
    pub const fn write_byte(self) -> u8 {
        self.0 << 1
    }
}

impl Default for DeviceAddress {
    fn default() -> Self {
        // ADAU145x with ADDR1/ADDR0 tied low.
        Self(0x38)
    }
}

/// Width of one auto-increment step of the register address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WordSize {
    /// Control registers, 2 bytes per address.
    Control = 2,
    /// Parameter and data memory cells, 4 bytes per address.
    Memory = 4,
}

impl WordSize {
    /// Returns the number of bytes per register address.
    pub const fn bytes(self) -> usize {
        self as usize
    }
}

/// Fixed-point register layouts used by SigmaDSP parameter memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FixedPointFormat {
    /// 5 integer bits (sign included) and 23 fraction bits, right-aligned in 32 bits.
    Q5_23,
    /// 8 integer bits (sign included) and 24 fraction bits.
    Q8_24,
}

impl FixedPointFormat {
    /// Number of integer bits, sign bit included.
    pub const fn integer_bits(self) -> u32 {
        match self {
            Self::Q5_23 => 5,
            Self::Q8_24 => 8,
        }
    }

    /// Number of fraction bits.
    pub const fn fraction_bits(self) -> u32 {
        match self {
            Self::Q5_23 => 23,
            Self::Q8_24 => 24,
        }
    }

    /// Width of the two's complement field inside the 4-byte register image.
    pub const fn total_bits(self) -> u32 {
        self.integer_bits() + self.fraction_bits()
    }
}

/// SigmaDSP processor families supported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DspModel {
    /// ADAU1442/ADAU1445/ADAU1446 (28-bit 5.23 parameters).
    Adau144x,
    /// ADAU1450/ADAU1451/ADAU1452 (32-bit 8.24 parameters).
    Adau145x,
}

impl DspModel {
    /// Returns the fixed-point layout of the model's parameter memory.
    pub const fn fixed_point_format(self) -> FixedPointFormat {
        match self {
            Self::Adau144x => FixedPointFormat::Q5_23,
            Self::Adau145x => FixedPointFormat::Q8_24,
        }
    }
}

impl Default for DspModel {
    fn default() -> Self {
        Self::Adau145x
    }
}

/// Execution state reported by `CORE_STATUS[2:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum CoreState {
    /// Core is stopped.
    NotRunning = 0b000,
    /// Core is executing the program.
    Running = 0b001,
    /// Core is paused.
    Paused = 0b010,
    /// Core is in sleep (hibernate) mode.
    Sleep = 0b011,
    /// Core halted after a fault.
    Halted = 0b100,
}
