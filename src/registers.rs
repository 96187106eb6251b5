//! Control register map definitions for the ADAU145x SigmaDSP family.
//!
//! Control registers are 16-bit words addressed above `0xF000`; parameter and data
//! memories live below and use 4-byte words.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::CoreState;

/// Register address of `PLL_CTRL0` (feedback divider).
pub const REG_PLL_CTRL0: u16 = 0xF000;
/// Register address of `PLL_CTRL1` (input prescaler).
pub const REG_PLL_CTRL1: u16 = 0xF001;
/// Register address of `PLL_CLK_SRC`.
pub const REG_PLL_CLK_SRC: u16 = 0xF002;
/// Register address of `PLL_ENABLE`.
pub const REG_PLL_ENABLE: u16 = 0xF003;
/// Register address of `PLL_LOCK`.
pub const REG_PLL_LOCK: u16 = 0xF004;
/// Register address of `MCLK_OUT`.
pub const REG_MCLK_OUT: u16 = 0xF005;
/// Register address of `PLL_WATCHDOG`.
pub const REG_PLL_WATCHDOG: u16 = 0xF006;
/// Register address of `POWER_ENABLE0`.
pub const REG_POWER_ENABLE0: u16 = 0xF050;
/// Register address of `POWER_ENABLE1`.
pub const REG_POWER_ENABLE1: u16 = 0xF051;
/// Register address of `HIBERNATE`.
pub const REG_HIBERNATE: u16 = 0xF400;
/// Register address of `START_PULSE`.
pub const REG_START_PULSE: u16 = 0xF401;
/// Register address of `START_CORE`.
pub const REG_START_CORE: u16 = 0xF402;
/// Register address of `KILL_CORE`.
pub const REG_KILL_CORE: u16 = 0xF403;
/// Register address of `START_ADDRESS`.
pub const REG_START_ADDRESS: u16 = 0xF404;
/// Register address of `CORE_STATUS`.
pub const REG_CORE_STATUS: u16 = 0xF405;
/// Register address of `SOFT_RESET`.
pub const REG_SOFT_RESET: u16 = 0xF890;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

impl RegisterAccess {
    /// Returns `true` if the register may be read.
    pub const fn readable(self) -> bool {
        !matches!(self, Self::WriteOnly)
    }

    /// Returns `true` if the register may be written.
    pub const fn writable(self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

/// Metadata and raw conversion shared by every control register view.
pub trait Register: From<u16> + Into<u16> + Copy {
    /// Register address as documented in the datasheet.
    const ADDRESS: u16;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
}

macro_rules! impl_u16_conversions {
    ($($register:ty),* $(,)?) => {
        $(
            impl From<u16> for $register {
                fn from(value: u16) -> Self {
                    Self::from_bytes(value.to_le_bytes())
                }
            }

            impl From<$register> for u16 {
                fn from(value: $register) -> Self {
                    u16::from_le_bytes(value.into_bytes())
                }
            }
        )*
    };
}

/// Bitfield representation of the `PLL_LOCK` register (address `0xF004`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PllLock {
    // PLL has locked to the input clock (bit 0).
    pub locked: bool,
    #[skip]
    __: B15,
}

/// Bitfield representation of the `START_CORE` register (address `0xF402`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartCore {
    // Core runs while set (bit 0).
    pub start: bool,
    #[skip]
    __: B15,
}

/// Bitfield representation of the `CORE_STATUS` register (address `0xF405`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreStatus {
    // Core execution state (bits 2:0).
    pub state: CoreState,
    #[skip]
    __: B13,
}

/// Bitfield representation of the `SOFT_RESET` register (address `0xF890`).
///
/// The device is held in soft reset while bit 0 is clear.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftReset {
    // Releases the soft reset when set (bit 0).
    pub release: bool,
    #[skip]
    __: B15,
}

impl_u16_conversions!(PllLock, StartCore, CoreStatus, SoftReset);

impl Register for PllLock {
    const ADDRESS: u16 = REG_PLL_LOCK;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
}

impl Register for StartCore {
    const ADDRESS: u16 = REG_START_CORE;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
}

impl Register for CoreStatus {
    const ADDRESS: u16 = REG_CORE_STATUS;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
}

impl Register for SoftReset {
    const ADDRESS: u16 = REG_SOFT_RESET;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that CORE_STATUS decodes the state field from the low bits.
    #[test]
    fn core_status_layout() {
        let status = CoreStatus::from(0x0001);
        assert_eq!(status.state(), CoreState::Running);

        let status = CoreStatus::from(0xFFF8 | 0b100);
        assert_eq!(status.state(), CoreState::Halted);
    }

    /// Single-flag registers round-trip through their raw word.
    #[test]
    fn flag_register_roundtrip() {
        let start = StartCore::new().with_start(true);
        assert_eq!(u16::from(start), 0x0001);
        assert!(PllLock::from(0x0001).locked());
        assert!(!SoftReset::from(0x0000).release());
        assert_eq!(<CoreStatus as Register>::ADDRESS, 0xF405);
    }

    #[test]
    fn status_registers_are_read_only() {
        assert!(!<CoreStatus as Register>::ACCESS.writable());
        assert!(!<PllLock as Register>::ACCESS.writable());
        assert!(<StartCore as Register>::ACCESS.writable());
        assert!(<SoftReset as Register>::ACCESS.readable());
        assert!(!RegisterAccess::WriteOnly.readable());
    }
}
