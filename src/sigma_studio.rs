//! Adapter for code generated by the vendor's SigmaStudio tool.
//!
//! Exported programs call a small set of host macros (`SIGMA_WRITE_REGISTER_BLOCK`,
//! `SIGMA_WRITE_DELAY`) with 8-bit device addresses and opaque byte arrays.
//! [`SigmaStudioHost`] forwards those calls to the block writer. The register read
//! macro has no counterpart here; use [`crate::transfer::read_block`] directly.

use embedded_hal::delay::DelayNs;

use crate::bus::BusHandle;
use crate::config::{Config, ConfigError};
use crate::error::{Error, Result};
use crate::interface::SigmaDspInterface;
use crate::log::debug;
use crate::params::{DeviceAddress, WordSize};
use crate::transfer;

/// Settle time between opening the bus and the first download write.
pub const DOWNLOAD_SETTLE_DELAY_MS: u32 = 1_000;

/// One call of an exported download sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStep<'a> {
    /// `SIGMA_WRITE_REGISTER_BLOCK(device, register, data.len(), data)`.
    WriteBlock {
        /// 8-bit device address as exported.
        device: u8,
        /// First register of the block.
        register: u16,
        /// Register contents.
        data: &'a [u8],
    },
    /// `SIGMA_WRITE_DELAY(device, data.len(), data)`.
    Delay {
        /// 8-bit device address as exported.
        device: u8,
        /// Delay descriptor; byte 1 selects the duration.
        data: &'a [u8],
    },
}

/// Failure of a download sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("download step {step} failed: {error}")]
pub struct DownloadError<E> {
    /// Zero-based index of the failing step.
    pub step: usize,
    /// Error reported by that step.
    pub error: Error<E>,
}

/// Host side of the SigmaStudio macro interface.
pub struct SigmaStudioHost<IFACE> {
    bus: BusHandle<IFACE>,
    word_size: WordSize,
    max_chunk: usize,
}

impl<IFACE> SigmaStudioHost<IFACE> {
    /// Creates the adapter; block writes use the configured word and chunk sizes.
    pub fn new(
        bus: BusHandle<IFACE>,
        config: &Config,
    ) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            bus,
            word_size: config.block_word_size,
            max_chunk: config.max_chunk,
        })
    }

    /// Consumes the adapter and returns the bus handle.
    pub fn release(self) -> BusHandle<IFACE> {
        self.bus
    }
}

impl<IFACE, CommE> SigmaStudioHost<IFACE>
where
    IFACE: SigmaDspInterface<Error = CommE>,
{
    /// Writes `data` starting at `register` of the DSP at 8-bit address `device`.
    pub fn write_register_block(
        &mut self,
        device: u8,
        register: u16,
        data: &[u8],
    ) -> Result<(), CommE> {
        transfer::write_block_chunked(
            &mut self.bus,
            DeviceAddress::from_8bit(device),
            register,
            self.word_size,
            data,
            self.max_chunk,
        )
    }

    /// Waits for the duration encoded in a delay descriptor.
    pub fn write_delay(&mut self, data: &[u8], delay: &mut impl DelayNs) {
        delay.delay_us(delay_micros(data));
    }

    /// Runs an exported download sequence, stopping at the first failing step.
    ///
    /// Waits [`DOWNLOAD_SETTLE_DELAY_MS`] before the first step.
    pub fn download<'a, I>(
        &mut self,
        steps: I,
        delay: &mut impl DelayNs,
    ) -> core::result::Result<(), DownloadError<CommE>>
    where
        I: IntoIterator<Item = DownloadStep<'a>>,
    {
        delay.delay_ms(DOWNLOAD_SETTLE_DELAY_MS);

        for (step, call) in steps.into_iter().enumerate() {
            match call {
                DownloadStep::WriteBlock {
                    device,
                    register,
                    data,
                } => self
                    .write_register_block(device, register, data)
                    .map_err(|error| DownloadError { step, error })?,
                DownloadStep::Delay { data, .. } => self.write_delay(data, delay),
            }
        }

        debug!("download complete");
        Ok(())
    }
}

/// Duration selected by a delay descriptor, in microseconds.
///
/// `data[1] == 0xFF` waits 10 ms, `data[1] == 0x01` waits 1 µs, anything else
/// (including a short descriptor) waits 100 ms.
pub fn delay_micros(data: &[u8]) -> u32 {
    match data.get(1) {
        Some(0xFF) => 10_000,
        Some(0x01) => 1,
        _ => 100_000,
    }
}
