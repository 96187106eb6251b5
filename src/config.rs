//! Configuration primitives for the SigmaDSP driver.

use crate::params::{DeviceAddress, DspModel, FixedPointFormat, WordSize};
use crate::transfer::MAX_CHUNK;

/// User-facing configuration for a SigmaDSP on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit slave address of the DSP.
    pub address: DeviceAddress,
    /// Processor family, selects the fixed-point parameter format.
    pub model: DspModel,
    /// Largest payload slice sent in one bus write.
    pub max_chunk: usize,
    /// Word size assumed for vendor-generated block writes, which carry no width.
    pub block_word_size: WordSize,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Fixed-point format of the configured model.
    pub const fn format(&self) -> FixedPointFormat {
        self.model.fixed_point_format()
    }

    /// Checks that every chunk boundary lands on a word boundary for both word sizes.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.max_chunk == 0 {
            return Err(ConfigError::EmptyChunk);
        }

        if self.max_chunk > MAX_CHUNK {
            return Err(ConfigError::ChunkTooLarge);
        }

        if self.max_chunk % WordSize::Memory.bytes() != 0 {
            return Err(ConfigError::ChunkNotWordAligned);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the slave address.
    pub fn address(mut self, address: DeviceAddress) -> Self {
        self.config.address = address;
        self
    }

    /// Overrides the processor family.
    pub fn model(mut self, model: DspModel) -> Self {
        self.config.model = model;
        self
    }

    /// Lowers the per-transaction payload limit, e.g. for adapters with small buffers.
    pub fn max_chunk(mut self, max_chunk: usize) -> Self {
        self.config.max_chunk = max_chunk;
        self
    }

    /// Sets the word size used for vendor block writes.
    pub fn block_word_size(mut self, word_size: WordSize) -> Self {
        self.config.block_word_size = word_size;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DeviceAddress::default(),
            model: DspModel::default(),
            max_chunk: MAX_CHUNK,
            block_word_size: WordSize::Memory,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Chunk size of zero would never make progress.
    #[error("chunk size must be non-zero")]
    EmptyChunk,
    /// Chunk size exceeds the host's per-transaction buffer.
    #[error("chunk size exceeds the per-transaction limit")]
    ChunkTooLarge,
    /// Chunk size is not a multiple of the widest word, so later chunks would be mis-addressed.
    #[error("chunk size must be a multiple of 4 bytes")]
    ChunkNotWordAligned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.address.get(), 0x38);
        assert_eq!(config.max_chunk, 8188);
        assert_eq!(config.format(), FixedPointFormat::Q8_24);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::new()
            .address(DeviceAddress::from_8bit(0x74))
            .model(DspModel::Adau144x)
            .max_chunk(32)
            .block_word_size(WordSize::Control)
            .build();

        assert_eq!(config.address.get(), 0x3A);
        assert_eq!(config.format(), FixedPointFormat::Q5_23);
        assert_eq!(config.max_chunk, 32);
        assert_eq!(config.block_word_size, WordSize::Control);
    }

    #[test]
    fn misaligned_chunk_is_rejected() {
        let config = Config::new().max_chunk(8186).build();
        assert_eq!(config.validate(), Err(ConfigError::ChunkNotWordAligned));

        let config = Config::new().max_chunk(0).build();
        assert_eq!(config.validate(), Err(ConfigError::EmptyChunk));

        let config = Config::new().max_chunk(8192).build();
        assert_eq!(config.validate(), Err(ConfigError::ChunkTooLarge));
    }
}
