//! High-level SigmaDSP device driver implementation.

use alloc::vec::Vec;

use crate::bus::BusHandle;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fixed::{self, PARAMETER_BYTES};
use crate::interface::i2c::I2cInterface;
use crate::interface::SigmaDspInterface;
use crate::params::{CoreState, WordSize};
use crate::registers::{CoreStatus, PllLock, Register, SoftReset, StartCore};
use crate::transfer;
use crate::volume;
use embedded_hal::i2c::I2c;

/// Byte width of a control register.
const CONTROL_REGISTER_BYTES: usize = 2;

/// High-level synchronous driver for one SigmaDSP on a bus.
pub struct SigmaDsp<IFACE> {
    bus: BusHandle<IFACE>,
    config: Config,
}

impl<IFACE> SigmaDsp<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from an opened bus interface.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self::with_bus(BusHandle::new(interface), config)
    }

    /// Creates a driver around an existing bus handle, open or not.
    pub fn with_bus(bus: BusHandle<IFACE>, config: Config) -> Self {
        Self { bus, config }
    }

    /// Consumes the driver and returns the bus handle and configuration.
    pub fn release(self) -> (BusHandle<IFACE>, Config) {
        (self.bus, self.config)
    }

    /// Provides mutable access to the underlying bus handle.
    pub fn bus_mut(&mut self) -> &mut BusHandle<IFACE> {
        &mut self.bus
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<I2C> SigmaDsp<I2cInterface<I2C>>
where
    I2C: I2c,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I2C buses.
    pub fn new_i2c(i2c: I2C, config: Config) -> Self {
        Self::new(I2cInterface::new(i2c), config)
    }

    /// Releases the driver, returning the I2C bus (if still open) and configuration.
    pub fn release_i2c(self) -> (Option<I2C>, Config) {
        let (mut bus, config) = self.release();
        (bus.close().map(I2cInterface::release), config)
    }
}

impl<IFACE, CommE> SigmaDsp<IFACE>
where
    IFACE: SigmaDspInterface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Global Configuration ==========================
    // ==================================================================
    /// Validates the configuration and checks that the DSP answers on the bus.
    pub fn init(&mut self) -> Result<CoreState, CommE> {
        self.config.validate()?;
        self.core_state()
    }

    /// Applies a new configuration after validating it.
    pub fn configure(&mut self, config: Config) -> Result<(), CommE> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    // ==================================================================
    // == Block Transfers ===============================================
    // ==================================================================
    /// Reads `byte_count` bytes starting at `register`.
    pub fn read_block(&mut self, register: u16, byte_count: usize) -> Result<Vec<u8>, CommE> {
        transfer::read_block(&mut self.bus, self.config.address, register, byte_count)
    }

    /// Reads `buf.len()` bytes starting at `register` into `buf`.
    pub fn read_block_into(&mut self, register: u16, buf: &mut [u8]) -> Result<(), CommE> {
        transfer::read_block_into(&mut self.bus, self.config.address, register, buf)
    }

    /// Writes `payload` starting at `register`, chunked per the configuration.
    pub fn write_block(
        &mut self,
        register: u16,
        word_size: WordSize,
        payload: &[u8],
    ) -> Result<(), CommE> {
        transfer::write_block_chunked(
            &mut self.bus,
            self.config.address,
            register,
            word_size,
            payload,
            self.config.max_chunk,
        )
    }

    /// Sends a caller-framed buffer, register header included.
    pub fn write_raw(&mut self, frame: &[u8]) -> Result<(), CommE> {
        transfer::write_raw(&mut self.bus, self.config.address, frame)
    }

    // ==================================================================
    // == Parameters & Volume ===========================================
    // ==================================================================
    /// Writes `value` as a fixed-point parameter word in the model's format.
    pub fn write_fixed(&mut self, register: u16, value: f64) -> Result<(), CommE> {
        let bytes = fixed::encode(value, self.config.format())?;
        self.write_block(register, WordSize::Memory, &bytes)
    }

    /// Reads a fixed-point parameter word and decodes it in the model's format.
    pub fn read_fixed(&mut self, register: u16) -> Result<f64, CommE> {
        let mut bytes = [0u8; PARAMETER_BYTES];
        self.read_block_into(register, &mut bytes)?;
        Ok(fixed::decode(bytes, self.config.format()))
    }

    /// Writes the gain word for `volume` (0–100, 1 dB per step) to `register`.
    pub fn set_volume(&mut self, register: u16, volume: f64) -> Result<(), CommE> {
        let bytes = volume::volume_to_bytes(volume, self.config.format())?;
        self.write_block(register, WordSize::Memory, &bytes)
    }

    // ==================================================================
    // == Control Registers =============================================
    // ==================================================================
    /// Reads a control register into its typed view.
    ///
    /// Write-only registers fail with [`Error::AccessDenied`] without touching the bus.
    pub fn read_control<R: Register>(&mut self) -> Result<R, CommE> {
        if !R::ACCESS.readable() {
            return Err(Error::AccessDenied(R::ADDRESS));
        }
        let mut raw = [0u8; CONTROL_REGISTER_BYTES];
        self.read_block_into(R::ADDRESS, &mut raw)?;
        Ok(R::from(u16::from_be_bytes(raw)))
    }

    /// Writes a typed control register view.
    ///
    /// Read-only registers fail with [`Error::AccessDenied`] without touching the bus.
    pub fn write_control<R: Register>(&mut self, value: R) -> Result<(), CommE> {
        if !R::ACCESS.writable() {
            return Err(Error::AccessDenied(R::ADDRESS));
        }
        let raw: u16 = value.into();
        self.write_block(R::ADDRESS, WordSize::Control, &raw.to_be_bytes())
    }

    /// Returns the core execution state from `CORE_STATUS`.
    pub fn core_state(&mut self) -> Result<CoreState, CommE> {
        let status: CoreStatus = self.read_control()?;
        status
            .state_or_err()
            .map_err(|_| Error::UnexpectedValue(u16::from(status)))
    }

    /// Returns `true` once the PLL reports lock.
    pub fn pll_locked(&mut self) -> Result<bool, CommE> {
        let lock: PllLock = self.read_control()?;
        Ok(lock.locked())
    }

    /// Starts program execution.
    pub fn start_core(&mut self) -> Result<(), CommE> {
        self.write_control(StartCore::new().with_start(true))
    }

    /// Stops program execution.
    pub fn stop_core(&mut self) -> Result<(), CommE> {
        self.write_control(StartCore::new().with_start(false))
    }

    /// Asserts (`true`) or releases (`false`) the soft reset.
    pub fn soft_reset(&mut self, assert: bool) -> Result<(), CommE> {
        self.write_control(SoftReset::new().with_release(!assert))
    }
}

#[cfg(test)]
mod tests {
    use super::SigmaDsp;
    use crate::config::Config;
    use crate::error::{Error, Quantity};
    use crate::params::{CoreState, DeviceAddress, DspModel, WordSize};
    use crate::registers::CoreStatus;
    use crate::transfer::tests::{pseudo_random, EchoInterface, Nack, RecordingInterface};
    use alloc::vec;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn set_volume_writes_gain_word() {
        let expectations = [I2cTransaction::write(
            0x38,
            vec![0x00, 0x40, 0x00, 0x19, 0x99, 0x9A],
        )];
        let mut i2c = I2cMock::new(&expectations);
        let mut dsp = SigmaDsp::new_i2c(i2c.clone(), Config::default());

        dsp.set_volume(0x0040, 80.0).unwrap();
        i2c.done();
    }

    #[test]
    fn set_volume_uses_model_format() {
        let expectations = [I2cTransaction::write(
            0x3A,
            vec![0x00, 0x40, 0x00, 0x80, 0x00, 0x00],
        )];
        let mut i2c = I2cMock::new(&expectations);
        let config = Config::new()
            .address(DeviceAddress::from_8bit(0x74))
            .model(DspModel::Adau144x)
            .build();
        let mut dsp = SigmaDsp::new_i2c(i2c.clone(), config);

        dsp.set_volume(0x0040, 100.0).unwrap();
        i2c.done();
    }

    #[test]
    fn set_volume_out_of_range_sends_nothing() {
        let expectations: [I2cTransaction; 0] = [];
        let mut i2c = I2cMock::new(&expectations);
        let mut dsp = SigmaDsp::new_i2c(i2c.clone(), Config::default());

        assert_eq!(
            dsp.set_volume(0x0040, 101.0),
            Err(Error::OutOfRange(Quantity::Volume))
        );
        i2c.done();
    }

    #[test]
    fn core_state_reads_control_register() {
        let expectations = [I2cTransaction::write_read(
            0x38,
            vec![0xF4, 0x05],
            vec![0x00, 0x01],
        )];
        let mut i2c = I2cMock::new(&expectations);
        let mut dsp = SigmaDsp::new_i2c(i2c.clone(), Config::default());

        assert_eq!(dsp.init(), Ok(CoreState::Running));
        i2c.done();
    }

    #[test]
    fn reserved_core_state_is_reported() {
        let expectations = [I2cTransaction::write_read(
            0x38,
            vec![0xF4, 0x05],
            vec![0x00, 0x07],
        )];
        let mut i2c = I2cMock::new(&expectations);
        let mut dsp = SigmaDsp::new_i2c(i2c.clone(), Config::default());

        assert_eq!(dsp.core_state(), Err(Error::UnexpectedValue(0x0007)));
        i2c.done();
    }

    #[test]
    fn core_control_sequence() {
        let expectations = [
            I2cTransaction::write(0x38, vec![0xF8, 0x90, 0x00, 0x00]),
            I2cTransaction::write(0x38, vec![0xF8, 0x90, 0x00, 0x01]),
            I2cTransaction::write_read(0x38, vec![0xF0, 0x04], vec![0x00, 0x01]),
            I2cTransaction::write(0x38, vec![0xF4, 0x02, 0x00, 0x01]),
            I2cTransaction::write(0x38, vec![0xF4, 0x02, 0x00, 0x00]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut dsp = SigmaDsp::new_i2c(i2c.clone(), Config::default());

        dsp.soft_reset(true).unwrap();
        dsp.soft_reset(false).unwrap();
        assert!(dsp.pll_locked().unwrap());
        dsp.start_core().unwrap();
        dsp.stop_core().unwrap();
        i2c.done();
    }

    #[test]
    fn read_only_register_write_is_refused() {
        let expectations: [I2cTransaction; 0] = [];
        let mut i2c = I2cMock::new(&expectations);
        let mut dsp = SigmaDsp::new_i2c(i2c.clone(), Config::default());

        assert_eq!(
            dsp.write_control(CoreStatus::from(0x0001)),
            Err(Error::AccessDenied(0xF405))
        );
        i2c.done();
    }

    #[test]
    fn bus_error_is_reported_as_io() {
        let expectations = [
            I2cTransaction::write_read(0x38, vec![0xF0, 0x04], vec![0x00, 0x00])
                .with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut dsp = SigmaDsp::new_i2c(i2c.clone(), Config::default());

        assert_eq!(dsp.pll_locked(), Err(Error::Io(ErrorKind::Other)));
        i2c.done();
    }

    #[test]
    fn configured_chunk_size_splits_writes() {
        let config = Config::new().max_chunk(8).build();
        let mut dsp = SigmaDsp::new(RecordingInterface::default(), config);

        dsp.write_block(0x0010, WordSize::Memory, &[0xAA; 20]).unwrap();

        let (mut bus, _) = dsp.release();
        let writes = bus.close().unwrap().writes;
        let headers: vec::Vec<_> = writes.iter().map(|w| [w[0], w[1], w.len() as u8]).collect();
        assert_eq!(headers, [[0x00, 0x10, 10], [0x00, 0x12, 10], [0x00, 0x14, 6]]);
    }

    #[test]
    fn oversized_chunk_configuration_never_reaches_the_bus() {
        let config = Config::new().max_chunk(16_384).build();
        let mut dsp = SigmaDsp::new(RecordingInterface::default(), config);

        assert_eq!(
            dsp.write_block(0x0000, WordSize::Memory, &[0; 16_384]),
            Err(Error::InvalidConfig)
        );
        let (mut bus, _) = dsp.release();
        assert!(bus.close().unwrap().writes.is_empty());
    }

    #[test]
    fn fixed_point_parameters_round_trip() {
        let mut dsp = SigmaDsp::new(EchoInterface::new(WordSize::Memory), Config::default());

        dsp.write_fixed(0x0100, -0.5).unwrap();
        assert_eq!(dsp.read_fixed(0x0100), Ok(-0.5));

        let block = pseudo_random(64, 11);
        dsp.write_block(0x0200, WordSize::Memory, &block).unwrap();
        assert_eq!(dsp.read_block(0x0200, 64), Ok(block));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut dsp = SigmaDsp::new(RecordingInterface::default(), Config::default());
        let bad = Config::new().max_chunk(6).build();

        assert_eq!(dsp.configure(bad), Err(Error::<Nack>::InvalidConfig));
        assert_eq!(dsp.config().max_chunk, 8188);
    }
}
