//! Raspberry Pi / Linux `i2c-dev` bus access through `rppal`.

use rppal::i2c::I2c;

use crate::bus::BusHandle;
use crate::interface::i2c::I2cInterface;
use crate::log::debug;

/// Bus number of `/dev/i2c-1`, the header I2C bus on current Raspberry Pi models.
pub const DEFAULT_BUS: u8 = 1;

/// Interface type for a Linux I2C character device.
pub type LinuxInterface = I2cInterface<I2c>;

/// Opens `/dev/i2c-<bus>` read/write.
pub fn open(bus: u8) -> Result<LinuxInterface, rppal::i2c::Error> {
    debug!("opening /dev/i2c-{}", bus);
    I2c::with_bus(bus).map(I2cInterface::new)
}

/// Opens `/dev/i2c-<bus>` into `handle` unless it is already open.
pub fn open_handle(
    handle: &mut BusHandle<LinuxInterface>,
    bus: u8,
) -> Result<(), rppal::i2c::Error> {
    handle.open_with(|| open(bus))
}
