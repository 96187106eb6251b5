//! I2C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::{I2c, Operation};

use super::SigmaDspInterface;
use crate::params::DeviceAddress;

/// I2C-based interface implementation for the SigmaDSP driver.
pub struct I2cInterface<I2C> {
    i2c: I2C,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface from the provided I2C bus abstraction.
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Provides mutable access to the wrapped I2C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> SigmaDspInterface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn submit(
        &mut self,
        address: DeviceAddress,
        operations: &mut [Operation<'_>],
    ) -> core::result::Result<(), Self::Error> {
        let address = address.get();

        // Single-message and dummy-write-then-read shapes go through the dedicated
        // methods, which HALs map onto one combined transfer with a repeated START.
        match operations {
            [] => Ok(()),
            [Operation::Write(bytes)] => self.i2c.write(address, bytes),
            [Operation::Read(buf)] => self.i2c.read(address, buf),
            [Operation::Write(bytes), Operation::Read(buf)] => {
                self.i2c.write_read(address, bytes, buf)
            }
            // Not atomic on Linux `i2c-dev` through rppal, which issues one ioctl
            // per operation.
            _ => self.i2c.transaction(address, operations),
        }
    }
}
