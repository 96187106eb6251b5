//! Bus interface abstraction for the SigmaDSP driver.

pub mod i2c;

pub use embedded_hal::i2c::Operation;

use crate::params::DeviceAddress;

/// Abstraction over the single bus primitive required by the driver.
pub trait SigmaDspInterface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Issues `operations` to `address` as one bus transaction.
    ///
    /// The driver only submits a single write or a write followed by a read. For
    /// those shapes the bus must not be released between operations: the register
    /// address write and the read are joined by a repeated START, never STOP then
    /// START. Longer sequences are forwarded as-is and are only atomic if the
    /// underlying bus makes them so. Failures are reported as-is, without retry.
    fn submit(
        &mut self,
        address: DeviceAddress,
        operations: &mut [Operation<'_>],
    ) -> core::result::Result<(), Self::Error>;
}
