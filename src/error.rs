//! Error handling primitives for the SigmaDSP driver.

use core::fmt;

use crate::config::ConfigError;

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    /// The underlying bus transaction failed (no ACK, arbitration lost, device absent).
    #[error("bus transaction failed: {0}")]
    Io(E),
    /// A multi-chunk write failed after earlier chunks were already accepted.
    ///
    /// The device register range is partially written and must be re-synchronized,
    /// typically by re-sending the whole block.
    #[error("block write failed after {bytes_sent} bytes were sent: {cause}")]
    PartialWrite {
        /// Payload bytes (excluding register headers) accepted before the failure.
        bytes_sent: usize,
        /// Error reported by the failing chunk.
        cause: E,
    },
    /// A caller-supplied value is outside its documented domain.
    #[error("{0} out of range")]
    OutOfRange(Quantity),
    /// A transfer buffer could not be allocated.
    #[error("transfer buffer allocation failed")]
    Allocation,
    /// The bus handle is not open.
    #[error("bus handle is closed")]
    Closed,
    /// The provided configuration parameters are invalid.
    #[error("invalid configuration")]
    InvalidConfig,
    /// A derived register address does not fit in 16 bits.
    #[error("register address overflow")]
    AddressOverflow,
    /// The register at this address does not permit the requested access.
    #[error("register {0:#06x} does not permit this access")]
    AccessDenied(u16),
    /// A register returned a reserved bit pattern.
    #[error("unexpected register value {0:#06x}")]
    UnexpectedValue(u16),
}

/// Quantity that failed a range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    /// Volume outside `[0, 100]`.
    Volume,
    /// Linear gain outside `[0, 1]`.
    Gain,
    /// Value not representable in the selected fixed-point format.
    FixedPoint,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Volume => "volume",
            Self::Gain => "gain",
            Self::FixedPoint => "fixed-point value",
        })
    }
}

/// Range check failure raised by the bus-independent codec helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("{0} out of range")]
pub struct RangeError(pub Quantity);

impl<E> From<RangeError> for Error<E> {
    fn from(err: RangeError) -> Self {
        Self::OutOfRange(err.0)
    }
}

impl<E> From<ConfigError> for Error<E> {
    fn from(_: ConfigError) -> Self {
        Self::InvalidConfig
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_converts_into_driver_error() {
        let err: Error<()> = RangeError(Quantity::Gain).into();
        assert_eq!(err, Error::OutOfRange(Quantity::Gain));
    }

    #[test]
    fn partial_write_reports_progress() {
        use alloc::string::ToString;

        let err: Error<&str> = Error::PartialWrite {
            bytes_sent: 16_376,
            cause: "nack",
        };
        assert_eq!(
            err.to_string(),
            "block write failed after 16376 bytes were sent: nack"
        );
    }
}
