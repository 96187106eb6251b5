//! Volume to gain conversion.
//!
//! Volume is a 0–100 control where every step is 1 dB: `gain = 10^((vol - 100) / 20)`,
//! so 100 is unity gain and 0 is -100 dB.

use crate::error::{Quantity, RangeError};
use crate::fixed::{self, PARAMETER_BYTES};
use crate::params::FixedPointFormat;

/// Highest accepted volume (unity gain).
pub const VOLUME_MAX: f64 = 100.0;

/// Converts a volume in `[0, 100]` to a linear gain in `[1e-5, 1]`.
pub fn gain_from_volume(volume: f64) -> Result<f64, RangeError> {
    if !(0.0..=VOLUME_MAX).contains(&volume) {
        return Err(RangeError(Quantity::Volume));
    }

    Ok(libm::pow(10.0, (volume - VOLUME_MAX) / 20.0))
}

/// Encodes a linear gain in `[0, 1]` as a parameter word of `format`.
pub fn gain_to_bytes(
    gain: f64,
    format: FixedPointFormat,
) -> Result<[u8; PARAMETER_BYTES], RangeError> {
    if !(0.0..=1.0).contains(&gain) {
        return Err(RangeError(Quantity::Gain));
    }

    fixed::encode(gain, format)
}

/// Converts a volume straight to the gain parameter word of `format`.
pub fn volume_to_bytes(
    volume: f64,
    format: FixedPointFormat,
) -> Result<[u8; PARAMETER_BYTES], RangeError> {
    gain_to_bytes(gain_from_volume(volume)?, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn volume_endpoints() {
        let silent = gain_from_volume(0.0).unwrap();
        assert!(libm::fabs(silent - 1e-5) < TOLERANCE);

        let unity = gain_from_volume(100.0).unwrap();
        assert!(libm::fabs(unity - 1.0) < TOLERANCE);
    }

    #[test]
    fn twenty_steps_is_one_decade() {
        let gain = gain_from_volume(80.0).unwrap();
        assert!(libm::fabs(gain - 0.1) < TOLERANCE);
    }

    #[test]
    fn volume_outside_range_is_rejected() {
        assert_eq!(gain_from_volume(-1.0), Err(RangeError(Quantity::Volume)));
        assert_eq!(gain_from_volume(101.0), Err(RangeError(Quantity::Volume)));
        assert_eq!(gain_from_volume(f64::NAN), Err(RangeError(Quantity::Volume)));
    }

    #[test]
    fn gain_outside_unit_interval_is_rejected() {
        assert_eq!(
            gain_to_bytes(1.5, FixedPointFormat::Q8_24),
            Err(RangeError(Quantity::Gain))
        );
        assert_eq!(
            gain_to_bytes(-0.1, FixedPointFormat::Q8_24),
            Err(RangeError(Quantity::Gain))
        );
    }

    #[test]
    fn full_volume_is_unity_word() {
        assert_eq!(
            volume_to_bytes(100.0, FixedPointFormat::Q8_24),
            Ok([0x01, 0x00, 0x00, 0x00])
        );
        assert_eq!(
            volume_to_bytes(100.0, FixedPointFormat::Q5_23),
            Ok([0x00, 0x80, 0x00, 0x00])
        );
    }

    #[test]
    fn minus_twenty_db_word() {
        // 0.1 * 2^24 = 1677721.6 -> 0x0019999A
        assert_eq!(
            volume_to_bytes(80.0, FixedPointFormat::Q8_24),
            Ok([0x00, 0x19, 0x99, 0x9A])
        );
    }
}
