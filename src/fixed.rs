//! Fixed-point codec for SigmaDSP parameter words.
//!
//! Parameters are stored as 4-byte big-endian two's complement values. Q8.24 fills
//! all 32 bits; Q5.23 occupies the low 28 bits, with bit 27 as the sign.

use crate::error::{Quantity, RangeError};
use crate::params::FixedPointFormat;

/// Size of one encoded parameter word.
pub const PARAMETER_BYTES: usize = 4;

/// Encodes `value` into the 4-byte register image of `format`.
///
/// Non-negative values encode as `round(value * 2^fraction_bits)`. Negative values
/// encode as `round(2^total_bits - 2^fraction_bits * |value|)`, the two's complement
/// of the magnitude within the format's field. Values outside the representable range
/// (and NaN) fail with a [`RangeError`].
pub fn encode(value: f64, format: FixedPointFormat) -> Result<[u8; PARAMETER_BYTES], RangeError> {
    let scale = pow2(format.fraction_bits());
    let field = pow2(format.total_bits());
    let limit = field / 2.0;

    let raw = if value >= 0.0 {
        libm::round(value * scale)
    } else {
        libm::round(field - scale * libm::fabs(value))
    };

    // Positive results must stay below the sign bit; negative ones must set it,
    // except for magnitudes that round to zero and wrap to `field`.
    let in_range = if value >= 0.0 {
        raw < limit
    } else {
        raw >= limit && raw <= field
    };
    if !in_range {
        return Err(RangeError(Quantity::FixedPoint));
    }

    let mask = (1u64 << format.total_bits()) - 1;
    Ok(((raw as u64 & mask) as u32).to_be_bytes())
}

/// Decodes a 4-byte register image of `format` back to a decimal value.
///
/// Bits above the format's field are ignored; the field's top bit is the sign.
pub fn decode(bytes: [u8; PARAMETER_BYTES], format: FixedPointFormat) -> f64 {
    let unused = 32 - format.total_bits();
    let raw = u32::from_be_bytes(bytes);
    let signed = ((raw << unused) as i32) >> unused;

    f64::from(signed) / pow2(format.fraction_bits())
}

/// Smallest step representable in `format`.
pub fn resolution(format: FixedPointFormat) -> f64 {
    1.0 / pow2(format.fraction_bits())
}

fn pow2(exponent: u32) -> f64 {
    libm::ldexp(1.0, exponent as i32)
}
