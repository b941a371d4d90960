use serde::{Deserialize, Serialize};

/// Exponent bias of the 128-bit decimal format.
const EXPONENT_BIAS: u64 = 6176;
const SIGN_BIT: u64 = 1 << 63;

/// A 128-bit IEEE 754-2008 decimal, in the binary integer decimal encoding.
///
/// This is a carrier for the 16 encoded bytes, not an arithmetic type. The bytes are kept in
/// wire order: the low 64-bit word first, both words little-endian.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Decimal128 {
    bytes: [u8; 16],
}

impl Decimal128 {
    pub fn from_bytes(bytes: [u8; 16]) -> Decimal128 {
        Decimal128 { bytes }
    }

    /// Build from the high and low 64-bit words of the encoding.
    pub fn from_parts(high: u64, low: u64) -> Decimal128 {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&low.to_le_bytes());
        bytes[8..].copy_from_slice(&high.to_le_bytes());
        Decimal128 { bytes }
    }

    pub fn bytes(&self) -> [u8; 16] {
        self.bytes
    }

    pub fn high(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.bytes[8..]);
        u64::from_le_bytes(word)
    }

    pub fn low(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.bytes[..8]);
        u64::from_le_bytes(word)
    }

    pub fn is_negative(&self) -> bool {
        self.high() & SIGN_BIT != 0
    }
}

impl From<i64> for Decimal128 {
    /// Exact conversion with a zero exponent.
    fn from(v: i64) -> Decimal128 {
        let sign = if v < 0 { SIGN_BIT } else { 0 };
        Decimal128::from_parts(sign | (EXPONENT_BIAS << 49), v.unsigned_abs())
    }
}
