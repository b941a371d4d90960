use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of an object identifier, in bytes.
pub const OID_LEN: usize = 12;

/// A 12-byte object identifier, conventionally used as a document's primary key.
///
/// The bytes are stored and encoded as-is; no assumptions are made about the embedded
/// timestamp, machine, or counter fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ObjectId([u8; OID_LEN]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; OID_LEN]) -> ObjectId {
        ObjectId(bytes)
    }

    /// Parse the usual 24-character hex form. Returns `None` if the string is the wrong length
    /// or has a non-hex character.
    pub fn parse_str(s: &str) -> Option<ObjectId> {
        let s = s.as_bytes();
        if s.len() != 2 * OID_LEN {
            return None;
        }
        let mut bytes = [0u8; OID_LEN];
        for (byte, pair) in bytes.iter_mut().zip(s.chunks_exact(2)) {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            *byte = ((hi << 4) | lo) as u8;
        }
        Some(ObjectId(bytes))
    }

    pub fn bytes(&self) -> [u8; OID_LEN] {
        self.0
    }

    /// The creation time embedded in the first four bytes (big-endian seconds since the epoch).
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; OID_LEN]> for ObjectId {
    fn from(bytes: [u8; OID_LEN]) -> ObjectId {
        ObjectId(bytes)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(
            oid.bytes(),
            [0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x11]
        );
        assert_eq!(oid.to_string(), "507f1f77bcf86cd799439011");
        assert_eq!(oid.timestamp(), 0x507f1f77);
        assert_eq!(
            ObjectId::parse_str("507F1F77BCF86CD799439011"),
            Some(oid),
            "uppercase hex is accepted"
        );
    }

    #[test]
    fn bad_hex() {
        assert!(ObjectId::parse_str("").is_none());
        assert!(ObjectId::parse_str("507f1f77bcf86cd79943901").is_none());
        assert!(ObjectId::parse_str("507f1f77bcf86cd79943901g").is_none());
        assert!(ObjectId::parse_str("507f1f77bcf86cd7994390111").is_none());
    }
}
