use serde::{Deserialize, Serialize};

use crate::element_type::BinarySubtype;

/// Opaque binary data tagged with a subtype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Binary {
    pub subtype: BinarySubtype,
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

impl Binary {
    /// Binary data with the generic subtype.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Binary {
        Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.into(),
        }
    }

    pub fn with_subtype(subtype: BinarySubtype, bytes: impl Into<Vec<u8>>) -> Binary {
        Binary {
            subtype,
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Sorts below every other value. Used as a lower bound in range queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MinKey;

/// Sorts above every other value. Used as an upper bound in range queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MaxKey;
