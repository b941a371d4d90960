//! Already-encoded values, copied verbatim into an encoder without re-traversal.
//!
//! A [`RawValue`] is one element's type code and payload, minus the key. A [`RawDocument`] is a
//! complete encoded document. Both are checked at construction, so appending them can't
//! corrupt the surrounding document's framing.

use std::convert::TryFrom;

use crate::{
    element::{encode_payload, Element},
    element_type::{BinarySubtype, ElementType},
    error::{Error, Result},
};

/// Bytes of the empty document: the length prefix and the terminator.
pub const EMPTY_DOCUMENT: [u8; 5] = [5, 0, 0, 0, 0];

/// Check that a byte slice has the outer frame of a document: a length prefix that matches the
/// slice, and a trailing null byte. Nested elements aren't inspected.
pub(crate) fn check_document_frame(bytes: &[u8]) -> Result<()> {
    if bytes.len() < EMPTY_DOCUMENT.len() {
        return Err(Error::BadSubdocument(format!(
            "expected at least {} bytes, got {}",
            EMPTY_DOCUMENT.len(),
            bytes.len()
        )));
    }
    let declared = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if usize::try_from(declared).ok() != Some(bytes.len()) {
        return Err(Error::BadSubdocument(format!(
            "length prefix is {}, but document is {} bytes",
            declared,
            bytes.len()
        )));
    }
    if bytes[bytes.len() - 1] != 0 {
        return Err(Error::BadSubdocument(
            "document isn't null-terminated".to_string(),
        ));
    }
    Ok(())
}

fn check_len(ty: ElementType, payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() != expected {
        return Err(Error::BadRawValue(format!(
            "{:?} payload must be {} bytes, got {}",
            ty,
            expected,
            payload.len()
        )));
    }
    Ok(())
}

fn read_i32_prefix(ty: ElementType, payload: &[u8]) -> Result<usize> {
    if payload.len() < 4 {
        return Err(Error::BadRawValue(format!(
            "{:?} payload is missing its length prefix",
            ty
        )));
    }
    let len = i32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    usize::try_from(len)
        .map_err(|_| Error::BadRawValue(format!("{:?} has negative length {}", ty, len)))
}

fn check_payload(ty: ElementType, payload: &[u8]) -> Result<()> {
    use self::ElementType::*;
    match ty {
        Double | DateTime | Int64 | Timestamp => check_len(ty, payload, 8),
        Int32 => check_len(ty, payload, 4),
        ObjectId => check_len(ty, payload, crate::oid::OID_LEN),
        Decimal128 => check_len(ty, payload, 16),
        Null | MinKey | MaxKey => check_len(ty, payload, 0),
        Bool => {
            check_len(ty, payload, 1)?;
            if payload[0] > 1 {
                return Err(Error::BadRawValue(format!(
                    "Bool payload must be 0 or 1, got {}",
                    payload[0]
                )));
            }
            Ok(())
        }
        String => {
            let len = read_i32_prefix(ty, payload)?;
            if len == 0 || len != payload.len() - 4 || payload[payload.len() - 1] != 0 {
                return Err(Error::BadRawValue(format!(
                    "String length prefix {} doesn't match a {}-byte payload",
                    len,
                    payload.len()
                )));
            }
            if let Err(e) = std::str::from_utf8(&payload[4..payload.len() - 1]) {
                return Err(Error::InvalidUtf8 {
                    key: std::string::String::new(),
                    valid_up_to: e.valid_up_to(),
                });
            }
            Ok(())
        }
        Binary => {
            let len = read_i32_prefix(ty, payload)?;
            if payload.len() < 5 || len != payload.len() - 5 {
                return Err(Error::BadRawValue(format!(
                    "Binary length prefix {} doesn't match a {}-byte payload",
                    len,
                    payload.len()
                )));
            }
            // The old binary subtype nests a second length prefix
            if payload[4] == u8::from(BinarySubtype::BinaryOld) {
                let inner = if payload.len() >= 9 {
                    i32::from_le_bytes([payload[5], payload[6], payload[7], payload[8]])
                } else {
                    -1
                };
                if len < 4 || usize::try_from(inner).ok() != Some(len - 4) {
                    return Err(Error::BadRawValue(format!(
                        "old binary inner length {} doesn't match outer length {}",
                        inner, len
                    )));
                }
            }
            Ok(())
        }
        Document | Array => check_document_frame(payload),
    }
}

/// An already-encoded element value: its type code and payload bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawValue {
    element_type: ElementType,
    payload: Vec<u8>,
}

impl RawValue {
    /// Wrap a payload produced elsewhere. Fails if the payload can't be a value of the given
    /// type.
    pub fn new(element_type: ElementType, payload: Vec<u8>) -> Result<RawValue> {
        check_payload(element_type, &payload)?;
        Ok(RawValue {
            element_type,
            payload,
        })
    }

    /// Encode a single element into a standalone raw value.
    pub fn encode(elem: Element) -> Result<RawValue> {
        let element_type = elem.element_type();
        let mut payload = Vec::new();
        encode_payload(&mut payload, "", elem)?;
        Ok(RawValue {
            element_type,
            payload,
        })
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// A complete encoded document, checked to have a valid outer frame.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawDocument {
    bytes: Vec<u8>,
}

impl RawDocument {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<RawDocument> {
        check_document_frame(&bytes)?;
        Ok(RawDocument { bytes })
    }

    pub fn empty() -> RawDocument {
        RawDocument {
            bytes: EMPTY_DOCUMENT.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for RawDocument {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl TryFrom<Vec<u8>> for RawDocument {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<RawDocument> {
        RawDocument::from_bytes(bytes)
    }
}
