//! Single elements and the routines that append them.
//!
//! An element on the wire is a type code, a null-terminated key, and a type-specific payload.
//! Every routine here checks its value against the wire-format constraints *before* writing,
//! so a rejected element leaves the buffer untouched.

use crate::{
    binary::{Binary, MaxKey, MinKey},
    datetime::DateTime,
    decimal::Decimal128,
    element_type::{BinarySubtype, ElementType},
    error::{Error, Result},
    oid::ObjectId,
    raw::{check_document_frame, RawDocument, RawValue},
    timestamp::Timestamp,
    MAX_DOC_SIZE,
};

/// A single scalar value ready to be appended under a key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Element<'a> {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    /// Stored as a signed 64-bit integer; must not exceed `i64::MAX`.
    UInt64(u64),
    Double(f64),
    /// UTF-8 text. Kept as bytes so text from an outside parser can be validated here.
    Str(&'a [u8]),
    DateTime(DateTime),
    ObjectId(ObjectId),
    Binary(BinarySubtype, &'a [u8]),
    Decimal128(Decimal128),
    MinKey,
    MaxKey,
    Timestamp(Timestamp),
    /// An already-encoded value, copied verbatim.
    Raw(&'a RawValue),
    /// A complete encoded document, embedded as a subdocument.
    Document(&'a [u8]),
}

impl<'a> Element<'a> {
    pub fn name(&self) -> &'static str {
        use self::Element::*;
        match self {
            Null => "Null",
            Bool(_) => "Bool",
            Int32(_) => "Int32",
            Int64(_) => "Int64",
            UInt64(_) => "UInt64",
            Double(_) => "Double",
            Str(_) => "Str",
            DateTime(_) => "DateTime",
            ObjectId(_) => "ObjectId",
            Binary(..) => "Binary",
            Decimal128(_) => "Decimal128",
            MinKey => "MinKey",
            MaxKey => "MaxKey",
            Timestamp(_) => "Timestamp",
            Raw(_) => "Raw",
            Document(_) => "Document",
        }
    }

    /// The type code this element is written with.
    pub fn element_type(&self) -> ElementType {
        use self::Element::*;
        match self {
            Null => ElementType::Null,
            Bool(_) => ElementType::Bool,
            Int32(_) => ElementType::Int32,
            Int64(_) | UInt64(_) => ElementType::Int64,
            Double(_) => ElementType::Double,
            Str(_) => ElementType::String,
            DateTime(_) => ElementType::DateTime,
            ObjectId(_) => ElementType::ObjectId,
            Binary(..) => ElementType::Binary,
            Decimal128(_) => ElementType::Decimal128,
            MinKey => ElementType::MinKey,
            MaxKey => ElementType::MaxKey,
            Timestamp(_) => ElementType::Timestamp,
            Raw(v) => v.element_type(),
            Document(_) => ElementType::Document,
        }
    }
}

/// Keys are written as C strings.
pub(crate) fn check_key(key: &str) -> Result<()> {
    if key.as_bytes().contains(&0) {
        return Err(Error::InvalidKey(key.to_string()));
    }
    Ok(())
}

pub(crate) fn write_key(buf: &mut Vec<u8>, key: &str) {
    buf.extend_from_slice(key.as_bytes());
    buf.push(0);
}

fn check_len(len: usize) -> Result<()> {
    // Room for the i32 length prefix's own limit, minus the trailing null or subtype byte
    let max = MAX_DOC_SIZE - 1;
    if len > max {
        return Err(Error::LengthTooLong { max, actual: len });
    }
    Ok(())
}

/// Check an element against the wire-format constraints without writing anything.
fn check_elem(key: &str, elem: &Element) -> Result<()> {
    use self::Element::*;
    match *elem {
        UInt64(v) => {
            if v > i64::MAX as u64 {
                return Err(Error::IntegerOverflow {
                    key: key.to_string(),
                    value: v,
                });
            }
        }
        Str(v) => {
            check_len(v.len())?;
            if let Err(e) = std::str::from_utf8(v) {
                return Err(Error::InvalidUtf8 {
                    key: key.to_string(),
                    valid_up_to: e.valid_up_to(),
                });
            }
        }
        Binary(subtype, v) => {
            // The old binary subtype nests a second length prefix
            let extra = if subtype == BinarySubtype::BinaryOld { 4 } else { 0 };
            check_len(v.len() + extra)?;
        }
        Document(v) => check_document_frame(v)?,
        Null | Bool(_) | Int32(_) | Int64(_) | Double(_) | DateTime(_) | ObjectId(_)
        | Decimal128(_) | MinKey | MaxKey | Timestamp(_) | Raw(_) => (),
    }
    Ok(())
}

/// Write an element's payload. Assumes [`check_elem`] already passed.
fn write_payload(buf: &mut Vec<u8>, elem: Element) {
    use self::Element::*;
    match elem {
        Null | MinKey | MaxKey => (),
        Bool(v) => buf.push(v as u8),
        Int32(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Int64(v) => buf.extend_from_slice(&v.to_le_bytes()),
        UInt64(v) => buf.extend_from_slice(&(v as i64).to_le_bytes()),
        Double(v) => buf.extend_from_slice(&v.to_bits().to_le_bytes()),
        Str(v) => {
            buf.extend_from_slice(&((v.len() + 1) as i32).to_le_bytes());
            buf.extend_from_slice(v);
            buf.push(0);
        }
        DateTime(v) => buf.extend_from_slice(&v.timestamp_millis().to_le_bytes()),
        ObjectId(v) => buf.extend_from_slice(v.as_ref()),
        Binary(subtype, v) => {
            if subtype == BinarySubtype::BinaryOld {
                buf.extend_from_slice(&((v.len() + 4) as i32).to_le_bytes());
                buf.push(subtype.into());
                buf.extend_from_slice(&(v.len() as i32).to_le_bytes());
            } else {
                buf.extend_from_slice(&(v.len() as i32).to_le_bytes());
                buf.push(subtype.into());
            }
            buf.extend_from_slice(v);
        }
        Decimal128(v) => buf.extend_from_slice(&v.bytes()),
        Timestamp(v) => v.encode_vec(buf),
        Raw(v) => buf.extend_from_slice(v.payload()),
        Document(v) => buf.extend_from_slice(v),
    }
}

/// Encode just the payload of an element, with no type code or key. `key` is only used in
/// error messages.
pub(crate) fn encode_payload(buf: &mut Vec<u8>, key: &str, elem: Element) -> Result<()> {
    check_elem(key, &elem)?;
    write_payload(buf, elem);
    Ok(())
}

/// Serialize a keyed element onto a byte vector. Either the whole element is written, or
/// nothing is.
pub fn serialize_elem(buf: &mut Vec<u8>, key: &str, elem: Element) -> Result<()> {
    check_key(key)?;
    check_elem(key, &elem)?;
    buf.push(elem.element_type().into());
    write_key(buf, key);
    write_payload(buf, elem);
    Ok(())
}

impl<'a> From<()> for Element<'a> {
    fn from(_: ()) -> Element<'a> {
        Element::Null
    }
}

impl<'a> From<bool> for Element<'a> {
    fn from(v: bool) -> Element<'a> {
        Element::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $wide:ty, $($t:ty),*) => {
        $(
            impl<'a> From<$t> for Element<'a> {
                fn from(v: $t) -> Element<'a> {
                    Element::$variant(v as $wide)
                }
            }
        )*
    };
}

impl_from_int!(Int32, i32, i8, i16, i32, u8, u16);
impl_from_int!(Int64, i64, i64, u32);
impl_from_int!(UInt64, u64, u64);

impl<'a> From<f32> for Element<'a> {
    fn from(v: f32) -> Element<'a> {
        Element::Double(v.into())
    }
}

impl<'a> From<f64> for Element<'a> {
    fn from(v: f64) -> Element<'a> {
        Element::Double(v)
    }
}

impl<'a> From<&'a str> for Element<'a> {
    fn from(v: &'a str) -> Element<'a> {
        Element::Str(v.as_bytes())
    }
}

impl<'a> From<&'a String> for Element<'a> {
    fn from(v: &'a String) -> Element<'a> {
        Element::Str(v.as_bytes())
    }
}

impl<'a> From<DateTime> for Element<'a> {
    fn from(v: DateTime) -> Element<'a> {
        Element::DateTime(v)
    }
}

impl<'a> From<ObjectId> for Element<'a> {
    fn from(v: ObjectId) -> Element<'a> {
        Element::ObjectId(v)
    }
}

impl<'a> From<&'a Binary> for Element<'a> {
    fn from(v: &'a Binary) -> Element<'a> {
        Element::Binary(v.subtype, &v.bytes)
    }
}

impl<'a> From<Decimal128> for Element<'a> {
    fn from(v: Decimal128) -> Element<'a> {
        Element::Decimal128(v)
    }
}

impl<'a> From<MinKey> for Element<'a> {
    fn from(_: MinKey) -> Element<'a> {
        Element::MinKey
    }
}

impl<'a> From<MaxKey> for Element<'a> {
    fn from(_: MaxKey) -> Element<'a> {
        Element::MaxKey
    }
}

impl<'a> From<Timestamp> for Element<'a> {
    fn from(v: Timestamp) -> Element<'a> {
        Element::Timestamp(v)
    }
}

impl<'a> From<&'a RawValue> for Element<'a> {
    fn from(v: &'a RawValue) -> Element<'a> {
        Element::Raw(v)
    }
}

impl<'a> From<&'a RawDocument> for Element<'a> {
    fn from(v: &'a RawDocument) -> Element<'a> {
        Element::Document(v.as_bytes())
    }
}

impl<'a, T: Into<Element<'a>>> From<Option<T>> for Element<'a> {
    fn from(v: Option<T>) -> Element<'a> {
        match v {
            Some(v) => v.into(),
            None => Element::Null,
        }
    }
}
