use serde::{Deserialize, Serialize};

/// BSON element type codes. For internal use only, but exposed so already-encoded values can
/// declare their type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Double,
    String,
    Document,
    Array,
    Binary,
    ObjectId,
    Bool,
    DateTime,
    Null,
    Int32,
    Timestamp,
    Int64,
    Decimal128,
    MinKey,
    MaxKey,
}

impl ElementType {
    /// Construct an element type from a single byte. Returns `None` for codes this crate
    /// doesn't produce, including the deprecated ones.
    pub fn from_u8(n: u8) -> Option<ElementType> {
        use self::ElementType::*;
        match n {
            0x01 => Some(Double),
            0x02 => Some(String),
            0x03 => Some(Document),
            0x04 => Some(Array),
            0x05 => Some(Binary),
            0x07 => Some(ObjectId),
            0x08 => Some(Bool),
            0x09 => Some(DateTime),
            0x0a => Some(Null),
            0x10 => Some(Int32),
            0x11 => Some(Timestamp),
            0x12 => Some(Int64),
            0x13 => Some(Decimal128),
            0xff => Some(MinKey),
            0x7f => Some(MaxKey),
            _ => None,
        }
    }

    /// Converts an element type into its single-byte representation.
    pub fn into_u8(self) -> u8 {
        use self::ElementType::*;
        match self {
            Double => 0x01,
            String => 0x02,
            Document => 0x03,
            Array => 0x04,
            Binary => 0x05,
            ObjectId => 0x07,
            Bool => 0x08,
            DateTime => 0x09,
            Null => 0x0a,
            Int32 => 0x10,
            Timestamp => 0x11,
            Int64 => 0x12,
            Decimal128 => 0x13,
            MinKey => 0xff,
            MaxKey => 0x7f,
        }
    }

    /// Whether this type holds nested elements.
    pub fn is_container(self) -> bool {
        matches!(self, ElementType::Document | ElementType::Array)
    }
}

impl From<ElementType> for u8 {
    fn from(val: ElementType) -> u8 {
        val.into_u8()
    }
}

/// Subtype byte carried by every binary element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum BinarySubtype {
    #[default]
    Generic,
    Function,
    /// Deprecated; the payload carries its own length prefix.
    BinaryOld,
    /// Deprecated UUID representation.
    UuidOld,
    Uuid,
    Md5,
    Encrypted,
    Column,
    Sensitive,
    /// Application-defined, `0x80` through `0xff`.
    UserDefined(u8),
    Reserved(u8),
}

impl BinarySubtype {
    pub fn from_u8(n: u8) -> BinarySubtype {
        use self::BinarySubtype::*;
        match n {
            0x00 => Generic,
            0x01 => Function,
            0x02 => BinaryOld,
            0x03 => UuidOld,
            0x04 => Uuid,
            0x05 => Md5,
            0x06 => Encrypted,
            0x07 => Column,
            0x08 => Sensitive,
            0x80..=0xff => UserDefined(n),
            _ => Reserved(n),
        }
    }

    pub fn into_u8(self) -> u8 {
        use self::BinarySubtype::*;
        match self {
            Generic => 0x00,
            Function => 0x01,
            BinaryOld => 0x02,
            UuidOld => 0x03,
            Uuid => 0x04,
            Md5 => 0x05,
            Encrypted => 0x06,
            Column => 0x07,
            Sensitive => 0x08,
            UserDefined(n) | Reserved(n) => n,
        }
    }
}

impl From<u8> for BinarySubtype {
    fn from(val: u8) -> BinarySubtype {
        BinarySubtype::from_u8(val)
    }
}

impl From<BinarySubtype> for u8 {
    fn from(val: BinarySubtype) -> u8 {
        val.into_u8()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn type_codes_roundtrip() {
        for n in 0..=255u8 {
            if let Some(ty) = ElementType::from_u8(n) {
                assert_eq!(ty.into_u8(), n);
            }
        }
        assert_eq!(ElementType::from_u8(0x06), None, "undefined is deprecated");
        assert_eq!(ElementType::from_u8(0x00), None);
    }

    #[test]
    fn sentinel_codes() {
        assert_eq!(u8::from(ElementType::MinKey), 0xff);
        assert_eq!(u8::from(ElementType::MaxKey), 0x7f);
    }

    #[test]
    fn subtypes() {
        for n in 0..=255u8 {
            assert_eq!(BinarySubtype::from_u8(n).into_u8(), n);
        }
        assert_eq!(BinarySubtype::from(0x80), BinarySubtype::UserDefined(0x80));
        assert_eq!(BinarySubtype::from(0x09), BinarySubtype::Reserved(0x09));
        assert_eq!(BinarySubtype::default().into_u8(), 0);
    }
}
