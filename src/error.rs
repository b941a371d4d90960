use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// An unsigned 64-bit value was larger than the signed 64-bit maximum. BSON has no unsigned
    /// 64-bit type, so it can't be stored.
    IntegerOverflow { key: String, value: u64 },
    /// A string value wasn't valid UTF-8. `valid_up_to` is the byte offset of the first bad
    /// sequence.
    InvalidUtf8 { key: String, valid_up_to: usize },
    /// Keys are null-terminated on the wire, so they can't contain a null byte.
    InvalidKey(String),
    /// Documents and arrays were nested deeper than the encoder allows.
    DepthLimit { max: usize },
    /// The encoded document grew past the maximum allowed size.
    LengthTooLong { max: usize, actual: usize },
    /// A pre-encoded subdocument didn't have a valid outer frame.
    BadSubdocument(String),
    /// An already-encoded value's payload didn't match its declared type.
    BadRawValue(String),
    /// A date was outside the range of signed 64-bit milliseconds since the Unix epoch.
    DateOutOfRange,
    /// The encoder was used after its buffer was extracted.
    AlreadyExtracted,
    /// Attempted to build a document from something that isn't a document or an array.
    NonContainerRoot(&'static str),
    /// A required value was missing.
    MissingValue,
    /// A dictionary had neither the requested key nor a default entry.
    NoValue { key: String, name: Option<String> },
}

impl Error {
    /// Programmer misuse of the encoder, as opposed to bad input data.
    pub fn is_logic_error(&self) -> bool {
        matches!(
            self,
            Error::AlreadyExtracted | Error::NonContainerRoot(_) | Error::MissingValue
        )
    }

    /// Input data that violates a wire-format constraint.
    pub fn is_encoding_error(&self) -> bool {
        matches!(
            self,
            Error::IntegerOverflow { .. }
                | Error::InvalidUtf8 { .. }
                | Error::InvalidKey(_)
                | Error::DepthLimit { .. }
                | Error::LengthTooLong { .. }
                | Error::BadSubdocument(_)
                | Error::BadRawValue(_)
                | Error::DateOutOfRange
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::IntegerOverflow { ref key, value } => write!(
                f,
                "The value {} of '{}' is too high for BSON",
                value, key
            ),
            Error::InvalidUtf8 {
                ref key,
                valid_up_to,
            } => write!(
                f,
                "BSON strings must be valid UTF-8: value of '{}' is invalid after byte {}",
                key, valid_up_to
            ),
            Error::InvalidKey(ref key) => {
                write!(f, "BSON keys can't contain a null byte: {:?}", key)
            }
            Error::DepthLimit { max } => {
                write!(f, "Hit nesting limit: depth exceeded maximum of {}", max)
            }
            Error::LengthTooLong { max, actual } => write!(
                f,
                "Document too long: was {} bytes, maximum allowed is {}",
                actual, max
            ),
            Error::BadSubdocument(ref err) => write!(f, "Malformed subdocument: {}", err),
            Error::BadRawValue(ref err) => write!(f, "Malformed raw value: {}", err),
            Error::DateOutOfRange => f.write_str("Date is out of range for BSON"),
            Error::AlreadyExtracted => f.write_str("Document was already extracted"),
            Error::NonContainerRoot(kind) => write!(
                f,
                "Attempt to build a document from primitive type ({})",
                kind
            ),
            Error::MissingValue => f.write_str("Value is missing"),
            Error::NoValue { ref key, ref name } => match name {
                Some(name) => write!(f, "no value for '{}' in {}", key, name),
                None => write!(f, "no value for '{}'", key),
            },
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classification() {
        let logic = [
            Error::AlreadyExtracted,
            Error::NonContainerRoot("Null"),
            Error::MissingValue,
        ];
        for err in logic.iter() {
            assert!(err.is_logic_error(), "{:?} should be a logic error", err);
            assert!(!err.is_encoding_error());
        }

        let encoding = [
            Error::IntegerOverflow {
                key: "a".into(),
                value: u64::MAX,
            },
            Error::InvalidUtf8 {
                key: "a".into(),
                valid_up_to: 0,
            },
            Error::InvalidKey("a\0b".into()),
            Error::DepthLimit { max: 200 },
            Error::LengthTooLong { max: 5, actual: 6 },
            Error::BadSubdocument("short".into()),
            Error::BadRawValue("short".into()),
            Error::DateOutOfRange,
        ];
        for err in encoding.iter() {
            assert!(err.is_encoding_error(), "{:?} should be an encoding error", err);
            assert!(!err.is_logic_error());
        }

        let dict = Error::NoValue {
            key: "a".into(),
            name: None,
        };
        assert!(!dict.is_logic_error());
        assert!(!dict.is_encoding_error());
    }

    #[test]
    fn display() {
        let err = Error::IntegerOverflow {
            key: "big".into(),
            value: 9223372036854775808,
        };
        assert_eq!(
            err.to_string(),
            "The value 9223372036854775808 of 'big' is too high for BSON"
        );
        let err = Error::NoValue {
            key: "timeout".into(),
            name: Some("CLIENT_TIMEOUTS".into()),
        };
        assert_eq!(err.to_string(), "no value for 'timeout' in CLIENT_TIMEOUTS");
    }
}
