//! Parsed document trees, as handed to the encoder by an outside parser.

use crate::{
    binary::Binary,
    datetime::DateTime,
    decimal::Decimal128,
    element::Element,
    oid::ObjectId,
    raw::{RawDocument, RawValue},
    timestamp::Timestamp,
};

/// A leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    /// Text as bytes. It is checked for valid UTF-8 when encoded, not when the tree is built.
    String(Vec<u8>),
    DateTime(DateTime),
    ObjectId(ObjectId),
    Binary(Binary),
    Decimal128(Decimal128),
    MinKey,
    MaxKey,
    Timestamp(Timestamp),
    Raw(RawValue),
    RawDocument(RawDocument),
}

impl Scalar {
    pub fn as_element(&self) -> Element<'_> {
        match *self {
            Scalar::Bool(v) => Element::Bool(v),
            Scalar::Int32(v) => Element::Int32(v),
            Scalar::Int64(v) => Element::Int64(v),
            Scalar::UInt64(v) => Element::UInt64(v),
            Scalar::Double(v) => Element::Double(v),
            Scalar::String(ref v) => Element::Str(v),
            Scalar::DateTime(v) => Element::DateTime(v),
            Scalar::ObjectId(v) => Element::ObjectId(v),
            Scalar::Binary(ref v) => Element::Binary(v.subtype, &v.bytes),
            Scalar::Decimal128(v) => Element::Decimal128(v),
            Scalar::MinKey => Element::MinKey,
            Scalar::MaxKey => Element::MaxKey,
            Scalar::Timestamp(v) => Element::Timestamp(v),
            Scalar::Raw(ref v) => Element::Raw(v),
            Scalar::RawDocument(ref v) => Element::Document(v.as_bytes()),
        }
    }
}

/// A node of a parsed document tree.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Node {
    /// An absent value. Skipped when it appears inside a document or array.
    #[default]
    Missing,
    Null,
    /// Key-value pairs in insertion order. Duplicate keys are kept as-is.
    Document(Vec<(String, Node)>),
    /// Array elements. Their keys are always regenerated as "0", "1", ...
    Array(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    /// Name of this node's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Missing => "Missing",
            Node::Null => "Null",
            Node::Document(_) => "Document",
            Node::Array(_) => "Array",
            Node::Scalar(v) => v.as_element().name(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Node::Missing)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Node::Document(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    pub fn is_container(&self) -> bool {
        self.is_document() || self.is_array()
    }

    pub fn as_document(&self) -> Option<&[(String, Node)]> {
        if let Node::Document(ref doc) = *self {
            Some(doc)
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        if let Node::Array(ref array) = *self {
            Some(array)
        } else {
            None
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        if let Node::Scalar(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    /// First value under `key` in a document. `None` for other node kinds.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_document()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Build a document from key-value pairs, keeping their order.
    pub fn document<K, V, I>(pairs: I) -> Node
    where
        K: Into<String>,
        V: Into<Node>,
        I: IntoIterator<Item = (K, V)>,
    {
        Node::Document(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array from values, keeping their order.
    pub fn array<V, I>(items: I) -> Node
    where
        V: Into<Node>,
        I: IntoIterator<Item = V>,
    {
        Node::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Scalar> for Node {
    fn from(v: Scalar) -> Node {
        Node::Scalar(v)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Node {
        match v {
            Some(v) => v.into(),
            None => Node::Missing,
        }
    }
}

macro_rules! impl_node_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Node {
                fn from(v: $t) -> Node {
                    Node::Scalar(Scalar::$variant(v.into()))
                }
            }
        )*
    };
}

impl_node_from!(
    bool => Bool,
    i32 => Int32,
    i64 => Int64,
    u64 => UInt64,
    f64 => Double,
    DateTime => DateTime,
    ObjectId => ObjectId,
    Binary => Binary,
    Decimal128 => Decimal128,
    Timestamp => Timestamp,
    RawValue => Raw,
    RawDocument => RawDocument,
);

impl From<&str> for Node {
    fn from(v: &str) -> Node {
        Node::Scalar(Scalar::String(v.as_bytes().to_vec()))
    }
}

impl From<String> for Node {
    fn from(v: String) -> Node {
        Node::Scalar(Scalar::String(v.into_bytes()))
    }
}

impl From<crate::binary::MinKey> for Node {
    fn from(_: crate::binary::MinKey) -> Node {
        Node::Scalar(Scalar::MinKey)
    }
}

impl From<crate::binary::MaxKey> for Node {
    fn from(_: crate::binary::MaxKey) -> Node {
        Node::Scalar(Scalar::MaxKey)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Value> for Node {
    fn from(v: serde_json::Value) -> Node {
        use serde_json::Value;
        match v {
            Value::Null => Node::Null,
            Value::Bool(v) => v.into(),
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    match i32::try_from(v) {
                        Ok(v) => v.into(),
                        Err(_) => v.into(),
                    }
                } else if let Some(v) = n.as_u64() {
                    v.into()
                } else {
                    // Every JSON number is representable as some f64
                    n.as_f64().unwrap_or(f64::NAN).into()
                }
            }
            Value::String(v) => v.into(),
            Value::Array(v) => Node::Array(v.into_iter().map(Node::from).collect()),
            Value::Object(v) => {
                Node::Document(v.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}
