//! bson-builder encodes parsed document trees into BSON, the binary document format used by
//! document stores.
//!
//! A tree comes from some outside parser as a [`Node`]: documents with ordered keys, arrays,
//! and scalars. An [`Encoder`] walks the tree and writes each element with its type code,
//! null-terminated key, and payload. Nested documents and arrays get their length prefixes
//! patched as they close, so the output can be read by any conformant BSON reader.
//!
//! Beyond the JSON-like scalars, the encoder supports the BSON-specific types:
//!
//! - [`ObjectId`], the 12-byte identifier used as a primary key
//! - [`Binary`] data with a [`BinarySubtype`]
//! - [`Decimal128`] values
//! - [`DateTime`] at millisecond resolution
//! - [`Timestamp`], the logical replication timestamp
//! - [`MinKey`] and [`MaxKey`], the range-query bounds
//! - [`RawValue`] and [`RawDocument`], for passing through already-encoded data
//!
//! Data that breaks the format's rules fails with an encoding error: unsigned integers above
//! `i64::MAX`, text that isn't UTF-8, keys with null bytes, or nesting deeper than
//! [`MAX_DEPTH`]. Misusing an encoder, like reading it after its document was extracted or
//! building a document from a bare scalar, fails with a logic error. See [`Error`].
//!
//! ```
//! use bson_builder::{Encoder, Node};
//!
//! let tree = Node::document([
//!     ("name", Node::from("widget")),
//!     ("tags", Node::array(["a", "b"])),
//! ]);
//! let mut enc = Encoder::from_tree(&tree).unwrap();
//! enc.append("count", 3i32).unwrap();
//! let bytes = enc.extract().unwrap();
//! assert_eq!(bytes.len(), u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize);
//! ```

mod array_indexer;
mod binary;
mod datetime;
mod decimal;
mod depth_tracking;
mod element;
mod element_type;
mod encoder;
mod error;
mod oid;
mod raw;
mod scope;
mod timestamp;
mod value;
pub mod value_dict;

pub use array_indexer::ArrayIndexer;
pub use binary::{Binary, MaxKey, MinKey};
pub use datetime::DateTime;
pub use decimal::Decimal128;
pub use depth_tracking::DepthTracker;
pub use element::{serialize_elem, Element};
pub use element_type::{BinarySubtype, ElementType};
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use oid::{ObjectId, OID_LEN};
pub use raw::{RawDocument, RawValue, EMPTY_DOCUMENT};
pub use scope::SubcontainerScope;
pub use timestamp::Timestamp;
pub use value::{Node, Scalar};
pub use value_dict::{ValueDict, DEFAULT_KEY};

/// Maximum nesting depth of documents and arrays below the root document.
pub const MAX_DEPTH: usize = 200;

/// The maximum size of an encoded document. The length prefix is a signed 32-bit integer.
pub const MAX_DOC_SIZE: usize = i32::MAX as usize;
