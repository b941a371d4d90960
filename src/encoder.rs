//! The document encoder.
//!
//! An [`Encoder`] owns a single growable buffer holding a complete document. Elements can be
//! appended one at a time with [`Encoder::append`], or a whole parsed tree can be walked with
//! [`Encoder::append_tree`]. Between calls the buffer is always a well-formed document, so it
//! can be peeked at with [`Encoder::get`] and embedded into another encoder. Once done,
//! [`Encoder::extract`] hands the bytes over; after that, the encoder can't be used again.
//!
//! If any append fails with an encoding error, elements appended before the failure stay in the
//! buffer. The document is still well-formed, but it is incomplete, so it should be discarded.

use std::mem;
use std::time::SystemTime;

use crate::{
    array_indexer::ArrayIndexer,
    datetime::DateTime,
    depth_tracking::DepthTracker,
    element::{serialize_elem, Element},
    element_type::ElementType,
    error::{Error, Result},
    raw::EMPTY_DOCUMENT,
    scope::SubcontainerScope,
    value::Node,
    MAX_DEPTH, MAX_DOC_SIZE,
};

/// Builds one document. Cloning an encoder copies its buffer.
#[derive(Clone, Debug)]
pub struct Encoder {
    buf: Vec<u8>,
    extracted: bool,
    max_depth: usize,
    max_size: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_params(MAX_DEPTH, MAX_DOC_SIZE)
    }

    /// Create an encoder with a custom nesting limit and maximum document size. The size is
    /// capped at [`MAX_DOC_SIZE`], as the length prefix can't describe anything larger.
    pub fn with_params(max_depth: usize, max_size: usize) -> Self {
        Self {
            buf: EMPTY_DOCUMENT.to_vec(),
            extracted: false,
            max_depth,
            max_size: max_size.min(MAX_DOC_SIZE),
        }
    }

    /// Create an encoder seeded with every entry of a document or array node.
    pub fn from_tree(tree: &Node) -> Result<Self> {
        let mut enc = Self::new();
        enc.append_tree(tree)?;
        Ok(enc)
    }

    fn check_live(&self) -> Result<()> {
        if self.extracted {
            log::warn!("encoder used after its document was extracted");
            return Err(Error::AlreadyExtracted);
        }
        Ok(())
    }

    fn check_size(&self) -> Result<()> {
        if self.buf.len() > self.max_size {
            return Err(Error::LengthTooLong {
                max: self.max_size,
                actual: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Reopen the root document for appending. It is closed again when the scope drops.
    fn body(&mut self) -> Result<SubcontainerScope<'_>> {
        SubcontainerScope::reopen(&mut self.buf)
    }

    /// Append a single value under `key`.
    pub fn append<'a, V: Into<Element<'a>>>(&mut self, key: &str, value: V) -> Result<&mut Self> {
        self.check_live()?;
        serialize_elem(&mut *self.body()?, key, value.into())?;
        Ok(self)
    }

    /// Append a date, truncated to millisecond resolution.
    pub fn append_system_time(&mut self, key: &str, time: SystemTime) -> Result<&mut Self> {
        let date = DateTime::from_system_time(time)?;
        self.append(key, date)
    }

    /// Append any node under `key`, recursing into documents and arrays. The node must be
    /// present: a [`Node::Missing`] here is an error rather than being skipped.
    pub fn append_node(&mut self, key: &str, node: &Node) -> Result<&mut Self> {
        self.check_live()?;
        if node.is_missing() {
            log::warn!("attempt to append a missing value under '{}'", key);
            return Err(Error::MissingValue);
        }
        let depth = DepthTracker::new(self.max_depth);
        append_into(&mut *self.body()?, key, node, depth)?;
        Ok(self)
    }

    /// Append every entry of a document, or every element of an array, into this document.
    /// Array elements get the keys "0", "1", and so on.
    pub fn append_tree(&mut self, tree: &Node) -> Result<&mut Self> {
        self.check_live()?;
        let depth = DepthTracker::new(self.max_depth);
        match tree {
            Node::Document(pairs) => {
                let mut body = self.body()?;
                for (key, node) in pairs.iter() {
                    append_into(&mut body, key, node, depth)?;
                }
            }
            Node::Array(items) => {
                let mut body = self.body()?;
                append_items(&mut body, items, depth)?;
            }
            Node::Missing | Node::Null | Node::Scalar(_) => {
                log::warn!("attempt to build a document from {}", tree.kind());
                return Err(Error::NonContainerRoot(tree.kind()));
            }
        }
        Ok(self)
    }

    /// The document built so far.
    pub fn get(&self) -> Result<&[u8]> {
        self.check_live()?;
        self.check_size()?;
        Ok(&self.buf)
    }

    /// The document built so far, for in-place edits. Edits must keep the trailing null byte;
    /// appending to a document without one fails with [`Error::BadSubdocument`]. The length
    /// prefix is rewritten on the next append.
    pub fn get_mut(&mut self) -> Result<&mut [u8]> {
        self.check_live()?;
        self.check_size()?;
        Ok(&mut self.buf)
    }

    /// Take the finished document. This can only be done once.
    pub fn extract(&mut self) -> Result<Vec<u8>> {
        self.check_live()?;
        self.check_size()?;
        self.extracted = true;
        let buf = mem::take(&mut self.buf);
        log::trace!("extracted document of {} bytes", buf.len());
        Ok(buf)
    }

    /// Size of the document built so far, in bytes. Zero once extracted.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if no elements have been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.len() <= EMPTY_DOCUMENT.len()
    }

    pub fn is_extracted(&self) -> bool {
        self.extracted
    }
}

/// Append a node under `key` into an open container. Missing nodes write nothing.
fn append_into(dest: &mut Vec<u8>, key: &str, node: &Node, depth: DepthTracker) -> Result<()> {
    match node {
        Node::Missing => Ok(()),
        Node::Null => serialize_elem(dest, key, Element::Null),
        Node::Scalar(v) => serialize_elem(dest, key, v.as_element()),
        Node::Document(pairs) => {
            let depth = depth.descend()?;
            let mut scope = SubcontainerScope::open(dest, ElementType::Document, key)?;
            for (key, node) in pairs.iter() {
                append_into(&mut scope, key, node, depth)?;
            }
            Ok(())
        }
        Node::Array(items) => {
            let depth = depth.descend()?;
            let mut scope = SubcontainerScope::open(dest, ElementType::Array, key)?;
            append_items(&mut scope, items, depth)
        }
    }
}

/// Append array items with generated keys. Missing items are skipped without using up a key,
/// so the keys stay a gapless sequence.
fn append_items(dest: &mut Vec<u8>, items: &[Node], depth: DepthTracker) -> Result<()> {
    let mut indexer = ArrayIndexer::new();
    // Only present items advance the indexer: [a, Missing, b] gets keys "0" and "1", not "0" and "2"
    for node in items.iter().filter(|node| !node.is_missing()) {
        append_into(dest, indexer.key(), node, depth)?;
        indexer.advance();
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::Scalar;

    #[test]
    fn empty_extract() {
        let mut enc = Encoder::new();
        assert!(enc.is_empty());
        assert_eq!(enc.extract().unwrap(), &EMPTY_DOCUMENT);
        assert!(enc.is_extracted());
        assert_eq!(enc.len(), 0);
    }

    #[test]
    fn extract_once() {
        let mut enc = Encoder::new();
        enc.append("a", 1i32).unwrap();
        enc.extract().unwrap();
        assert_eq!(enc.extract(), Err(Error::AlreadyExtracted));
        assert_eq!(enc.append("b", 2i32).unwrap_err(), Error::AlreadyExtracted);
        assert_eq!(enc.get().unwrap_err(), Error::AlreadyExtracted);
        assert!(enc.get_mut().unwrap_err().is_logic_error());
        assert!(enc.append_tree(&Node::array([1])).unwrap_err().is_logic_error());
        assert!(enc.append_node("c", &Node::Null).unwrap_err().is_logic_error());
    }

    #[test]
    fn append_chain() {
        let mut enc = Encoder::new();
        enc.append("a", true).unwrap().append("b", ()).unwrap();
        assert!(!enc.is_empty());
        assert_eq!(
            enc.extract().unwrap(),
            &[12, 0, 0, 0, 0x08, b'a', 0, 1, 0x0a, b'b', 0, 0]
        );
    }

    #[test]
    fn always_well_formed() {
        let mut enc = Encoder::new();
        enc.append("a", 1i32).unwrap();
        let peek = enc.get().unwrap().to_vec();
        assert_eq!(peek, &[12, 0, 0, 0, 0x10, b'a', 0, 1, 0, 0, 0, 0]);
        enc.append("b", u64::MAX).unwrap_err();
        assert_eq!(enc.get().unwrap(), &peek[..], "Failed append leaves nothing behind");
    }

    #[test]
    fn non_container_roots() {
        let mut enc = Encoder::new();
        let roots = [
            Node::Missing,
            Node::Null,
            Node::from(1i32),
            Node::from("x"),
        ];
        for root in roots.iter() {
            let err = enc.append_tree(root).unwrap_err();
            assert_eq!(err, Error::NonContainerRoot(root.kind()));
            assert!(err.is_logic_error());
        }
        assert!(Encoder::from_tree(&Node::Null).is_err());
        assert_eq!(enc.extract().unwrap(), &EMPTY_DOCUMENT);
    }

    #[test]
    fn missing_skipped() {
        let tree = Node::document([("a", Node::from(1i32)), ("b", Node::Missing)]);
        let mut enc = Encoder::from_tree(&tree).unwrap();
        assert_eq!(
            enc.extract().unwrap(),
            &[12, 0, 0, 0, 0x10, b'a', 0, 1, 0, 0, 0, 0]
        );
    }

    #[test]
    fn missing_array_items_keep_keys_gapless() {
        let tree = Node::array([Node::from(true), Node::Missing, Node::from(false)]);
        let mut enc = Encoder::from_tree(&tree).unwrap();
        assert_eq!(
            enc.extract().unwrap(),
            &[13, 0, 0, 0, 0x08, b'0', 0, 1, 0x08, b'1', 0, 0, 0]
        );
    }

    #[test]
    fn append_missing_node() {
        let mut enc = Encoder::new();
        let err = enc.append_node("a", &Node::Missing).unwrap_err();
        assert_eq!(err, Error::MissingValue);
        assert!(err.is_logic_error());
    }

    #[test]
    fn append_node_nested() {
        let mut enc = Encoder::new();
        enc.append_node("d", &Node::document([("x", Node::Null)]))
            .unwrap();
        assert_eq!(
            enc.extract().unwrap(),
            &[16, 0, 0, 0, 0x03, b'd', 0, 8, 0, 0, 0, 0x0a, b'x', 0, 0, 0]
        );
    }

    #[test]
    fn depth_limit() {
        fn nest(levels: usize) -> Node {
            let mut node = Node::from(1i32);
            for _ in 0..levels {
                node = Node::document([("n", node)]);
            }
            node
        }
        // The root doesn't count toward the limit
        let mut enc = Encoder::with_params(3, MAX_DOC_SIZE);
        enc.append_tree(&nest(4)).unwrap();
        let mut enc = Encoder::with_params(3, MAX_DOC_SIZE);
        assert_eq!(
            enc.append_tree(&nest(5)).unwrap_err(),
            Error::DepthLimit { max: 3 }
        );
        // Still a well-formed document after the failure
        let doc = enc.get().unwrap();
        assert_eq!(doc.len(), u32::from_le_bytes([doc[0], doc[1], doc[2], doc[3]]) as usize);

        let mut enc = Encoder::new();
        enc.append_tree(&nest(MAX_DEPTH + 1)).unwrap();
        let mut enc = Encoder::new();
        assert!(enc.append_tree(&nest(MAX_DEPTH + 2)).unwrap_err().is_encoding_error());
    }

    #[test]
    fn size_limit() {
        let mut enc = Encoder::with_params(MAX_DEPTH, 16);
        enc.append("a", 1i32).unwrap();
        enc.get().unwrap();
        enc.append("b", 1i32).unwrap();
        assert_eq!(
            enc.extract().unwrap_err(),
            Error::LengthTooLong { max: 16, actual: 19 }
        );
        assert!(!enc.is_extracted());
    }

    #[test]
    fn clone_is_independent() {
        let mut a = Encoder::new();
        a.append("x", 1i32).unwrap();
        let mut b = a.clone();
        b.append("y", 2i32).unwrap();
        assert_eq!(a.extract().unwrap().len(), 12);
        assert_eq!(b.extract().unwrap().len(), 19);
    }

    #[test]
    fn composition() {
        let mut inner = Encoder::new();
        inner.append("x", 1i32).unwrap();
        let mut outer = Encoder::new();
        outer
            .append("inner", Element::Document(inner.get().unwrap()))
            .unwrap();
        let inner_doc = inner.extract().unwrap();
        let outer_doc = outer.extract().unwrap();
        assert_eq!(outer_doc[4], 0x03);
        assert_eq!(&outer_doc[4 + 1 + 6..outer_doc.len() - 1], &inner_doc[..]);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut enc = Encoder::new();
        enc.append("a", 1i32).unwrap();
        let doc = enc.get_mut().unwrap();
        doc[7] = 9;
        assert_eq!(enc.extract().unwrap()[7], 9);
    }

    #[test]
    fn get_mut_without_terminator() {
        let mut enc = Encoder::new();
        enc.append("a", 1i32).unwrap();
        let doc = enc.get_mut().unwrap();
        let last = doc.len() - 1;
        doc[last] = 7;
        let err = enc.append("b", 2i32).unwrap_err();
        assert!(matches!(err, Error::BadSubdocument(_)));
        assert!(err.is_encoding_error());
        let err = enc.append_tree(&Node::array([1])).unwrap_err();
        assert!(matches!(err, Error::BadSubdocument(_)));
        // Nothing was overwritten
        assert_eq!(enc.get().unwrap(), &[12, 0, 0, 0, 0x10, b'a', 0, 1, 0, 0, 0, 7]);

        // Restoring the terminator makes the document appendable again
        enc.get_mut().unwrap()[last] = 0;
        enc.append("b", 2i32).unwrap();
        assert_eq!(enc.extract().unwrap().len(), 19);
    }

    #[test]
    fn scalar_errors_inside_tree() {
        let tree = Node::document([
            ("ok", Node::from(1i32)),
            ("bad", Node::Scalar(Scalar::String(vec![0x80]))),
        ]);
        let err = Encoder::from_tree(&tree).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidUtf8 {
                key: "bad".to_string(),
                valid_up_to: 0
            }
        );
    }

    #[test]
    fn system_time() {
        use std::time::{Duration, UNIX_EPOCH};
        let mut enc = Encoder::new();
        enc.append_system_time("t", UNIX_EPOCH + Duration::from_micros(1_500))
            .unwrap();
        let doc = enc.extract().unwrap();
        assert_eq!(doc[4], 0x09);
        assert_eq!(&doc[7..15], &1i64.to_le_bytes());
    }

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Encoder>();
    }
}
