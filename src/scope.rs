//! Scope guard for writing a nested document or array.
//!
//! Opening a scope writes the container's header with a placeholder length. The guard derefs
//! to the underlying buffer, so children are written straight into it. When the guard drops,
//! on success or on an early return with an error, it writes the terminator and patches the
//! length prefix. The drop runs exactly once, so a container's header is always consistent
//! with its contents.

use std::ops::{Deref, DerefMut};

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    element::{check_key, write_key},
    element_type::ElementType,
    error::{Error, Result},
    raw::EMPTY_DOCUMENT,
};

pub struct SubcontainerScope<'b> {
    buf: &'b mut Vec<u8>,
    start: usize,
}

impl<'b> SubcontainerScope<'b> {
    /// Open a nested container under `key` in the parent's buffer.
    pub fn open(parent: &'b mut Vec<u8>, ty: ElementType, key: &str) -> Result<Self> {
        debug_assert!(ty.is_container());
        check_key(key)?;
        parent.push(ty.into());
        write_key(parent, key);
        let start = parent.len();
        parent.extend_from_slice(&[0u8; 4]);
        Ok(Self { buf: parent, start })
    }

    /// Reopen a finished top-level document for more elements. Its terminator is removed now
    /// and restored when the scope drops. Fails without touching `doc` if it doesn't end in
    /// a terminator.
    pub fn reopen(doc: &'b mut Vec<u8>) -> Result<Self> {
        if doc.len() < EMPTY_DOCUMENT.len() || doc.last() != Some(&0) {
            return Err(Error::BadSubdocument(
                "document isn't null-terminated".to_string(),
            ));
        }
        doc.pop();
        Ok(Self { buf: doc, start: 0 })
    }

    /// Offset of this container's length prefix in the buffer.
    pub fn start(&self) -> usize {
        self.start
    }
}

impl<'b> Deref for SubcontainerScope<'b> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &*self.buf
    }
}

impl<'b> DerefMut for SubcontainerScope<'b> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut *self.buf
    }
}

impl<'b> Drop for SubcontainerScope<'b> {
    fn drop(&mut self) {
        self.buf.push(0);
        let len = self.buf.len() - self.start;
        // Oversized documents are rejected when the root is read out
        LittleEndian::write_u32(&mut self.buf[self.start..self.start + 4], len as u32);
        log::trace!("closed container at offset {} with length {}", self.start, len);
    }
}
