//! The buffer representation (§4, §10.1): an immutable, validated byte
//! slice plus the zero-copy [`Cursor`] that reads it. [`Buffer`] owns the
//! bytes (behind whichever [`crate::heap::RefCounted`] strategy the
//! surrounding [`crate::packet::Packet`] picked) so cursors can borrow
//! from it for as long as the caller likes.

extern crate alloc;

mod array;
mod cursor;
mod lower;
mod object;
mod primitive;
mod validate;

pub use cursor::{Cursor, EntryIter, KeyIter, ValueIter};
pub use lower::lower;
pub use validate::{validate, validate_exact};

use alloc::vec::Vec;

use crate::error::Error;
use crate::heap::{Node, RefCounted};

/// An immutable packed buffer, owning its bytes via `P`'s reference
/// counting strategy. Validated once, at construction; every [`Cursor`]
/// it hands out afterward is a borrow that does no further allocation.
pub struct Buffer<P: RefCounted> {
    bytes: P::Ptr<Vec<u8>>,
}

impl<P: RefCounted> Buffer<P> {
    /// Lowers `tree` into a fresh, canonical buffer (§4.3).
    pub fn from_heap(tree: &Node) -> Result<Buffer<P>, Error> {
        let bytes = lower(tree)?;
        Ok(Buffer { bytes: P::new(bytes) })
    }

    /// Validates `bytes` as a standalone packed value (§4.4) and takes
    /// ownership of them. Rejects trailing bytes past the root's own
    /// extent — use [`Buffer::from_validated_prefix`] to allow them.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Buffer<P>, Error> {
        validate_exact(&bytes)?;
        Ok(Buffer { bytes: P::new(bytes) })
    }

    /// Like [`Buffer::from_bytes`] but allows (and silently drops, from
    /// the caller's perspective — `cursor()` still only ever sees the
    /// root's own extent) bytes beyond the root node's extent.
    pub fn from_validated_prefix(bytes: Vec<u8>) -> Result<Buffer<P>, Error> {
        validate(&bytes)?;
        Ok(Buffer { bytes: P::new(bytes) })
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }
}

impl<P: RefCounted> Clone for Buffer<P> {
    fn clone(&self) -> Self {
        Buffer { bytes: self.bytes.clone() }
    }
}
