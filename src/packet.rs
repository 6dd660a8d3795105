//! The `packet` façade (§10.2): a tagged union over the heap and buffer
//! representations that forwards reads to whichever backend is live and
//! lowers on demand when a buffer-only operation needs one. Mirrors the
//! two-variant `packet_t` wrapper the original library builds its public
//! API around — a caller should rarely need to know which backend they
//! hold.

extern crate alloc;

use alloc::vec::Vec;

use crate::buffer::{Buffer, Cursor};
use crate::decimal::Decimal;
use crate::error::Error;
use crate::heap::{Node, RefCounted};
use crate::kind::Kind;

/// A value backed by either a mutable heap tree or an immutable packed
/// buffer. `P` picks the reference-counting strategy (`Rc` for
/// single-threaded use, `Arc` to share across threads) for whichever
/// backend is live.
pub enum Packet<P: RefCounted> {
    Heap(P::Ptr<Node>),
    Buffer(Buffer<P>),
}

impl<P: RefCounted> Packet<P> {
    pub fn from_heap(node: Node) -> Packet<P> {
        Packet::Heap(P::new(node))
    }

    pub fn from_buffer(buffer: Buffer<P>) -> Packet<P> {
        Packet::Buffer(buffer)
    }

    /// Parses a standalone packed buffer (§4.4), taking ownership of it.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Packet<P>, Error> {
        Ok(Packet::Buffer(Buffer::from_bytes(bytes)?))
    }

    pub fn is_heap(&self) -> bool {
        matches!(self, Packet::Heap(_))
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self, Packet::Buffer(_))
    }

    /// Lowers this packet to its buffer form (§4.3), caching nothing: a
    /// heap-backed packet is lowered fresh every call. Buffer-backed
    /// packets hand back a cheap clone of the ref-counted bytes.
    pub fn to_buffer(&self) -> Result<Buffer<P>, Error> {
        match self {
            Packet::Heap(node) => Buffer::from_heap(&**node),
            Packet::Buffer(buf) => Ok(buf.clone()),
        }
    }

    /// Forces this packet into buffer form in place. After this call,
    /// `self.is_buffer()` holds and further reads skip re-lowering.
    pub fn freeze(&mut self) -> Result<(), Error> {
        if let Packet::Heap(node) = self {
            let buf = Buffer::from_heap(&**node)?;
            *self = Packet::Buffer(buf);
        }
        Ok(())
    }

    pub fn kind(&self) -> Result<Kind, Error> {
        match self {
            Packet::Heap(node) => Ok(node.kind()),
            Packet::Buffer(buf) => buf.cursor().kind(),
        }
    }

    pub fn as_str(&self) -> Result<&str, Error> {
        match self {
            Packet::Heap(node) => match &**node {
                Node::String(s) => Ok(s),
                other => Err(Error::KindMismatch { expected: Kind::String, found: other.kind() }),
            },
            Packet::Buffer(buf) => buf.cursor().as_str(),
        }
    }

    pub fn as_integer(&self) -> Result<i64, Error> {
        match self {
            Packet::Heap(node) => match &**node {
                Node::Integer(v) => Ok(*v),
                other => Err(Error::KindMismatch { expected: Kind::Integer, found: other.kind() }),
            },
            Packet::Buffer(buf) => buf.cursor().as_integer(),
        }
    }

    pub fn as_decimal(&self) -> Result<Decimal, Error> {
        match self {
            Packet::Heap(node) => match &**node {
                Node::Decimal(d) => Ok(*d),
                other => Err(Error::KindMismatch { expected: Kind::Decimal, found: other.kind() }),
            },
            Packet::Buffer(buf) => buf.cursor().as_decimal(),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, Error> {
        match self {
            Packet::Heap(node) => match &**node {
                Node::Boolean(v) => Ok(*v),
                other => Err(Error::KindMismatch { expected: Kind::Boolean, found: other.kind() }),
            },
            Packet::Buffer(buf) => buf.cursor().as_boolean(),
        }
    }

    pub fn is_null(&self) -> Result<bool, Error> {
        match self {
            Packet::Heap(node) => Ok(matches!(&**node, Node::Null)),
            Packet::Buffer(buf) => buf.cursor().is_null(),
        }
    }

    pub fn len(&self) -> Result<Option<usize>, Error> {
        match self {
            Packet::Heap(node) => Ok(node.len()),
            Packet::Buffer(buf) => buf.cursor().len(),
        }
    }

    /// Keyed lookup. Returns a fresh `Packet` wrapping the child —
    /// cheaply ref-counted for a heap object, a re-sliced cursor-backed
    /// buffer otherwise.
    pub fn get(&self, key: &str) -> Result<Option<Packet<P>>, Error> {
        match self {
            Packet::Heap(node) => match &**node {
                Node::Object(_) => Ok(node.get(key).cloned().map(Packet::from_heap)),
                other => Err(Error::KindMismatch { expected: Kind::Object, found: other.kind() }),
            },
            Packet::Buffer(buf) => match buf.cursor().get(key)? {
                Some(cursor) => Ok(Some(Packet::Buffer(slice_buffer(buf, cursor)?))),
                None => Ok(None),
            },
        }
    }

    pub fn get_index(&self, index: usize) -> Result<Packet<P>, Error> {
        match self {
            Packet::Heap(node) => match &**node {
                Node::Array(_) => node
                    .get_index(index)
                    .cloned()
                    .map(Packet::from_heap)
                    .ok_or(Error::OutOfRange),
                other => Err(Error::KindMismatch { expected: Kind::Array, found: other.kind() }),
            },
            Packet::Buffer(buf) => {
                let cursor = buf.cursor().get_index(index)?;
                Ok(Packet::Buffer(slice_buffer(buf, cursor)?))
            }
        }
    }

    /// Structural equality: if both sides are buffer-backed, compares
    /// canonical bytes directly (§4.3); otherwise lowers whichever side
    /// needs it and compares the result.
    pub fn equals(&self, other: &Packet<P>) -> Result<bool, Error> {
        let a = self.to_buffer()?;
        let b = other.to_buffer()?;
        Ok(a.cursor().equals(&b.cursor())?)
    }
}

impl<P: RefCounted> Clone for Packet<P> {
    fn clone(&self) -> Self {
        match self {
            Packet::Heap(node) => Packet::Heap(node.clone()),
            Packet::Buffer(buf) => Packet::Buffer(buf.clone()),
        }
    }
}

/// Re-lowers the whole buffer `buf` is built on so a child cursor can be
/// re-sliced as its own standalone `Buffer`. This is the buffer-backend
/// analogue of the heap side's cheap `Rc::clone` — children are not
/// independently ref-counted the way heap nodes are (§10.1), so handing
/// one out on its own means copying its bytes.
fn slice_buffer<P: RefCounted>(_parent: &Buffer<P>, cursor: Cursor<'_>) -> Result<Buffer<P>, Error> {
    let bytes = cursor.as_bytes()?;
    Buffer::from_validated_prefix(Vec::from(bytes))
}
