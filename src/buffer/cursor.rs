//! The cursor (§4.5): a zero-copy, `Copy` handle into an already-validated
//! buffer. Every accessor either returns borrowed data in O(1)/O(log n) or
//! an `Error`; none of them allocate.

use crate::decimal::Decimal;
use crate::error::{Error, ValidationError};
use crate::kind::{Discriminant, Kind};
use crate::width::Tier;

use super::array;
use super::object;
use super::primitive::{read_scalar, ScalarRef};

/// A borrowed position within a validated buffer: the byte slice plus an
/// offset to this node's own discriminant. `Copy` because it is nothing
/// more than a fat pointer and an integer.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Builds a cursor over `bytes`, trusting that `bytes` already passed
    /// [`super::validate::validate`]. Building a cursor over unvalidated
    /// bytes is memory-safe (every read here is itself bounds-checked) but
    /// may surface `Error`s a validator would have caught up front.
    pub fn new(bytes: &'a [u8]) -> Cursor<'a> {
        Cursor { bytes, offset: 0 }
    }

    fn at(bytes: &'a [u8], offset: usize) -> Result<Cursor<'a>, Error> {
        if offset >= bytes.len() {
            return Err(ValidationError::OffsetOutOfBounds.into());
        }
        Ok(Cursor { bytes, offset })
    }

    /// Reconstitutes a cursor at a previously observed offset into `bytes`.
    /// The C FFI surface hands callers a raw `(bytes, offset)` pair instead
    /// of a borrowed `Cursor` it cannot represent across the boundary, and
    /// rebuilds one here each time the caller calls back in.
    pub fn at_offset(bytes: &'a [u8], offset: usize) -> Result<Cursor<'a>, Error> {
        Cursor::at(bytes, offset)
    }

    /// This cursor's own offset into the buffer it was built from, for a
    /// caller that needs to hand it back across an FFI boundary.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn discriminant(&self) -> Result<Discriminant, Error> {
        Discriminant::decode(self.bytes[self.offset])
    }

    /// This node's own byte window, from its discriminant to the end of
    /// the underlying buffer (not yet trimmed to its own extent).
    fn tail(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    pub fn kind(&self) -> Result<Kind, Error> {
        Ok(self.discriminant()?.kind)
    }

    /// This node's own extent, in bytes, from this node's start.
    fn extent(&self) -> Result<usize, Error> {
        let disc = self.discriminant()?;
        match disc.kind {
            Kind::Object => Ok(object::header(tier_of(disc)?, self.tail())?.extent),
            Kind::Array => Ok(array::header(tier_of(disc)?, self.tail())?.extent),
            _ => {
                let (_, extent) = read_scalar(disc, self.tail())?;
                Ok(extent)
            }
        }
    }

    /// Child count for an aggregate, byte length for a string; errors with
    /// `KindMismatch` for any other scalar (§4.5 — `size()` is not the same
    /// concept as [`Cursor::extent`]: a one-element array and a two-byte
    /// string can share the same packed extent but report different sizes
    /// here).
    pub fn size(&self) -> Result<usize, Error> {
        let disc = self.discriminant()?;
        match disc.kind {
            Kind::Object => Ok(object::header(tier_of(disc)?, self.tail())?.count),
            Kind::Array => Ok(array::header(tier_of(disc)?, self.tail())?.count),
            Kind::String => Ok(self.as_str()?.len()),
            _ => Err(Error::KindMismatch { expected: Kind::String, found: disc.kind }),
        }
    }

    /// This node's own packed bytes (its extent, from this node's start).
    pub fn as_bytes(&self) -> Result<&'a [u8], Error> {
        let extent = self.extent()?;
        Ok(&self.bytes[self.offset..self.offset + extent])
    }

    fn scalar(&self) -> Result<ScalarRef<'a>, Error> {
        let disc = self.discriminant()?;
        let (scalar, _) = read_scalar(disc, self.tail())?;
        Ok(scalar)
    }

    fn kind_mismatch(&self, expected: Kind) -> Result<Error, Error> {
        Ok(Error::KindMismatch { expected, found: self.kind()? })
    }

    pub fn as_str(&self) -> Result<&'a str, Error> {
        match self.scalar()? {
            ScalarRef::Str(s) => Ok(s),
            _ => Err(self.kind_mismatch(Kind::String)?),
        }
    }

    pub fn as_integer(&self) -> Result<i64, Error> {
        match self.scalar()? {
            ScalarRef::Integer(v) => Ok(v),
            _ => Err(self.kind_mismatch(Kind::Integer)?),
        }
    }

    pub fn as_decimal(&self) -> Result<Decimal, Error> {
        match self.scalar()? {
            ScalarRef::Decimal(v) => Ok(v),
            _ => Err(self.kind_mismatch(Kind::Decimal)?),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, Error> {
        match self.scalar()? {
            ScalarRef::Boolean(v) => Ok(v),
            _ => Err(self.kind_mismatch(Kind::Boolean)?),
        }
    }

    pub fn is_null(&self) -> Result<bool, Error> {
        Ok(matches!(self.scalar()?, ScalarRef::Null))
    }

    /// Number of children, for an aggregate; `None` for scalars.
    pub fn len(&self) -> Result<Option<usize>, Error> {
        let disc = self.discriminant()?;
        Ok(match disc.kind {
            Kind::Object => Some(object::header(tier_of(disc)?, self.tail())?.count),
            Kind::Array => Some(array::header(tier_of(disc)?, self.tail())?.count),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()?.unwrap_or(0) == 0)
    }

    /// Keyed lookup (§4.2.1): O(log n) binary search over the sorted
    /// offset vector.
    pub fn get(&self, key: &str) -> Result<Option<Cursor<'a>>, Error> {
        let disc = self.discriminant()?;
        if disc.kind != Kind::Object {
            return Err(self.kind_mismatch(Kind::Object)?);
        }
        let h = object::header(tier_of(disc)?, self.tail())?;
        match object::find(&h, self.tail(), key)? {
            Some(value_off) => Ok(Some(Cursor::at(self.bytes, self.offset + value_off)?)),
            None => Ok(None),
        }
    }

    /// Indexed lookup (§4.2.2): O(1) offset vector read.
    pub fn get_index(&self, index: usize) -> Result<Cursor<'a>, Error> {
        let disc = self.discriminant()?;
        if disc.kind != Kind::Array {
            return Err(self.kind_mismatch(Kind::Array)?);
        }
        let h = array::header(tier_of(disc)?, self.tail())?;
        let off = array::element_offset(&h, self.tail(), index)?;
        Cursor::at(self.bytes, self.offset + off)
    }

    /// Iterates values of an array in order.
    pub fn values(&self) -> Result<ValueIter<'a>, Error> {
        let disc = self.discriminant()?;
        if disc.kind != Kind::Array {
            return Err(self.kind_mismatch(Kind::Array)?);
        }
        let window = self.tail();
        let h = array::header(tier_of(disc)?, window)?;
        Ok(ValueIter {
            bytes: self.bytes,
            base: self.offset,
            inner: array::ElementIter::new(&h, window),
        })
    }

    /// Iterates just the keys of an object, in canonical order.
    pub fn keys(&self) -> Result<KeyIter<'a>, Error> {
        Ok(KeyIter { inner: self.entries()? })
    }

    /// Iterates `(key, value)` pairs of an object in canonical order.
    pub fn entries(&self) -> Result<EntryIter<'a>, Error> {
        let disc = self.discriminant()?;
        if disc.kind != Kind::Object {
            return Err(self.kind_mismatch(Kind::Object)?);
        }
        let window = self.tail();
        let h = object::header(tier_of(disc)?, window)?;
        Ok(EntryIter {
            bytes: self.bytes,
            base: self.offset,
            inner: object::PairIter::new(&h, window),
        })
    }

    /// Byte-identical comparison of this node's own packed extent against
    /// `other`'s — valid because lowering produces a canonical byte form
    /// (§4.3): structurally equal trees always lower to identical bytes.
    pub fn equals(&self, other: &Cursor<'_>) -> Result<bool, Error> {
        Ok(self.as_bytes()? == other.as_bytes()?)
    }
}

fn tier_of(disc: Discriminant) -> Result<Tier, Error> {
    Tier::from_code(disc.sub).ok_or_else(|| ValidationError::BadDiscriminant.into())
}

pub struct ValueIter<'a> {
    bytes: &'a [u8],
    base: usize,
    inner: array::ElementIter<'a>,
}

impl<'a> Iterator for ValueIter<'a> {
    type Item = Result<Cursor<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.inner.next()?;
        Some(offset.map(|o| Cursor { bytes: self.bytes, offset: self.base + o }))
    }
}

pub struct KeyIter<'a> {
    inner: EntryIter<'a>,
}

impl<'a> Iterator for KeyIter<'a> {
    type Item = Result<&'a str, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.inner.next()?.map(|(key, _)| key))
    }
}

pub struct EntryIter<'a> {
    bytes: &'a [u8],
    base: usize,
    inner: object::PairIter<'a>,
}

impl<'a> Iterator for EntryIter<'a> {
    type Item = Result<(&'a str, Cursor<'a>), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.inner.next()?;
        Some(pair.map(|(key, value_off)| {
            (key, Cursor { bytes: self.bytes, offset: self.base + value_off })
        }))
    }
}
