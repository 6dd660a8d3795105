//! Read-side object aggregate codec (§4.2.1, §4.5). Operates on an
//! already-validated byte window whose first byte is the object's own
//! discriminant. Shared by the cursor (trusted) and the validator
//! (untrusted, via [`header`] and [`key_at`] alone — it never calls
//! [`find`], which assumes the key order validation has already passed).

use core::cmp::Ordering;

use crate::error::{Error, ValidationError};
use crate::order::key_order;
use crate::width::{pad_for, Tier};

use super::primitive::{read_scalar, ScalarRef};

/// The decoded, but not yet bounds-checked, header of an object node.
pub struct Header {
    pub tier: Tier,
    pub extent: usize,
    pub count: usize,
    pub offsets_start: usize,
}

/// Reads `tier`'s header fields out of `bytes`. Does not yet check that
/// `extent`/`count` are consistent with `bytes.len()` — that is the
/// validator's job; the cursor trusts it was already done.
pub fn header(tier: Tier, bytes: &[u8]) -> Result<Header, Error> {
    let field_start = 1 + pad_for(1, tier.bytes());
    let w = tier.bytes();
    if bytes.len() < field_start + 2 * w {
        return Err(ValidationError::Truncated.into());
    }
    let extent = tier.read(&bytes[field_start..field_start + w]) as usize;
    let count = tier.read(&bytes[field_start + w..field_start + 2 * w]) as usize;
    Ok(Header {
        tier,
        extent,
        count,
        offsets_start: field_start + 2 * w,
    })
}

/// The absolute (node-relative) offset of the `index`th key, from the
/// offset vector.
pub fn key_offset(h: &Header, bytes: &[u8], index: usize) -> Result<usize, Error> {
    let w = h.tier.bytes();
    let slot = h.offsets_start + index * w;
    if bytes.len() < slot + w {
        return Err(ValidationError::Truncated.into());
    }
    Ok(h.tier.read(&bytes[slot..slot + w]) as usize)
}

/// Decodes the key string starting at `offset`, returning it and the
/// offset just past it — the value starts there, with no padding in
/// between.
pub fn key_at<'a>(bytes: &'a [u8], offset: usize) -> Result<(&'a str, usize), Error> {
    if offset >= bytes.len() {
        return Err(ValidationError::OffsetOutOfBounds.into());
    }
    let disc = crate::kind::Discriminant::decode(bytes[offset])?;
    let (scalar, extent) = read_scalar(disc, &bytes[offset..])?;
    let ScalarRef::Str(key) = scalar else {
        return Err(ValidationError::BadDiscriminant.into());
    };
    Ok((key, offset + extent))
}

/// Binary-searches the sorted offset vector for `key`, returning the
/// value's node-relative offset if present. Assumes the buffer already
/// passed validation (keys in canonical order, no duplicates).
pub fn find(h: &Header, bytes: &[u8], key: &str) -> Result<Option<usize>, Error> {
    let mut lo = 0usize;
    let mut hi = h.count;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let key_off = key_offset(h, bytes, mid)?;
        let (found_key, value_start) = key_at(bytes, key_off)?;
        match key_order(found_key.as_bytes(), key.as_bytes()) {
            Ordering::Equal => return Ok(Some(value_start)),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    Ok(None)
}

/// Iterates `(key, value_offset)` pairs in canonical order.
pub struct PairIter<'a> {
    bytes: &'a [u8],
    tier: Tier,
    offsets_start: usize,
    index: usize,
    count: usize,
}

impl<'a> PairIter<'a> {
    pub fn new(h: &Header, bytes: &'a [u8]) -> Self {
        PairIter {
            bytes,
            tier: h.tier,
            offsets_start: h.offsets_start,
            index: 0,
            count: h.count,
        }
    }
}

impl<'a> Iterator for PairIter<'a> {
    type Item = Result<(&'a str, usize), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let slot = self.offsets_start + self.index * self.tier.bytes();
        self.index += 1;
        let w = self.tier.bytes();
        if self.bytes.len() < slot + w {
            return Some(Err(ValidationError::Truncated.into()));
        }
        let key_off = self.tier.read(&self.bytes[slot..slot + w]) as usize;
        Some(key_at(self.bytes, key_off))
    }
}
