//! The validator (§4.4): a single bounded-recursion pass over an untrusted
//! byte slice that either proves the whole buffer safe to read with the
//! trusted cursor path, or rejects it. Never indexes past a length it has
//! already checked, never recurses past [`MAX_DEPTH`], and runs in time
//! linear in the buffer's own encoded size: every recursive call operates
//! on a strictly smaller sub-slice than its caller, so an attacker cannot
//! make the walk quadratic by nesting offsets that double back on
//! already-visited bytes.

use core::cmp::Ordering;

use crate::error::{Error, ValidationError};
use crate::kind::{Discriminant, Kind};
use crate::order::key_order;
use crate::width::Tier;

use super::array;
use super::lower::MAX_DEPTH;
use super::object;
use super::primitive::{read_scalar, scalar_alignment};

/// Validates that `bytes` begins with exactly one well-formed node, and
/// returns that node's self-reported extent. Bytes beyond the extent are
/// not inspected; [`validate_exact`] additionally requires there be none.
pub fn validate(bytes: &[u8]) -> Result<usize, Error> {
    validate_node(bytes, 0)
}

/// Like [`validate`] but requires `bytes.len() == extent` — the shape a
/// freshly lowered buffer, or any buffer accepted as a standalone value,
/// must have.
pub fn validate_exact(bytes: &[u8]) -> Result<(), Error> {
    let extent = validate(bytes)?;
    if extent != bytes.len() {
        return Err(ValidationError::TrailingBytes(bytes.len() - extent).into());
    }
    Ok(())
}

fn natural_alignment(disc: Discriminant) -> Result<usize, Error> {
    match disc.kind {
        Kind::Object | Kind::Array => {
            let tier = Tier::from_code(disc.sub).ok_or(ValidationError::BadDiscriminant)?;
            Ok(tier.bytes())
        }
        _ => scalar_alignment(disc),
    }
}

fn validate_node(bytes: &[u8], depth: usize) -> Result<usize, Error> {
    if depth > MAX_DEPTH {
        return Err(ValidationError::DepthExceeded.into());
    }
    if bytes.is_empty() {
        return Err(ValidationError::Truncated.into());
    }
    let disc = Discriminant::decode(bytes[0])?;
    match disc.kind {
        Kind::Object => validate_object(disc, bytes, depth),
        Kind::Array => validate_array(disc, bytes, depth),
        _ => {
            let (_, extent) = read_scalar(disc, bytes)?;
            Ok(extent)
        }
    }
}

/// Validates the child at `window[offset..]`, requiring both that `offset`
/// is itself properly aligned (the child is explicitly offset-addressed,
/// so the writer was required to align it, §3) and that it ends within
/// `window`.
fn validate_child(window: &[u8], offset: usize, depth: usize) -> Result<(), Error> {
    if offset >= window.len() {
        return Err(ValidationError::OffsetOutOfBounds.into());
    }
    let disc = Discriminant::decode(window[offset])?;
    let align = natural_alignment(disc)?;
    if offset % align != 0 {
        return Err(ValidationError::Misaligned.into());
    }
    let extent = validate_node(&window[offset..], depth + 1)?;
    if offset + extent > window.len() {
        return Err(ValidationError::OffsetOutOfBounds.into());
    }
    Ok(())
}

fn validate_object(disc: Discriminant, bytes: &[u8], depth: usize) -> Result<usize, Error> {
    let tier = Tier::from_code(disc.sub).ok_or(ValidationError::BadDiscriminant)?;
    let h = object::header(tier, bytes)?;
    if h.extent > bytes.len() {
        return Err(ValidationError::OffsetOutOfBounds.into());
    }
    if h.count.checked_mul(tier.bytes()).map_or(true, |sz| h.offsets_start + sz > h.extent) {
        return Err(ValidationError::CountOverflow.into());
    }
    let window = &bytes[..h.extent];

    let mut prev_key: Option<&str> = None;
    for i in 0..h.count {
        let key_off = object::key_offset(&h, window, i)?;
        validate_child(window, key_off, depth + 1)?;
        let (key, value_off) = object::key_at(window, key_off)?;

        if let Some(prev) = prev_key {
            match key_order(prev.as_bytes(), key.as_bytes()) {
                Ordering::Less => {}
                _ => return Err(ValidationError::KeyOrderViolation.into()),
            }
        }
        prev_key = Some(key);

        if value_off >= window.len() {
            return Err(ValidationError::OffsetOutOfBounds.into());
        }
        let value_extent = validate_node(&window[value_off..], depth + 1)?;
        if value_off + value_extent > window.len() {
            return Err(ValidationError::OffsetOutOfBounds.into());
        }
    }
    Ok(h.extent)
}

fn validate_array(disc: Discriminant, bytes: &[u8], depth: usize) -> Result<usize, Error> {
    let tier = Tier::from_code(disc.sub).ok_or(ValidationError::BadDiscriminant)?;
    let h = array::header(tier, bytes)?;
    if h.extent > bytes.len() {
        return Err(ValidationError::OffsetOutOfBounds.into());
    }
    if h.count.checked_mul(tier.bytes()).map_or(true, |sz| h.offsets_start + sz > h.extent) {
        return Err(ValidationError::CountOverflow.into());
    }
    let window = &bytes[..h.extent];
    for offset in array::ElementIter::new(&h, window) {
        validate_child(window, offset?, depth + 1)?;
    }
    Ok(h.extent)
}
