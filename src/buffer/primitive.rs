//! The primitive codec (§4.1): packed size, write, and read for the five
//! scalar kinds (string, integer, decimal, boolean, null). Every function
//! here operates on a node-local byte window — offset 0 is the node's own
//! discriminant byte — so the aggregate codec and the lowering engine can
//! place the result anywhere in the final buffer without this module
//! knowing about absolute offsets.

use core::str;

use crate::decimal::Decimal;
use crate::error::{Error, ValidationError};
use crate::heap::Node;
use crate::kind::{Discriminant, Kind};
use crate::width::{pad_for, IntWidth, Tier};

/// `packed_size`: the total extent a scalar heap node will occupy, including
/// its discriminant byte and any internal alignment padding. Pure and
/// total, as §4.1 requires — the lowering engine's first pass depends on
/// that.
pub fn scalar_extent(node: &Node) -> usize {
    match node {
        Node::String(s) => string_extent(s.len()),
        Node::Integer(v) => integer_extent(*v),
        Node::Decimal(d) => decimal_extent(*d),
        Node::Boolean(_) | Node::Null => 1,
        Node::Object(_) | Node::Array(_) => unreachable!("scalar_extent called on an aggregate"),
    }
}

pub fn string_extent(byte_len: usize) -> usize {
    let tier = Tier::smallest_fitting(byte_len as u64).expect("string length fits in 32 bits");
    1 + pad_for(1, tier.bytes()) + tier.bytes() + byte_len + 1
}

pub fn integer_extent(value: i64) -> usize {
    let width = IntWidth::narrowest(value);
    1 + pad_for(1, width.bytes()) + width.bytes()
}

pub fn decimal_extent(value: Decimal) -> usize {
    let width = if value.is_double() { 8 } else { 4 };
    1 + pad_for(1, width) + width
}

/// Natural alignment of a scalar node, given its encoded discriminant.
pub fn scalar_alignment(disc: Discriminant) -> Result<usize, Error> {
    Ok(match disc.kind {
        Kind::String => Tier::from_code(disc.sub)
            .ok_or(ValidationError::BadDiscriminant)?
            .bytes(),
        Kind::Integer => IntWidth::from_code(disc.sub)
            .ok_or(ValidationError::BadDiscriminant)?
            .bytes(),
        Kind::Decimal => {
            if disc.sub == 0 {
                4
            } else {
                8
            }
        }
        Kind::Boolean | Kind::Null => 1,
        Kind::Object | Kind::Array => unreachable!("scalar_alignment called on an aggregate kind"),
    })
}

/// Writes a scalar node into `dst`, where `dst.len()` equals the node's
/// already-computed extent and `dst[0]` is this node's discriminant byte.
pub fn write_scalar(node: &Node, dst: &mut [u8]) {
    match node {
        Node::String(s) => write_string(s, dst),
        Node::Integer(v) => write_integer(*v, dst),
        Node::Decimal(d) => write_decimal(*d, dst),
        Node::Boolean(v) => dst[0] = Discriminant::encode(Kind::Boolean, u8::from(*v)),
        Node::Null => dst[0] = Discriminant::encode(Kind::Null, 0),
        Node::Object(_) | Node::Array(_) => unreachable!("write_scalar called on an aggregate"),
    }
}

fn write_string(s: &str, dst: &mut [u8]) {
    let tier = Tier::smallest_fitting(s.len() as u64).expect("string length fits in 32 bits");
    dst[0] = Discriminant::encode(Kind::String, tier.code());
    let field_start = 1 + pad_for(1, tier.bytes());
    tier.write(s.len() as u64, &mut dst[field_start..field_start + tier.bytes()]);
    let body_start = field_start + tier.bytes();
    dst[body_start..body_start + s.len()].copy_from_slice(s.as_bytes());
    dst[body_start + s.len()] = 0;
}

fn write_integer(v: i64, dst: &mut [u8]) {
    let width = IntWidth::narrowest(v);
    dst[0] = Discriminant::encode(Kind::Integer, width.code());
    let field_start = 1 + pad_for(1, width.bytes());
    width.write(v, &mut dst[field_start..field_start + width.bytes()]);
}

fn write_decimal(d: Decimal, dst: &mut [u8]) {
    match d {
        Decimal::Single(v) => {
            dst[0] = Discriminant::encode(Kind::Decimal, 0);
            let start = 1 + pad_for(1, 4);
            dst[start..start + 4].copy_from_slice(&v.to_le_bytes());
        }
        Decimal::Double(v) => {
            dst[0] = Discriminant::encode(Kind::Decimal, 1);
            let start = 1 + pad_for(1, 8);
            dst[start..start + 8].copy_from_slice(&v.to_le_bytes());
        }
    }
}

/// A decoded scalar, borrowed in place from the buffer (§4.5: "no
/// allocation occurs between receiving B and returning the scalar").
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Str(&'a str),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    Null,
}

/// Decodes the scalar at `bytes[0..]`, returning the value and its extent.
/// Used by both the cursor (trusted path, already validated) and the
/// validator (untrusted path, must not panic or read out of bounds).
pub fn read_scalar<'a>(disc: Discriminant, bytes: &'a [u8]) -> Result<(ScalarRef<'a>, usize), Error> {
    match disc.kind {
        Kind::String => read_string(disc, bytes),
        Kind::Integer => read_integer(disc, bytes),
        Kind::Decimal => read_decimal(disc, bytes),
        Kind::Boolean => Ok((ScalarRef::Boolean(disc.sub != 0), 1)),
        Kind::Null => Ok((ScalarRef::Null, 1)),
        Kind::Object | Kind::Array => unreachable!("read_scalar called on an aggregate kind"),
    }
}

fn read_string<'a>(disc: Discriminant, bytes: &'a [u8]) -> Result<(ScalarRef<'a>, usize), Error> {
    let tier = Tier::from_code(disc.sub).ok_or(ValidationError::BadDiscriminant)?;
    let field_start = 1 + pad_for(1, tier.bytes());
    if bytes.len() < field_start + tier.bytes() {
        return Err(ValidationError::Truncated.into());
    }
    let len = tier.read(&bytes[field_start..field_start + tier.bytes()]) as usize;
    let body_start = field_start + tier.bytes();
    let extent = body_start + len + 1;
    if bytes.len() < extent {
        return Err(ValidationError::Truncated.into());
    }
    let s = str::from_utf8(&bytes[body_start..body_start + len])
        .map_err(|_| ValidationError::BadDiscriminant)?;
    Ok((ScalarRef::Str(s), extent))
}

fn read_integer<'a>(disc: Discriminant, bytes: &'a [u8]) -> Result<(ScalarRef<'a>, usize), Error> {
    let width = IntWidth::from_code(disc.sub).ok_or(ValidationError::BadDiscriminant)?;
    let field_start = 1 + pad_for(1, width.bytes());
    let extent = field_start + width.bytes();
    if bytes.len() < extent {
        return Err(ValidationError::Truncated.into());
    }
    let v = width.read_sign_extend(&bytes[field_start..extent]);
    Ok((ScalarRef::Integer(v), extent))
}

fn read_decimal<'a>(disc: Discriminant, bytes: &'a [u8]) -> Result<(ScalarRef<'a>, usize), Error> {
    let width = if disc.sub == 0 { 4 } else { 8 };
    let field_start = 1 + pad_for(1, width);
    let extent = field_start + width;
    if bytes.len() < extent {
        return Err(ValidationError::Truncated.into());
    }
    let value = if width == 4 {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&bytes[field_start..extent]);
        Decimal::Single(f32::from_le_bytes(buf))
    } else {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes[field_start..extent]);
        Decimal::Double(f64::from_le_bytes(buf))
    };
    Ok((ScalarRef::Decimal(value), extent))
}
