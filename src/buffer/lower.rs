//! The lowering engine (§4.3): a two-pass, linear-time walk that turns a
//! heap tree into one canonical, validated byte buffer.
//!
//! Pass 1 ([`plan`]) computes a mirror tree of layout decisions — each
//! node's extent, each aggregate's width tier, each child's offset —
//! without writing a single byte. Pass 2 ([`emit`]) walks the heap tree and
//! the plan in lockstep and writes. Splitting the two means every decision
//! that can fail (duplicate keys, oversize strings, oversize aggregates)
//! surfaces during planning, before any allocation happens, matching
//! §4.3's listed failure modes.

extern crate alloc;

use alloc::vec::Vec;

use log::trace;

use crate::error::{Error, StructuralError};
use crate::heap::Node;
use crate::kind::{Discriminant, Kind};
use crate::width::{align_up, pad_for, Tier};

use super::primitive::{scalar_extent, write_scalar};

/// Maximum nesting depth the lowering engine will walk. Matches the
/// validator's own recursion budget (§4.4) so a tree that lowers
/// successfully is always later re-validatable.
pub const MAX_DEPTH: usize = 256;

const MAX_KEY_LEN: usize = 0xFFFF;
const MAX_EXTENT: u64 = u32::MAX as u64;

/// Pass 1's output: a layout plan that mirrors the heap tree's shape.
pub(crate) enum Planned<'a> {
    Scalar {
        extent: usize,
        align: usize,
    },
    Object {
        tier: Tier,
        extent: usize,
        /// Sorted-key order; `offset` is the key node's start relative to
        /// this node's own start.
        entries: Vec<ObjectEntry<'a>>,
    },
    Array {
        tier: Tier,
        extent: usize,
        entries: Vec<ArrayEntry<'a>>,
    },
}

pub(crate) struct ObjectEntry<'a> {
    pub key: &'a str,
    pub key_extent: usize,
    pub value: &'a Node,
    pub value_plan: Planned<'a>,
    pub offset: usize,
}

pub(crate) struct ArrayEntry<'a> {
    pub value: &'a Node,
    pub value_plan: Planned<'a>,
    pub offset: usize,
}

impl<'a> Planned<'a> {
    pub fn extent(&self) -> usize {
        match self {
            Planned::Scalar { extent, .. } => *extent,
            Planned::Object { extent, .. } => *extent,
            Planned::Array { extent, .. } => *extent,
        }
    }

    pub fn align(&self) -> usize {
        match self {
            Planned::Scalar { align, .. } => *align,
            Planned::Object { tier, .. } | Planned::Array { tier, .. } => tier.bytes(),
        }
    }
}

fn check_extent(extent: usize) -> Result<(), Error> {
    if extent as u64 > MAX_EXTENT {
        return Err(StructuralError::AggregateTooLarge(extent).into());
    }
    Ok(())
}

/// Builds the layout plan for `node`, recursing depth-first postorder.
pub(crate) fn plan(node: &Node, depth: usize) -> Result<Planned<'_>, Error> {
    if depth > MAX_DEPTH {
        return Err(StructuralError::TreeTooDeep(depth).into());
    }
    match node {
        Node::String(s) => {
            if s.len() as u64 > MAX_EXTENT {
                return Err(StructuralError::StringTooLong(s.len()).into());
            }
            let extent = scalar_extent(node);
            Ok(Planned::Scalar {
                extent,
                align: scalar_align(node),
            })
        }
        Node::Integer(_) | Node::Decimal(_) | Node::Boolean(_) | Node::Null => {
            let extent = scalar_extent(node);
            Ok(Planned::Scalar {
                extent,
                align: scalar_align(node),
            })
        }
        Node::Object(_) => plan_object(node, depth),
        Node::Array(_) => plan_array(node, depth),
    }
}

fn scalar_align(node: &Node) -> usize {
    match node {
        Node::String(s) => {
            Tier::smallest_fitting(s.len() as u64).expect("checked above").bytes()
        }
        Node::Integer(v) => crate::width::IntWidth::narrowest(*v).bytes(),
        Node::Decimal(d) => {
            if d.is_double() {
                8
            } else {
                4
            }
        }
        Node::Boolean(_) | Node::Null => 1,
        Node::Object(_) | Node::Array(_) => unreachable!(),
    }
}

fn plan_object(node: &Node, depth: usize) -> Result<Planned<'_>, Error> {
    let sorted = node.sorted_pairs();

    // Duplicate-key check (§4.3 Pass 1): adjacent equal-length keys that
    // compare byte-equal are rejected. `sorted_pairs` orders by length then
    // lexicographically, so duplicates are always adjacent.
    for pair in sorted.windows(2) {
        let (a, b) = (&pair[0].0, &pair[1].0);
        if a.len() == b.len() && a.as_bytes() == b.as_bytes() {
            return Err(StructuralError::DuplicateKey.into());
        }
    }

    let mut keys = Vec::with_capacity(sorted.len());
    let mut key_extents = Vec::with_capacity(sorted.len());
    let mut key_aligns = Vec::with_capacity(sorted.len());
    let mut values = Vec::with_capacity(sorted.len());
    for (key, value) in sorted.iter().map(|p| (&p.0, &p.1)) {
        if key.len() > MAX_KEY_LEN {
            return Err(StructuralError::KeyTooLong(key.len()).into());
        }
        keys.push(key.as_ref());
        key_extents.push(crate::buffer::primitive::string_extent(key.len()));
        key_aligns.push(
            Tier::smallest_fitting(key.len() as u64)
                .expect("checked against MAX_KEY_LEN above")
                .bytes(),
        );
        values.push(plan(value, depth + 1)?);
    }

    let count = keys.len();
    for tier in Tier::ALL {
        let header =
            1 + pad_for(1, tier.bytes()) + tier.bytes() + tier.bytes() + count * tier.bytes();
        let mut pos = header;
        let mut key_offsets = Vec::with_capacity(count);
        for i in 0..count {
            // The key is explicitly offset-addressed (via the offset
            // vector) so it must start at its own natural alignment. The
            // value is found implicitly at `key_offset + key_extent` — no
            // padding is inserted before it, which keeps that computation
            // reader-side-free of any need to know the value's kind in
            // advance.
            pos = align_up(pos, key_aligns[i]);
            let key_offset = pos;
            pos += key_extents[i];
            pos += values[i].extent();
            key_offsets.push(key_offset);
        }
        let total = pos;
        if tier.fits(total as u64) && key_offsets.iter().all(|o| tier.fits(*o as u64)) {
            check_extent(total)?;
            let entries = keys
                .iter()
                .zip(key_extents.iter())
                .zip(sorted.iter().map(|p| &p.1))
                .zip(values.into_iter())
                .zip(key_offsets.into_iter())
                .map(|((((key, key_extent), value), value_plan), offset)| ObjectEntry {
                    key: *key,
                    key_extent: *key_extent,
                    value,
                    value_plan,
                    offset,
                })
                .collect();
            trace!(
                "planned object: {} entries, tier={:?}, extent={}",
                count, tier, total
            );
            return Ok(Planned::Object { tier, extent: total, entries });
        }
    }
    Err(StructuralError::AggregateTooLarge(usize::MAX).into())
}

fn plan_array(node: &Node, depth: usize) -> Result<Planned<'_>, Error> {
    let Node::Array(items) = node else { unreachable!() };
    let mut planned = Vec::with_capacity(items.len());
    for item in items {
        planned.push(plan(item, depth + 1)?);
    }

    for tier in Tier::ALL {
        let header = 1 + pad_for(1, tier.bytes()) + tier.bytes() + tier.bytes() + items.len() * tier.bytes();
        let mut pos = header;
        let mut offsets = Vec::with_capacity(items.len());
        for p in &planned {
            pos = align_up(pos, p.align());
            offsets.push(pos);
            pos += p.extent();
        }
        let total = pos;
        if tier.fits(total as u64) && offsets.iter().all(|o| tier.fits(*o as u64)) {
            check_extent(total)?;
            let entries = items
                .iter()
                .zip(planned.into_iter())
                .zip(offsets.into_iter())
                .map(|((value, value_plan), offset)| ArrayEntry {
                    value,
                    value_plan,
                    offset,
                })
                .collect();
            trace!(
                "planned array: {} entries, tier={:?}, extent={}",
                items.len(),
                tier,
                total
            );
            return Ok(Planned::Array { tier, extent: total, entries });
        }
    }
    Err(StructuralError::AggregateTooLarge(usize::MAX).into())
}

/// Pass 2: allocates one buffer of exactly `root.extent()` bytes and
/// writes the whole tree into it.
///
/// A buffer's root must be an aggregate (§7 `state`): a standalone packed
/// value is addressed by offset from its own root, and a naked scalar has
/// no such offset vector for a later `get`/`get_index` to land on.
pub fn lower(root: &Node) -> Result<Vec<u8>, Error> {
    if !matches!(root, Node::Object(_) | Node::Array(_)) {
        return Err(Error::State("cannot lower a naked scalar; wrap it in an object or array"));
    }
    let planned = plan(root, 0)?;
    let mut buf = alloc::vec![0u8; planned.extent()];
    emit(root, &planned, &mut buf);
    trace!("lowered buffer: {} bytes", buf.len());
    Ok(buf)
}

fn emit(node: &Node, planned: &Planned<'_>, dst: &mut [u8]) {
    match (node, planned) {
        (Node::Object(_), Planned::Object { tier, extent, entries }) => {
            emit_object(*tier, *extent, entries, dst)
        }
        (Node::Array(_), Planned::Array { tier, extent, entries }) => {
            emit_array(*tier, *extent, entries, dst)
        }
        (_, Planned::Scalar { .. }) => write_scalar(node, dst),
        _ => unreachable!("node/plan shape mismatch"),
    }
}

fn emit_object(tier: Tier, extent: usize, entries: &[ObjectEntry<'_>], dst: &mut [u8]) {
    dst[0] = Discriminant::encode(Kind::Object, tier.code());
    let field_start = 1 + pad_for(1, tier.bytes());
    tier.write(extent as u64, &mut dst[field_start..field_start + tier.bytes()]);
    let count_start = field_start + tier.bytes();
    tier.write(entries.len() as u64, &mut dst[count_start..count_start + tier.bytes()]);
    let offsets_start = count_start + tier.bytes();
    for (i, entry) in entries.iter().enumerate() {
        let slot = offsets_start + i * tier.bytes();
        tier.write(entry.offset as u64, &mut dst[slot..slot + tier.bytes()]);
        let key_end = entry.offset + entry.key_extent;
        write_scalar(&Node::String(entry.key.into()), &mut dst[entry.offset..key_end]);
        let value_end = key_end + entry.value_plan.extent();
        emit(entry.value, &entry.value_plan, &mut dst[key_end..value_end]);
    }
}

fn emit_array(tier: Tier, extent: usize, entries: &[ArrayEntry<'_>], dst: &mut [u8]) {
    dst[0] = Discriminant::encode(Kind::Array, tier.code());
    let field_start = 1 + pad_for(1, tier.bytes());
    tier.write(extent as u64, &mut dst[field_start..field_start + tier.bytes()]);
    let count_start = field_start + tier.bytes();
    tier.write(entries.len() as u64, &mut dst[count_start..count_start + tier.bytes()]);
    let offsets_start = count_start + tier.bytes();
    for (i, entry) in entries.iter().enumerate() {
        let slot = offsets_start + i * tier.bytes();
        tier.write(entry.offset as u64, &mut dst[slot..slot + tier.bytes()]);
        let value_end = entry.offset + entry.value_plan.extent();
        emit(entry.value, &entry.value_plan, &mut dst[entry.offset..value_end]);
    }
}
