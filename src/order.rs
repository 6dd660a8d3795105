//! The total order on object keys (§3, §4.2.1, glossary "Total key order"):
//! shorter keys first, ties broken by byte-wise lexicographic comparison.
//!
//! This single function is the one source of truth for key ordering; the
//! lowering engine sorts by it, the validator checks buffers are sorted by
//! it, and the cursor's binary search probes by it. Keeping it in one place
//! means the three can never quietly disagree.

use core::cmp::Ordering;

pub fn key_order(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
