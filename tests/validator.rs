//! Rejection tests for the bounded-recursion validator (§4.4): each of
//! these builds a legitimate buffer and then corrupts it in one specific
//! way, checking the validator catches exactly that corruption rather
//! than panicking or reading out of bounds.

use polypack::buffer::{validate, validate_exact};
use polypack::{Buffer, Node, Rc};

fn lowered_bytes(tree: &Node) -> Vec<u8> {
    Buffer::<Rc>::from_heap(tree).unwrap().as_bytes().to_vec()
}

#[test]
fn accepts_a_well_formed_buffer() {
    let mut tree = Node::empty_object();
    tree.insert("a", 1i32);
    tree.insert("b", "two");
    let bytes = lowered_bytes(&tree);
    assert!(validate_exact(&bytes).is_ok());
}

#[test]
fn rejects_a_truncated_buffer() {
    let mut tree = Node::empty_object();
    tree.insert("a", "a string long enough to have a real extent");
    let bytes = lowered_bytes(&tree);
    for cut in 1..bytes.len() {
        let truncated = &bytes[..bytes.len() - cut];
        assert!(
            validate(truncated).is_err() || validate_exact(truncated).is_err(),
            "truncating {cut} bytes from the end should be rejected"
        );
    }
}

#[test]
fn rejects_trailing_bytes_under_validate_exact_but_allows_them_under_validate() {
    let mut tree = Node::empty_object();
    tree.insert("a", 1i32);
    let mut bytes = lowered_bytes(&tree);
    bytes.push(0xFF);
    bytes.push(0xFF);

    assert!(validate_exact(&bytes).is_err());
    assert!(validate(&bytes).is_ok());
}

#[test]
fn rejects_an_out_of_order_key_pair() {
    // Two short keys lower with a Tier::One header: discriminant (1),
    // extent (1), count (1), then a 2-entry offset vector (1 byte each).
    // Canonical order is ["a", "bb"] (shorter first); swapping the two
    // offset-vector entries hands the validator "bb" then "a", which
    // violates strict ascending key order without touching any key bytes.
    let mut tree = Node::empty_object();
    tree.insert("a", 1i32);
    tree.insert("bb", 2i32);
    let mut bytes = lowered_bytes(&tree);

    let offset_vector_start = 1 + 1 + 1;
    bytes.swap(offset_vector_start, offset_vector_start + 1);
    assert!(validate(&bytes).is_err());
}

#[test]
fn rejects_an_offset_past_the_end_of_the_buffer() {
    let mut tree = Node::empty_object();
    tree.insert("a", 1i32);
    let bytes = lowered_bytes(&tree);

    // Discriminant byte, then object header: extent (Tier::One -> 1 byte),
    // count (1 byte), then the offset vector. Corrupt the first
    // offset-vector entry to point past the buffer.
    let offset_vector_start = 1 + 1 + 1;
    let mut corrupted = bytes.clone();
    corrupted[offset_vector_start] = 0xFF;
    assert!(validate(&corrupted).is_err());
}

#[test]
fn rejects_a_bad_discriminant_byte() {
    let mut tree = Node::empty_object();
    tree.insert("a", 1i32);
    let mut bytes = lowered_bytes(&tree);
    bytes[0] = 0xFF;
    assert!(validate(&bytes).is_err());
}

#[test]
fn rejects_an_empty_slice() {
    assert!(validate(&[]).is_err());
    assert!(validate_exact(&[]).is_err());
}
