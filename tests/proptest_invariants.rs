//! Property tests for the quantified invariants in §8: round-trip,
//! canonicality, bounded (panic-free) validation over arbitrary bytes, key
//! order, and kind exclusivity on the cursor's accessors.

use proptest::prelude::*;

use polypack::buffer::validate;
use polypack::{Buffer, Kind, Node, Rc};

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn arb_leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::Null),
        any::<bool>().prop_map(Node::Boolean),
        any::<i32>().prop_map(|v| Node::from(v as i64)),
        (-1e6f64..1e6f64).prop_map(Node::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(|s| Node::from(s)),
    ]
}

fn arb_node() -> impl Strategy<Value = Node> {
    arb_leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(|items| {
                let mut node = Node::empty_array();
                for item in items {
                    node.push(item);
                }
                node
            }),
            prop::collection::vec((arb_key(), inner), 0..6).prop_map(|pairs| {
                let mut node = Node::empty_object();
                for (key, value) in pairs {
                    node.insert(key, value);
                }
                node
            }),
        ]
    })
}

proptest! {
    /// A tree that lowers successfully always validates, and its buffer's
    /// own structural shape (kind, child count) survives lowering exactly.
    #[test]
    fn lowering_then_validating_never_rejects_a_legitimate_tree(tree in arb_node()) {
        let buffer: Buffer<Rc> = match Buffer::from_heap(&tree) {
            Ok(buffer) => buffer,
            // A tree can legitimately fail to lower (e.g. a proptest-built
            // object landing on a duplicate key by chance); only assert
            // the invariant for trees that did lower.
            Err(_) => return Ok(()),
        };
        prop_assert!(polypack::buffer::validate_exact(buffer.as_bytes()).is_ok());

        let cursor = buffer.cursor();
        prop_assert_eq!(cursor.kind().unwrap(), tree.kind());
        if let Some(expected_len) = tree.len() {
            prop_assert_eq!(cursor.len().unwrap(), Some(expected_len));
        }
    }

    /// Lowering is canonical: shuffling an object's insertion order must
    /// not change the bytes it lowers to.
    #[test]
    fn lowering_is_insertion_order_independent(pairs in prop::collection::vec((arb_key(), arb_leaf()), 0..8)) {
        let mut deduped = Vec::new();
        for (key, value) in pairs {
            if !deduped.iter().any(|(k, _): &(String, Node)| *k == key) {
                deduped.push((key, value));
            }
        }

        let mut forward = Node::empty_object();
        for (key, value) in &deduped {
            forward.insert(key.clone(), value.clone());
        }

        let mut reversed = Node::empty_object();
        for (key, value) in deduped.iter().rev() {
            reversed.insert(key.clone(), value.clone());
        }

        let forward_bytes = Buffer::<Rc>::from_heap(&forward).unwrap();
        let reversed_bytes = Buffer::<Rc>::from_heap(&reversed).unwrap();
        prop_assert_eq!(forward_bytes.as_bytes(), reversed_bytes.as_bytes());
    }

    /// An object's keys are always emitted in strict total key order
    /// (shorter first, then lexicographic).
    #[test]
    fn object_entries_are_always_in_canonical_order(pairs in prop::collection::vec((arb_key(), arb_leaf()), 0..8)) {
        let mut tree = Node::empty_object();
        for (key, value) in pairs {
            tree.insert(key, value);
        }
        let buffer: Buffer<Rc> = Buffer::from_heap(&tree).unwrap();
        let keys: Vec<String> = buffer
            .cursor()
            .entries()
            .unwrap()
            .map(|pair| pair.unwrap().0.to_string())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        prop_assert_eq!(keys, sorted);
    }

    /// The validator never panics on arbitrary bytes, and only ever
    /// reports success or a structured error.
    #[test]
    fn validator_is_panic_free_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = validate(&bytes);
    }

    /// A cursor's typed accessor only ever succeeds for its own kind; a
    /// mismatched accessor always reports `KindMismatch`, never wrong data.
    #[test]
    fn cursor_accessors_are_kind_exclusive(tree in arb_leaf()) {
        let buffer: Buffer<Rc> = Buffer::from_heap(&tree).unwrap();
        let cursor = buffer.cursor();
        let kind = cursor.kind().unwrap();

        prop_assert_eq!(cursor.as_str().is_ok(), kind == Kind::String);
        prop_assert_eq!(cursor.as_integer().is_ok(), kind == Kind::Integer);
        prop_assert_eq!(cursor.as_decimal().is_ok(), kind == Kind::Decimal);
        prop_assert_eq!(cursor.as_boolean().is_ok(), kind == Kind::Boolean);
        prop_assert_eq!(cursor.is_null().unwrap(), kind == Kind::Null);
    }
}
