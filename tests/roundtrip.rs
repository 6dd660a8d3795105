//! End-to-end round-trip scenarios for lowering (§4.3) and reading back
//! through the cursor (§4.5): the concrete cases behind §8's quantified
//! invariants, as hand-written `#[test]`s alongside the property tests in
//! `tests/proptest_invariants.rs`.

use polypack::{Buffer, Node, Rc};

fn lower(node: &Node) -> Buffer<Rc> {
    Buffer::from_heap(node).expect("tree should lower")
}

#[test]
fn empty_object_round_trips() {
    let tree = Node::empty_object();
    let buffer = lower(&tree);
    let cursor = buffer.cursor();
    assert_eq!(cursor.len().unwrap(), Some(0));
    assert!(cursor.is_empty().unwrap());
}

#[test]
fn empty_array_round_trips() {
    let tree = Node::empty_array();
    let buffer = lower(&tree);
    let cursor = buffer.cursor();
    assert_eq!(cursor.len().unwrap(), Some(0));
}

#[test]
fn small_mixed_object_round_trips() {
    let mut tree = Node::empty_object();
    tree.insert("name", "ark");
    tree.insert("height", 42i32);
    tree.insert("ratio", 1.5f64);
    tree.insert("active", true);
    tree.insert("nothing", ());

    let buffer = lower(&tree);
    let cursor = buffer.cursor();

    assert_eq!(cursor.get("name").unwrap().unwrap().as_str().unwrap(), "ark");
    assert_eq!(cursor.get("height").unwrap().unwrap().as_integer().unwrap(), 42);
    assert_eq!(cursor.get("ratio").unwrap().unwrap().as_decimal().unwrap().as_f64(), 1.5);
    assert!(cursor.get("active").unwrap().unwrap().as_boolean().unwrap());
    assert!(cursor.get("nothing").unwrap().unwrap().is_null().unwrap());
}

#[test]
fn object_keys_are_emitted_in_canonical_order_regardless_of_insertion_order() {
    let mut forward = Node::empty_object();
    forward.insert("bb", 1i32);
    forward.insert("a", 2i32);
    forward.insert("ccc", 3i32);

    let mut backward = Node::empty_object();
    backward.insert("ccc", 3i32);
    backward.insert("a", 2i32);
    backward.insert("bb", 1i32);

    assert_eq!(lower(&forward).as_bytes(), lower(&backward).as_bytes());

    let buffer = lower(&forward);
    let keys: Vec<&str> = buffer
        .cursor()
        .entries()
        .unwrap()
        .map(|pair| pair.unwrap().0)
        .collect();
    // Total key order: shorter keys first, ties broken lexicographically.
    assert_eq!(keys, vec!["a", "bb", "ccc"]);
}

#[test]
fn nested_array_of_objects_round_trips() {
    let mut tree = Node::empty_array();
    for i in 0..5 {
        let mut item = Node::empty_object();
        item.insert("index", i as i32);
        item.insert("label", format!("item-{i}"));
        tree.push(item);
    }

    let buffer = lower(&tree);
    let cursor = buffer.cursor();
    assert_eq!(cursor.len().unwrap(), Some(5));

    for i in 0..5 {
        let entry = cursor.get_index(i).unwrap();
        assert_eq!(entry.get("index").unwrap().unwrap().as_integer().unwrap(), i as i64);
        assert_eq!(
            entry.get("label").unwrap().unwrap().as_str().unwrap(),
            format!("item-{i}")
        );
    }
}

#[test]
fn long_strings_and_keys_promote_to_a_wider_width_tier() {
    let long_key = "k".repeat(300);
    let long_value = "v".repeat(70_000);

    let mut tree = Node::empty_object();
    tree.insert(long_key.as_str(), long_value.as_str());
    tree.insert("short", 1i32);

    let buffer = lower(&tree);
    let cursor = buffer.cursor();
    assert_eq!(cursor.get(&long_key).unwrap().unwrap().as_str().unwrap(), long_value);
    assert_eq!(cursor.get("short").unwrap().unwrap().as_integer().unwrap(), 1);
}

#[test]
fn integers_across_width_boundaries_round_trip_exactly() {
    let values: [i64; 6] = [0, 127, 128, i32::MAX as i64, i32::MAX as i64 + 1, i64::MIN];
    let mut tree = Node::empty_array();
    for v in values {
        tree.push(v);
    }

    let buffer = lower(&tree);
    let cursor = buffer.cursor();
    for (i, expected) in values.iter().enumerate() {
        assert_eq!(cursor.get_index(i).unwrap().as_integer().unwrap(), *expected);
    }
}

#[test]
fn deeply_nested_objects_round_trip_up_to_the_recursion_budget() {
    let mut tree = Node::Null;
    for depth in 0..64 {
        let mut wrapper = Node::empty_object();
        wrapper.insert("depth", depth as i32);
        wrapper.insert("child", tree);
        tree = wrapper;
    }

    let buffer = lower(&tree);
    let mut cursor = buffer.cursor();
    for depth in (0..64).rev() {
        assert_eq!(cursor.get("depth").unwrap().unwrap().as_integer().unwrap(), depth);
        cursor = cursor.get("child").unwrap().unwrap();
    }
    assert!(cursor.is_null().unwrap());
}

#[test]
fn packet_equals_compares_structurally_across_backends() {
    use polypack::LocalPacket as Packet;

    let mut a = Node::empty_object();
    a.insert("x", 1i32);
    a.insert("y", 2i32);

    let mut b = Node::empty_object();
    b.insert("y", 2i32);
    b.insert("x", 1i32);

    let packet_a = Packet::from_heap(a);
    let packet_b = Packet::from_bytes(Packet::from_heap(b).to_buffer().unwrap().as_bytes().to_vec())
        .unwrap();

    assert!(packet_a.equals(&packet_b).unwrap());
}
