#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;

pub mod buffer;
pub mod decimal;
pub mod display;
pub mod error;
pub mod heap;
pub mod kind;
pub mod order;
pub mod packet;
pub mod width;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "yaml")]
pub mod yaml;

pub use buffer::{Buffer, Cursor};
pub use decimal::Decimal;
pub use error::{Error, Result, StructuralError, ValidationError};
pub use heap::{Arc, Node, Rc, RefCounted, Value};
pub use kind::Kind;
pub use packet::Packet;

/// A single-threaded packet: the common case, using `Rc` internally.
pub type LocalPacket = Packet<Rc>;

/// A thread-shareable packet, using `Arc` internally.
pub type SharedPacket = Packet<Arc>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowers_and_reads_back_a_small_object() {
        let mut tree = Node::empty_object();
        tree.insert("name", "ark");
        tree.insert("count", 3i32);
        tree.insert("ok", true);

        let buffer: Buffer<Rc> = Buffer::from_heap(&tree).unwrap();
        let cursor = buffer.cursor();

        assert_eq!(cursor.get("name").unwrap().unwrap().as_str().unwrap(), "ark");
        assert_eq!(cursor.get("count").unwrap().unwrap().as_integer().unwrap(), 3);
        assert_eq!(cursor.get("ok").unwrap().unwrap().as_boolean().unwrap(), true);
        assert!(cursor.get("missing").unwrap().is_none());
    }

    #[test]
    fn lowering_is_canonical_regardless_of_insertion_order() {
        let mut a = Node::empty_object();
        a.insert("zzz", 1i32);
        a.insert("a", 2i32);

        let mut b = Node::empty_object();
        b.insert("a", 2i32);
        b.insert("zzz", 1i32);

        let ba: Buffer<Rc> = Buffer::from_heap(&a).unwrap();
        let bb: Buffer<Rc> = Buffer::from_heap(&b).unwrap();
        assert_eq!(ba.as_bytes(), bb.as_bytes());
    }

    #[test]
    fn rejects_duplicate_keys_at_lowering() {
        let mut tree = Node::empty_object();
        tree.insert("dup", 1i32);
        tree.insert("dup", 2i32);
        // `insert` on a fresh key name overwrites in the heap tree, so
        // build the duplicate directly through the underlying Vec to
        // exercise the lowering engine's own duplicate-key check.
        let Node::Object(pairs) = &mut tree else { unreachable!() };
        pairs.push((alloc::boxed::Box::from("dup"), Node::Integer(3)));

        let result: Result<Buffer<Rc>> = Buffer::from_heap(&tree);
        assert!(result.is_err());
    }

    #[test]
    fn lowering_a_naked_scalar_is_a_state_error() {
        let result: Result<Buffer<Rc>> = Buffer::from_heap(&Node::Integer(5));
        assert_eq!(result.unwrap_err(), Error::State(
            "cannot lower a naked scalar; wrap it in an object or array",
        ));
    }

    #[test]
    fn validator_rejects_truncated_buffers() {
        let mut tree = Node::empty_object();
        tree.insert("a", "hello world");
        let buffer: Buffer<Rc> = Buffer::from_heap(&tree).unwrap();
        let bytes = buffer.as_bytes();
        let truncated = &bytes[..bytes.len() - 1];
        assert!(buffer::validate_exact(truncated).is_err());
    }

    #[test]
    fn packet_forwards_to_whichever_backend_is_live() {
        let mut tree = Node::empty_object();
        tree.insert("x", 42i32);
        let heap_packet: LocalPacket = Packet::from_heap(tree);
        assert_eq!(heap_packet.get("x").unwrap().unwrap().as_integer().unwrap(), 42);

        let buffer_packet: LocalPacket = Packet::from_bytes(
            heap_packet.to_buffer().unwrap().as_bytes().to_vec(),
        )
        .unwrap();
        assert!(heap_packet.equals(&buffer_packet).unwrap());
    }
}
