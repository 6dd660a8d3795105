//! A small "pointer family" abstraction so [`crate::buffer::Buffer`] and
//! [`crate::packet::Packet`] can be generic over the reference-counting
//! strategy (§5: "the system exposes both variants so callers pay for
//! atomics only when needed"), the same way the original's `basic_heap`/
//! `basic_buffer`/`basic_packet` are templated on a `RefCount` parameter.
//!
//! Two zero-sized marker types, [`Rc`] (non-atomic, single-threaded) and
//! [`Arc`] (atomic, thread-shareable), each implement [`RefCounted`] by
//! delegating to the standard library smart pointer of the same name.

use core::ops::Deref;

extern crate alloc;

/// A reference-counting strategy: a way to wrap a `T` for cheap cloning.
/// Heap tree mutation (`Node::insert`/`push`/`remove`) always goes through
/// an owned `&mut Node` rather than through this pointer, so the family
/// only needs to construct and clone, not provide clone-on-write access.
pub trait RefCounted: Clone {
    type Ptr<T: Clone>: Deref<Target = T> + Clone;

    fn new<T: Clone>(value: T) -> Self::Ptr<T>;
}

/// Non-atomic reference counting (`std::rc::Rc`). Single-threaded only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rc;

impl RefCounted for Rc {
    type Ptr<T: Clone> = alloc::rc::Rc<T>;

    fn new<T: Clone>(value: T) -> Self::Ptr<T> {
        alloc::rc::Rc::new(value)
    }
}

/// Atomic reference counting (`std::sync::Arc`). Safe to share across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arc;

impl RefCounted for Arc {
    type Ptr<T: Clone> = alloc::sync::Arc<T>;

    fn new<T: Clone>(value: T) -> Self::Ptr<T> {
        alloc::sync::Arc::new(value)
    }
}
