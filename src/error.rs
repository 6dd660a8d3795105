//! Crate-wide error type.
//!
//! Mirrors the error taxonomy a caller actually needs to branch on: a
//! mismatched accessor, a missing key/index, a tree that refuses to lower,
//! a foreign buffer that fails validation, a parse failure from a text
//! collaborator, or a representation that can't support the requested
//! operation. Every variant is plain data so the type stays `no_std`-
//! friendly; `Display` is hand-written for the same reason.

use core::fmt;

use alloc::string::String;

use crate::kind::Kind;

/// Why a heap tree refused to lower into a packed buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// Two keys in the same object compared equal under the total key order.
    DuplicateKey,
    /// An object key's UTF-8 length exceeded the 64 KiB limit.
    KeyTooLong(usize),
    /// A string payload's length exceeded the 4 GiB limit.
    StringTooLong(usize),
    /// An aggregate's computed extent exceeded the 4 GiB limit.
    AggregateTooLarge(usize),
    /// The tree nests deeper than the lowering engine's recursion budget.
    TreeTooDeep(usize),
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey => write!(f, "duplicate key in object"),
            Self::KeyTooLong(n) => write!(f, "object key of {n} bytes exceeds 64 KiB limit"),
            Self::StringTooLong(n) => write!(f, "string of {n} bytes exceeds 4 GiB limit"),
            Self::AggregateTooLarge(n) => {
                write!(f, "aggregate extent of {n} bytes exceeds 4 GiB limit")
            }
            Self::TreeTooDeep(d) => write!(f, "tree nests {d} levels deep, exceeding the limit"),
        }
    }
}

/// Why an untrusted byte slice failed §4.4 validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Fewer bytes remained than the node's header or payload requires.
    Truncated,
    /// A node's claimed length is not representable in its discriminant's width tier.
    BadDiscriminant,
    /// A child offset does not land on a properly aligned position.
    Misaligned,
    /// A child offset is `>= total_extent`, or equal to/past the end of the slice.
    OffsetOutOfBounds,
    /// `child_count * offset_width` does not fit inside the claimed extent.
    CountOverflow,
    /// An object's keys are not in strict ascending total order.
    KeyOrderViolation,
    /// Recursion exceeded the validator's maximum depth (DoS defense).
    DepthExceeded,
    /// The root's extent did not equal the full length of the supplied slice.
    TrailingBytes(usize),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "buffer ends before a node's header or payload"),
            Self::BadDiscriminant => write!(f, "discriminant byte encodes an unknown layout"),
            Self::Misaligned => write!(f, "child offset violates the alignment invariant"),
            Self::OffsetOutOfBounds => write!(f, "child offset lands outside the node's extent"),
            Self::CountOverflow => write!(f, "offset vector does not fit inside the claimed extent"),
            Self::KeyOrderViolation => write!(f, "object keys are not in strict ascending order"),
            Self::DepthExceeded => write!(f, "buffer nests deeper than the validator's recursion limit"),
            Self::TrailingBytes(n) => write!(f, "{n} trailing bytes after the root node's extent"),
        }
    }
}

/// Top-level crate error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An accessor was called for a kind the node is not.
    KindMismatch { expected: Kind, found: Kind },
    /// Array index `>= size`, or object key absent.
    OutOfRange,
    /// A rule that makes a tree un-lowerable was violated during construction.
    Structural(StructuralError),
    /// An untrusted buffer failed validation.
    Validation(ValidationError),
    /// Incoming text (JSON/YAML) was syntactically invalid. Only ever
    /// constructed by a text collaborator (§10.3); the core never raises it.
    Parse(String),
    /// Operation incompatible with the value's current representation.
    State(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch { expected, found } => {
                write!(f, "expected a {expected} node, found a {found} node")
            }
            Self::OutOfRange => write!(f, "index or key out of range"),
            Self::Structural(e) => write!(f, "{e}"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::State(msg) => write!(f, "invalid operation for this representation: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<StructuralError> for Error {
    fn from(e: StructuralError) -> Self {
        Self::Structural(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
