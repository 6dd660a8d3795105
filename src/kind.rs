//! The closed sum of value kinds (§3) and the discriminant byte layout
//! shared by every packed node (§4, §6).
//!
//! The discriminant is one byte: the top 3 bits select the [`Kind`], the
//! low 5 bits carry kind-specific sub-encoding (a width tier for
//! aggregates/strings, a stored-width selector for integers, a format bit
//! for decimals, a value bit for booleans). Keeping the split fixed here
//! means every other module can treat "decode the tag" and "decode the
//! sub-encoding" as two independent one-liners instead of duplicating bit
//! math at each call site.

use core::fmt;

use crate::error::{Error, ValidationError};

/// The kind of a value, independent of its physical encoding.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Object = 0,
    Array = 1,
    String = 2,
    Integer = 3,
    Decimal = 4,
    Boolean = 5,
    Null = 6,
}

impl Kind {
    /// `object` and `array`.
    pub const fn is_aggregate(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    /// `integer` and `decimal`.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }

    /// numeric and `string`.
    pub const fn is_scalar(self) -> bool {
        self.is_numeric() || matches!(self, Self::String)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Null => "null",
        };
        write!(f, "{s}")
    }
}

const TAG_SHIFT: u8 = 5;
const SUB_MASK: u8 = 0b0001_1111;

fn tag_to_kind(tag: u8) -> Result<Kind, Error> {
    match tag {
        0 => Ok(Kind::Object),
        1 => Ok(Kind::Array),
        2 => Ok(Kind::String),
        3 => Ok(Kind::Integer),
        4 => Ok(Kind::Decimal),
        5 => Ok(Kind::Boolean),
        6 => Ok(Kind::Null),
        _ => Err(ValidationError::BadDiscriminant.into()),
    }
}

/// A decoded discriminant byte: the kind plus its 5-bit sub-encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discriminant {
    pub kind: Kind,
    pub sub: u8,
}

impl Discriminant {
    pub const fn encode(kind: Kind, sub: u8) -> u8 {
        ((kind as u8) << TAG_SHIFT) | (sub & SUB_MASK)
    }

    pub fn decode(byte: u8) -> Result<Self, Error> {
        let tag = byte >> TAG_SHIFT;
        let sub = byte & SUB_MASK;
        Ok(Self {
            kind: tag_to_kind(tag)?,
            sub,
        })
    }
}
