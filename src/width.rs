//! Width-tier selection (§3 "Encoding choices", §4.2.3) and alignment math.
//!
//! Three tiers recur throughout the packed format: aggregate header fields
//! (`{1,2,4}` bytes, used for an object/array's extent, count and offset
//! vector), string length fields (the same `{1,2,4}` tiers), and integer
//! payloads (`{1,2,4,8}` bytes, signed). `Tier` models the former two;
//! integers pick their width directly since they never need a fourth,
//! 8-byte tier for anything but the payload itself.

use byteorder::{ByteOrder, LittleEndian};

/// A `{1,2,4}`-byte width tier for aggregate headers and string lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    One,
    Two,
    Four,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::One, Tier::Two, Tier::Four];

    pub const fn bytes(self) -> usize {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Four => 4,
        }
    }

    /// The 2-bit sub-encoding stored in the discriminant's low bits.
    pub const fn code(self) -> u8 {
        match self {
            Tier::One => 0,
            Tier::Two => 1,
            Tier::Four => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Tier> {
        match code {
            0 => Some(Tier::One),
            1 => Some(Tier::Two),
            2 => Some(Tier::Four),
            _ => None,
        }
    }

    /// The smallest tier whose range covers `value`.
    pub fn smallest_fitting(value: u64) -> Option<Tier> {
        if value <= u64::from(u8::MAX) {
            Some(Tier::One)
        } else if value <= u64::from(u16::MAX) {
            Some(Tier::Two)
        } else if value <= u64::from(u32::MAX) {
            Some(Tier::Four)
        } else {
            None
        }
    }

    pub fn fits(self, value: u64) -> bool {
        match self {
            Tier::One => value <= u64::from(u8::MAX),
            Tier::Two => value <= u64::from(u16::MAX),
            Tier::Four => value <= u64::from(u32::MAX),
        }
    }

    pub fn read(self, bytes: &[u8]) -> u64 {
        match self {
            Tier::One => u64::from(bytes[0]),
            Tier::Two => u64::from(LittleEndian::read_u16(bytes)),
            Tier::Four => u64::from(LittleEndian::read_u32(bytes)),
        }
    }

    pub fn write(self, value: u64, dst: &mut [u8]) {
        match self {
            Tier::One => dst[0] = value as u8,
            Tier::Two => LittleEndian::write_u16(dst, value as u16),
            Tier::Four => LittleEndian::write_u32(dst, value as u32),
        }
    }
}

/// Signed integer storage width: `{1,2,4,8}` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntWidth {
    One,
    Two,
    Four,
    Eight,
}

impl IntWidth {
    pub const fn bytes(self) -> usize {
        match self {
            IntWidth::One => 1,
            IntWidth::Two => 2,
            IntWidth::Four => 4,
            IntWidth::Eight => 8,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            IntWidth::One => 0,
            IntWidth::Two => 1,
            IntWidth::Four => 2,
            IntWidth::Eight => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<IntWidth> {
        match code {
            0 => Some(IntWidth::One),
            1 => Some(IntWidth::Two),
            2 => Some(IntWidth::Four),
            3 => Some(IntWidth::Eight),
            _ => None,
        }
    }

    /// The narrowest width that round-trips `value`.
    pub fn narrowest(value: i64) -> IntWidth {
        if value >= i64::from(i8::MIN) && value <= i64::from(i8::MAX) {
            IntWidth::One
        } else if value >= i64::from(i16::MIN) && value <= i64::from(i16::MAX) {
            IntWidth::Two
        } else if value >= i64::from(i32::MIN) && value <= i64::from(i32::MAX) {
            IntWidth::Four
        } else {
            IntWidth::Eight
        }
    }

    pub fn read_sign_extend(self, bytes: &[u8]) -> i64 {
        match self {
            IntWidth::One => i64::from(bytes[0] as i8),
            IntWidth::Two => i64::from(LittleEndian::read_i16(bytes)),
            IntWidth::Four => i64::from(LittleEndian::read_i32(bytes)),
            IntWidth::Eight => LittleEndian::read_i64(bytes),
        }
    }

    pub fn write(self, value: i64, dst: &mut [u8]) {
        match self {
            IntWidth::One => dst[0] = value as i8 as u8,
            IntWidth::Two => LittleEndian::write_i16(dst, value as i16),
            IntWidth::Four => LittleEndian::write_i32(dst, value as i32),
            IntWidth::Eight => LittleEndian::write_i64(dst, value),
        }
    }
}

/// Bytes of zero padding needed to advance `offset` to a multiple of `align`.
pub const fn pad_for(offset: usize, align: usize) -> usize {
    let rem = offset % align;
    if rem == 0 {
        0
    } else {
        align - rem
    }
}

/// `offset` rounded up to the next multiple of `align`.
pub const fn align_up(offset: usize, align: usize) -> usize {
    offset + pad_for(offset, align)
}
