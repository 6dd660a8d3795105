//! The decimal scalar: either IEEE 754 binary32 or binary64 (§4.1).
//!
//! Unlike strings and integers, the format gives no "narrowest that
//! round-trips" rule for decimals — the width is a first-class choice the
//! caller makes (by inserting an `f32` vs an `f64`), not something the
//! lowering engine infers. `Decimal` carries that choice through both the
//! heap tree and the cursor's decoded value.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decimal {
    Single(f32),
    Double(f64),
}

impl Decimal {
    pub fn as_f64(self) -> f64 {
        match self {
            Decimal::Single(v) => f64::from(v),
            Decimal::Double(v) => v,
        }
    }

    pub const fn is_double(self) -> bool {
        matches!(self, Decimal::Double(_))
    }
}

impl From<f32> for Decimal {
    fn from(v: f32) -> Self {
        Decimal::Single(v)
    }
}

impl From<f64> for Decimal {
    fn from(v: f64) -> Self {
        Decimal::Double(v)
    }
}

impl PartialEq<f64> for Decimal {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == *other
    }
}
