//! Textual pretty-printing (§10.6): `Display` for the heap tree and the
//! buffer cursor, in JSON-like notation. Not a JSON encoder — NaN and
//! infinities print as written (`nan`, `inf`) rather than being coerced,
//! matching the core's own no-canonicalization-of-floats non-goal.

use core::fmt;
use core::fmt::Write as _;

use crate::buffer::Cursor;
use crate::decimal::Decimal;
use crate::heap::Node;

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Object(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
            Node::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Node::String(s) => write_quoted(f, s),
            Node::Integer(v) => write!(f, "{v}"),
            Node::Decimal(d) => write_decimal(f, *d),
            Node::Boolean(b) => write!(f, "{b}"),
            Node::Null => f.write_str("null"),
        }
    }
}

impl fmt::Display for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::kind::Kind;
        match self.kind().map_err(|_| fmt::Error)? {
            Kind::Object => {
                f.write_str("{")?;
                for (i, entry) in self.entries().map_err(|_| fmt::Error)?.enumerate() {
                    let (key, value) = entry.map_err(|_| fmt::Error)?;
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
            Kind::Array => {
                f.write_str("[")?;
                for (i, value) in self.values().map_err(|_| fmt::Error)?.enumerate() {
                    let value = value.map_err(|_| fmt::Error)?;
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Kind::String => write_quoted(f, self.as_str().map_err(|_| fmt::Error)?),
            Kind::Integer => write!(f, "{}", self.as_integer().map_err(|_| fmt::Error)?),
            Kind::Decimal => write_decimal(f, self.as_decimal().map_err(|_| fmt::Error)?),
            Kind::Boolean => write!(f, "{}", self.as_boolean().map_err(|_| fmt::Error)?),
            Kind::Null => f.write_str("null"),
        }
    }
}

fn write_decimal(f: &mut fmt::Formatter<'_>, d: Decimal) -> fmt::Result {
    match d {
        Decimal::Single(v) => write!(f, "{v}"),
        Decimal::Double(v) => write!(f, "{v}"),
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            _ => f.write_char(c)?,
        }
    }
    f.write_str("\"")
}
