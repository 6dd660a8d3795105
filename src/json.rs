//! JSON collaborator (§10.3, feature `json`): builds a heap tree from
//! `serde_json::Value` and serializes one back out.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use serde_json::Value as Json;

use crate::decimal::Decimal;
use crate::error::Error;
use crate::heap::Node;
use crate::order::key_order;

/// Parses a JSON text into a heap tree.
pub fn from_str(text: &str) -> Result<Node, Error> {
    let value: Json = serde_json::from_str(text).map_err(|e| Error::Parse(e.to_string()))?;
    Ok(from_json(value))
}

/// Converts an already-parsed `serde_json::Value` into a heap tree.
pub fn from_json(value: Json) -> Node {
    match value {
        Json::Null => Node::Null,
        Json::Bool(b) => Node::Boolean(b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Integer(i)
            } else {
                Node::Decimal(Decimal::Double(n.as_f64().unwrap_or(0.0)))
            }
        }
        Json::String(s) => Node::String(s.into_boxed_str()),
        Json::Array(items) => Node::Array(items.into_iter().map(from_json).collect()),
        Json::Object(map) => {
            // `serde_json::Map`'s own iteration order is not the packed
            // format's canonical key order, so sort once here and hand
            // the result to the pre-sorted-pairs fast path (§6) rather
            // than calling `insert` once per key, which would redo this
            // comparison from scratch on every call.
            let mut pairs: Vec<(Box<str>, Node)> = map
                .into_iter()
                .map(|(key, value)| (key.into_boxed_str(), from_json(value)))
                .collect();
            pairs.sort_by(|(a, _), (b, _)| key_order(a.as_bytes(), b.as_bytes()));
            Node::from_sorted_pairs(pairs)
        }
    }
}

/// Renders a heap tree as JSON text. Object key order in the output
/// follows the tree's own insertion order, not the packed format's
/// canonical sort order — JSON has no notion of canonical key order.
pub fn to_string(node: &Node) -> Result<alloc::string::String, Error> {
    let value = to_json(node);
    serde_json::to_string(&value).map_err(|e| Error::Parse(e.to_string()))
}

fn to_json(node: &Node) -> Json {
    match node {
        Node::Null => Json::Null,
        Node::Boolean(b) => Json::Bool(*b),
        Node::Integer(v) => Json::Number((*v).into()),
        Node::Decimal(d) => serde_json::Number::from_f64(d.as_f64())
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Node::String(s) => Json::String(s.to_string()),
        Node::Array(items) => Json::Array(items.iter().map(to_json).collect()),
        Node::Object(pairs) => {
            let mut map = serde_json::Map::with_capacity(pairs.len());
            for (key, value) in pairs {
                map.insert(key.to_string(), to_json(value));
            }
            Json::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_mixed_object() {
        let node = from_str(r#"{"a":1,"b":[true,null,"x"],"c":2.5}"#).unwrap();
        assert_eq!(node.get("a").unwrap(), &Node::Integer(1));
        assert_eq!(node.get("c").unwrap(), &Node::Decimal(Decimal::Double(2.5)));
        let text = to_string(&node).unwrap();
        let reparsed = from_str(&text).unwrap();
        assert_eq!(reparsed.get("a"), node.get("a"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(from_str("{not json").is_err());
    }
}
