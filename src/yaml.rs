//! YAML collaborator (§10.3, feature `yaml`). Same shape as [`crate::json`];
//! `serde_yaml`'s own value model maps onto ours the same way serde_json's
//! does, with YAML's tagged/anchor features left to `serde_yaml` itself —
//! we only ever see the fully resolved `serde_yaml::Value` tree.

extern crate alloc;

use alloc::string::{String, ToString};

use serde_yaml::Value as Yaml;

use crate::decimal::Decimal;
use crate::error::Error;
use crate::heap::Node;

pub fn from_str(text: &str) -> Result<Node, Error> {
    let value: Yaml = serde_yaml::from_str(text).map_err(|e| Error::Parse(e.to_string()))?;
    from_yaml(value)
}

fn from_yaml(value: Yaml) -> Result<Node, Error> {
    Ok(match value {
        Yaml::Null => Node::Null,
        Yaml::Bool(b) => Node::Boolean(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Integer(i)
            } else {
                Node::Decimal(Decimal::Double(n.as_f64().unwrap_or(0.0)))
            }
        }
        Yaml::String(s) => Node::String(s.into_boxed_str()),
        Yaml::Sequence(items) => {
            let mut node = Node::empty_array();
            for item in items {
                node.push(from_yaml(item)?);
            }
            node
        }
        Yaml::Mapping(map) => {
            let mut node = Node::empty_object();
            for (key, value) in map {
                let key = key
                    .as_str()
                    .ok_or_else(|| Error::Parse("YAML mapping keys must be strings".into()))?;
                node.insert(key, from_yaml(value)?);
            }
            node
        }
        Yaml::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

pub fn to_string(node: &Node) -> Result<String, Error> {
    let value = to_yaml(node);
    serde_yaml::to_string(&value).map_err(|e| Error::Parse(e.to_string()))
}

fn to_yaml(node: &Node) -> Yaml {
    match node {
        Node::Null => Yaml::Null,
        Node::Boolean(b) => Yaml::Bool(*b),
        Node::Integer(v) => Yaml::Number((*v).into()),
        Node::Decimal(d) => Yaml::Number(d.as_f64().into()),
        Node::String(s) => Yaml::String(s.to_string()),
        Node::Array(items) => Yaml::Sequence(items.iter().map(to_yaml).collect()),
        Node::Object(pairs) => {
            let mut map = serde_yaml::Mapping::new();
            for (key, value) in pairs {
                map.insert(Yaml::String(key.to_string()), to_yaml(value));
            }
            Yaml::Mapping(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_mapping() {
        let node = from_str("a: 1\nb:\n  - true\n  - null\n").unwrap();
        assert_eq!(node.get("a").unwrap(), &Node::Integer(1));
        let text = to_string(&node).unwrap();
        assert!(from_str(&text).is_ok());
    }

    #[test]
    fn rejects_non_string_mapping_keys() {
        assert!(from_str("1: a\n").is_err());
    }
}
