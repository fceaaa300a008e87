//! Data models for parsed network graphs.
//!
//! A [`Graph`] is what one GDF file turns into: an ordered list of nodes and
//! edges, each carrying a flat attribute mapping. The serialized form is the
//! element shape graph-visualization frontends consume directly:
//!
//! ```json
//! {
//!   "nodes": [{ "data": { "id": "1", "label": "ACT1", "type": "ref" } }],
//!   "edges": [{ "data": { "id": "1-2", "source": "1", "target": "2" } }]
//! }
//! ```
//!
//! The same shape is accepted on input, so graphs round-trip through the
//! layout and component endpoints unchanged.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A typed attribute value.
///
/// GDF rows are untyped text; values are coerced on parse (digits → integer,
/// digits with a dot → float, anything else → string).
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Integer(i64),
    Float(f64),
    String(String),
}

impl AttrValue {
    /// Numeric view of the value. Strings are parsed leniently.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Integer(i) => Some(*i as f64),
            AttrValue::Float(f) => Some(*f),
            AttrValue::String(s) => s.trim().parse().ok(),
        }
    }

    /// Borrow the value if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON value received from a client.
    ///
    /// Returns `None` for `null`. Booleans and nested structures are kept as
    /// their JSON text so unknown keys still pass through.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(AttrValue::Integer(i)),
                None => n.as_f64().map(AttrValue::Float),
            },
            Value::String(s) => Some(AttrValue::String(s)),
            Value::Bool(b) => Some(AttrValue::String(b.to_string())),
            other => Some(AttrValue::String(other.to_string())),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Integer(i) => write!(f, "{}", i),
            // Whole floats keep their decimal point: "1.0", not "1"
            AttrValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{:.1}", v)
            }
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Integer(i)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        AttrValue::Float(f)
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::Integer(i) => serializer.serialize_i64(*i),
            AttrValue::Float(f) => serializer.serialize_f64(*f),
            AttrValue::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Insertion-ordered attribute mapping.
///
/// Kept as a vector of pairs: node payloads are small (a handful of keys) and
/// column order from the `nodedef>` header is preserved on output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a value. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// The first declared attribute, if any.
    pub fn first(&self) -> Option<(&str, &AttrValue)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// String form of a value, if present.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

impl FromIterator<(String, AttrValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Attributes, A::Error> {
                let mut attrs = Attributes::new();
                while let Some((key, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    if let Some(value) = AttrValue::from_json(value) {
                        attrs.insert(key, value);
                    }
                }
                Ok(attrs)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

/// Wire shape of a graph element: `{ "data": { ... } }`.
#[derive(Deserialize)]
struct Element {
    #[serde(default)]
    data: Attributes,
}

/// A graph node.
///
/// `id` is held outside the attribute map; it is re-inserted as the first key
/// when serialized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub id: String,
    pub attributes: Attributes,
}

impl Node {
    pub fn new(id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// The node's `type` attribute, or `"unknown"`.
    pub fn node_type(&self) -> String {
        self.attributes
            .get_string("type")
            .unwrap_or_else(|| "unknown".to_string())
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut attributes = Element::deserialize(deserializer)?.data;
        let id = attributes
            .remove("id")
            .map(|v| v.to_string())
            .unwrap_or_default();
        Ok(Node { id, attributes })
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("data", &NodeData(self))?;
        map.end()
    }
}

struct NodeData<'a>(&'a Node);

impl Serialize for NodeData<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.0;
        let mut map = serializer.serialize_map(Some(node.attributes.len() + 1))?;
        map.serialize_entry("id", &node.id)?;
        for (k, v) in node.attributes.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A graph edge. Undirected for analysis purposes; `source`/`target` keep the
/// order the file declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub attributes: Attributes,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, attributes: Attributes) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}-{}", source, target),
            source,
            target,
            attributes,
        }
    }

    /// Edge weight for layout purposes. Missing or non-numeric weights are 1.0.
    pub fn weight(&self) -> f64 {
        self.attributes
            .get("weight")
            .and_then(AttrValue::as_f64)
            .filter(|w| w.is_finite())
            .unwrap_or(1.0)
    }
}

impl<'de> Deserialize<'de> for Edge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut attributes = Element::deserialize(deserializer)?.data;
        let source = attributes
            .remove("source")
            .map(|v| v.to_string())
            .unwrap_or_default();
        let target = attributes
            .remove("target")
            .map(|v| v.to_string())
            .unwrap_or_default();
        let id = attributes
            .remove("id")
            .map(|v| v.to_string())
            .unwrap_or_else(|| format!("{}-{}", source, target));
        Ok(Edge {
            id,
            source,
            target,
            attributes,
        })
    }
}

impl Serialize for Edge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("data", &EdgeData(self))?;
        map.end()
    }
}

struct EdgeData<'a>(&'a Edge);

impl Serialize for EdgeData<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let edge = self.0;
        let mut map = serializer.serialize_map(Some(edge.attributes.len() + 3))?;
        map.serialize_entry("id", &edge.id)?;
        map.serialize_entry("source", &edge.source)?;
        map.serialize_entry("target", &edge.target)?;
        for (k, v) in edge.attributes.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// An ordered node/edge graph parsed from one GDF file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_node(&self, node_id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == node_id)
    }

    /// Node ids in declaration order (duplicates included).
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Edge endpoints as `(source, target)` pairs.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_display_keeps_decimal() {
        assert_eq!(AttrValue::Float(1.0).to_string(), "1.0");
        assert_eq!(AttrValue::Float(0.25).to_string(), "0.25");
        assert_eq!(AttrValue::Integer(-3).to_string(), "-3");
    }

    #[test]
    fn test_attributes_preserve_order_on_replace() {
        let mut attrs = Attributes::new();
        attrs.insert("name", 1i64);
        attrs.insert("label", "ACT1");
        attrs.insert("name", 2i64);

        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "label"]);
        assert_eq!(attrs.get("name"), Some(&AttrValue::Integer(2)));
    }

    #[test]
    fn test_node_serializes_as_element() {
        let mut attrs = Attributes::new();
        attrs.insert("label", "ACT1");
        attrs.insert("weight", 0.5);
        let node = Node::new("1", attrs);

        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"data":{"id":"1","label":"ACT1","weight":0.5}}"#);
    }

    #[test]
    fn test_edge_deserializes_from_element() {
        let edge: Edge =
            serde_json::from_str(r#"{"data":{"source":"a","target":"b","weight":2}}"#).unwrap();
        assert_eq!(edge.id, "a-b");
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
        assert_eq!(edge.weight(), 2.0);
    }

    #[test]
    fn test_graph_accepts_numeric_ids_and_nulls() {
        let graph: Graph = serde_json::from_str(
            r#"{"nodes":[{"data":{"id":7,"label":null,"selected":true}}],"edges":[]}"#,
        )
        .unwrap();
        assert_eq!(graph.nodes[0].id, "7");
        assert!(!graph.nodes[0].attributes.contains_key("label"));
        assert_eq!(
            graph.nodes[0].attributes.get("selected"),
            Some(&AttrValue::String("true".to_string()))
        );
    }

    #[test]
    fn test_edge_weight_defaults() {
        let mut attrs = Attributes::new();
        attrs.insert("weight", "heavy");
        assert_eq!(Edge::new("a", "b", attrs).weight(), 1.0);
        assert_eq!(Edge::new("a", "b", Attributes::new()).weight(), 1.0);
    }
}
