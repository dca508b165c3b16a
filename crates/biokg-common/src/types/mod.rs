//! Common types used across BioKG
//!
//! Every adapter produces the same two tuple shapes. Writers (graph triples,
//! relational import scripts, logic facts) consume these and never look at
//! the source format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Checksum algorithm type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumAlgorithm::Sha256 => write!(f, "sha256"),
            ChecksumAlgorithm::Sha512 => write!(f, "sha512"),
        }
    }
}

// ============================================================================
// Graph Tuples
// ============================================================================

/// A property value attached to a node or edge.
///
/// Serialized untagged, so `Text` becomes a JSON string and `List` a JSON
/// array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Text(String),
    List(Vec<String>),
}

impl PropValue {
    /// Returns the text value, if this is a scalar
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            PropValue::List(_) => None,
        }
    }

    /// Returns the list value, if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropValue::Text(_) => None,
            PropValue::List(values) => Some(values),
        }
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for PropValue {
    fn from(values: Vec<String>) -> Self {
        PropValue::List(values)
    }
}

/// Property map. Ordered so that two runs over the same input serialize
/// byte-identically.
pub type Properties = BTreeMap<String, PropValue>;

/// Node tuple: `(id, label, properties)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Normalized term key (e.g., "CL:0000084")
    pub id: String,

    /// Output label selecting the writer channel (e.g., "cl")
    pub label: String,

    pub properties: Properties,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties,
        }
    }
}

/// Edge tuple: `(source, target, label, properties)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub label: String,
    pub properties: Properties,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
        properties: Properties,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
            properties,
        }
    }

    /// Identity used for redundancy checks
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.source, &self.target, &self.label)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prop_value_serializes_untagged() {
        let mut props = Properties::new();
        props.insert("term_name".to_string(), "neuron".into());
        props.insert(
            "synonyms".to_string(),
            vec!["nerve cell".to_string()].into(),
        );

        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"synonyms":["nerve cell"],"term_name":"neuron"}"#);
    }

    #[test]
    fn test_node_round_trip() {
        let mut props = Properties::new();
        props.insert("source".to_string(), "Cell Ontology".into());
        let node = Node::new("CL:0000540", "cl", props);

        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
        assert_eq!(back.properties["source"].as_text(), Some("Cell Ontology"));
    }

    #[test]
    fn test_edge_identity() {
        let edge = Edge::new("P01308", "GO:0005615", "cellular_component_gene_product", Properties::new());
        assert_eq!(edge.identity(), ("P01308", "GO:0005615", "cellular_component_gene_product"));
    }
}
