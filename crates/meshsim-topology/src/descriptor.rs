//! Topology descriptors and edge derivation.
//!
//! A descriptor is the canonical text form of a topology. Both the paste and
//! the form builder paths end up here, so nothing downstream needs to know
//! where a topology came from.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Marker that starts a node declaration in descriptor text.
const DECLARATION_MARKER: &str = "- id:";

/// A single node and the neighbor ids it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Node identifier, unique within a topology
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    /// Declared neighbors, in declaration order
    #[serde(default, deserialize_with = "scalar_strings")]
    pub neighbors: Vec<String>,
}

impl NodeSpec {
    /// Create a node spec.
    pub fn new(id: impl Into<String>, neighbors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            neighbors: neighbors.into_iter().map(Into::into).collect(),
        }
    }
}

/// An undirected edge stored in its canonical direction (`source < target`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// A full topology: every node with its declared neighbors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyDescriptor {
    pub nodes: Vec<NodeSpec>,
}

impl TopologyDescriptor {
    /// Create a descriptor from node specs.
    pub fn new(nodes: Vec<NodeSpec>) -> Self {
        Self { nodes }
    }

    /// Parse descriptor text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Serialize to descriptor text.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Number of declared nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the descriptor declares no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in declaration order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Derive the edges to render.
    ///
    /// For every node `A` and every id `B` in `A`'s neighbor list, an edge is
    /// emitted only if `A < B` lexically. A relation declared by the larger
    /// id alone is therefore dropped, while one declared by the smaller id
    /// alone is kept. Repeated declarations yield repeated edges.
    pub fn edges(&self) -> Vec<Edge> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.neighbors
                    .iter()
                    .filter(move |nb| node.id.as_str() < nb.as_str())
                    .map(move |nb| Edge {
                        source: node.id.clone(),
                        target: nb.clone(),
                    })
            })
            .collect()
    }
}

/// Count node declarations in raw descriptor text.
///
/// This is a coarse heuristic for pasted text: it counts lines whose first
/// non-blank characters are `- id:` and does not parse the document.
pub fn count_declarations(text: &str) -> usize {
    text.lines()
        .filter(|line| line.trim_start().starts_with(DECLARATION_MARKER))
        .count()
}

/// A YAML scalar read as text (`id: 7` is the node `"7"`).
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(String::from)
}

fn scalar_strings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    let values = Option::<Vec<Scalar>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(String::from)
        .collect())
}
