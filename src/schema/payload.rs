//! Sentence-graph payload types (schema v2.4)
//!
//! Unknown fields are ignored so newer extractors can add data without
//! breaking the encoder. Node and edge ids may arrive as strings or integers
//! and are normalized to strings.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{HydraEdgeError, Result};

/// Payload version the validator's rule set is written for
pub const SUPPORTED_VERSION: &str = "2.4";

// ============================================================================
// Vocabularies
// ============================================================================

/// Node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Subject / predicate / object mention
    Spo,
    /// Attribute modifier
    Attr,
    /// Sentence-level metadata (tense, source, date, ...)
    MetaOut,
    /// The sentence's composite vector anchor
    Chv,
    /// Event (clause) anchor
    Event,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [Self::Spo, Self::Attr, Self::MetaOut, Self::Chv, Self::Event];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spo => "spo",
            Self::Attr => "attr",
            Self::MetaOut => "meta_out",
            Self::Chv => "chv",
            Self::Event => "event",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// `S-P`: subject → predicate inside one event
    SubjectPredicate,
    /// `P-O`: predicate → object inside one event
    PredicateObject,
    /// `attr`: attribute → spo
    Attr,
    /// `meta`: meta_out → chv
    Meta,
    /// `binder`: spo → chv
    Binder,
    /// `event-pred`: event → its predicate
    EventPred,
    /// `subevt`: spo → nested sub-event spo
    Subevt,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 7] = [
        Self::SubjectPredicate,
        Self::PredicateObject,
        Self::Attr,
        Self::Meta,
        Self::Binder,
        Self::EventPred,
        Self::Subevt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubjectPredicate => "S-P",
            Self::PredicateObject => "P-O",
            Self::Attr => "attr",
            Self::Meta => "meta",
            Self::Binder => "binder",
            Self::EventPred => "event-pred",
            Self::Subevt => "subevt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payload
// ============================================================================

/// One sentence's extracted graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentencePayload {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub sentence: String,

    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    #[serde(default)]
    pub layouts: Layouts,
}

impl SentencePayload {
    /// Convert parsed JSON into the typed payload
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| HydraEdgeError::Serialization(e.to_string()))
    }

    /// First node with the given id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes indexed by id (first occurrence wins)
    pub fn node_index(&self) -> HashMap<&str, &Node> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            index.entry(node.id.as_str()).or_insert(node);
        }
        index
    }

    /// Nodes of the given type
    pub fn nodes_of_type(&self, ntype: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.node_type() == Some(ntype))
    }
}

/// Graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    pub ntype: String,

    #[serde(default)]
    pub filler: String,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default, deserialize_with = "id_strings")]
    pub eid_set: Vec<String>,

    /// Event id of an `event` node
    #[serde(default, deserialize_with = "opt_id_string", skip_serializing_if = "Option::is_none")]
    pub eid: Option<String>,
}

impl Node {
    /// Parsed node type, `None` if outside the vocabulary
    pub fn node_type(&self) -> Option<NodeType> {
        NodeType::parse(&self.ntype)
    }

    /// The node's own event id: `eid`, else the sole member of `eid_set`
    pub fn single_eid(&self) -> Option<&str> {
        match (&self.eid, self.eid_set.as_slice()) {
            (Some(eid), _) => Some(eid.as_str()),
            (None, [only]) => Some(only.as_str()),
            _ => None,
        }
    }

    /// True if the two nodes share at least one event id
    pub fn shares_event_with(&self, other: &Node) -> bool {
        self.eid_set.iter().any(|e| other.eid_set.contains(e))
    }
}

/// Directed typed edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, deserialize_with = "opt_id_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(deserialize_with = "id_string")]
    pub source: String,

    #[serde(deserialize_with = "id_string")]
    pub target: String,

    pub kind: String,
}

impl Edge {
    /// Parsed edge kind, `None` if outside the vocabulary
    pub fn edge_kind(&self) -> Option<EdgeKind> {
        EdgeKind::parse(&self.kind)
    }
}

/// Layout hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layouts {
    #[serde(default)]
    pub hulls: Vec<Hull>,
}

/// Node grouping for one (possibly nested) sub-event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    #[serde(default, deserialize_with = "opt_id_string", skip_serializing_if = "Option::is_none")]
    pub eid: Option<String>,

    #[serde(deserialize_with = "id_strings")]
    pub members: Vec<String>,
}

// ============================================================================
// Id normalization
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Str(String),
    Int(i64),
    UInt(u64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Str(s) => s,
            RawId::Int(i) => i.to_string(),
            RawId::UInt(u) => u.to_string(),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    RawId::deserialize(d).map(String::from)
}

fn opt_id_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(d).map(|id| id.map(String::from))
}

fn id_strings<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
    Vec::<RawId>::deserialize(d).map(|ids| ids.into_iter().map(String::from).collect())
}
