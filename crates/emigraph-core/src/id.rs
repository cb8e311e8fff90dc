//! Identifier newtypes for graph entities.
//!
//! Node and edge ids are caller-chosen strings (the editor generates them,
//! snapshots carry them verbatim). Both are distinct newtype wrappers so a
//! `NodeId` cannot be passed where an `EdgeId` is expected.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Identifier of an edge within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        EdgeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Display implementations -- just print the raw id.

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        EdgeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl From<String> for EdgeId {
    fn from(id: String) -> Self {
        EdgeId(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EdgeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_display() {
        assert_eq!(format!("{}", NodeId::from("boiler")), "boiler");
    }

    #[test]
    fn edge_id_display() {
        assert_eq!(format!("{}", EdgeId::new("e-7")), "e-7");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&NodeId::from("a")).unwrap();
        assert_eq!(json, "\"a\"");

        let back: EdgeId = serde_json::from_str("\"a-b\"").unwrap();
        assert_eq!(back, EdgeId::from("a-b"));
    }

    #[test]
    fn ids_borrow_as_str_for_map_lookups() {
        let mut map = std::collections::HashMap::new();
        map.insert(NodeId::from("n1"), 1);
        assert_eq!(map.get("n1"), Some(&1));
    }
}
