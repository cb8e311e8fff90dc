//! Trust-boundary gate for whole snapshots.
//!
//! [`admit`] turns an untrusted [`GraphSnapshot`] into a [`FlowGraph`] only
//! if it has no structural issues and no invariant violations. A refusal
//! lists everything that is wrong, so a caller can fix it all in one pass.

use emigraph_core::{FlowGraph, GraphSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::validator::validate;
use crate::violation::Violation;

/// Every reason a snapshot was refused.
#[derive(Debug, Clone, PartialEq, Default, Error)]
#[error("snapshot rejected with {} finding(s)", .schema.len() + .violations.len())]
pub struct Rejection {
    /// Structural issues (duplicate ids, dangling edges, bad numbers).
    pub schema: Vec<String>,
    /// Broken invariants.
    pub violations: Vec<Violation>,
}

/// One finding in the `{type, message}` shape returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl Detail {
    pub fn schema(message: impl Into<String>) -> Self {
        Detail {
            kind: "schema".to_string(),
            message: message.into(),
        }
    }
}

impl From<&Violation> for Detail {
    fn from(v: &Violation) -> Self {
        Detail {
            kind: v.kind.as_str().to_string(),
            message: v.message.clone(),
        }
    }
}

impl Rejection {
    pub fn is_empty(&self) -> bool {
        self.schema.is_empty() && self.violations.is_empty()
    }

    /// All findings, schema issues first.
    pub fn details(&self) -> Vec<Detail> {
        self.schema
            .iter()
            .map(Detail::schema)
            .chain(self.violations.iter().map(Detail::from))
            .collect()
    }
}

/// Inspects a snapshot without admitting it.
pub fn review(snapshot: &GraphSnapshot) -> Rejection {
    Rejection {
        schema: snapshot.schema_issues(),
        violations: validate(snapshot),
    }
}

/// Admits a snapshot that is structurally sound and satisfies every
/// invariant.
pub fn admit(snapshot: GraphSnapshot) -> Result<FlowGraph, Rejection> {
    let findings = review(&snapshot);
    if !findings.is_empty() {
        debug!(
            schema = findings.schema.len(),
            violations = findings.violations.len(),
            "snapshot refused"
        );
        return Err(findings);
    }
    FlowGraph::from_snapshot(snapshot).map_err(|err| Rejection {
        schema: vec![err.to_string()],
        violations: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use emigraph_core::{Edge, Node};

    use crate::violation::ViolationKind;

    #[test]
    fn consistent_snapshot_is_admitted() {
        let snapshot = GraphSnapshot {
            id: Some("g1".into()),
            name: "plant".into(),
            nodes: vec![
                Node::new("a", "A", 100.0, 50.0),
                Node::new("b", "B", 50.0, 25.0),
            ],
            edges: vec![Edge {
                emissions: 25.0,
                ..Edge::new("ab", "a", "b", 50.0)
            }],
        };
        let graph = admit(snapshot.clone()).unwrap();
        assert_eq!(graph.to_snapshot(), snapshot);
    }

    #[test]
    fn rejection_lists_schema_issues_and_violations_together() {
        let snapshot = GraphSnapshot {
            id: None,
            name: "broken".into(),
            nodes: vec![Node::new("a", "A", 10.0, 0.0), Node::new("b", "B", 10.0, 0.0)],
            edges: vec![
                Edge::new("ab", "a", "b", 1.0),
                Edge {
                    emissions: 0.0,
                    ..Edge::new("ba", "b", "a", 1.0)
                },
                Edge::new("bx", "b", "missing", 1.0),
            ],
        };

        let rejection = admit(snapshot).unwrap_err();
        assert_eq!(rejection.schema.len(), 1);
        assert!(rejection.violations.iter().any(|v| v.kind == ViolationKind::Cycle));

        let details = rejection.details();
        assert_eq!(details[0].kind, "schema");
        assert!(details.iter().any(|d| d.kind == "cycle"));
        assert_eq!(rejection.to_string(), "snapshot rejected with 2 finding(s)");
    }

    #[test]
    fn detail_wire_shape() {
        let json = serde_json::to_value(Detail::schema("edge e: unknown target node x")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "schema", "message": "edge e: unknown target node x"})
        );
    }
}
