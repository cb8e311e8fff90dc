//! Whole-snapshot invariant scan.
//!
//! [`validate`] assumes no mutation history. It re-derives every invariant
//! from the snapshot alone with the same checkers the Mutation API uses, and
//! reports every violation it finds instead of stopping at the first.
//!
//! Structural defects (duplicate ids, dangling edges, bad numbers) are not
//! violations; they are reported by [`GraphSnapshot::schema_issues`]. The
//! scan tolerates them: a dangling edge still takes part in the cycle scan
//! and in the budget sums of the endpoint that does exist, and duplicate
//! node ids are checked once, under their first occurrence.

use std::collections::HashMap;

use emigraph_core::budget::{covers_inbound, covers_outbound, inbound_emissions, outbound_weight};
use emigraph_core::{edge_emissions, find_cycles, GraphSnapshot, Node, NodeId, EMISSIONS_TOLERANCE};
use tracing::debug;

use crate::violation::{Location, Violation, ViolationKind};

/// Checks a snapshot against all four graph invariants.
///
/// Never fails; an empty list means the snapshot is consistent.
pub fn validate(snapshot: &GraphSnapshot) -> Vec<Violation> {
    let mut violations = Vec::new();
    let edges = &snapshot.edges;

    for cycle in find_cycles(edges) {
        let path: Vec<&str> = cycle.iter().map(NodeId::as_str).collect();
        let message = format!("graph contains a cycle through {}", path.join(", "));
        violations.push(Violation::new(ViolationKind::Cycle, Location::Cycle(cycle), message));
    }

    let mut nodes: HashMap<&NodeId, &Node> = HashMap::with_capacity(snapshot.nodes.len());
    for node in &snapshot.nodes {
        if nodes.contains_key(&node.id) {
            continue;
        }
        nodes.insert(&node.id, node);

        let outbound = outbound_weight(&node.id, edges);
        if !covers_outbound(node.weight, outbound) {
            violations.push(Violation::new(
                ViolationKind::WeightBudget,
                Location::Node(node.id.clone()),
                format!(
                    "node {} ({}): outbound edge weights {outbound} exceed node weight {}",
                    node.name, node.id, node.weight
                ),
            ));
        }

        let inbound = inbound_emissions(&node.id, edges);
        if !covers_inbound(node.emissions, inbound) {
            violations.push(Violation::new(
                ViolationKind::EmissionsBudget,
                Location::Node(node.id.clone()),
                format!(
                    "node {} ({}): emissions {} are below incoming emissions {inbound}",
                    node.name, node.id, node.emissions
                ),
            ));
        }
    }

    for edge in edges {
        let Some(source) = nodes.get(&edge.source) else {
            continue;
        };
        let expected = edge_emissions(source.weight, source.emissions, edge.weight);
        // Written so that NaN on either side counts as a mismatch.
        if !((edge.emissions - expected).abs() <= EMISSIONS_TOLERANCE) {
            violations.push(Violation::new(
                ViolationKind::EmissionsMismatch,
                Location::Edge(edge.id.clone()),
                format!(
                    "edge {}: emissions mismatch, expected {expected}, got {}",
                    edge.id, edge.emissions
                ),
            ));
        }
    }

    debug!(
        nodes = snapshot.nodes.len(),
        edges = edges.len(),
        findings = violations.len(),
        "validated snapshot"
    );
    violations
}
