//! Budget Checker: per-node weight and emissions budgets.
//!
//! Two independent, pure checks:
//! - a node's outbound edge weights must not exceed the node's weight;
//! - a node's emissions must not fall below its inbound edge emissions.
//!
//! The Mutation API runs them before touching state and the standalone
//! validator runs them over whole snapshots, so both sides share the same
//! comparison rules ([`covers_outbound`], [`covers_inbound`]).

use crate::edge::{Edge, EMISSIONS_TOLERANCE};
use crate::id::{EdgeId, NodeId};
use crate::node::Node;

/// Slack allowed when comparing summed edge weights with a node weight, so
/// splits like `33.3 + 33.3 + 33.4` of `100` are not refused over rounding.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// A proposed change to the outbound edges of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightChange<'a> {
    /// Check the edges as they are.
    Unchanged,
    /// A new outbound edge with this weight.
    Extra(f64),
    /// An existing outbound edge gets a new weight.
    Replace { edge: &'a EdgeId, weight: f64 },
}

/// Sum of the weights of edges leaving `node`.
pub fn outbound_weight<'a>(node: &NodeId, edges: impl IntoIterator<Item = &'a Edge>) -> f64 {
    edges
        .into_iter()
        .filter(|e| &e.source == node)
        .map(|e| e.weight)
        .sum()
}

/// Sum of the emissions of edges arriving at `node`.
pub fn inbound_emissions<'a>(node: &NodeId, edges: impl IntoIterator<Item = &'a Edge>) -> f64 {
    edges
        .into_iter()
        .filter(|e| &e.target == node)
        .map(|e| e.emissions)
        .sum()
}

/// `true` if a node of `weight` can route `outbound` in total.
pub fn covers_outbound(weight: f64, outbound: f64) -> bool {
    outbound <= weight + WEIGHT_TOLERANCE
}

/// `true` if a node holding `emissions` covers `inbound` arriving emissions.
pub fn covers_inbound(emissions: f64, inbound: f64) -> bool {
    inbound <= emissions + EMISSIONS_TOLERANCE
}

/// Checks that the outbound weights of `node`, after applying `change`,
/// stay within `node.weight`.
pub fn outbound_within_budget<'a>(
    node: &Node,
    edges: impl IntoIterator<Item = &'a Edge>,
    change: WeightChange<'_>,
) -> bool {
    let outbound: f64 = match change {
        WeightChange::Unchanged => outbound_weight(&node.id, edges),
        WeightChange::Extra(weight) => outbound_weight(&node.id, edges) + weight,
        WeightChange::Replace { edge, weight } => {
            let rest = outbound_weight(&node.id, edges.into_iter().filter(|e| &e.id != edge));
            rest + weight
        }
    };
    covers_outbound(node.weight, outbound)
}

/// Checks that the inbound emissions of `node` do not exceed
/// `proposed_emissions`, or the node's current emissions when `None`.
pub fn inbound_within_emissions<'a>(
    node: &Node,
    edges: impl IntoIterator<Item = &'a Edge>,
    proposed_emissions: Option<f64>,
) -> bool {
    let emissions = proposed_emissions.unwrap_or(node.emissions);
    covers_inbound(emissions, inbound_emissions(&node.id, edges))
}
