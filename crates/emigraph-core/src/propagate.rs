//! Emission Propagator: recomputes derived emissions downstream of an edit.
//!
//! Propagation is a pure function from the current graph plus a
//! [`Trigger`] (the edit about to happen) to a [`PropagationPlan`] (the
//! complete set of new emissions values). Nothing is written while the plan
//! is computed; the Mutation API applies the trigger and the plan together
//! or not at all.
//!
//! The walk visits the subgraph reachable from the trigger in topological
//! order. A node's final emissions are its base value (the trigger's
//! override, or its current value) plus every emissions delta that arrived
//! over its incoming edges. Each outgoing edge is then recomputed from the
//! node's final state with [`edge_emissions`], and the difference to the
//! edge's previous value travels on to the edge's target. Every hop uses the
//! formula, so edge emissions never drift from their source.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::trace;

use crate::budget::covers_inbound;
use crate::edge::{edge_emissions, Edge, EMISSIONS_TOLERANCE};
use crate::error::{BudgetKind, CoreError};
use crate::graph::FlowGraph;
use crate::id::{EdgeId, NodeId};
use crate::topology::FlowIndex;

/// New invariant-relevant values for a node changed directly by an edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeValues {
    pub weight: f64,
    pub emissions: f64,
}

/// The structural part of an edit, described before it is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trigger {
    /// Nodes whose weight or emissions are set by the edit.
    pub nodes: IndexMap<NodeId, NodeValues>,
    /// Existing edges leaving the graph: deleted ones, and ones replaced by
    /// an entry of `attached` with the same id.
    pub detached: Vec<EdgeId>,
    /// Edges entering the graph. They start out without emissions; their
    /// value is derived during the walk.
    pub attached: Vec<Edge>,
    /// Nodes removed by the edit. Deltas arriving at them are dropped.
    pub removed: Vec<NodeId>,
}

impl Trigger {
    pub fn node(id: NodeId, values: NodeValues) -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert(id, values);
        Trigger {
            nodes,
            ..Trigger::default()
        }
    }

    pub fn attach(edge: Edge) -> Self {
        Trigger {
            attached: vec![edge],
            ..Trigger::default()
        }
    }

    pub fn detach(edge: EdgeId) -> Self {
        Trigger {
            detached: vec![edge],
            ..Trigger::default()
        }
    }

    /// Swaps the edge `replacement.id` for `replacement`.
    pub fn replace(replacement: Edge) -> Self {
        Trigger {
            detached: vec![replacement.id.clone()],
            attached: vec![replacement],
            ..Trigger::default()
        }
    }
}

/// Staged emissions values computed by [`plan`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationPlan {
    /// Final emissions of every node the walk finalized.
    pub nodes: IndexMap<NodeId, f64>,
    /// Final emissions of every edge recomputed on the way, attached edges
    /// included.
    pub edges: IndexMap<EdgeId, f64>,
}

impl PropagationPlan {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Computes the emissions of every node and edge affected by `trigger`.
///
/// Fails with [`CoreError::BudgetExceeded`] (kind `Emissions`) if a node's
/// final emissions would fall below its inbound edge emissions or below
/// zero, and with [`CoreError::CycleDetected`] if the reachable subgraph is
/// not acyclic. `graph` is never modified.
pub fn plan(graph: &FlowGraph, trigger: &Trigger) -> Result<PropagationPlan, CoreError> {
    let detached: HashSet<&EdgeId> = trigger.detached.iter().collect();
    let attached: HashSet<&EdgeId> = trigger.attached.iter().map(|e| &e.id).collect();
    let removed: HashSet<&NodeId> = trigger.removed.iter().collect();

    let view: Vec<&Edge> = graph
        .edges()
        .filter(|e| !detached.contains(&e.id))
        .chain(trigger.attached.iter())
        .collect();
    let previous = |edge: &Edge| {
        if attached.contains(&edge.id) {
            0.0
        } else {
            edge.emissions
        }
    };

    // Withdrawn contributions enter as negative deltas at the old targets.
    let mut pending: HashMap<&NodeId, f64> = HashMap::new();
    for id in &trigger.detached {
        let edge = graph.edge(id).ok_or_else(|| CoreError::edge_not_found(id))?;
        *pending.entry(&edge.target).or_default() -= edge.emissions;
    }

    // Sources of attached edges are revisited so the new edges get derived.
    for edge in &trigger.attached {
        pending.entry(&edge.source).or_default();
    }

    let mut roots: Vec<&NodeId> = trigger.nodes.keys().collect();
    roots.extend(pending.keys().copied());
    roots.retain(|id| !removed.contains(id));
    for root in &roots {
        if !graph.contains_node(root) {
            return Err(CoreError::node_not_found(root));
        }
    }

    let reachable =
        FlowIndex::from_edges(view.iter().copied()).reachable_from(roots.iter().copied());
    let walk = FlowIndex::from_edges(view.iter().copied().filter(|e| reachable.contains(&e.source)));
    let mut order = walk.topological_order().ok_or_else(|| cycle_error(&walk))?;
    // Roots without any remaining edges are not part of the walk index.
    let mut ordered: HashSet<&NodeId> = order.iter().copied().collect();
    for root in roots {
        if ordered.insert(root) {
            order.push(root);
        }
    }

    let mut staged = PropagationPlan::default();
    for id in order {
        if removed.contains(id) {
            continue;
        }
        let base = trigger.nodes.get(id);
        let inflow = pending.get(id).copied();
        if base.is_none() && inflow.is_none() {
            continue;
        }
        let node = graph.node(id).ok_or_else(|| CoreError::node_not_found(id))?;
        let weight = base.map_or(node.weight, |v| v.weight);
        let mut emissions = base.map_or(node.emissions, |v| v.emissions) + inflow.unwrap_or(0.0);
        if emissions < 0.0 {
            if emissions < -EMISSIONS_TOLERANCE {
                return Err(CoreError::BudgetExceeded {
                    kind: BudgetKind::Emissions,
                    node: id.clone(),
                });
            }
            emissions = 0.0;
        }
        trace!(node = %id, emissions, "finalized node emissions");
        staged.nodes.insert(id.clone(), emissions);

        for edge in walk.outgoing(id) {
            let value = edge_emissions(weight, emissions, edge.weight);
            let delta = value - previous(edge);
            staged.edges.insert(edge.id.clone(), value);
            if delta != 0.0 {
                *pending.entry(&edge.target).or_default() += delta;
            }
        }
    }

    // Every finalized node must still cover what flows into it.
    for (id, emissions) in &staged.nodes {
        let inbound: f64 = view
            .iter()
            .filter(|e| &e.target == id)
            .map(|e| staged.edges.get(&e.id).copied().unwrap_or_else(|| previous(*e)))
            .sum();
        if !covers_inbound(*emissions, inbound) {
            return Err(CoreError::BudgetExceeded {
                kind: BudgetKind::Emissions,
                node: id.clone(),
            });
        }
    }

    Ok(staged)
}

fn cycle_error(index: &FlowIndex<'_>) -> CoreError {
    let cycle = index.cycles().into_iter().next().unwrap_or_default();
    match cycle.as_slice() {
        [first, second, ..] => CoreError::CycleDetected {
            from: (*first).clone(),
            to: (*second).clone(),
        },
        [only] => CoreError::CycleDetected {
            from: (*only).clone(),
            to: (*only).clone(),
        },
        [] => CoreError::SchemaInvalid {
            issues: vec!["edge set is not acyclic".to_string()],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// a(100, 50) -> b(50, 25) -> c(20, 10), with consistent emissions.
    fn chain() -> FlowGraph {
        let mut graph = FlowGraph::new("chain");
        graph.insert_node(Node::new("a", "A", 100.0, 50.0));
        graph.insert_node(Node::new("b", "B", 50.0, 25.0));
        graph.insert_node(Node::new("c", "C", 20.0, 10.0));
        graph.insert_edge(Edge {
            emissions: 25.0,
            ..Edge::new("ab", "a", "b", 50.0)
        });
        graph.insert_edge(Edge {
            emissions: 10.0,
            ..Edge::new("bc", "b", "c", 20.0)
        });
        graph
    }

    #[test]
    fn emissions_change_is_recomputed_at_every_hop() {
        let graph = chain();
        let trigger = Trigger::node(
            NodeId::from("a"),
            NodeValues {
                weight: 100.0,
                emissions: 100.0,
            },
        );
        let plan = plan(&graph, &trigger).unwrap();

        assert!(close(plan.edges[&EdgeId::from("ab")], 50.0));
        assert!(close(plan.nodes[&NodeId::from("b")], 50.0));
        // b's edge follows b's new state: (20 / 50) * 50.
        assert!(close(plan.edges[&EdgeId::from("bc")], 20.0));
        assert!(close(plan.nodes[&NodeId::from("c")], 20.0));
    }

    #[test]
    fn detached_edge_withdraws_its_contribution() {
        let graph = chain();
        let plan = plan(&graph, &Trigger::detach(EdgeId::from("ab"))).unwrap();

        assert!(close(plan.nodes[&NodeId::from("b")], 0.0));
        assert!(close(plan.edges[&EdgeId::from("bc")], 0.0));
        assert!(close(plan.nodes[&NodeId::from("c")], 0.0));
        assert!(!plan.nodes.contains_key(&NodeId::from("a")));
    }

    #[test]
    fn attached_edge_starts_from_zero() {
        let mut graph = chain();
        graph.insert_node(Node::new("d", "D", 10.0, 0.0));
        let plan = plan(&graph, &Trigger::attach(Edge::new("ad", "a", "d", 10.0))).unwrap();

        assert!(close(plan.edges[&EdgeId::from("ad")], 5.0));
        assert!(close(plan.nodes[&NodeId::from("d")], 5.0));
        // Existing siblings keep their values and push nothing downstream.
        assert!(close(plan.edges[&EdgeId::from("ab")], 25.0));
        assert!(!plan.nodes.contains_key(&NodeId::from("b")));
    }

    #[test]
    fn retargeted_edge_moves_emissions_between_targets() {
        let mut graph = chain();
        graph.insert_node(Node::new("d", "D", 10.0, 0.0));
        let replacement = Edge::new("ab", "a", "d", 50.0);
        let plan = plan(&graph, &Trigger::replace(replacement)).unwrap();

        assert!(close(plan.nodes[&NodeId::from("b")], 0.0));
        assert!(close(plan.nodes[&NodeId::from("c")], 0.0));
        assert!(close(plan.nodes[&NodeId::from("d")], 25.0));
        assert!(close(plan.edges[&EdgeId::from("ab")], 25.0));
    }

    #[test]
    fn diamond_target_sums_both_branches() {
        // s -> l, s -> r, l -> t, r -> t
        let mut graph = FlowGraph::new("diamond");
        graph.insert_node(Node::new("s", "S", 10.0, 10.0));
        graph.insert_node(Node::new("l", "L", 5.0, 5.0));
        graph.insert_node(Node::new("r", "R", 5.0, 5.0));
        graph.insert_node(Node::new("t", "T", 10.0, 10.0));
        for (id, from, to, weight, em) in [
            ("sl", "s", "l", 5.0, 5.0),
            ("sr", "s", "r", 5.0, 5.0),
            ("lt", "l", "t", 5.0, 5.0),
            ("rt", "r", "t", 5.0, 5.0),
        ] {
            graph.insert_edge(Edge {
                emissions: em,
                ..Edge::new(id, from, to, weight)
            });
        }

        let trigger = Trigger::node(
            NodeId::from("s"),
            NodeValues {
                weight: 10.0,
                emissions: 20.0,
            },
        );
        let plan = plan(&graph, &trigger).unwrap();
        assert!(close(plan.nodes[&NodeId::from("t")], 20.0));
        assert!(close(plan.edges[&EdgeId::from("lt")], 10.0));
    }

    #[test]
    fn negative_result_is_refused() {
        let mut graph = chain();
        // b claims less than it receives; withdrawing more drives it negative.
        graph.node_mut(&NodeId::from("b")).unwrap().emissions = 10.0;
        let err = plan(&graph, &Trigger::detach(EdgeId::from("ab"))).unwrap_err();
        assert_eq!(
            err,
            CoreError::BudgetExceeded {
                kind: BudgetKind::Emissions,
                node: NodeId::from("b"),
            }
        );
    }

    #[test]
    fn planning_leaves_the_graph_untouched() {
        let graph = chain();
        let before = graph.clone();
        let _ = plan(&graph, &Trigger::detach(EdgeId::from("bc"))).unwrap();
        assert_eq!(graph, before);
    }
}
