//! Mutation API: the only way structural state of a [`FlowGraph`] changes.
//!
//! Every operation runs in two phases. The check phase validates ids and
//! fields, asks the Topology Checker and the Budget Checker, and lets the
//! Emission Propagator compute a [`PropagationPlan`], all against the
//! unchanged graph. The write phase applies the edit and the plan in one go.
//! Any error is returned from the check phase, so a failed call leaves the
//! graph exactly as it was.
//!
//! [`Mutation`] is the serializable form of the same operations, used for
//! batches submitted over the wire. [`FlowGraph::apply_batch`] is
//! all-or-nothing: it works on a clone and swaps it in only on success.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::budget::{inbound_within_emissions, outbound_within_budget, WeightChange};
use crate::edge::{Edge, EdgePatch};
use crate::error::{BatchError, BudgetKind, CoreError, EntityKind};
use crate::graph::FlowGraph;
use crate::id::{EdgeId, NodeId};
use crate::node::{Node, NodePatch, Position};
use crate::propagate::{plan, NodeValues, PropagationPlan, Trigger};
use crate::snapshot::{edge_weight_issue, node_field_issues};
use crate::topology::would_create_cycle;

/// One edit of the graph, in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Mutation {
    /// Add an isolated node.
    AddNode {
        id: NodeId,
        name: String,
        weight: f64,
        emissions: f64,
        #[serde(default)]
        position: Position,
    },
    /// Patch a node's fields.
    UpdateNode {
        id: NodeId,
        #[serde(default)]
        patch: NodePatch,
    },
    /// Remove a node and every edge touching it.
    DeleteNode { id: NodeId },
    /// Add an edge; its emissions are derived from the source.
    AddEdge {
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        weight: f64,
    },
    /// Retarget an edge or change its weight.
    UpdateEdge {
        id: EdgeId,
        #[serde(default)]
        patch: EdgePatch,
    },
    /// Remove an edge.
    DeleteEdge { id: EdgeId },
    /// Rename the graph.
    SetName { name: String },
}

impl Mutation {
    /// Short operation name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::AddNode { .. } => "addNode",
            Mutation::UpdateNode { .. } => "updateNode",
            Mutation::DeleteNode { .. } => "deleteNode",
            Mutation::AddEdge { .. } => "addEdge",
            Mutation::UpdateEdge { .. } => "updateEdge",
            Mutation::DeleteEdge { .. } => "deleteEdge",
            Mutation::SetName { .. } => "setName",
        }
    }
}

/// Which entities an operation (or a batch) created, changed, or removed.
///
/// Created entities are reported as changed. Re-render from the graph for
/// the actual values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub nodes_changed: IndexSet<NodeId>,
    pub edges_changed: IndexSet<EdgeId>,
    pub nodes_removed: IndexSet<NodeId>,
    pub edges_removed: IndexSet<EdgeId>,
}

impl MutationOutcome {
    pub fn is_empty(&self) -> bool {
        self.nodes_changed.is_empty()
            && self.edges_changed.is_empty()
            && self.nodes_removed.is_empty()
            && self.edges_removed.is_empty()
    }

    /// Folds a later outcome into this one.
    pub fn merge(&mut self, later: MutationOutcome) {
        for id in later.nodes_removed {
            self.nodes_changed.shift_remove(&id);
            self.nodes_removed.insert(id);
        }
        for id in later.edges_removed {
            self.edges_changed.shift_remove(&id);
            self.edges_removed.insert(id);
        }
        for id in later.nodes_changed {
            self.nodes_removed.shift_remove(&id);
            self.nodes_changed.insert(id);
        }
        for id in later.edges_changed {
            self.edges_removed.shift_remove(&id);
            self.edges_changed.insert(id);
        }
    }
}

impl FlowGraph {
    /// Adds an isolated node.
    ///
    /// Fails with `DuplicateId` if the id is taken and with `SchemaInvalid`
    /// if the weight is not positive or the emissions are negative.
    pub fn add_node(&mut self, node: Node) -> Result<MutationOutcome, CoreError> {
        if self.contains_node(&node.id) {
            return Err(CoreError::DuplicateId {
                kind: EntityKind::Node,
                id: node.id.to_string(),
            });
        }
        let issues = node_field_issues(node.weight, node.emissions, &format!("node {}", node.id));
        if !issues.is_empty() {
            return Err(CoreError::SchemaInvalid { issues });
        }

        let mut outcome = MutationOutcome::default();
        outcome.nodes_changed.insert(node.id.clone());
        self.insert_node(node);
        Ok(outcome)
    }

    /// Patches a node.
    ///
    /// Presentation fields (name, position) are written without checks.
    /// A changed weight or emissions value must keep the node's outbound
    /// weights within its weight and its emissions above its inbound
    /// emissions; the new values are then propagated downstream.
    pub fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> Result<MutationOutcome, CoreError> {
        let node = self.node(id).ok_or_else(|| CoreError::node_not_found(id))?;
        let weight = patch.weight.unwrap_or(node.weight);
        let emissions = patch.emissions.unwrap_or(node.emissions);

        let staged = if weight != node.weight || emissions != node.emissions {
            let issues = node_field_issues(weight, emissions, &format!("node {id}"));
            if !issues.is_empty() {
                return Err(CoreError::SchemaInvalid { issues });
            }
            let resized = Node {
                weight,
                ..node.clone()
            };
            if !outbound_within_budget(&resized, self.edges(), WeightChange::Unchanged) {
                return Err(budget(BudgetKind::Weight, id));
            }
            if !inbound_within_emissions(node, self.edges(), Some(emissions)) {
                return Err(budget(BudgetKind::Emissions, id));
            }
            let trigger = Trigger::node(id.clone(), NodeValues { weight, emissions });
            let plan = plan(self, &trigger)?;
            Some((trigger, plan))
        } else {
            None
        };

        let mut outcome = match staged {
            Some((trigger, plan)) => self.commit(trigger, plan),
            None => MutationOutcome::default(),
        };
        if patch.name.is_some() || patch.position.is_some() {
            if let Some(node) = self.node_mut(id) {
                if let Some(name) = patch.name {
                    node.name = name;
                }
                if let Some(position) = patch.position {
                    node.position = position;
                }
            }
            outcome.nodes_changed.insert(id.clone());
        }
        Ok(outcome)
    }

    /// Removes a node and every edge touching it.
    ///
    /// The emissions its outgoing edges carried are withdrawn from their
    /// downstream subgraphs first. Only an unknown id is refused.
    pub fn delete_node(&mut self, id: &NodeId) -> Result<MutationOutcome, CoreError> {
        if !self.contains_node(id) {
            return Err(CoreError::node_not_found(id));
        }
        let touching = self
            .edges()
            .filter(|e| &e.source == id || &e.target == id)
            .map(|e| e.id.clone())
            .collect();
        let trigger = Trigger {
            detached: touching,
            removed: vec![id.clone()],
            ..Trigger::default()
        };
        let plan = plan(self, &trigger)?;
        Ok(self.commit(trigger, plan))
    }

    /// Adds an edge and derives its emissions from the source node.
    ///
    /// Refused with `CycleDetected` if the target already reaches the
    /// source and with `BudgetExceeded(weight)` if the source cannot route
    /// the extra weight.
    pub fn add_edge(&mut self, edge: Edge) -> Result<MutationOutcome, CoreError> {
        if self.contains_edge(&edge.id) {
            return Err(CoreError::DuplicateId {
                kind: EntityKind::Edge,
                id: edge.id.to_string(),
            });
        }
        if let Some(issue) = edge_weight_issue(edge.weight, &format!("edge {}", edge.id)) {
            return Err(CoreError::schema(issue));
        }
        let source = self
            .node(&edge.source)
            .ok_or_else(|| CoreError::node_not_found(&edge.source))?;
        if !self.contains_node(&edge.target) {
            return Err(CoreError::node_not_found(&edge.target));
        }
        if would_create_cycle(&edge, self, None) {
            return Err(CoreError::CycleDetected {
                from: edge.source.clone(),
                to: edge.target.clone(),
            });
        }
        if !outbound_within_budget(source, self.edges(), WeightChange::Extra(edge.weight)) {
            return Err(budget(BudgetKind::Weight, &edge.source));
        }

        let trigger = Trigger::attach(Edge {
            emissions: 0.0,
            ..edge
        });
        let plan = plan(self, &trigger)?;
        Ok(self.commit(trigger, plan))
    }

    /// Retargets an edge and/or changes its weight.
    ///
    /// A new target is checked for cycles without the edge's current
    /// occurrence; a new weight is checked against the source's budget. The
    /// edge's emissions are withdrawn from the old target and the recomputed
    /// value is delivered to the (possibly new) target.
    pub fn update_edge(&mut self, id: &EdgeId, patch: EdgePatch) -> Result<MutationOutcome, CoreError> {
        let current = self.edge(id).ok_or_else(|| CoreError::edge_not_found(id))?;
        let target = patch.target.unwrap_or_else(|| current.target.clone());
        let weight = patch.weight.unwrap_or(current.weight);

        if let Some(issue) = edge_weight_issue(weight, &format!("edge {id}")) {
            return Err(CoreError::schema(issue));
        }
        if !self.contains_node(&target) {
            return Err(CoreError::node_not_found(&target));
        }
        let retargeted = target != current.target;
        let reweighted = weight != current.weight;
        if !retargeted && !reweighted {
            return Ok(MutationOutcome::default());
        }

        let candidate = Edge {
            id: id.clone(),
            source: current.source.clone(),
            target,
            weight,
            emissions: 0.0,
        };
        if retargeted && would_create_cycle(&candidate, self, Some(id)) {
            return Err(CoreError::CycleDetected {
                from: candidate.source,
                to: candidate.target,
            });
        }
        if reweighted {
            let source = self
                .node(&candidate.source)
                .ok_or_else(|| CoreError::node_not_found(&candidate.source))?;
            let change = WeightChange::Replace { edge: id, weight };
            if !outbound_within_budget(source, self.edges(), change) {
                return Err(budget(BudgetKind::Weight, &candidate.source));
            }
        }

        let trigger = Trigger::replace(candidate);
        let plan = plan(self, &trigger)?;
        Ok(self.commit(trigger, plan))
    }

    /// Removes an edge, withdrawing its emissions from the target's
    /// subgraph. Only an unknown id is refused.
    pub fn delete_edge(&mut self, id: &EdgeId) -> Result<MutationOutcome, CoreError> {
        if !self.contains_edge(id) {
            return Err(CoreError::edge_not_found(id));
        }
        let trigger = Trigger::detach(id.clone());
        let plan = plan(self, &trigger)?;
        Ok(self.commit(trigger, plan))
    }

    /// Applies one wire-form mutation.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationOutcome, CoreError> {
        let result = match mutation {
            Mutation::AddNode {
                id,
                name,
                weight,
                emissions,
                position,
            } => self.add_node(Node {
                id: id.clone(),
                name: name.clone(),
                weight: *weight,
                emissions: *emissions,
                position: *position,
            }),
            Mutation::UpdateNode { id, patch } => self.update_node(id, patch.clone()),
            Mutation::DeleteNode { id } => self.delete_node(id),
            Mutation::AddEdge {
                id,
                source,
                target,
                weight,
            } => self.add_edge(Edge::new(id.clone(), source.clone(), target.clone(), *weight)),
            Mutation::UpdateEdge { id, patch } => self.update_edge(id, patch.clone()),
            Mutation::DeleteEdge { id } => self.delete_edge(id),
            Mutation::SetName { name } => {
                self.set_name(name.clone());
                Ok(MutationOutcome::default())
            }
        };
        if let Err(err) = &result {
            debug!(op = mutation.kind(), error = %err, "mutation rejected");
        }
        result
    }

    /// Applies `mutations` in order, all or nothing.
    ///
    /// On failure the graph is unchanged and the error carries the index of
    /// the mutation that was refused.
    pub fn apply_batch(&mut self, mutations: &[Mutation]) -> Result<MutationOutcome, BatchError> {
        let mut working = self.clone();
        let mut outcome = MutationOutcome::default();
        for (index, mutation) in mutations.iter().enumerate() {
            let step = working
                .apply(mutation)
                .map_err(|error| BatchError { index, error })?;
            outcome.merge(step);
        }
        *self = working;
        Ok(outcome)
    }

    /// Write phase: applies a checked trigger and its plan.
    fn commit(&mut self, trigger: Trigger, plan: PropagationPlan) -> MutationOutcome {
        let mut outcome = MutationOutcome::default();
        let replaced: HashSet<&EdgeId> = trigger.attached.iter().map(|e| &e.id).collect();

        for id in &trigger.detached {
            if !replaced.contains(id) && self.remove_edge(id).is_some() {
                outcome.edges_removed.insert(id.clone());
            }
        }
        for edge in &trigger.attached {
            outcome.edges_changed.insert(edge.id.clone());
            match self.edge_mut(&edge.id) {
                Some(slot) => *slot = edge.clone(),
                None => self.insert_edge(edge.clone()),
            }
        }
        for (id, values) in &trigger.nodes {
            if let Some(node) = self.node_mut(id) {
                node.weight = values.weight;
                node.emissions = values.emissions;
                outcome.nodes_changed.insert(id.clone());
            }
        }
        for id in &trigger.removed {
            if self.remove_node(id).is_some() {
                outcome.nodes_removed.insert(id.clone());
            }
        }

        for (id, emissions) in &plan.nodes {
            if let Some(node) = self.node_mut(id) {
                if node.emissions != *emissions {
                    node.emissions = *emissions;
                    outcome.nodes_changed.insert(id.clone());
                }
            }
        }
        for (id, emissions) in &plan.edges {
            if let Some(edge) = self.edge_mut(id) {
                if edge.emissions != *emissions {
                    edge.emissions = *emissions;
                    outcome.edges_changed.insert(id.clone());
                }
            }
        }

        debug!(
            staged_nodes = plan.nodes.len(),
            staged_edges = plan.edges.len(),
            "committed propagation plan"
        );
        outcome
    }
}

fn budget(kind: BudgetKind, node: &NodeId) -> CoreError {
    CoreError::BudgetExceeded {
        kind,
        node: node.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// A(100, 50) -> B(50, 0) with edge weight 50, built through the API.
    fn seeded() -> FlowGraph {
        let mut graph = FlowGraph::new("plant");
        graph.add_node(Node::new("a", "A", 100.0, 50.0)).unwrap();
        graph.add_node(Node::new("b", "B", 50.0, 0.0)).unwrap();
        graph.add_node(Node::new("c", "C", 50.0, 0.0)).unwrap();
        graph.add_edge(Edge::new("ab", "a", "b", 50.0)).unwrap();
        graph
    }

    fn node_emissions(graph: &FlowGraph, id: &str) -> f64 {
        graph.node(&NodeId::from(id)).unwrap().emissions
    }

    fn edge_emissions_of(graph: &FlowGraph, id: &str) -> f64 {
        graph.edge(&EdgeId::from(id)).unwrap().emissions
    }

    #[test]
    fn add_edge_derives_emissions_and_feeds_the_target() {
        let graph = seeded();
        assert!(close(edge_emissions_of(&graph, "ab"), 25.0));
        assert!(close(node_emissions(&graph, "b"), 25.0));
        assert!(close(node_emissions(&graph, "a"), 50.0));
    }

    #[test]
    fn add_node_rejects_duplicates_and_bad_fields() {
        let mut graph = seeded();
        let before = graph.clone();

        let err = graph.add_node(Node::new("a", "again", 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId { kind: EntityKind::Node, .. }));

        let err = graph.add_node(Node::new("z", "Z", 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, CoreError::SchemaInvalid { .. }));
        let err = graph.add_node(Node::new("z", "Z", 1.0, -1.0)).unwrap_err();
        assert!(matches!(err, CoreError::SchemaInvalid { .. }));

        assert_eq!(graph, before);
    }

    #[test]
    fn add_edge_reports_unknown_endpoints_before_other_checks() {
        let mut graph = seeded();
        let err = graph.add_edge(Edge::new("xb", "x", "b", 1.0)).unwrap_err();
        assert_eq!(err, CoreError::node_not_found(&NodeId::from("x")));
        let err = graph.add_edge(Edge::new("ax", "a", "x", 1.0)).unwrap_err();
        assert_eq!(err, CoreError::node_not_found(&NodeId::from("x")));
        let err = graph.add_edge(Edge::new("ab", "a", "c", 1.0)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId { kind: EntityKind::Edge, .. }));
        let err = graph.add_edge(Edge::new("ac", "a", "c", -2.0)).unwrap_err();
        assert!(matches!(err, CoreError::SchemaInvalid { .. }));
    }

    #[test]
    fn update_node_lowering_emissions_below_inbound_is_refused() {
        let mut graph = seeded();
        let before = graph.clone();
        let err = graph
            .update_node(&NodeId::from("b"), NodePatch::default().emissions(10.0))
            .unwrap_err();
        assert_eq!(err, budget(BudgetKind::Emissions, &NodeId::from("b")));
        assert_eq!(graph, before);
    }

    #[test]
    fn update_node_shrinking_weight_below_outbound_is_refused() {
        let mut graph = seeded();
        let before = graph.clone();
        let err = graph
            .update_node(&NodeId::from("a"), NodePatch::default().weight(40.0))
            .unwrap_err();
        assert_eq!(err, budget(BudgetKind::Weight, &NodeId::from("a")));
        assert_eq!(graph, before);
    }

    #[test]
    fn weight_only_update_recomputes_outgoing_edges() {
        let mut graph = seeded();
        graph
            .update_node(&NodeId::from("a"), NodePatch::default().weight(200.0))
            .unwrap();
        // (50 / 200) * 50
        assert!(close(edge_emissions_of(&graph, "ab"), 12.5));
        assert!(close(node_emissions(&graph, "b"), 12.5));
    }

    #[test]
    fn presentation_patch_skips_checks() {
        let mut graph = seeded();
        let outcome = graph
            .update_node(
                &NodeId::from("b"),
                NodePatch::default().name("Kiln").position(4.0, 2.0),
            )
            .unwrap();
        let b = graph.node(&NodeId::from("b")).unwrap();
        assert_eq!(b.name, "Kiln");
        assert_eq!(b.position, Position { x: 4.0, y: 2.0 });
        assert_eq!(outcome.nodes_changed.len(), 1);
        assert!(outcome.edges_changed.is_empty());
    }

    #[test]
    fn update_node_with_unchanged_values_propagates_nothing() {
        let mut graph = seeded();
        let outcome = graph
            .update_node(&NodeId::from("a"), NodePatch::default().emissions(50.0))
            .unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn update_edge_weight_rederives_emissions() {
        let mut graph = seeded();
        graph
            .update_edge(&EdgeId::from("ab"), EdgePatch::default().weight(80.0))
            .unwrap();
        assert!(close(edge_emissions_of(&graph, "ab"), 40.0));
        assert!(close(node_emissions(&graph, "b"), 40.0));

        let err = graph
            .update_edge(&EdgeId::from("ab"), EdgePatch::default().weight(101.0))
            .unwrap_err();
        assert_eq!(err, budget(BudgetKind::Weight, &NodeId::from("a")));
    }

    #[test]
    fn update_edge_retarget_moves_emissions() {
        let mut graph = seeded();
        let outcome = graph
            .update_edge(&EdgeId::from("ab"), EdgePatch::default().target("c"))
            .unwrap();
        assert_eq!(graph.edge(&EdgeId::from("ab")).unwrap().target, NodeId::from("c"));
        assert!(close(node_emissions(&graph, "b"), 0.0));
        assert!(close(node_emissions(&graph, "c"), 25.0));
        assert!(outcome.nodes_changed.contains(&NodeId::from("b")));
        assert!(outcome.nodes_changed.contains(&NodeId::from("c")));
        // Retargeting keeps the edge in place.
        let ids: Vec<&str> = graph.edges().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ab"]);
    }

    #[test]
    fn update_edge_retarget_and_reweight_in_one_patch() {
        let mut graph = seeded();
        let outcome = graph
            .update_edge(&EdgeId::from("ab"), EdgePatch::default().target("c").weight(80.0))
            .unwrap();
        let ab = graph.edge(&EdgeId::from("ab")).unwrap();
        assert_eq!(ab.target, NodeId::from("c"));
        assert_eq!(ab.weight, 80.0);
        // (80 / 100) * 50, delivered to the new target only.
        assert!(close(ab.emissions, 40.0));
        assert!(close(node_emissions(&graph, "b"), 0.0));
        assert!(close(node_emissions(&graph, "c"), 40.0));
        assert!(outcome.edges_changed.contains(&EdgeId::from("ab")));

        let before = graph.clone();
        let err = graph
            .update_edge(&EdgeId::from("ab"), EdgePatch::default().target("b").weight(120.0))
            .unwrap_err();
        assert_eq!(err, budget(BudgetKind::Weight, &NodeId::from("a")));
        assert_eq!(graph, before);
    }

    #[test]
    fn refused_value_change_drops_the_presentation_fields_too() {
        let mut graph = seeded();
        let before = graph.clone();
        let err = graph
            .update_node(
                &NodeId::from("b"),
                NodePatch::default().name("Kiln").position(4.0, 2.0).emissions(10.0),
            )
            .unwrap_err();
        assert_eq!(err, budget(BudgetKind::Emissions, &NodeId::from("b")));
        assert_eq!(graph, before);
        assert_eq!(graph.node(&NodeId::from("b")).unwrap().name, "B");
    }

    #[test]
    fn update_edge_retarget_into_a_cycle_is_refused() {
        let mut graph = seeded();
        graph.add_edge(Edge::new("bc", "b", "c", 10.0)).unwrap();
        let before = graph.clone();
        let err = graph
            .update_edge(&EdgeId::from("bc"), EdgePatch::default().target("a"))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::CycleDetected {
                from: NodeId::from("b"),
                to: NodeId::from("a"),
            }
        );
        assert_eq!(graph, before);
    }

    #[test]
    fn delete_node_cascades_and_withdraws_emissions() {
        let mut graph = seeded();
        graph.add_edge(Edge::new("bc", "b", "c", 10.0)).unwrap();
        assert!(close(node_emissions(&graph, "c"), 5.0));

        let outcome = graph.delete_node(&NodeId::from("b")).unwrap();
        assert!(!graph.contains_node(&NodeId::from("b")));
        assert_eq!(graph.edge_count(), 0);
        assert!(close(node_emissions(&graph, "c"), 0.0));
        assert!(outcome.nodes_removed.contains(&NodeId::from("b")));
        assert_eq!(outcome.edges_removed.len(), 2);
    }

    #[test]
    fn delete_of_unknown_ids_is_not_found() {
        let mut graph = seeded();
        assert!(matches!(
            graph.delete_node(&NodeId::from("nope")),
            Err(CoreError::NotFound { kind: EntityKind::Node, .. })
        ));
        assert!(matches!(
            graph.delete_edge(&EdgeId::from("nope")),
            Err(CoreError::NotFound { kind: EntityKind::Edge, .. })
        ));
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let mut graph = seeded();
        let before = graph.clone();
        let batch = vec![
            Mutation::AddEdge {
                id: EdgeId::from("bc"),
                source: NodeId::from("b"),
                target: NodeId::from("c"),
                weight: 10.0,
            },
            Mutation::AddEdge {
                id: EdgeId::from("ca"),
                source: NodeId::from("c"),
                target: NodeId::from("a"),
                weight: 1.0,
            },
        ];
        let err = graph.apply_batch(&batch).unwrap_err();
        assert_eq!(err.index, 1);
        assert!(matches!(err.error, CoreError::CycleDetected { .. }));
        assert_eq!(graph, before);

        let outcome = graph.apply_batch(&batch[..1]).unwrap();
        assert!(outcome.edges_changed.contains(&EdgeId::from("bc")));
        assert!(close(node_emissions(&graph, "c"), 5.0));
    }

    #[test]
    fn batch_outcome_drops_entities_removed_later() {
        let mut graph = seeded();
        let batch = vec![
            Mutation::AddNode {
                id: NodeId::from("d"),
                name: "D".into(),
                weight: 1.0,
                emissions: 0.0,
                position: Position::default(),
            },
            Mutation::DeleteNode { id: NodeId::from("d") },
            Mutation::SetName { name: "mill".into() },
        ];
        let outcome = graph.apply_batch(&batch).unwrap();
        assert!(!outcome.nodes_changed.contains(&NodeId::from("d")));
        assert!(outcome.nodes_removed.contains(&NodeId::from("d")));
        assert_eq!(graph.name(), "mill");
    }

    #[test]
    fn mutation_wire_shape() {
        let batch: Vec<Mutation> = serde_json::from_str(
            r#"[
                {"type":"AddNode","id":"d","name":"D","weight":5,"emissions":1},
                {"type":"UpdateNode","id":"d","patch":{"emissions":2}},
                {"type":"AddEdge","id":"ad","source":"a","target":"d","weight":5},
                {"type":"UpdateEdge","id":"ad","patch":{"weight":4}},
                {"type":"DeleteEdge","id":"ad"},
                {"type":"DeleteNode","id":"d"}
            ]"#,
        )
        .unwrap();
        assert_eq!(batch.len(), 6);
        assert_eq!(batch[1].kind(), "updateNode");
        assert_eq!(
            batch[3],
            Mutation::UpdateEdge {
                id: EdgeId::from("ad"),
                patch: EdgePatch::default().weight(4.0),
            }
        );

        let mut graph = seeded();
        let before = graph.clone();
        graph.apply_batch(&batch).unwrap();
        assert_eq!(graph, before);
    }
}
