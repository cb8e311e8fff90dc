//! End-to-end editing scenarios through the public Mutation API.

use emigraph_core::{
    BudgetKind, CoreError, Edge, EdgeId, EdgePatch, FlowGraph, Node, NodeId, NodePatch,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn emissions(graph: &FlowGraph, node: &str) -> f64 {
    graph.node(&NodeId::from(node)).unwrap().emissions
}

fn edge_emissions(graph: &FlowGraph, edge: &str) -> f64 {
    graph.edge(&EdgeId::from(edge)).unwrap().emissions
}

/// A {weight:100, emissions:50} routing 50 to B.
fn scenario_one() -> FlowGraph {
    let mut graph = FlowGraph::new("scenario");
    graph.add_node(Node::new("A", "Mill", 100.0, 50.0)).unwrap();
    graph.add_node(Node::new("B", "Kiln", 50.0, 0.0)).unwrap();
    graph.add_node(Node::new("C", "Silo", 60.0, 0.0)).unwrap();
    graph.add_edge(Edge::new("AB", "A", "B", 50.0)).unwrap();
    graph
}

#[test]
fn edge_emissions_follow_the_routed_share() {
    let graph = scenario_one();
    assert!(close(edge_emissions(&graph, "AB"), 25.0));
}

#[test]
fn back_edge_is_rejected_and_graph_unchanged() {
    let mut graph = scenario_one();
    let before = graph.clone();
    let err = graph.add_edge(Edge::new("BA", "B", "A", 10.0)).unwrap_err();
    assert_eq!(
        err,
        CoreError::CycleDetected {
            from: NodeId::from("B"),
            to: NodeId::from("A"),
        }
    );
    assert_eq!(graph, before);
}

#[test]
fn outbound_overflow_is_rejected() {
    let mut graph = scenario_one();
    let before = graph.clone();
    let err = graph.add_edge(Edge::new("AC", "A", "C", 60.0)).unwrap_err();
    assert_eq!(
        err,
        CoreError::BudgetExceeded {
            kind: BudgetKind::Weight,
            node: NodeId::from("A"),
        }
    );
    assert_eq!(graph, before);
}

#[test]
fn source_emissions_update_reaches_every_hop() {
    let mut graph = scenario_one();
    graph.add_edge(Edge::new("BC", "B", "C", 25.0)).unwrap();
    // (25 / 50) * 25
    assert!(close(emissions(&graph, "C"), 12.5));

    graph
        .update_node(&NodeId::from("A"), NodePatch::default().emissions(100.0))
        .unwrap();

    assert!(close(edge_emissions(&graph, "AB"), 50.0));
    assert!(close(emissions(&graph, "B"), 50.0));
    assert!(close(edge_emissions(&graph, "BC"), 25.0));
    assert!(close(emissions(&graph, "C"), 25.0));
}

#[test]
fn deleting_an_edge_withdraws_its_emissions() {
    let mut graph = scenario_one();
    graph.add_edge(Edge::new("BC", "B", "C", 25.0)).unwrap();
    let a_before = graph.node(&NodeId::from("A")).cloned();

    graph.delete_edge(&EdgeId::from("AB")).unwrap();

    assert!(close(emissions(&graph, "B"), 0.0));
    assert!(close(edge_emissions(&graph, "BC"), 0.0));
    assert!(close(emissions(&graph, "C"), 0.0));
    assert_eq!(graph.node(&NodeId::from("A")).cloned(), a_before);
}

#[test]
fn repeated_edits_do_not_drift_from_the_formula() {
    let mut graph = scenario_one();
    graph.add_edge(Edge::new("BC", "B", "C", 30.0)).unwrap();

    for round in 0..50 {
        let value = 10.0 + f64::from(round % 7) * 13.0;
        graph
            .update_node(&NodeId::from("A"), NodePatch::default().emissions(value))
            .unwrap();
        let weight = 10.0 + f64::from(round % 5) * 10.0;
        graph
            .update_edge(&EdgeId::from("AB"), EdgePatch::default().weight(weight))
            .unwrap();
    }

    for edge in graph.edges() {
        let source = graph.node(&edge.source).unwrap();
        let expected = emigraph_core::edge_emissions(source.weight, source.emissions, edge.weight);
        assert!((edge.emissions - expected).abs() < emigraph_core::EMISSIONS_TOLERANCE);
    }
    let b = graph.node(&NodeId::from("B")).unwrap();
    assert!(close(b.emissions, edge_emissions(&graph, "AB")));
}
