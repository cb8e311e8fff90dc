//! Emission Graph Consistency Engine.
//!
//! A [`FlowGraph`] is a directed acyclic graph of nodes carrying a weight
//! and an emissions quantity, joined by edges that route part of the source
//! node's weight downstream together with a proportional share of its
//! emissions. The engine keeps four invariants true after every committed
//! edit:
//!
//! 1. the edges form a DAG;
//! 2. a node's outbound edge weights never exceed its weight;
//! 3. a node's emissions never fall below its inbound edge emissions;
//! 4. every edge's emissions equal [`edge_emissions`] of its source.
//!
//! # Modules
//!
//! - [`id`], [`node`], [`edge`], [`graph`], [`snapshot`]: the graph model and
//!   its wire shape
//! - [`topology`]: cycle detection
//! - [`budget`]: weight and emissions budgets
//! - [`propagate`]: staged recomputation of downstream emissions
//! - [`mutation`]: the atomic edit operations
//! - [`error`]: the typed failures of all of the above

pub mod budget;
pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod mutation;
pub mod node;
pub mod propagate;
pub mod snapshot;
pub mod topology;

// Re-export commonly used types
pub use budget::{outbound_within_budget, inbound_within_emissions, WeightChange};
pub use edge::{edge_emissions, Edge, EdgePatch, EMISSIONS_TOLERANCE};
pub use error::{BatchError, BudgetKind, CoreError, EntityKind};
pub use graph::FlowGraph;
pub use id::{EdgeId, NodeId};
pub use mutation::{Mutation, MutationOutcome};
pub use node::{Node, NodePatch, Position};
pub use snapshot::GraphSnapshot;
pub use topology::{find_cycles, would_create_cycle};
