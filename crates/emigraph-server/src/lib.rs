//! HTTP/JSON API server for emission graphs.
//!
//! Provides a REST API to save, load, list, replace, and delete graph
//! snapshots, to edit stored graphs through the Mutation API, and to run
//! the standalone validator on arbitrary snapshots. Every write passes the
//! admission gate, so a stored graph always satisfies the graph invariants.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
