//! Standalone validation of whole-graph snapshots.
//!
//! The Mutation API keeps a graph consistent edit by edit. Snapshots that
//! arrive from outside (storage, network requests, files) have no such
//! history, so they are re-checked from scratch here before anything trusts
//! them.
//!
//! - [`violation`]: finding types
//! - [`validator`]: the invariant scan, [`validate`]
//! - [`admission`]: the trust-boundary gate, [`admit`]

pub mod admission;
pub mod validator;
pub mod violation;

pub use admission::{admit, review, Detail, Rejection};
pub use validator::validate;
pub use violation::{Location, Violation, ViolationKind};
