//! HTTP handler modules for the emigraph API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`GraphService`](crate::service::GraphService),
//! and return JSON responses. No business logic lives in handlers.

pub mod graphs;
pub mod health;
pub mod mutations;
pub mod validate;
