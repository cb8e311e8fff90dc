//! Validation response types.

use emigraph_check::{Detail, Violation};
use serde::Serialize;

/// Findings of a validation run. Never an error, even when not valid.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    /// Structural issues, then violations, as `{type, message}`.
    pub details: Vec<Detail>,
    /// The invariant violations with their locations.
    pub violations: Vec<Violation>,
}
