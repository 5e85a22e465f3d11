// crates/opa-gate-core/src/decision.rs
// ============================================================================
// Module: Decision
// Description: Decoded verdict returned by the policy service.
// Purpose: Model the single boolean the query protocol cares about.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The policy service answers a query with a JSON object carrying one
//! boolean field, `result`. Nothing else is modeled; a response without a
//! decodable `result` is a protocol failure at the call site, never an
//! implicit deny.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Verdict decoded from a `200` response body.
///
/// # Invariants
/// - `result` is required; decoding fails when it is absent or not a bool.
/// - Extra response fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Decision {
    /// True when the policy allows the input.
    pub result: bool,
}
