// crates/opa-gate-client/src/lib.rs
// ============================================================================
// Module: OPA Gate Client
// Description: Synchronous policy query executor.
// Purpose: Perform one HTTP round trip per invocation against a policy
//          decision service and route the outcome.
// Dependencies: opa-gate-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! This crate ships [`OpaProducer`], the executor that takes an
//! [`opa_gate_core::OpaEndpoint`] and an [`opa_gate_core::Exchange`],
//! performs one blocking POST against the configured policy service, and
//! resolves the verdict through the core error-routing policy.
//! Invariants:
//! - One invocation, one round trip; no retries, no caching.
//! - The HTTP client is scoped to the call and released on every exit path.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod producer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use producer::OpaProducer;
