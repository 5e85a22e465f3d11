// crates/opa-gate-core/src/lib.rs
// ============================================================================
// Module: OPA Gate Core
// Description: Data model and error routing for policy authorization checks.
// Purpose: Define the configuration, exchange, and failure contracts shared
//          by policy query executors.
// Dependencies: serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate holds the backend-agnostic model for querying an Open Policy
//! Agent style decision service: the per-destination [`OpaEndpoint`]
//! configuration, the [`Exchange`] carrying a payload and its annotations,
//! the decoded [`Decision`], and the [`QueryError`] taxonomy together with
//! the `handle_error`-gated routing policy [`route_failure`].
//! Invariants:
//! - [`OpaEndpoint`] is immutable after construction and safe to share
//!   read-only across concurrent queries.
//! - Every query failure, whatever its kind, funnels through
//!   [`route_failure`]; no other code decides "annotate" vs "propagate".

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod decision;
pub mod endpoint;
pub mod error;
pub mod exchange;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use decision::Decision;
pub use endpoint::EndpointConfigError;
pub use endpoint::OpaEndpoint;
pub use endpoint::OperationKind;
pub use error::QueryError;
pub use error::route_failure;
pub use exchange::Exchange;
pub use exchange::HEADER_OPA_EXCEPTION;
pub use exchange::HEADER_OPA_RESULT;
pub use exchange::RESULT_VALID;
