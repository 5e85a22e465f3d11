// crates/opa-gate-core/src/error.rs
// ============================================================================
// Module: Query Errors
// Description: Failure taxonomy and the handle_error routing policy.
// Purpose: Funnel every query failure through one "annotate or propagate"
//          decision point.
// Dependencies: thiserror, tracing, crate::endpoint, crate::exchange
// ============================================================================

//! ## Overview
//! Every way a policy query can fail — missing operation kind, transport
//! fault, protocol violation, explicit deny, unimplemented operation — is a
//! [`QueryError`] variant, and every one of them is resolved by
//! [`route_failure`]. With `handle_error` set the failure becomes an
//! `OPA-Exception` annotation and the pipeline continues; without it the
//! error propagates and aborts the pipeline.
//! Invariants:
//! - Variants are stable for programmatic handling.
//! - Display texts are the failure descriptions callers observe, either as
//!   the annotation value or as the propagated error message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use tracing::debug;

use crate::endpoint::OperationKind;
use crate::exchange::Exchange;
use crate::exchange::HEADER_OPA_EXCEPTION;

// ============================================================================
// SECTION: Query Errors
// ============================================================================

/// Failure of one policy query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The endpoint configuration carries no operation kind.
    #[error("Error calling OPA endpoint: Missing Operation type")]
    MissingOperation,
    /// The request never completed: connection refused, DNS failure,
    /// timeout.
    #[error("{0}")]
    Transport(String),
    /// The service answered outside the protocol: a non-200 status, or a
    /// 200 body without a decodable `result` field.
    #[error("{0}")]
    Protocol(String),
    /// The policy service evaluated the input and denied it.
    #[error("OPA returned not allowed")]
    Denied,
    /// The configured operation kind has no implemented protocol.
    #[error("OPA operation {0} is not implemented")]
    Unsupported(OperationKind),
}

// ============================================================================
// SECTION: Error Routing
// ============================================================================

/// Resolves a query failure according to the endpoint's error-routing
/// policy.
///
/// With `handle_error` set, the failure description is attached to the
/// exchange as [`HEADER_OPA_EXCEPTION`] and the query counts as handled.
/// Otherwise the error is returned for the caller's pipeline to abort on.
///
/// # Errors
///
/// Returns `error` unchanged when `handle_error` is false.
pub fn route_failure(
    handle_error: bool,
    error: QueryError,
    exchange: &mut Exchange,
) -> Result<(), QueryError> {
    if handle_error {
        debug!(failure = %error, "policy query failed, attaching annotation");
        exchange.set_annotation(HEADER_OPA_EXCEPTION, error.to_string());
        Ok(())
    } else {
        debug!(failure = %error, "policy query failed, propagating");
        Err(error)
    }
}
