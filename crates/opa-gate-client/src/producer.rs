// crates/opa-gate-client/src/producer.rs
// ============================================================================
// Module: Policy Query Producer
// Description: One-shot request/response cycle against the policy service.
// Purpose: Build the query request, decode the verdict, and route failures.
// Dependencies: opa-gate-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! [`OpaProducer`] executes exactly one query operation per invocation. It
//! dispatches on the endpoint's [`OperationKind`], POSTs the exchange
//! payload verbatim to the scheme-qualified endpoint URL, and decodes a
//! `200` response into a [`Decision`]. Anything other than a confirmed
//! allow — deny, non-200 status, undecodable body, transport fault, missing
//! or unimplemented operation — is resolved by
//! [`opa_gate_core::route_failure`].
//! Invariants:
//! - `OPA-RESULT = "Valid"` is set only on a confirmed allow.
//! - The HTTP client is constructed per call and dropped on every exit
//!   path; nothing is shared between concurrent invocations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use opa_gate_core::Decision;
use opa_gate_core::Exchange;
use opa_gate_core::HEADER_OPA_RESULT;
use opa_gate_core::OpaEndpoint;
use opa_gate_core::OperationKind;
use opa_gate_core::QueryError;
use opa_gate_core::RESULT_VALID;
use opa_gate_core::route_failure;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use tracing::trace;

// ============================================================================
// SECTION: Producer
// ============================================================================

/// Executor for policy query operations.
///
/// Stateless: all per-destination parameters live in the [`OpaEndpoint`]
/// passed to [`OpaProducer::process`], so one producer may serve any number
/// of concurrent invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaProducer;

impl OpaProducer {
    /// Creates a producer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes one operation for the exchange against the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the query is denied or fails and the
    /// endpoint's `handle_error` flag is unset; with the flag set, failures
    /// are attached to the exchange as an `OPA-Exception` annotation and
    /// the call returns `Ok(())`.
    pub fn process(
        &self,
        endpoint: &OpaEndpoint,
        exchange: &mut Exchange,
    ) -> Result<(), QueryError> {
        match endpoint.operation {
            Some(OperationKind::Query) => query(endpoint, exchange),
            Some(kind @ (OperationKind::Acl | OperationKind::Policy)) => {
                trace!(operation = %kind, "operation kind has no implemented protocol");
                route_failure(endpoint.handle_error, QueryError::Unsupported(kind), exchange)
            }
            None => route_failure(endpoint.handle_error, QueryError::MissingOperation, exchange),
        }
    }
}

// ============================================================================
// SECTION: Query Protocol
// ============================================================================

/// Performs one synchronous query round trip and routes the outcome.
///
/// # Errors
///
/// Returns [`QueryError`] per the endpoint's error-routing policy.
fn query(endpoint: &OpaEndpoint, exchange: &mut Exchange) -> Result<(), QueryError> {
    // The client lives for this call only; dropping it on any exit path
    // below releases the connection.
    let client = match build_client(endpoint) {
        Ok(client) => client,
        Err(error) => return route_failure(endpoint.handle_error, error, exchange),
    };

    let url = endpoint.url();
    trace!(%url, bytes = exchange.body().len(), "dispatching policy query");

    match client.post(url).body(exchange.body().to_vec()).send() {
        Ok(response) => resolve_response(endpoint, response, exchange),
        Err(error) => {
            route_failure(endpoint.handle_error, QueryError::Transport(error.to_string()), exchange)
        }
    }
}

/// Decodes the service response and routes anything short of a confirmed
/// allow.
///
/// # Errors
///
/// Returns [`QueryError`] per the endpoint's error-routing policy.
fn resolve_response(
    endpoint: &OpaEndpoint,
    response: Response,
    exchange: &mut Exchange,
) -> Result<(), QueryError> {
    if response.status().as_u16() != 200 {
        let failure = QueryError::Protocol(format!(
            "Error calling OPA endpoint: {}",
            endpoint.address
        ));
        return route_failure(endpoint.handle_error, failure, exchange);
    }

    let body = match response.bytes() {
        Ok(body) => body,
        Err(error) => {
            let failure = QueryError::Transport(error.to_string());
            return route_failure(endpoint.handle_error, failure, exchange);
        }
    };

    match serde_json::from_slice::<Decision>(&body) {
        Ok(Decision { result: true }) => {
            trace!("policy query allowed");
            exchange.set_annotation(HEADER_OPA_RESULT, RESULT_VALID);
            Ok(())
        }
        Ok(Decision { result: false }) => {
            route_failure(endpoint.handle_error, QueryError::Denied, exchange)
        }
        Err(error) => {
            let failure = QueryError::Protocol(format!("failed to decode OPA decision: {error}"));
            route_failure(endpoint.handle_error, failure, exchange)
        }
    }
}

// ============================================================================
// SECTION: Client Construction
// ============================================================================

/// Builds a per-call HTTP client with the endpoint's timeout budgets.
///
/// Per-call clients hold no connection pool, so the connection acquisition
/// budget bounds the same connect phase as the connect timeout; when both
/// are set the tighter one wins. A budget of zero leaves the transport
/// default untouched.
///
/// # Errors
///
/// Returns [`QueryError::Transport`] when the client cannot be constructed.
fn build_client(endpoint: &OpaEndpoint) -> Result<Client, QueryError> {
    let mut builder = Client::builder();

    let connect = match (endpoint.connect_budget(), endpoint.connection_request_budget()) {
        (Some(connect), Some(acquire)) => Some(connect.min(acquire)),
        (connect, acquire) => connect.or(acquire),
    };
    if let Some(connect) = connect {
        builder = builder.connect_timeout(connect);
    }
    if let Some(socket) = endpoint.socket_budget() {
        builder = builder.timeout(socket);
    }

    builder
        .build()
        .map_err(|error| QueryError::Transport(format!("failed to build HTTP client: {error}")))
}
