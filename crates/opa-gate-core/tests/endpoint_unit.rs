// crates/opa-gate-core/tests/endpoint_unit.rs
// ============================================================================
// Module: Endpoint Configuration Unit Tests
// Description: Tests for URL transformation, timeout budgets, and validation.
// Purpose: Pin the pure configuration behavior the executor relies on.
// ============================================================================

//! ## Overview
//! Covers the scheme-selecting URL transform, second-to-millisecond timeout
//! budgets with `0` meaning "transport default", address validation, and
//! operation kind parsing from both strings and configuration files.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::str::FromStr;
use std::time::Duration;

use opa_gate_core::EndpointConfigError;
use opa_gate_core::OpaEndpoint;
use opa_gate_core::OperationKind;

// ============================================================================
// SECTION: URL Transformation
// ============================================================================

/// Insecure endpoints resolve to an `http` URL over the bare address.
#[test]
fn url_uses_http_when_not_secure() {
    let endpoint = OpaEndpoint::new("127.0.0.1:8181/v1/data/myapi/policy/allow");
    assert_eq!(endpoint.url(), "http://127.0.0.1:8181/v1/data/myapi/policy/allow");
}

/// Secure endpoints resolve to an `https` URL over the bare address.
#[test]
fn url_uses_https_when_secure() {
    let endpoint = OpaEndpoint {
        secure: true,
        ..OpaEndpoint::new("opa.internal:8181/v1/data/myapi/policy/allow")
    };
    assert_eq!(endpoint.url(), "https://opa.internal:8181/v1/data/myapi/policy/allow");
}

// ============================================================================
// SECTION: Timeout Budgets
// ============================================================================

/// Zero timeouts leave the transport default untouched.
#[test]
fn zero_timeouts_mean_transport_default() {
    let endpoint = OpaEndpoint::new("127.0.0.1:8181/test");
    assert_eq!(endpoint.connect_budget(), None);
    assert_eq!(endpoint.connection_request_budget(), None);
    assert_eq!(endpoint.socket_budget(), None);
}

/// Positive timeouts convert from whole seconds to milliseconds.
#[test]
fn positive_timeouts_convert_to_milliseconds() {
    let endpoint = OpaEndpoint {
        connect_timeout: 4,
        connection_request_timeout: 2,
        socket_timeout: 30,
        ..OpaEndpoint::new("127.0.0.1:8181/test")
    };
    assert_eq!(endpoint.connect_budget(), Some(Duration::from_millis(4000)));
    assert_eq!(endpoint.connection_request_budget(), Some(Duration::from_millis(2000)));
    assert_eq!(endpoint.socket_budget(), Some(Duration::from_millis(30_000)));
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// An empty address is rejected.
#[test]
fn validate_rejects_empty_address() {
    let endpoint = OpaEndpoint::new("");
    assert!(matches!(endpoint.validate(), Err(EndpointConfigError::EmptyAddress)));
}

/// Addresses carrying their own scheme prefix are rejected; the scheme is
/// derived from the `secure` flag instead.
#[test]
fn validate_rejects_scheme_prefixed_address() {
    let endpoint = OpaEndpoint::new("http://127.0.0.1:8181/test");
    assert!(matches!(endpoint.validate(), Err(EndpointConfigError::AddressHasScheme(_))));
}

/// A bare authority + path address passes validation.
#[test]
fn validate_accepts_bare_address() {
    let endpoint = OpaEndpoint::new("localhost:8181/v1/data/myapi/policy/allow");
    assert!(endpoint.validate().is_ok());
}

// ============================================================================
// SECTION: Operation Kind
// ============================================================================

/// Operation kinds parse from their uppercase wire names and nothing else.
#[test]
fn operation_kind_parses_wire_names() {
    assert_eq!(OperationKind::from_str("QUERY").unwrap(), OperationKind::Query);
    assert_eq!(OperationKind::from_str("ACL").unwrap(), OperationKind::Acl);
    assert_eq!(OperationKind::from_str("POLICY").unwrap(), OperationKind::Policy);
    assert!(matches!(
        OperationKind::from_str("query"),
        Err(EndpointConfigError::UnknownOperation(_))
    ));
}

/// Display round-trips through the wire name.
#[test]
fn operation_kind_displays_wire_name() {
    assert_eq!(OperationKind::Query.to_string(), "QUERY");
    assert_eq!(OperationKind::Acl.to_string(), "ACL");
    assert_eq!(OperationKind::Policy.to_string(), "POLICY");
}

// ============================================================================
// SECTION: Configuration Loading
// ============================================================================

/// Endpoints deserialize from TOML with serde defaults for every optional
/// field.
#[test]
fn endpoint_deserializes_from_toml_with_defaults() {
    let endpoint: OpaEndpoint = toml::from_str(
        r#"
        address = "127.0.0.1:8181/v1/data/myapi/policy/allow"
        operation = "QUERY"
        "#,
    )
    .unwrap();
    assert_eq!(endpoint.address, "127.0.0.1:8181/v1/data/myapi/policy/allow");
    assert_eq!(endpoint.operation, Some(OperationKind::Query));
    assert!(!endpoint.secure);
    assert!(!endpoint.handle_error);
    assert_eq!(endpoint.connect_timeout, 0);
    assert_eq!(endpoint.connection_request_timeout, 0);
    assert_eq!(endpoint.socket_timeout, 0);
}

/// Explicit fields override the defaults.
#[test]
fn endpoint_deserializes_explicit_fields() {
    let endpoint: OpaEndpoint = toml::from_str(
        r#"
        address = "opa.internal:8181/v1/data/app/allow"
        secure = true
        handle_error = true
        connect_timeout = 4
        socket_timeout = 10
        "#,
    )
    .unwrap();
    assert!(endpoint.secure);
    assert!(endpoint.handle_error);
    assert_eq!(endpoint.connect_timeout, 4);
    assert_eq!(endpoint.socket_timeout, 10);
    assert_eq!(endpoint.operation, None);
}

/// Unknown configuration keys are rejected rather than ignored.
#[test]
fn endpoint_rejects_unknown_fields() {
    let parsed: Result<OpaEndpoint, _> = toml::from_str(
        r#"
        address = "127.0.0.1:8181/test"
        retries = 3
        "#,
    );
    assert!(parsed.is_err());
}
