// crates/opa-gate-core/src/endpoint.rs
// ============================================================================
// Module: Endpoint Configuration
// Description: Immutable per-destination configuration for policy queries.
// Purpose: Describe where and how to reach the policy decision service.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An [`OpaEndpoint`] is resolved once per configured destination and then
//! shared read-only across queries. The address is stored as a bare
//! authority + path with no scheme prefix; [`OpaEndpoint::url`] prepends
//! `https://` or `http://` from the `secure` flag, so no offset-based
//! string surgery is ever needed.
//! Invariants:
//! - No field mutates after construction.
//! - `address` never carries its own scheme prefix.
//! - A timeout of `0` means "use the transport default".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Operation Kind
// ============================================================================

/// Protocol variant an endpoint configuration executes.
///
/// Only [`OperationKind::Query`] has a defined protocol. The other kinds
/// resolve to an explicit "not implemented" failure instead of silently
/// succeeding, so a pipeline can never mistake an unchecked request for an
/// authorized one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum OperationKind {
    /// Ask the policy service for an allow/deny decision.
    #[serde(rename = "QUERY")]
    Query,
    /// Manage access control lists. Not implemented.
    #[serde(rename = "ACL")]
    Acl,
    /// Manage policy documents. Not implemented.
    #[serde(rename = "POLICY")]
    Policy,
}

impl OperationKind {
    /// Returns the wire name of the operation kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Acl => "ACL",
            Self::Policy => "POLICY",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = EndpointConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "QUERY" => Ok(Self::Query),
            "ACL" => Ok(Self::Acl),
            "POLICY" => Ok(Self::Policy),
            other => Err(EndpointConfigError::UnknownOperation(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Errors raised while validating an endpoint configuration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EndpointConfigError {
    /// The endpoint address is empty.
    #[error("OPA endpoint address must not be empty")]
    EmptyAddress,
    /// The endpoint address carries its own scheme prefix.
    #[error("OPA endpoint address must not include a scheme prefix: {0}")]
    AddressHasScheme(String),
    /// The operation name does not match a known kind.
    #[error("unknown OPA operation kind: {0}")]
    UnknownOperation(String),
}

// ============================================================================
// SECTION: Endpoint Configuration
// ============================================================================

/// Immutable configuration for one policy decision destination.
///
/// # Invariants
/// - `address` is a bare `host:port/path` without a scheme prefix.
/// - Timeouts are whole seconds; `0` leaves the transport default in place.
/// - `operation` must be set before the first query; `None` at query time
///   is a configuration failure routed like any other query failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpaEndpoint {
    /// Authority and path of the policy decision to query,
    /// e.g. `127.0.0.1:8181/v1/data/myapi/policy/allow`.
    pub address: String,
    /// Call the policy service over HTTPS instead of HTTP.
    #[serde(default)]
    pub secure: bool,
    /// Attach failures to the exchange as an `OPA-Exception` annotation
    /// instead of raising an error that aborts the caller's pipeline.
    #[serde(default)]
    pub handle_error: bool,
    /// Connect timeout in seconds.
    #[serde(default)]
    pub connect_timeout: u64,
    /// Connection acquisition timeout in seconds.
    #[serde(default)]
    pub connection_request_timeout: u64,
    /// Socket read timeout in seconds.
    #[serde(default)]
    pub socket_timeout: u64,
    /// Protocol variant to execute.
    #[serde(default)]
    pub operation: Option<OperationKind>,
}

impl OpaEndpoint {
    /// Creates a configuration for the given bare address with all optional
    /// fields at their defaults.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            secure: false,
            handle_error: false,
            connect_timeout: 0,
            connection_request_timeout: 0,
            socket_timeout: 0,
            operation: None,
        }
    }

    /// Returns the destination URL, selecting the scheme from `secure`.
    #[must_use]
    pub fn url(&self) -> String {
        if self.secure {
            format!("https://{}", self.address)
        } else {
            format!("http://{}", self.address)
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointConfigError`] when the address is empty or already
    /// carries a scheme prefix.
    pub fn validate(&self) -> Result<(), EndpointConfigError> {
        if self.address.is_empty() {
            return Err(EndpointConfigError::EmptyAddress);
        }
        if self.address.contains("://") {
            return Err(EndpointConfigError::AddressHasScheme(self.address.clone()));
        }
        Ok(())
    }

    /// Returns the connect timeout, or `None` for the transport default.
    #[must_use]
    pub const fn connect_budget(&self) -> Option<Duration> {
        budget(self.connect_timeout)
    }

    /// Returns the connection acquisition timeout, or `None` for the
    /// transport default.
    #[must_use]
    pub const fn connection_request_budget(&self) -> Option<Duration> {
        budget(self.connection_request_timeout)
    }

    /// Returns the socket read timeout, or `None` for the transport default.
    #[must_use]
    pub const fn socket_budget(&self) -> Option<Duration> {
        budget(self.socket_timeout)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a whole-second timeout to a millisecond [`Duration`], treating
/// `0` as "use the transport default".
const fn budget(seconds: u64) -> Option<Duration> {
    if seconds == 0 {
        None
    } else {
        Some(Duration::from_millis(seconds.saturating_mul(1000)))
    }
}
