// crates/opa-gate-core/src/exchange.rs
// ============================================================================
// Module: Exchange
// Description: Message payload plus mutable annotations for one query.
// Purpose: Carry the policy input and receive the executor's side-channel
//          outputs.
// Dependencies: std
// ============================================================================

//! ## Overview
//! An [`Exchange`] wraps the opaque byte payload a pipeline hands to the
//! executor (expected to be a JSON document shaped `{"input": {...}}`) and
//! the string annotations the executor sets as a side effect:
//! [`HEADER_OPA_RESULT`] on a confirmed allow and [`HEADER_OPA_EXCEPTION`]
//! on a handled failure. Annotations live for one query only; nothing
//! persists across calls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

// ============================================================================
// SECTION: Annotation Names
// ============================================================================

/// Annotation set to [`RESULT_VALID`] when the policy service allowed the
/// input.
pub const HEADER_OPA_RESULT: &str = "OPA-RESULT";

/// Annotation carrying the failure description when `handle_error` is set.
pub const HEADER_OPA_EXCEPTION: &str = "OPA-Exception";

/// Value of [`HEADER_OPA_RESULT`] on the success path.
pub const RESULT_VALID: &str = "Valid";

// ============================================================================
// SECTION: Exchange
// ============================================================================

/// One in-flight message: an opaque payload plus mutable annotations.
///
/// # Invariants
/// - The payload is sent verbatim as the request body; the executor never
///   inspects or rewrites it.
/// - Annotations are the executor's only observable output besides a
///   returned error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exchange {
    /// Opaque request payload.
    body: Vec<u8>,
    /// String annotations attached by the executor.
    annotations: BTreeMap<String, String>,
}

impl Exchange {
    /// Creates an exchange around the given payload.
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            annotations: BTreeMap::new(),
        }
    }

    /// Returns the opaque payload bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the annotation value for `name`, if set.
    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&str> {
        self.annotations.get(name).map(String::as_str)
    }

    /// Sets the annotation `name` to `value`, replacing any prior value.
    pub fn set_annotation(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.annotations.insert(name.into(), value.into());
    }
}
