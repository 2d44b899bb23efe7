// crates/pidl-core/src/interfaces/mod.rs
// ============================================================================
// Module: PIDL Interfaces
// Description: Audit event payloads and the audit sink contract.
// Purpose: Let hosts observe resolutions without coupling the engine to I/O.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The engine reports every resolution, failure, and missing validator to a
//! [`ResolutionAuditSink`]. Sinks are best-effort: they never return errors
//! and never influence the resolved documents. Events serialize as single
//! JSON objects carrying an `event` label and a millisecond timestamp.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::hashing::HashDigest;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Successful resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Descriptor family.
    pub family: &'static str,
    /// Market code.
    pub country: String,
    /// Calling partner.
    pub partner: String,
    /// Partner used for axis matching.
    pub effective_partner: String,
    /// Operation.
    pub operation: String,
    /// Number of active flights.
    pub flight_count: usize,
    /// Base template id.
    pub base_template: String,
    /// Applied fragment ids in application order.
    pub fragments: Vec<String>,
    /// Number of documents returned.
    pub document_count: usize,
    /// Digest of the returned documents when computable.
    pub digest: Option<HashDigest>,
}

/// Failed resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionFailureEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Descriptor family label as requested.
    pub family: String,
    /// Market code.
    pub country: String,
    /// Calling partner.
    pub partner: String,
    /// Operation.
    pub operation: String,
    /// Normalized error kind label.
    pub error_kind: &'static str,
    /// Error message.
    pub message: String,
}

/// Validation chain exhausted without a global default.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatorMissingEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Rule property.
    pub property: String,
    /// Region queried.
    pub region: String,
    /// Operation queried.
    pub operation: String,
    /// Descriptor type queried.
    pub descriptor_type: String,
}

/// Inputs required to construct a resolution event.
pub struct ResolutionAuditEventParams {
    /// Descriptor family.
    pub family: &'static str,
    /// Market code.
    pub country: String,
    /// Calling partner.
    pub partner: String,
    /// Partner used for axis matching.
    pub effective_partner: String,
    /// Operation.
    pub operation: String,
    /// Number of active flights.
    pub flight_count: usize,
    /// Base template id.
    pub base_template: String,
    /// Applied fragment ids.
    pub fragments: Vec<String>,
    /// Number of documents returned.
    pub document_count: usize,
    /// Digest of the returned documents.
    pub digest: Option<HashDigest>,
}

impl ResolutionAuditEvent {
    /// Creates a resolution event stamped with the current time.
    #[must_use]
    pub fn new(params: ResolutionAuditEventParams) -> Self {
        Self {
            event: "descriptor_resolved",
            timestamp_ms: now_ms(),
            family: params.family,
            country: params.country,
            partner: params.partner,
            effective_partner: params.effective_partner,
            operation: params.operation,
            flight_count: params.flight_count,
            base_template: params.base_template,
            fragments: params.fragments,
            document_count: params.document_count,
            digest: params.digest,
        }
    }
}

impl ResolutionFailureEvent {
    /// Creates a failure event stamped with the current time.
    #[must_use]
    pub fn new(
        family: impl Into<String>,
        country: impl Into<String>,
        partner: impl Into<String>,
        operation: impl Into<String>,
        error_kind: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event: "descriptor_resolution_failed",
            timestamp_ms: now_ms(),
            family: family.into(),
            country: country.into(),
            partner: partner.into(),
            operation: operation.into(),
            error_kind,
            message: message.into(),
        }
    }
}

impl ValidatorMissingEvent {
    /// Creates a missing-validator event stamped with the current time.
    #[must_use]
    pub fn new(property: &str, region: &str, operation: &str, descriptor_type: &str) -> Self {
        Self {
            event: "validator_missing",
            timestamp_ms: now_ms(),
            property: property.to_string(),
            region: region.to_string(),
            operation: operation.to_string(),
            descriptor_type: descriptor_type.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Audit sink for resolution events.
pub trait ResolutionAuditSink: Send + Sync {
    /// Record a successful resolution.
    fn record_resolution(&self, _event: &ResolutionAuditEvent) {}

    /// Record a failed resolution.
    fn record_failure(&self, _event: &ResolutionFailureEvent) {}

    /// Record a missing validator.
    fn record_validator_missing(&self, _event: &ValidatorMissingEvent) {}
}

impl<T: ResolutionAuditSink + ?Sized> ResolutionAuditSink for Box<T> {
    fn record_resolution(&self, event: &ResolutionAuditEvent) {
        (**self).record_resolution(event);
    }

    fn record_failure(&self, event: &ResolutionFailureEvent) {
        (**self).record_failure(event);
    }

    fn record_validator_missing(&self, event: &ValidatorMissingEvent) {
        (**self).record_validator_missing(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ResolutionAuditSink for NoopAuditSink {}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Milliseconds since the Unix epoch; zero when the clock is before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}
