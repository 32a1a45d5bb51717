// crates/restgate-core/src/runtime/audit.rs
// ============================================================================
// Module: Restgate Audit Logging
// Description: Structured audit events for registry loading and dispatch.
// Purpose: Emit progress and outcome logs without hard dependencies.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for registry-load
//! progress and per-request dispatch outcomes. It is intentionally
//! lightweight so deployments can route events to their preferred logging
//! pipeline without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::DispatchRequest;
use crate::core::ResourceName;

// ============================================================================
// SECTION: Registry Events
// ============================================================================

/// Registry-load audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Resource name the event concerns, when per-resource.
    pub resource: Option<String>,
    /// Outcome label.
    pub outcome: &'static str,
    /// Failure reason, for failure events.
    pub reason: Option<String>,
    /// Registered resource count, for the publish event.
    pub resources: Option<usize>,
}

impl RegistryAuditEvent {
    /// Builds a per-resource load-started event.
    #[must_use]
    pub fn loading(resource: &ResourceName) -> Self {
        Self {
            event: "registry_load",
            resource: Some(resource.as_str().to_string()),
            outcome: "loading",
            reason: None,
            resources: None,
        }
    }

    /// Builds a per-resource load-succeeded event.
    #[must_use]
    pub fn loaded(resource: &ResourceName) -> Self {
        Self {
            event: "registry_load",
            resource: Some(resource.as_str().to_string()),
            outcome: "loaded",
            reason: None,
            resources: None,
        }
    }

    /// Builds a per-resource load-failed event.
    #[must_use]
    pub fn failed(resource: &ResourceName, reason: impl Into<String>) -> Self {
        Self {
            event: "registry_load",
            resource: Some(resource.as_str().to_string()),
            outcome: "failed",
            reason: Some(reason.into()),
            resources: None,
        }
    }

    /// Builds the snapshot-published event.
    #[must_use]
    pub const fn published(resources: usize) -> Self {
        Self {
            event: "registry_load",
            resource: None,
            outcome: "published",
            reason: None,
            resources: Some(resources),
        }
    }
}

/// Audit sink for registry-load events.
pub trait RegistryAuditSink: Send + Sync {
    /// Records a registry-load audit event.
    fn record(&self, event: &RegistryAuditEvent);
}

// ============================================================================
// SECTION: Dispatch Events
// ============================================================================

/// Per-request dispatch audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Tenant label the request was bound to.
    pub tenant: String,
    /// Requested resource class.
    pub resource: String,
    /// Requested API version.
    pub version: String,
    /// HTTP verb label.
    pub verb: &'static str,
    /// Caller subject, when authenticated.
    pub subject: Option<String>,
    /// Terminal outcome label (`completed` or `failed`).
    pub outcome: &'static str,
    /// Pipeline phase the request terminated in.
    pub phase: &'static str,
    /// Machine-readable failure reason, for failed requests.
    pub reason: Option<&'static str>,
    /// HTTP status of the rendered response.
    pub status: u16,
}

impl DispatchAuditEvent {
    /// Builds a completed-request event.
    #[must_use]
    pub fn completed(request: &DispatchRequest, status: u16) -> Self {
        Self {
            event: "dispatch",
            tenant: request.tenant.label().to_string(),
            resource: request.resource.as_str().to_string(),
            version: request.version.as_str().to_string(),
            verb: request.verb.as_str(),
            subject: request.principal.as_ref().map(|p| p.subject().to_string()),
            outcome: "completed",
            phase: "executing",
            reason: None,
            status,
        }
    }

    /// Builds a failed-request event.
    #[must_use]
    pub fn failed(
        request: &DispatchRequest,
        phase: &'static str,
        reason: &'static str,
        status: u16,
    ) -> Self {
        Self {
            event: "dispatch",
            tenant: request.tenant.label().to_string(),
            resource: request.resource.as_str().to_string(),
            version: request.version.as_str().to_string(),
            verb: request.verb.as_str(),
            subject: request.principal.as_ref().map(|p| p.subject().to_string()),
            outcome: "failed",
            phase,
            reason: Some(reason),
            status,
        }
    }
}

/// Audit sink for dispatch events.
pub trait DispatchAuditSink: Send + Sync {
    /// Records a dispatch audit event.
    fn record(&self, event: &DispatchAuditEvent);
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl RegistryAuditSink for StderrAuditSink {
    #[allow(clippy::print_stderr, reason = "This sink writes JSON lines to stderr by contract.")]
    fn record(&self, event: &RegistryAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            eprintln!("{payload}");
        }
    }
}

impl DispatchAuditSink for StderrAuditSink {
    #[allow(clippy::print_stderr, reason = "This sink writes JSON lines to stderr by contract.")]
    fn record(&self, event: &DispatchAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            eprintln!("{payload}");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuditSink;

impl RegistryAuditSink for NoopAuditSink {
    fn record(&self, _event: &RegistryAuditEvent) {}
}

impl DispatchAuditSink for NoopAuditSink {
    fn record(&self, _event: &DispatchAuditEvent) {}
}
