// crates/restgate-http/src/auth.rs
// ============================================================================
// Module: HTTP Principal Resolution
// Description: Bearer-token principal resolution for inbound requests.
// Purpose: Turn request credentials into principals, or leave them anonymous.
// Dependencies: restgate-config, restgate-core, serde, sha2
// ============================================================================

//! ## Overview
//! The principal resolver maps request credentials to an authenticated
//! [`Principal`], or leaves the request anonymous when no valid credentials
//! are presented. Resolution never rejects a request by itself: the
//! permission gate is the deciding authority. Audit events carry a sha256
//! token fingerprint, never the raw token.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use restgate_config::AuthConfig;
use restgate_core::PermissionName;
use restgate_core::Principal;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted authorization header size in bytes.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Resolver Interface
// ============================================================================

/// Resolves request credentials into an optional principal.
pub trait PrincipalResolver: Send + Sync {
    /// Resolves the authorization header into a principal, or `None` for
    /// anonymous callers.
    fn resolve(&self, auth_header: Option<&str>) -> Option<Principal>;
}

// ============================================================================
// SECTION: Static Resolver
// ============================================================================

/// Principal resolver backed by configured bearer tokens.
pub struct StaticPrincipalResolver {
    /// Principals keyed by bearer token.
    principals: BTreeMap<String, Principal>,
    /// Sink for resolution audit events.
    audit: Arc<dyn AuthAuditSink>,
}

impl StaticPrincipalResolver {
    /// Builds a resolver from the auth configuration.
    #[must_use]
    pub fn from_config(config: &AuthConfig, audit: Arc<dyn AuthAuditSink>) -> Self {
        let principals = config
            .principals
            .iter()
            .map(|entry| {
                let principal = Principal::new(
                    entry.subject.clone(),
                    entry.permissions.iter().map(|name| PermissionName::new(name.as_str())),
                );
                (entry.token.clone(), principal)
            })
            .collect();
        Self {
            principals,
            audit,
        }
    }
}

impl PrincipalResolver for StaticPrincipalResolver {
    fn resolve(&self, auth_header: Option<&str>) -> Option<Principal> {
        let Some(header) = auth_header else {
            self.audit.record(&AuthAuditEvent::anonymous());
            return None;
        };
        let Some(token) = parse_bearer_token(header) else {
            self.audit.record(&AuthAuditEvent::invalid_header());
            return None;
        };
        match self.principals.get(&token) {
            Some(principal) => {
                self.audit.record(&AuthAuditEvent::resolved(principal, &token));
                Some(principal.clone())
            }
            None => {
                self.audit.record(&AuthAuditEvent::unknown_token(&token));
                None
            }
        }
    }
}

// ============================================================================
// SECTION: Bearer Parsing
// ============================================================================

/// Extracts the bearer token from an authorization header value.
#[must_use]
pub fn parse_bearer_token(header: &str) -> Option<String> {
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return None;
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Returns the sha256 hex fingerprint of a token for audit labeling.
#[must_use]
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Principal resolution audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Resolution outcome label.
    pub outcome: &'static str,
    /// Resolved subject, when a principal matched.
    pub subject: Option<String>,
    /// Bearer token fingerprint (sha256), when a token was presented.
    pub token_fingerprint: Option<String>,
}

impl AuthAuditEvent {
    /// Builds an event for a request with no credentials.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            event: "principal_resolution",
            outcome: "anonymous",
            subject: None,
            token_fingerprint: None,
        }
    }

    /// Builds an event for an unparseable authorization header.
    #[must_use]
    pub const fn invalid_header() -> Self {
        Self {
            event: "principal_resolution",
            outcome: "invalid_header",
            subject: None,
            token_fingerprint: None,
        }
    }

    /// Builds an event for a token that matched no principal.
    #[must_use]
    pub fn unknown_token(token: &str) -> Self {
        Self {
            event: "principal_resolution",
            outcome: "unknown_token",
            subject: None,
            token_fingerprint: Some(token_fingerprint(token)),
        }
    }

    /// Builds an event for a resolved principal.
    #[must_use]
    pub fn resolved(principal: &Principal, token: &str) -> Self {
        Self {
            event: "principal_resolution",
            outcome: "resolved",
            subject: Some(principal.subject().to_string()),
            token_fingerprint: Some(token_fingerprint(token)),
        }
    }
}

/// Audit sink for principal resolution events.
pub trait AuthAuditSink: Send + Sync {
    /// Records a resolution audit event.
    fn record(&self, event: &AuthAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuthAuditSink;

impl AuthAuditSink for StderrAuthAuditSink {
    #[allow(clippy::print_stderr, reason = "This sink writes JSON lines to stderr by contract.")]
    fn record(&self, event: &AuthAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            eprintln!("{payload}");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuthAuditSink;

impl AuthAuditSink for NoopAuthAuditSink {
    fn record(&self, _event: &AuthAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
