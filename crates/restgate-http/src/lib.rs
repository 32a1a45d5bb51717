// crates/restgate-http/src/lib.rs
// ============================================================================
// Module: Restgate HTTP Library
// Description: HTTP transport for the Restgate dispatch core.
// Purpose: Expose the server, routes, and principal resolution.
// Dependencies: crate::{auth, server}
// ============================================================================

//! ## Overview
//! `restgate-http` serves the Restgate dispatch core over axum: two generic
//! route templates cover every registered resource class, credentials
//! resolve to principals through a pluggable seam, and the registry loads
//! before the listener binds.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::AuthAuditEvent;
pub use auth::AuthAuditSink;
pub use auth::NoopAuthAuditSink;
pub use auth::PrincipalResolver;
pub use auth::StaticPrincipalResolver;
pub use auth::StderrAuthAuditSink;
pub use auth::parse_bearer_token;
pub use auth::token_fingerprint;
pub use server::RestgateServer;
pub use server::ServerError;
