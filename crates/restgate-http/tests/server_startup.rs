// crates/restgate-http/tests/server_startup.rs
// ============================================================================
// Module: Server Startup Tests
// Description: Tests for configuration and registry gating at startup.
// ============================================================================
//! ## Overview
//! Validates that the server refuses to reach the serving state on invalid
//! configuration or a failed registry load.

#![allow(clippy::unwrap_used, reason = "Tests unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

use std::sync::Arc;

use restgate_config::RestgateConfig;
use restgate_core::ActionDefinition;
use restgate_core::ActionKey;
use restgate_core::ActionResponse;
use restgate_core::ActionTable;
use restgate_core::FixedResponseHandler;
use restgate_core::HttpVerb;
use restgate_core::InMemoryTenantDirectory;
use restgate_core::ResourceDefinition;
use restgate_core::SchemaRef;
use restgate_core::StaticResourceCatalog;
use restgate_http::RestgateServer;
use restgate_http::ServerError;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Builds a config with the given bind address.
fn config(bind: Option<&str>) -> RestgateConfig {
    let mut config = RestgateConfig::default();
    config.server.bind = bind.map(str::to_string);
    config
}

/// Builds a catalog with one valid resource.
fn valid_catalog() -> Arc<StaticResourceCatalog> {
    let mut catalog = StaticResourceCatalog::new();
    let table = ActionTable::new().route(
        "v1",
        HttpVerb::Get,
        ActionKey::Default,
        ActionDefinition::new(FixedResponseHandler::new(ActionResponse::ok(json!({})))),
    );
    catalog
        .register(ResourceDefinition::new("order", SchemaRef::new(json!({}))), table)
        .unwrap();
    Arc::new(catalog)
}

/// Builds a catalog whose only resource has an empty action table.
fn broken_catalog() -> Arc<StaticResourceCatalog> {
    let mut catalog = StaticResourceCatalog::new();
    catalog
        .register(ResourceDefinition::new("order", SchemaRef::new(json!({}))), ActionTable::new())
        .unwrap();
    Arc::new(catalog)
}

// ============================================================================
// SECTION: Startup Gating
// ============================================================================

#[tokio::test]
async fn missing_bind_address_refuses_to_serve() {
    let server = RestgateServer::from_parts(
        config(None),
        valid_catalog(),
        Arc::new(InMemoryTenantDirectory::new()),
    )
    .expect("server build");

    let error = server.serve().await.expect_err("serve must fail");
    assert!(matches!(error, ServerError::Config(_)));
}

#[tokio::test]
async fn failed_registry_load_prevents_serving() {
    let server = RestgateServer::from_parts(
        config(Some("127.0.0.1:0")),
        broken_catalog(),
        Arc::new(InMemoryTenantDirectory::new()),
    )
    .expect("server build");

    let error = server.serve().await.expect_err("serve must fail");
    assert!(matches!(error, ServerError::Registry(_)));
}

#[tokio::test]
async fn invalid_config_is_rejected_at_build_time() {
    let mut invalid = config(Some("127.0.0.1:0"));
    invalid.server.max_body_bytes = 0;

    let outcome = RestgateServer::from_parts(
        invalid,
        valid_catalog(),
        Arc::new(InMemoryTenantDirectory::new()),
    );
    assert!(matches!(outcome, Err(ServerError::Config(_))));
}
