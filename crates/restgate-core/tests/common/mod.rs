// crates/restgate-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Fixtures
// Description: Shared catalogs, handlers, and snapshot builders for tests.
// ============================================================================
//! ## Overview
//! Fixture helpers shared across the core test suites.

#![allow(dead_code, reason = "Each test binary uses a subset of the fixtures.")]
#![allow(clippy::expect_used, reason = "Fixture construction fails loudly in tests.")]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use restgate_core::ActionDefinition;
use restgate_core::ActionHandler;
use restgate_core::ActionKey;
use restgate_core::ActionResponse;
use restgate_core::ActionTable;
use restgate_core::BoundModelSet;
use restgate_core::ExecutionContext;
use restgate_core::ExecutionError;
use restgate_core::FixedResponseHandler;
use restgate_core::HttpVerb;
use restgate_core::NoopAuditSink;
use restgate_core::RegistryLoader;
use restgate_core::RegistrySnapshot;
use restgate_core::ResourceDefinition;
use restgate_core::ResourceScope;
use restgate_core::SchemaRef;
use restgate_core::StaticResourceCatalog;
use serde_json::json;

/// Builds a resource definition with a trivial schema shape.
pub fn definition(name: &str) -> ResourceDefinition {
    ResourceDefinition::new(
        name,
        SchemaRef::new(json!({
            "fields": {},
        })),
    )
}

/// Builds a resource definition with an explicit scope.
pub fn scoped_definition(name: &str, scope: ResourceScope) -> ResourceDefinition {
    definition(name).with_scope(scope)
}

/// Builds a public action returning a fixed 200 body.
pub fn ok_action(body: serde_json::Value) -> ActionDefinition {
    ActionDefinition::new(FixedResponseHandler::new(ActionResponse::ok(body)))
}

/// Action handler that counts executions.
pub struct CountingHandler {
    /// Number of completed executions.
    hits: Arc<AtomicUsize>,
    /// Response returned on every execution.
    response: ActionResponse,
}

#[async_trait]
impl ActionHandler for CountingHandler {
    async fn execute(
        &self,
        _ctx: &ExecutionContext,
        _models: &BoundModelSet,
    ) -> Result<ActionResponse, ExecutionError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Builds a public counting action plus its execution counter.
pub fn counting_action(body: serde_json::Value) -> (ActionDefinition, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler = CountingHandler {
        hits: Arc::clone(&hits),
        response: ActionResponse::ok(body),
    };
    (ActionDefinition::new(handler), hits)
}

/// Builds a `v1` table with a public GET collection default.
pub fn default_get_table() -> ActionTable {
    ActionTable::new().route(
        "v1",
        HttpVerb::Get,
        ActionKey::Default,
        ok_action(json!({
            "items": [],
        })),
    )
}

/// Builds a loader over a catalog with a silent audit sink.
pub fn loader_for(catalog: StaticResourceCatalog) -> RegistryLoader {
    let catalog = Arc::new(catalog);
    RegistryLoader::new(
        catalog.clone(),
        catalog.clone(),
        catalog,
        Arc::new(NoopAuditSink),
    )
}

/// Loads a snapshot from a catalog, panicking on load failure.
pub async fn snapshot_for(catalog: StaticResourceCatalog) -> Arc<RegistrySnapshot> {
    let snapshot = loader_for(catalog).load().await.expect("registry load");
    Arc::new(snapshot)
}
