// crates/restgate-core/tests/resolver.rs
// ============================================================================
// Module: Action Resolver Tests
// Description: Tests for key derivation and failure precedence.
// ============================================================================
//! ## Overview
//! Validates the resolver's four-way failure precedence and the reserved
//! default keys for collection and object routes.

#![allow(clippy::unwrap_used, reason = "Tests unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]

mod common;

use std::sync::Arc;

use restgate_core::ActionKey;
use restgate_core::ActionResolver;
use restgate_core::ActionTable;
use restgate_core::DispatchRequest;
use restgate_core::HttpVerb;
use restgate_core::InMemoryTenantDirectory;
use restgate_core::ModelHandle;
use restgate_core::ObjectId;
use restgate_core::ResolveError;
use restgate_core::TenantDirectory;
use restgate_core::TenantScope;
use serde_json::json;

use common::definition;
use common::ok_action;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Builds a table covering every key kind under `v1`.
fn full_table() -> ActionTable {
    ActionTable::new()
        .route("v1", HttpVerb::Get, ActionKey::Default, ok_action(json!({"kind": "collection"})))
        .route("v1", HttpVerb::Get, ActionKey::ObjectDefault, ok_action(json!({"kind": "object"})))
        .route(
            "v1",
            HttpVerb::Post,
            ActionKey::named("archive"),
            ok_action(json!({"kind": "archive"})),
        )
}

/// Opens a tenant-bound model handle over a seeded in-memory store.
async fn seeded_model(tenant: &TenantScope) -> Arc<dyn ModelHandle> {
    let directory = InMemoryTenantDirectory::new();
    directory
        .insert(tenant.clone(), "order", "o-1", json!({"id": "o-1", "total": 42}))
        .unwrap();
    let handle = directory.open(tenant).await.unwrap();
    handle.model(&definition("order"))
}

/// Builds a tenant scope for the fixtures.
fn tenant() -> TenantScope {
    TenantScope::Tenant("acme".into())
}

// ============================================================================
// SECTION: Collection Routes
// ============================================================================

#[tokio::test]
async fn collection_route_selects_empty_string_default() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let request = DispatchRequest::collection("v1", "order", HttpVerb::Get, tenant);

    let resolved = ActionResolver.resolve(&full_table(), &request, &model).await.unwrap();

    assert!(resolved.object.is_none());
    assert!(resolved.action.is_public());
}

#[tokio::test]
async fn collection_route_with_named_action_selects_it() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let request =
        DispatchRequest::collection("v1", "order", HttpVerb::Post, tenant).with_action("archive");

    let resolved = ActionResolver.resolve(&full_table(), &request, &model).await;
    assert!(resolved.is_ok());
}

#[tokio::test]
async fn missing_collection_default_is_action_not_found() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let table = ActionTable::new().route(
        "v1",
        HttpVerb::Get,
        ActionKey::ObjectDefault,
        ok_action(json!({})),
    );
    let request = DispatchRequest::collection("v1", "order", HttpVerb::Get, tenant);

    let error = ActionResolver.resolve(&table, &request, &model).await.expect_err("must fail");
    assert!(matches!(error, ResolveError::ActionNotFound { .. }));
}

// ============================================================================
// SECTION: Object Routes
// ============================================================================

#[tokio::test]
async fn object_route_selects_object_default_and_fetches_record() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let request =
        DispatchRequest::object("v1", "order", HttpVerb::Get, tenant, Some(ObjectId::new("o-1")));

    let resolved = ActionResolver.resolve(&full_table(), &request, &model).await.unwrap();

    let object = resolved.object.expect("record attached");
    assert_eq!(object["total"], json!(42));
}

#[tokio::test]
async fn object_route_without_id_is_objectid_required() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let request = DispatchRequest::object("v1", "order", HttpVerb::Get, tenant, None);

    let error =
        ActionResolver.resolve(&full_table(), &request, &model).await.expect_err("must fail");
    assert!(matches!(error, ResolveError::ObjectIdRequired));
}

#[tokio::test]
async fn empty_object_id_is_objectid_required() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let request =
        DispatchRequest::object("v1", "order", HttpVerb::Get, tenant, Some(ObjectId::new("")));

    let error =
        ActionResolver.resolve(&full_table(), &request, &model).await.expect_err("must fail");
    assert!(matches!(error, ResolveError::ObjectIdRequired));
}

#[tokio::test]
async fn missing_id_precedes_action_key_lookup() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    // The named action does not exist either; the id check must win.
    let request = DispatchRequest::object("v1", "order", HttpVerb::Get, tenant, None)
        .with_action("no-such-action");

    let error =
        ActionResolver.resolve(&full_table(), &request, &model).await.expect_err("must fail");
    assert!(matches!(error, ResolveError::ObjectIdRequired));
}

#[tokio::test]
async fn unknown_object_is_object_not_found() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let request =
        DispatchRequest::object("v1", "order", HttpVerb::Get, tenant, Some(ObjectId::new("o-9")));

    let error =
        ActionResolver.resolve(&full_table(), &request, &model).await.expect_err("must fail");
    assert!(matches!(error, ResolveError::ObjectNotFound { .. }));
}

#[tokio::test]
async fn missing_object_default_is_action_not_found() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let table =
        ActionTable::new().route("v1", HttpVerb::Get, ActionKey::Default, ok_action(json!({})));
    let request =
        DispatchRequest::object("v1", "order", HttpVerb::Get, tenant, Some(ObjectId::new("o-1")));

    let error = ActionResolver.resolve(&table, &request, &model).await.expect_err("must fail");
    assert!(matches!(error, ResolveError::ActionNotFound { .. }));
}

// ============================================================================
// SECTION: Version and Verb
// ============================================================================

#[tokio::test]
async fn unknown_version_wins_over_everything_else() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    // Object route with no id: the version check still comes first.
    let request = DispatchRequest::object("v2", "order", HttpVerb::Get, tenant, None);

    let error =
        ActionResolver.resolve(&full_table(), &request, &model).await.expect_err("must fail");
    assert!(matches!(error, ResolveError::UnknownVersion { .. }));
}

#[tokio::test]
async fn verb_absent_for_version_is_unknown_version() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let request = DispatchRequest::collection("v1", "order", HttpVerb::Delete, tenant);

    let error =
        ActionResolver.resolve(&full_table(), &request, &model).await.expect_err("must fail");
    assert!(matches!(error, ResolveError::UnknownVersion { .. }));
}

// ============================================================================
// SECTION: Reserved Labels
// ============================================================================

#[tokio::test]
async fn explicit_object_label_selects_the_object_default() {
    let tenant = tenant();
    let model = seeded_model(&tenant).await;
    let request =
        DispatchRequest::object("v1", "order", HttpVerb::Get, tenant, Some(ObjectId::new("o-1")))
            .with_action("object");

    let resolved = ActionResolver.resolve(&full_table(), &request, &model).await;
    assert!(resolved.is_ok());
}
