// crates/restgate-core/tests/loader.rs
// ============================================================================
// Module: Registry Loader Tests
// Description: Tests for all-or-nothing registry loading and pairing.
// ============================================================================
//! ## Overview
//! Validates the loader's aggregate failure behavior and the snapshot
//! pairing invariant.

#![allow(clippy::unwrap_used, reason = "Tests unwrap on deterministic fixtures.")]
#![allow(clippy::expect_used, reason = "Tests use expect for explicit failure messages.")]
#![allow(clippy::panic, reason = "Tests panic on unexpected error variants.")]

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use restgate_core::ActionTable;
use restgate_core::ActionTableProvider;
use restgate_core::EnumerationError;
use restgate_core::ModelProvider;
use restgate_core::NoopAuditSink;
use restgate_core::ProviderError;
use restgate_core::RegistryLoadError;
use restgate_core::RegistryLoader;
use restgate_core::ResourceDefinition;
use restgate_core::ResourceEnumerator;
use restgate_core::ResourceName;
use restgate_core::StaticResourceCatalog;

use common::default_get_table;
use common::definition;
use common::loader_for;

// ============================================================================
// SECTION: Failing Providers
// ============================================================================

/// Action-table provider that fails for one designated resource.
struct FailingTableProvider {
    /// Tables for resources that succeed.
    inner: Arc<StaticResourceCatalog>,
    /// Resource whose table lookup fails.
    broken: ResourceName,
}

#[async_trait]
impl ActionTableProvider for FailingTableProvider {
    async fn action_table(&self, name: &ResourceName) -> Result<ActionTable, ProviderError> {
        if name == &self.broken {
            return Err(ProviderError::Source("table file unreadable".to_string()));
        }
        self.inner.action_table(name).await
    }
}

/// Enumerator that always fails.
struct BrokenEnumerator;

#[async_trait]
impl ResourceEnumerator for BrokenEnumerator {
    async fn resource_names(&self) -> Result<Vec<ResourceName>, EnumerationError> {
        Err(EnumerationError::Source("listing unavailable".to_string()))
    }
}

// ============================================================================
// SECTION: Successful Load
// ============================================================================

#[tokio::test]
async fn load_publishes_paired_snapshot() {
    let mut catalog = StaticResourceCatalog::new();
    catalog.register(definition("order"), default_get_table()).unwrap();
    catalog.register(definition("user"), default_get_table()).unwrap();

    let snapshot = loader_for(catalog).load().await.expect("registry load");

    assert_eq!(snapshot.len(), 2);
    for name in snapshot.resource_names() {
        assert!(snapshot.model(name).is_some());
        assert!(snapshot.endpoint(name).is_some());
    }
}

#[tokio::test]
async fn load_of_empty_catalog_publishes_empty_snapshot() {
    let snapshot = loader_for(StaticResourceCatalog::new()).load().await.expect("registry load");
    assert!(snapshot.is_empty());
}

// ============================================================================
// SECTION: Aggregate Failure
// ============================================================================

#[tokio::test]
async fn one_failing_table_fails_the_entire_load() {
    let mut catalog = StaticResourceCatalog::new();
    catalog.register(definition("order"), default_get_table()).unwrap();
    catalog.register(definition("user"), default_get_table()).unwrap();
    catalog.register(definition("invoice"), default_get_table()).unwrap();
    let catalog = Arc::new(catalog);

    let loader = RegistryLoader::new(
        catalog.clone(),
        catalog.clone(),
        Arc::new(FailingTableProvider {
            inner: catalog,
            broken: ResourceName::new("user"),
        }),
        Arc::new(NoopAuditSink),
    );

    let error = loader.load().await.expect_err("load must fail");
    match error {
        RegistryLoadError::Resources {
            failures,
        } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].name.as_str(), "user");
            assert!(failures[0].cause.contains("table file unreadable"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn all_failures_are_reported_together() {
    let mut catalog = StaticResourceCatalog::new();
    catalog.register(definition("order"), default_get_table()).unwrap();
    catalog.register(definition("user"), default_get_table()).unwrap();
    let catalog = Arc::new(catalog);

    /// Model provider that fails for every resource.
    struct BrokenModels;

    #[async_trait]
    impl ModelProvider for BrokenModels {
        async fn model(&self, _name: &ResourceName) -> Result<ResourceDefinition, ProviderError> {
            Err(ProviderError::Source("definition unreadable".to_string()))
        }
    }

    let loader = RegistryLoader::new(
        catalog.clone(),
        Arc::new(BrokenModels),
        catalog,
        Arc::new(NoopAuditSink),
    );

    let error = loader.load().await.expect_err("load must fail");
    match error {
        RegistryLoadError::Resources {
            failures,
        } => {
            let names: Vec<&str> = failures.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, vec!["order", "user"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_action_table_is_a_load_failure() {
    let mut catalog = StaticResourceCatalog::new();
    catalog.register(definition("order"), ActionTable::new()).unwrap();

    let error = loader_for(catalog).load().await.expect_err("load must fail");
    match error {
        RegistryLoadError::Resources {
            failures,
        } => {
            assert_eq!(failures[0].name.as_str(), "order");
            assert!(failures[0].cause.contains("no routes"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn enumeration_failure_aborts_the_load() {
    let catalog = Arc::new(StaticResourceCatalog::new());
    let loader = RegistryLoader::new(
        Arc::new(BrokenEnumerator),
        catalog.clone(),
        catalog,
        Arc::new(NoopAuditSink),
    );

    let error = loader.load().await.expect_err("load must fail");
    assert!(matches!(error, RegistryLoadError::Enumeration(_)));
}
