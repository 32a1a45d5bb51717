// crates/restgate-core/src/runtime/loader.rs
// ============================================================================
// Module: Restgate Registry Loader
// Description: Concurrent, all-or-nothing loading of models and action tables.
// Purpose: Produce one immutable registry snapshot or a complete failure list.
// Dependencies: tokio, crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The registry loader enumerates the declared resource names and loads each
//! resource's definition and action table concurrently: one task per
//! resource, and within each task the two lookups run side by side and must
//! both succeed. The loader joins every task before deciding the outcome, so
//! a failed resource never cancels the progress reporting of the others, and
//! a partial snapshot is never published.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;

use crate::core::ActionTable;
use crate::core::RegistrySnapshot;
use crate::core::ResourceDefinition;
use crate::core::ResourceName;
use crate::core::SnapshotError;
use crate::interfaces::ActionTableProvider;
use crate::interfaces::EnumerationError;
use crate::interfaces::ModelProvider;
use crate::interfaces::ProviderError;
use crate::interfaces::ResourceEnumerator;
use crate::runtime::audit::RegistryAuditEvent;
use crate::runtime::audit::RegistryAuditSink;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// One resource that failed to load, with its cause.
#[derive(Debug, Clone)]
pub struct ResourceLoadFailure {
    /// Resource name that failed.
    pub name: ResourceName,
    /// Failure cause.
    pub cause: String,
}

/// Registry load errors. All variants are fatal at startup.
#[derive(Debug, Error)]
pub enum RegistryLoadError {
    /// The enumeration source could not produce the resource name set.
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),
    /// One or more resources failed their model or action-table lookup.
    #[error(
        "registry load failed for {count} resource(s): {names}",
        count = .failures.len(),
        names = failure_names(.failures)
    )]
    Resources {
        /// The resources that failed, with causes, sorted by name.
        failures: Vec<ResourceLoadFailure>,
    },
    /// A per-resource load task terminated abnormally.
    #[error("registry load task failed: {0}")]
    Task(String),
    /// The loaded maps violated the snapshot pairing invariant.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Joins failed resource names for the aggregate error message.
fn failure_names(failures: &[ResourceLoadFailure]) -> String {
    failures.iter().map(|failure| failure.name.as_str()).collect::<Vec<_>>().join(", ")
}

// ============================================================================
// SECTION: Registry Loader
// ============================================================================

/// Loads the registry snapshot from the configured definition sources.
pub struct RegistryLoader {
    /// Source of the declared resource name set.
    enumerator: Arc<dyn ResourceEnumerator>,
    /// Source of resource definitions.
    models: Arc<dyn ModelProvider>,
    /// Source of action tables.
    endpoints: Arc<dyn ActionTableProvider>,
    /// Sink for load-progress events.
    audit: Arc<dyn RegistryAuditSink>,
}

impl RegistryLoader {
    /// Creates a new loader over the given sources.
    #[must_use]
    pub fn new(
        enumerator: Arc<dyn ResourceEnumerator>,
        models: Arc<dyn ModelProvider>,
        endpoints: Arc<dyn ActionTableProvider>,
        audit: Arc<dyn RegistryAuditSink>,
    ) -> Self {
        Self {
            enumerator,
            models,
            endpoints,
            audit,
        }
    }

    /// Loads every declared resource and publishes one snapshot.
    ///
    /// The loader waits for every per-resource task to complete before
    /// deciding the outcome, so the aggregate error reports the full set of
    /// broken resources.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryLoadError`] when enumeration fails, when any
    /// resource fails either lookup, or when a load task terminates
    /// abnormally. No snapshot is published on failure.
    pub async fn load(&self) -> Result<RegistrySnapshot, RegistryLoadError> {
        let names = self.enumerator.resource_names().await?;

        let mut joins = JoinSet::new();
        for name in names {
            let models = Arc::clone(&self.models);
            let endpoints = Arc::clone(&self.endpoints);
            let audit = Arc::clone(&self.audit);
            joins.spawn(async move {
                audit.record(&RegistryAuditEvent::loading(&name));
                let outcome = load_resource(models.as_ref(), endpoints.as_ref(), &name).await;
                (name, outcome)
            });
        }

        let mut models = BTreeMap::new();
        let mut endpoints = BTreeMap::new();
        let mut failures: Vec<ResourceLoadFailure> = Vec::new();
        let mut task_failure: Option<String> = None;

        while let Some(joined) = joins.join_next().await {
            match joined {
                Ok((name, Ok((definition, table)))) => {
                    self.audit.record(&RegistryAuditEvent::loaded(&name));
                    models.insert(name.clone(), definition);
                    endpoints.insert(name, table);
                }
                Ok((name, Err(cause))) => {
                    let cause = cause.to_string();
                    self.audit.record(&RegistryAuditEvent::failed(&name, cause.clone()));
                    failures.push(ResourceLoadFailure {
                        name,
                        cause,
                    });
                }
                Err(join_error) => {
                    if task_failure.is_none() {
                        task_failure = Some(join_error.to_string());
                    }
                }
            }
        }

        if let Some(cause) = task_failure {
            return Err(RegistryLoadError::Task(cause));
        }
        if !failures.is_empty() {
            failures.sort_by(|a, b| a.name.cmp(&b.name));
            return Err(RegistryLoadError::Resources {
                failures,
            });
        }

        let snapshot = RegistrySnapshot::new(models, endpoints)?;
        self.audit.record(&RegistryAuditEvent::published(snapshot.len()));
        Ok(snapshot)
    }
}

/// Loads one resource's definition and action table concurrently.
async fn load_resource(
    models: &dyn ModelProvider,
    endpoints: &dyn ActionTableProvider,
    name: &ResourceName,
) -> Result<(ResourceDefinition, ActionTable), ProviderError> {
    let (definition, table) = tokio::join!(models.model(name), endpoints.action_table(name));
    let definition = definition?;
    let table = table?;
    if table.is_empty() {
        return Err(ProviderError::Source(format!(
            "resource `{name}` declares no routes in its action table"
        )));
    }
    Ok((definition, table))
}
