// crates/restgate-core/src/runtime/memory.rs
// ============================================================================
// Module: Restgate In-Memory Backends
// Description: In-memory tenant directory, model store, and fixed handlers.
// Purpose: Provide reference implementations for tests and embedding.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! In-memory implementations of the tenant-facing interfaces: a tenant
//! directory whose handles share one object store partitioned by tenant
//! scope and resource name, plus a fixed-response action handler. These back
//! the test suites and small embeddings; production deployments supply their
//! own persistence-backed implementations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::ActionResponse;
use crate::core::BoundModelSet;
use crate::core::ExecutionContext;
use crate::core::ObjectId;
use crate::core::ResourceDefinition;
use crate::core::ResourceName;
use crate::core::TenantScope;
use crate::interfaces::ActionHandler;
use crate::interfaces::ExecutionError;
use crate::interfaces::ModelError;
use crate::interfaces::ModelHandle;
use crate::interfaces::TenantDirectory;
use crate::interfaces::TenantDirectoryError;
use crate::interfaces::TenantHandle;

// ============================================================================
// SECTION: Shared Object Store
// ============================================================================

/// Object records keyed by tenant scope, resource name, and object id.
type SharedObjects = Arc<RwLock<BTreeMap<(TenantScope, ResourceName, ObjectId), Value>>>;

// ============================================================================
// SECTION: Tenant Directory
// ============================================================================

/// In-memory tenant directory whose handles share one object store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantDirectory {
    /// Shared object records across all tenant handles.
    objects: SharedObjects,
}

impl InMemoryTenantDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one object record, for seeding fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the store lock is poisoned.
    pub fn insert(
        &self,
        scope: TenantScope,
        resource: impl Into<ResourceName>,
        id: impl Into<ObjectId>,
        value: Value,
    ) -> Result<(), ModelError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| ModelError::Query("object store lock poisoned".to_string()))?;
        objects.insert((scope, resource.into(), id.into()), value);
        Ok(())
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn open(
        &self,
        scope: &TenantScope,
    ) -> Result<Arc<dyn TenantHandle>, TenantDirectoryError> {
        Ok(Arc::new(InMemoryTenantHandle {
            scope: scope.clone(),
            objects: Arc::clone(&self.objects),
        }))
    }
}

// ============================================================================
// SECTION: Tenant Handle
// ============================================================================

/// In-memory tenant handle bound to one scope.
#[derive(Debug)]
struct InMemoryTenantHandle {
    /// Scope this handle is bound to.
    scope: TenantScope,
    /// Shared object records.
    objects: SharedObjects,
}

impl TenantHandle for InMemoryTenantHandle {
    fn scope(&self) -> &TenantScope {
        &self.scope
    }

    fn model(&self, definition: &ResourceDefinition) -> Arc<dyn ModelHandle> {
        Arc::new(InMemoryModelHandle {
            scope: self.scope.clone(),
            resource: definition.name().clone(),
            objects: Arc::clone(&self.objects),
        })
    }
}

// ============================================================================
// SECTION: Model Handle
// ============================================================================

/// In-memory model handle scoped to one tenant and resource.
#[derive(Debug)]
struct InMemoryModelHandle {
    /// Tenant scope of the partition.
    scope: TenantScope,
    /// Resource class of the partition.
    resource: ResourceName,
    /// Shared object records.
    objects: SharedObjects,
}

#[async_trait]
impl ModelHandle for InMemoryModelHandle {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Value>, ModelError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| ModelError::Query("object store lock poisoned".to_string()))?;
        Ok(objects.get(&(self.scope.clone(), self.resource.clone(), id.clone())).cloned())
    }
}

// ============================================================================
// SECTION: Fixed-Response Handler
// ============================================================================

/// Action handler that returns one fixed response.
#[derive(Debug, Clone)]
pub struct FixedResponseHandler {
    /// The response returned for every execution.
    response: ActionResponse,
}

impl FixedResponseHandler {
    /// Creates a handler returning the given response.
    #[must_use]
    pub const fn new(response: ActionResponse) -> Self {
        Self {
            response,
        }
    }
}

#[async_trait]
impl ActionHandler for FixedResponseHandler {
    async fn execute(
        &self,
        _ctx: &ExecutionContext,
        _models: &BoundModelSet,
    ) -> Result<ActionResponse, ExecutionError> {
        Ok(self.response.clone())
    }
}
