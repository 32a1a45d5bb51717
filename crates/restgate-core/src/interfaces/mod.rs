// crates/restgate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Restgate Interfaces
// Description: Backend-agnostic interfaces for models, tenants, and actions.
// Purpose: Define the contract surfaces used by the Restgate runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Restgate integrates with external systems without
//! embedding backend-specific details: where resource definitions and action
//! tables come from, how tenant databases are opened, and how actions
//! execute. Implementations must be deterministic where the contract says so
//! and fail closed on missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::core::ActionResponse;
use crate::core::ActionTable;
use crate::core::BoundModelSet;
use crate::core::ExecutionContext;
use crate::core::ObjectId;
use crate::core::ResourceDefinition;
use crate::core::ResourceName;
use crate::core::TenantScope;

// ============================================================================
// SECTION: Resource Enumeration
// ============================================================================

/// Resource enumeration errors.
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// The enumeration source reported an error.
    #[error("resource enumeration failed: {0}")]
    Source(String),
}

/// Source of the set of resource names the registry must load.
#[async_trait]
pub trait ResourceEnumerator: Send + Sync {
    /// Returns every declared resource name.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerationError`] when the source cannot be read; this
    /// aborts the entire registry load.
    async fn resource_names(&self) -> Result<Vec<ResourceName>, EnumerationError>;
}

// ============================================================================
// SECTION: Definition Providers
// ============================================================================

/// Model and action-table provider errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The definition source reported an error.
    #[error("definition source error: {0}")]
    Source(String),
    /// The resource name is not declared by this provider.
    #[error("resource `{0}` is not declared")]
    UnknownResource(ResourceName),
}

/// Source of resource definitions, one per declared name.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the resource definition for a declared name.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the definition cannot be produced.
    async fn model(&self, name: &ResourceName) -> Result<ResourceDefinition, ProviderError>;
}

/// Source of action tables, one per declared name.
#[async_trait]
pub trait ActionTableProvider: Send + Sync {
    /// Returns the action table for a declared name.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the table cannot be produced.
    async fn action_table(&self, name: &ResourceName) -> Result<ActionTable, ProviderError>;
}

// ============================================================================
// SECTION: Tenant Directory
// ============================================================================

/// Tenant directory errors.
#[derive(Debug, Error)]
pub enum TenantDirectoryError {
    /// The tenant database could not be opened.
    #[error("tenant database unavailable: {0}")]
    Unavailable(String),
}

/// Opens database handles for tenant scopes.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Opens a handle bound to the given tenant scope.
    ///
    /// # Errors
    ///
    /// Returns [`TenantDirectoryError`] when the database cannot be opened.
    async fn open(&self, scope: &TenantScope) -> Result<Arc<dyn TenantHandle>, TenantDirectoryError>;
}

/// Live handle to one tenant's storage partition.
pub trait TenantHandle: Send + Sync {
    /// Returns the scope this handle is bound to.
    fn scope(&self) -> &TenantScope;

    /// Attaches a resource's schema reference to this tenant's partition,
    /// producing a live model handle.
    fn model(&self, definition: &ResourceDefinition) -> Arc<dyn ModelHandle>;
}

// ============================================================================
// SECTION: Model Handle
// ============================================================================

/// Model query errors.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The underlying store reported an error.
    #[error("model query failed: {0}")]
    Query(String),
}

/// Tenant-scoped live model for one resource class.
#[async_trait]
pub trait ModelHandle: Send + Sync {
    /// Looks up one record by object id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the query itself fails; a missing record
    /// is `Ok(None)`.
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Value>, ModelError>;
}

// ============================================================================
// SECTION: Action Handler
// ============================================================================

/// Opaque failure raised by an action's own execute step.
///
/// # Invariants
/// - The dispatch core never interprets the message; it is passed through.
#[derive(Debug, Error)]
#[error("action execution failed: {0}")]
pub struct ExecutionError(String);

impl ExecutionError {
    /// Creates a new execution error with an opaque message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the opaque message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Executable body of one registered action.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Produces the transport-level response for an authorized request.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] when the handler cannot produce a
    /// response; the error is opaque to the dispatch core.
    async fn execute(
        &self,
        ctx: &ExecutionContext,
        models: &BoundModelSet,
    ) -> Result<ActionResponse, ExecutionError>;
}
