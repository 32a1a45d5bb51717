// crates/restgate-core/src/core/snapshot.rs
// ============================================================================
// Module: Restgate Registry Snapshot
// Description: Immutable model/endpoint pairing published by the loader.
// Purpose: Guarantee every resource has both a model and an action table.
// Dependencies: thiserror, crate::core
// ============================================================================

//! ## Overview
//! A [`RegistrySnapshot`] is the write-once, read-many product of a registry
//! load: the resource definitions and their action tables, keyed by resource
//! name. The pairing invariant is enforced at construction, so request-time
//! lookups never observe a model without a table or a table without a model.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::actions::ActionTable;
use crate::core::identifiers::ResourceName;
use crate::core::resource::ResourceDefinition;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Snapshot construction errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A resource has a model but no action table.
    #[error("resource `{0}` has a model but no action table")]
    MissingEndpoint(ResourceName),
    /// A resource has an action table but no model.
    #[error("resource `{0}` has an action table but no model")]
    MissingModel(ResourceName),
    /// A resource's action table declares no routes.
    #[error("resource `{0}` declares no routes in its action table")]
    EmptyActionTable(ResourceName),
}

// ============================================================================
// SECTION: Registry Snapshot
// ============================================================================

/// Immutable registry of resource models and their action tables.
///
/// # Invariants
/// - `models` and `endpoints` carry exactly the same key set.
/// - Every action table declares at least one route.
/// - Reads are pure lookups; the snapshot never mutates after construction.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    /// Resource definitions keyed by name.
    models: BTreeMap<ResourceName, ResourceDefinition>,
    /// Action tables keyed by name.
    endpoints: BTreeMap<ResourceName, ActionTable>,
}

impl RegistrySnapshot {
    /// Builds a snapshot, enforcing the model/endpoint pairing invariant.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the pairing is incomplete or a table
    /// declares no routes.
    pub fn new(
        models: BTreeMap<ResourceName, ResourceDefinition>,
        endpoints: BTreeMap<ResourceName, ActionTable>,
    ) -> Result<Self, SnapshotError> {
        for name in models.keys() {
            if !endpoints.contains_key(name) {
                return Err(SnapshotError::MissingEndpoint(name.clone()));
            }
        }
        for (name, table) in &endpoints {
            if !models.contains_key(name) {
                return Err(SnapshotError::MissingModel(name.clone()));
            }
            if table.is_empty() {
                return Err(SnapshotError::EmptyActionTable(name.clone()));
            }
        }
        Ok(Self {
            models,
            endpoints,
        })
    }

    /// Returns the resource definition for a name, if registered.
    #[must_use]
    pub fn model(&self, name: &ResourceName) -> Option<&ResourceDefinition> {
        self.models.get(name)
    }

    /// Returns the action table for a name, if registered.
    #[must_use]
    pub fn endpoint(&self, name: &ResourceName) -> Option<&ActionTable> {
        self.endpoints.get(name)
    }

    /// Returns true when the resource name is registered.
    #[must_use]
    pub fn contains(&self, name: &ResourceName) -> bool {
        self.models.contains_key(name)
    }

    /// Returns the registered resource names.
    pub fn resource_names(&self) -> impl Iterator<Item = &ResourceName> {
        self.models.keys()
    }

    /// Returns the number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true when no resources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
