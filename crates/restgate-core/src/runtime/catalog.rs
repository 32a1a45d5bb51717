// crates/restgate-core/src/runtime/catalog.rs
// ============================================================================
// Module: Restgate Resource Catalog
// Description: Registration-based source of models and action tables.
// Purpose: Let embedders declare resources in code and feed the loader.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The static resource catalog implements the enumeration and provider
//! interfaces over resources registered in code. Registration rejects
//! duplicates; lookups are pure. One catalog value typically serves all
//! three loader interfaces behind `Arc` clones.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::ActionTable;
use crate::core::ResourceDefinition;
use crate::core::ResourceName;
use crate::interfaces::ActionTableProvider;
use crate::interfaces::EnumerationError;
use crate::interfaces::ModelProvider;
use crate::interfaces::ProviderError;
use crate::interfaces::ResourceEnumerator;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog registration errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The resource name is already registered.
    #[error("resource already registered: {0}")]
    Duplicate(ResourceName),
}

// ============================================================================
// SECTION: Static Resource Catalog
// ============================================================================

/// Code-declared resource catalog.
///
/// # Invariants
/// - Resource names are unique within the catalog.
/// - The catalog is immutable once handed to the loader.
#[derive(Debug, Default)]
pub struct StaticResourceCatalog {
    /// Registered resources keyed by name.
    resources: BTreeMap<ResourceName, (ResourceDefinition, ActionTable)>,
}

impl StaticResourceCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one resource with its action table.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Duplicate`] when the name is already
    /// registered.
    pub fn register(
        &mut self,
        definition: ResourceDefinition,
        table: ActionTable,
    ) -> Result<(), CatalogError> {
        let name = definition.name().clone();
        if self.resources.contains_key(&name) {
            return Err(CatalogError::Duplicate(name));
        }
        self.resources.insert(name, (definition, table));
        Ok(())
    }

    /// Returns the number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true when no resources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[async_trait]
impl ResourceEnumerator for StaticResourceCatalog {
    async fn resource_names(&self) -> Result<Vec<ResourceName>, EnumerationError> {
        Ok(self.resources.keys().cloned().collect())
    }
}

#[async_trait]
impl ModelProvider for StaticResourceCatalog {
    async fn model(&self, name: &ResourceName) -> Result<ResourceDefinition, ProviderError> {
        self.resources
            .get(name)
            .map(|(definition, _)| definition.clone())
            .ok_or_else(|| ProviderError::UnknownResource(name.clone()))
    }
}

#[async_trait]
impl ActionTableProvider for StaticResourceCatalog {
    async fn action_table(&self, name: &ResourceName) -> Result<ActionTable, ProviderError> {
        self.resources
            .get(name)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| ProviderError::UnknownResource(name.clone()))
    }
}
