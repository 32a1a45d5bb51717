// crates/restgate-core/src/core/resource.rs
// ============================================================================
// Module: Restgate Resource Definitions
// Description: Resource class definitions and database-scope declarations.
// Purpose: Describe one resource class as loaded into the registry snapshot.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ResourceDefinition`] describes one logical resource class: its name,
//! an opaque schema reference the persistence layer understands, and the
//! database scope it may be served from. Definitions are created once by the
//! registry loader and are immutable for the rest of process life.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::ResourceName;

// ============================================================================
// SECTION: Resource Scope
// ============================================================================

/// Database scope a resource class may be served from.
///
/// # Invariants
/// - `Either` is the default for resources that do not declare a scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceScope {
    /// Served only from the designated system database.
    SystemOnly,
    /// Served only from tenant databases, never the system database.
    TenantOnly,
    /// Served from either kind of database.
    #[default]
    Either,
}

// ============================================================================
// SECTION: Schema Reference
// ============================================================================

/// Opaque handle to the persistence layer's shape definition for a resource.
///
/// # Invariants
/// - The core never interprets the shape; only tenant handles consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRef(Value);

impl SchemaRef {
    /// Creates a new schema reference from an opaque shape value.
    #[must_use]
    pub fn new(shape: Value) -> Self {
        Self(shape)
    }

    /// Returns the opaque shape value.
    #[must_use]
    pub fn shape(&self) -> &Value {
        &self.0
    }
}

// ============================================================================
// SECTION: Resource Definition
// ============================================================================

/// One resource class as loaded into the registry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Unique resource class name.
    name: ResourceName,
    /// Opaque schema reference for the persistence layer.
    schema: SchemaRef,
    /// Database scope the resource may be served from.
    #[serde(default)]
    scope: ResourceScope,
}

impl ResourceDefinition {
    /// Creates a new resource definition served from either database kind.
    #[must_use]
    pub fn new(name: impl Into<ResourceName>, schema: SchemaRef) -> Self {
        Self {
            name: name.into(),
            schema,
            scope: ResourceScope::Either,
        }
    }

    /// Returns a copy with the given database scope.
    #[must_use]
    pub fn with_scope(mut self, scope: ResourceScope) -> Self {
        self.scope = scope;
        self
    }

    /// Returns the resource class name.
    #[must_use]
    pub fn name(&self) -> &ResourceName {
        &self.name
    }

    /// Returns the schema reference.
    #[must_use]
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Returns the declared database scope.
    #[must_use]
    pub const fn scope(&self) -> ResourceScope {
        self.scope
    }
}
