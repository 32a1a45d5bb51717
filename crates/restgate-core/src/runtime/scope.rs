// crates/restgate-core/src/runtime/scope.rs
// ============================================================================
// Module: Restgate Scope Binder
// Description: Tenant-scope compatibility checks and model binding.
// Purpose: Enforce system/tenant database exclusivity before binding models.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The scope binder turns a tenant handle and a list of required resource
//! names into a [`BoundModelSet`]. Compatibility is evaluated per resource
//! with a three-way truth table, and every check runs before any model
//! handle is constructed: one incompatible resource denies the whole
//! request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::BoundModelSet;
use crate::core::RegistrySnapshot;
use crate::core::ResourceDefinition;
use crate::core::ResourceName;
use crate::core::ResourceScope;
use crate::core::TenantScope;
use crate::interfaces::TenantHandle;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scope compatibility violations. Each denies the entire request.
#[derive(Debug, Error)]
pub enum ScopeViolation {
    /// A system-only resource was requested against a tenant database.
    #[error("resource `{resource}` is restricted to the system database")]
    SystemOnly {
        /// The offending resource.
        resource: ResourceName,
    },
    /// A tenant-only resource was requested against the system database.
    #[error("resource `{resource}` is not available on the system database")]
    TenantOnly {
        /// The offending resource.
        resource: ResourceName,
    },
    /// A required resource is not present in the registry.
    #[error("resource `{resource}` is not present in the registry")]
    UnknownResource {
        /// The missing resource.
        resource: ResourceName,
    },
}

// ============================================================================
// SECTION: Scope Binder
// ============================================================================

/// Binds tenant-scoped model handles for the resources a request needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeBinder;

impl ScopeBinder {
    /// Binds model handles for every required resource name.
    ///
    /// All compatibility checks run before any handle is constructed.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeViolation`] when any required resource's declared
    /// scope conflicts with the tenant handle's identity, or when a name is
    /// not registered.
    pub fn bind(
        &self,
        handle: &Arc<dyn TenantHandle>,
        snapshot: &RegistrySnapshot,
        required: &[ResourceName],
    ) -> Result<BoundModelSet, ScopeViolation> {
        let mut bound = BoundModelSet::new();
        self.extend(&mut bound, handle, snapshot, required)?;
        Ok(bound)
    }

    /// Extends an existing bound set with additional required resources.
    ///
    /// Names already bound are skipped; the same check-all-then-bind rule
    /// applies to the remainder.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeViolation`] under the same conditions as
    /// [`ScopeBinder::bind`].
    pub fn extend(
        &self,
        bound: &mut BoundModelSet,
        handle: &Arc<dyn TenantHandle>,
        snapshot: &RegistrySnapshot,
        required: &[ResourceName],
    ) -> Result<(), ScopeViolation> {
        let mut definitions: Vec<&ResourceDefinition> = Vec::new();
        for name in required {
            if bound.contains(name) {
                continue;
            }
            let definition =
                snapshot.model(name).ok_or_else(|| ScopeViolation::UnknownResource {
                    resource: name.clone(),
                })?;
            check_compatibility(definition, handle.scope())?;
            definitions.push(definition);
        }
        for definition in definitions {
            bound.insert(definition.name().clone(), handle.model(definition));
        }
        Ok(())
    }

    /// Binds every registered resource whose scope permits the tenant,
    /// silently skipping the rest.
    ///
    /// Intended for startup or maintenance work outside a request, where a
    /// restricted resource is simply not of interest rather than a denial.
    #[must_use]
    pub fn bind_compatible(
        &self,
        handle: &Arc<dyn TenantHandle>,
        snapshot: &RegistrySnapshot,
    ) -> BoundModelSet {
        let mut bound = BoundModelSet::new();
        for name in snapshot.resource_names() {
            let Some(definition) = snapshot.model(name) else {
                continue;
            };
            if check_compatibility(definition, handle.scope()).is_ok() {
                bound.insert(definition.name().clone(), handle.model(definition));
            }
        }
        bound
    }
}

// ============================================================================
// SECTION: Compatibility
// ============================================================================

/// Evaluates the three-way scope truth table for one resource.
fn check_compatibility(
    definition: &ResourceDefinition,
    scope: &TenantScope,
) -> Result<(), ScopeViolation> {
    match definition.scope() {
        ResourceScope::SystemOnly if !scope.is_system() => Err(ScopeViolation::SystemOnly {
            resource: definition.name().clone(),
        }),
        ResourceScope::TenantOnly if scope.is_system() => Err(ScopeViolation::TenantOnly {
            resource: definition.name().clone(),
        }),
        ResourceScope::SystemOnly | ResourceScope::TenantOnly | ResourceScope::Either => Ok(()),
    }
}
