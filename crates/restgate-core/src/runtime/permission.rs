// crates/restgate-core/src/runtime/permission.rs
// ============================================================================
// Module: Restgate Permission Gate
// Description: OR-of-permissions authorization for resolved actions.
// Purpose: Authorize the resolved action against the caller's grants.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The permission gate authorizes a resolved action against the caller's
//! granted permission set. An action with an empty requirement set is
//! public; otherwise any single matching permission is sufficient. The gate
//! never suspends and is evaluated only after action resolution, since the
//! requirement set is a property of the resolved action.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ActionDefinition;
use crate::core::Principal;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Denial raised when the caller lacks every required permission.
#[derive(Debug, Error)]
#[error("caller lacks the permissions required by this action")]
pub struct PermissionDenied;

// ============================================================================
// SECTION: Permission Gate
// ============================================================================

/// Authorizes resolved actions against caller permission sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionGate;

impl PermissionGate {
    /// Authorizes an action for an optionally authenticated caller.
    ///
    /// Public actions (empty requirement set) always authorize. Otherwise a
    /// principal is required and its grants must intersect the requirement
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionDenied`] for anonymous callers of non-public
    /// actions and for principals whose grants are disjoint from the
    /// requirement set.
    pub fn authorize(
        &self,
        action: &ActionDefinition,
        principal: Option<&Principal>,
    ) -> Result<(), PermissionDenied> {
        let required = action.required_permissions();
        if required.is_empty() {
            return Ok(());
        }
        let Some(principal) = principal else {
            return Err(PermissionDenied);
        };
        if required.is_disjoint(principal.permissions()) {
            return Err(PermissionDenied);
        }
        Ok(())
    }
}
