// crates/restgate-core/src/runtime/resolver.rs
// ============================================================================
// Module: Restgate Action Resolver
// Description: Deterministic selection of one action per request.
// Purpose: Map route parameters to exactly one action definition or fail.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The action resolver selects exactly one action definition for a request,
//! or fails with one of four enumerable reasons, in a fixed precedence
//! order: unknown version (or verb), missing object id, missing object, and
//! finally missing action key. The object-existence lookup is the only
//! suspending step; its failure stops the pipeline before any permission
//! evaluation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::core::ActionDefinition;
use crate::core::ActionKey;
use crate::core::ActionTable;
use crate::core::ApiVersion;
use crate::core::DispatchRequest;
use crate::core::HttpVerb;
use crate::core::ObjectId;
use crate::interfaces::ModelHandle;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Action resolution failures, in precedence order.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The version is absent from the table, or the verb is absent for it.
    #[error("version `{version}` has no `{verb}` routes for this resource")]
    UnknownVersion {
        /// Requested version.
        version: ApiVersion,
        /// Requested verb.
        verb: HttpVerb,
    },
    /// An object-style route carried no usable object id.
    #[error("object route requires a non-empty object id")]
    ObjectIdRequired,
    /// The addressed object does not exist.
    #[error("object `{id}` was not found")]
    ObjectNotFound {
        /// The missing object id.
        id: ObjectId,
    },
    /// No action entry matches the derived key.
    #[error("no action registered under `{key}`")]
    ActionNotFound {
        /// The derived action key.
        key: ActionKey,
    },
}

// ============================================================================
// SECTION: Resolved Action
// ============================================================================

/// Product of a successful resolution.
#[derive(Debug, Clone)]
pub struct ResolvedAction {
    /// The selected action definition.
    pub action: ActionDefinition,
    /// The fetched record, for object-style routes.
    pub object: Option<Value>,
}

// ============================================================================
// SECTION: Action Resolver
// ============================================================================

/// Selects the single applicable action definition for a request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionResolver;

impl ActionResolver {
    /// Resolves a request against a resource's action table.
    ///
    /// For object-style routes the addressed record is fetched through the
    /// bound model; a missing record (or a failing lookup) stops resolution
    /// before the action-key lookup runs.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] with the first failing check in precedence
    /// order.
    pub async fn resolve(
        &self,
        table: &ActionTable,
        request: &DispatchRequest,
        model: &Arc<dyn ModelHandle>,
    ) -> Result<ResolvedAction, ResolveError> {
        let actions = table.actions_for(&request.version, request.verb).ok_or_else(|| {
            ResolveError::UnknownVersion {
                version: request.version.clone(),
                verb: request.verb,
            }
        })?;

        let mut object = None;
        if request.style.is_object() {
            let id = request
                .object_id
                .as_ref()
                .filter(|id| !id.is_empty())
                .ok_or(ResolveError::ObjectIdRequired)?;
            let found = model.find_by_id(id).await.ok().flatten();
            object = Some(found.ok_or_else(|| ResolveError::ObjectNotFound {
                id: id.clone(),
            })?);
        }

        let key = ActionKey::derive(request.style, request.action.as_deref());
        let action = actions.get(&key).cloned().ok_or(ResolveError::ActionNotFound {
            key,
        })?;

        Ok(ResolvedAction {
            action,
            object,
        })
    }
}
