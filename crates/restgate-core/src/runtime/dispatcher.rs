// crates/restgate-core/src/runtime/dispatcher.rs
// ============================================================================
// Module: Restgate Dispatcher
// Description: Stage orchestration and error-to-status mapping per request.
// Purpose: Run scope binding, resolution, and authorization for each request.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The dispatcher is the single canonical execution path for inbound
//! requests: validate the resource class, open the tenant handle, bind
//! scopes, resolve the action, extend the binding with the action's declared
//! resources, gate permissions, and execute. Every stage short-circuits on
//! failure, and every failure kind maps to one transport status and one
//! machine-readable reason code. The dispatcher implements no business
//! logic; execution is fully delegated to the resolved action.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::core::ActionResponse;
use crate::core::BoundModelSet;
use crate::core::DispatchRequest;
use crate::core::ExecutionContext;
use crate::core::RegistrySnapshot;
use crate::core::ResourceName;
use crate::interfaces::ExecutionError;
use crate::interfaces::TenantDirectory;
use crate::interfaces::TenantDirectoryError;
use crate::runtime::audit::DispatchAuditEvent;
use crate::runtime::audit::DispatchAuditSink;
use crate::runtime::permission::PermissionDenied;
use crate::runtime::permission::PermissionGate;
use crate::runtime::resolver::ActionResolver;
use crate::runtime::resolver::ResolveError;
use crate::runtime::resolver::ResolvedAction;
use crate::runtime::scope::ScopeBinder;
use crate::runtime::scope::ScopeViolation;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request-scoped dispatch failures. None propagate past the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The resource class is not served by the registry.
    #[error("resource class `{0}` is not served by this registry")]
    UnknownResource(ResourceName),
    /// The tenant database could not be opened.
    #[error(transparent)]
    Tenant(#[from] TenantDirectoryError),
    /// A required resource's scope conflicts with the tenant identity.
    #[error(transparent)]
    Scope(#[from] ScopeViolation),
    /// Action resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The caller is not permitted to run the resolved action.
    #[error(transparent)]
    Permission(#[from] PermissionDenied),
    /// The action's own execute step failed; opaque to the core.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl DispatchError {
    /// Returns the transport status code for the failure kind.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::UnknownResource(_) | Self::Resolve(_) => 404,
            Self::Tenant(_) => 503,
            Self::Scope(_) | Self::Permission(_) => 403,
            Self::Execution(_) => 500,
        }
    }

    /// Returns the machine-readable reason code for the failure kind.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::UnknownResource(_) => "unknown_resource",
            Self::Tenant(_) => "tenant_unavailable",
            Self::Scope(_) => "scope_violation",
            Self::Resolve(ResolveError::UnknownVersion {
                ..
            }) => "unknown_version",
            Self::Resolve(ResolveError::ObjectIdRequired) => "objectid_required",
            Self::Resolve(ResolveError::ObjectNotFound {
                ..
            }) => "object_not_found",
            Self::Resolve(ResolveError::ActionNotFound {
                ..
            }) => "action_not_found",
            Self::Permission(_) => "permission_denied",
            Self::Execution(_) => "execution_failed",
        }
    }

    /// Returns the pipeline phase the failure belongs to.
    #[must_use]
    pub const fn phase(&self) -> &'static str {
        match self {
            Self::UnknownResource(_) | Self::Tenant(_) | Self::Scope(_) => "resolving_scope",
            Self::Resolve(_) => "resolving_action",
            Self::Permission(_) => "checking_permission",
            Self::Execution(_) => "executing",
        }
    }
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Orchestrates the dispatch pipeline for every inbound request.
pub struct Dispatcher {
    /// Published registry snapshot; read-only and shared across requests.
    snapshot: Arc<RegistrySnapshot>,
    /// Tenant directory for per-request database handles.
    tenants: Arc<dyn TenantDirectory>,
    /// Scope binder stage.
    scopes: ScopeBinder,
    /// Action resolver stage.
    resolver: ActionResolver,
    /// Permission gate stage.
    gate: PermissionGate,
    /// Sink for per-request audit events.
    audit: Arc<dyn DispatchAuditSink>,
}

impl Dispatcher {
    /// Creates a dispatcher over a published snapshot.
    #[must_use]
    pub fn new(
        snapshot: Arc<RegistrySnapshot>,
        tenants: Arc<dyn TenantDirectory>,
        audit: Arc<dyn DispatchAuditSink>,
    ) -> Self {
        Self {
            snapshot,
            tenants,
            scopes: ScopeBinder,
            resolver: ActionResolver,
            gate: PermissionGate,
            audit,
        }
    }

    /// Returns the published snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &Arc<RegistrySnapshot> {
        &self.snapshot
    }

    /// Dispatches one request, rendering every failure kind as a response.
    pub async fn dispatch(&self, request: DispatchRequest) -> ActionResponse {
        match self.run(request).await {
            Ok((request, response)) => {
                self.audit.record(&DispatchAuditEvent::completed(&request, response.status));
                response
            }
            Err((request, error)) => {
                let response = failure_response(&error);
                self.audit.record(&DispatchAuditEvent::failed(
                    &request,
                    error.phase(),
                    error.reason(),
                    response.status,
                ));
                response
            }
        }
    }

    /// Runs the staged pipeline, returning the request alongside the result
    /// so the caller can emit the audit event.
    async fn run(
        &self,
        request: DispatchRequest,
    ) -> Result<(DispatchRequest, ActionResponse), (DispatchRequest, DispatchError)> {
        match self.stages(&request).await {
            Ok((resolved, bound)) => {
                let ctx = ExecutionContext {
                    request,
                    object: resolved.object,
                };
                match resolved.action.handler().execute(&ctx, &bound).await {
                    Ok(response) => Ok((ctx.request, response)),
                    Err(error) => Err((ctx.request, DispatchError::Execution(error))),
                }
            }
            Err(error) => Err((request, error)),
        }
    }

    /// Runs every pre-execution stage in the fixed order.
    async fn stages(
        &self,
        request: &DispatchRequest,
    ) -> Result<(ResolvedAction, BoundModelSet), DispatchError> {
        let table = self
            .snapshot
            .endpoint(&request.resource)
            .ok_or_else(|| DispatchError::UnknownResource(request.resource.clone()))?;

        let handle = self.tenants.open(&request.tenant).await?;
        let mut bound =
            self.scopes.bind(&handle, &self.snapshot, std::slice::from_ref(&request.resource))?;
        let model = bound
            .get(&request.resource)
            .map(Arc::clone)
            .ok_or_else(|| DispatchError::UnknownResource(request.resource.clone()))?;

        let resolved = self.resolver.resolve(table, request, &model).await?;

        let extras: Vec<ResourceName> = resolved
            .action
            .required_resources()
            .iter()
            .filter(|name| !bound.contains(name))
            .cloned()
            .collect();
        if !extras.is_empty() {
            self.scopes.extend(&mut bound, &handle, &self.snapshot, &extras)?;
        }

        self.gate.authorize(&resolved.action, request.principal.as_ref())?;

        Ok((resolved, bound))
    }
}

// ============================================================================
// SECTION: Failure Rendering
// ============================================================================

/// Renders a dispatch failure as a transport response.
fn failure_response(error: &DispatchError) -> ActionResponse {
    let body = match error {
        DispatchError::Execution(cause) => json!({
            "error": error.reason(),
            "detail": cause.message(),
        }),
        _ => json!({
            "error": error.reason(),
        }),
    };
    ActionResponse::with_status(error.status(), body)
}
