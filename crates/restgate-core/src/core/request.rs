// crates/restgate-core/src/core/request.rs
// ============================================================================
// Module: Restgate Request Types
// Description: Per-request context, tenant scope, and response payloads.
// Purpose: Carry resolved route parameters through the dispatch pipeline.
// Dependencies: serde, crate::interfaces
// ============================================================================

//! ## Overview
//! Types in this module live for exactly one request: the resolved route
//! parameters ([`DispatchRequest`]), the caller identity ([`Principal`]),
//! the tenant identity the request is bound to ([`TenantScope`]), the
//! tenant-bound model handles ([`BoundModelSet`]), and the transport payload
//! an action produces ([`ActionResponse`]). Nothing here is persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::actions::HttpVerb;
use crate::core::identifiers::ApiVersion;
use crate::core::identifiers::ObjectId;
use crate::core::identifiers::PermissionName;
use crate::core::identifiers::ResourceName;
use crate::core::identifiers::TenantId;
use crate::interfaces::ModelHandle;

// ============================================================================
// SECTION: Tenant Scope
// ============================================================================

/// Identity of the database a request is bound to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TenantScope {
    /// The one designated system database.
    System,
    /// A regular tenant database.
    Tenant(TenantId),
}

impl TenantScope {
    /// Returns true for the system database.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }

    /// Returns a stable label for audit events.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::System => "system",
            Self::Tenant(id) => id.as_str(),
        }
    }
}

impl fmt::Display for TenantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Route Style
// ============================================================================

/// Which of the two generic route templates matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStyle {
    /// Route without an object id segment.
    Collection,
    /// Route addressing one specific record.
    Object,
}

impl RouteStyle {
    /// Returns true for object-style routes.
    #[must_use]
    pub const fn is_object(self) -> bool {
        matches!(self, Self::Object)
    }
}

// ============================================================================
// SECTION: Principal
// ============================================================================

/// Authenticated caller identity with its granted permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Subject identifier for audit events.
    subject: String,
    /// Permissions granted to the caller.
    permissions: BTreeSet<PermissionName>,
}

impl Principal {
    /// Creates a new principal.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        permissions: impl IntoIterator<Item = PermissionName>,
    ) -> Self {
        Self {
            subject: subject.into(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Returns the subject identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the granted permission set.
    #[must_use]
    pub const fn permissions(&self) -> &BTreeSet<PermissionName> {
        &self.permissions
    }
}

// ============================================================================
// SECTION: Dispatch Request
// ============================================================================

/// Resolved route parameters for one inbound request.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    /// Requested API version.
    pub version: ApiVersion,
    /// Requested resource class.
    pub resource: ResourceName,
    /// Which route template matched.
    pub style: RouteStyle,
    /// Object id segment for object-style routes.
    pub object_id: Option<ObjectId>,
    /// Explicit action segment, when present.
    pub action: Option<String>,
    /// HTTP verb of the request.
    pub verb: HttpVerb,
    /// Authenticated caller, absent for anonymous requests.
    pub principal: Option<Principal>,
    /// Database identity the request is bound to.
    pub tenant: TenantScope,
}

impl DispatchRequest {
    /// Builds a collection-style request.
    #[must_use]
    pub fn collection(
        version: impl Into<ApiVersion>,
        resource: impl Into<ResourceName>,
        verb: HttpVerb,
        tenant: TenantScope,
    ) -> Self {
        Self {
            version: version.into(),
            resource: resource.into(),
            style: RouteStyle::Collection,
            object_id: None,
            action: None,
            verb,
            principal: None,
            tenant,
        }
    }

    /// Builds an object-style request.
    #[must_use]
    pub fn object(
        version: impl Into<ApiVersion>,
        resource: impl Into<ResourceName>,
        verb: HttpVerb,
        tenant: TenantScope,
        object_id: Option<ObjectId>,
    ) -> Self {
        Self {
            version: version.into(),
            resource: resource.into(),
            style: RouteStyle::Object,
            object_id,
            action: None,
            verb,
            principal: None,
            tenant,
        }
    }

    /// Returns a copy with an explicit action segment.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Returns a copy with the caller principal attached.
    #[must_use]
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }
}

// ============================================================================
// SECTION: Execution Context
// ============================================================================

/// Context handed to an action handler once dispatch clears every stage.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// The request that selected this action.
    pub request: DispatchRequest,
    /// The fetched record for object-style routes.
    pub object: Option<Value>,
}

// ============================================================================
// SECTION: Action Response
// ============================================================================

/// Transport-level payload produced by an action handler.
///
/// # Invariants
/// - The dispatch core never inspects or transforms the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body.
    pub body: Value,
}

impl ActionResponse {
    /// Builds a 200 response with the given body.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
        }
    }

    /// Builds a response with an explicit status code.
    #[must_use]
    pub fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
        }
    }
}

// ============================================================================
// SECTION: Bound Model Set
// ============================================================================

/// Tenant-bound model handles for one request, keyed by resource name.
///
/// # Invariants
/// - Built only by the scope binder; discarded at end of request.
#[derive(Clone, Default)]
pub struct BoundModelSet {
    /// Live model handles keyed by resource name.
    models: BTreeMap<ResourceName, Arc<dyn ModelHandle>>,
}

impl BoundModelSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a bound model handle.
    pub fn insert(&mut self, name: ResourceName, model: Arc<dyn ModelHandle>) {
        self.models.insert(name, model);
    }

    /// Returns the handle bound for a resource name, if present.
    #[must_use]
    pub fn get(&self, name: &ResourceName) -> Option<&Arc<dyn ModelHandle>> {
        self.models.get(name)
    }

    /// Returns true when a handle is bound for the resource name.
    #[must_use]
    pub fn contains(&self, name: &ResourceName) -> bool {
        self.models.contains_key(name)
    }

    /// Returns the bound resource names.
    pub fn names(&self) -> impl Iterator<Item = &ResourceName> {
        self.models.keys()
    }

    /// Returns the number of bound handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true when no handles are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl fmt::Debug for BoundModelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundModelSet").field("names", &self.models.keys()).finish()
    }
}
