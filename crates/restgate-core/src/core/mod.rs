// crates/restgate-core/src/core/mod.rs
// ============================================================================
// Module: Restgate Core Types
// Description: Canonical resource, action, and request structures.
// Purpose: Provide stable types for the registry and dispatch pipeline.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Restgate core types define resource classes, versioned action tables, the
//! registry snapshot, and the per-request context. These types are the
//! canonical source of truth for any derived transport surface.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod actions;
pub mod identifiers;
pub mod request;
pub mod resource;
pub mod snapshot;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use actions::ActionDefinition;
pub use actions::ActionKey;
pub use actions::ActionTable;
pub use actions::HttpVerb;
pub use actions::OBJECT_DEFAULT_LABEL;
pub use identifiers::ApiVersion;
pub use identifiers::ObjectId;
pub use identifiers::PermissionName;
pub use identifiers::ResourceName;
pub use identifiers::TenantId;
pub use request::ActionResponse;
pub use request::BoundModelSet;
pub use request::DispatchRequest;
pub use request::ExecutionContext;
pub use request::Principal;
pub use request::RouteStyle;
pub use request::TenantScope;
pub use resource::ResourceDefinition;
pub use resource::ResourceScope;
pub use resource::SchemaRef;
pub use snapshot::RegistrySnapshot;
pub use snapshot::SnapshotError;
