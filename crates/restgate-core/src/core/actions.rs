// crates/restgate-core/src/core/actions.rs
// ============================================================================
// Module: Restgate Action Tables
// Description: Versioned action surface for one resource class.
// Purpose: Index permission-gated actions by (version, verb, key) triples.
// Dependencies: serde, crate::interfaces
// ============================================================================

//! ## Overview
//! An [`ActionTable`] maps `(version, verb, key)` triples to
//! [`ActionDefinition`] entries for one resource class. Keys form a closed
//! space: the collection default, the per-object default, and named custom
//! actions. Tables are built by action-table providers at load time and are
//! immutable afterwards.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ApiVersion;
use crate::core::identifiers::PermissionName;
use crate::core::identifiers::ResourceName;
use crate::core::request::RouteStyle;
use crate::interfaces::ActionHandler;

// ============================================================================
// SECTION: HTTP Verbs
// ============================================================================

/// HTTP verb routed by an action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
    /// HTTP PATCH.
    Patch,
}

impl HttpVerb {
    /// Returns the lowercase label for the verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
        }
    }

    /// Parses a verb from an HTTP method string, case-insensitively.
    #[must_use]
    pub fn parse(method: &str) -> Option<Self> {
        let method = method.trim();
        if method.eq_ignore_ascii_case("get") {
            Some(Self::Get)
        } else if method.eq_ignore_ascii_case("post") {
            Some(Self::Post)
        } else if method.eq_ignore_ascii_case("put") {
            Some(Self::Put)
        } else if method.eq_ignore_ascii_case("delete") {
            Some(Self::Delete)
        } else if method.eq_ignore_ascii_case("patch") {
            Some(Self::Patch)
        } else {
            None
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Action Keys
// ============================================================================

/// Reserved wire label selecting the per-object default action.
pub const OBJECT_DEFAULT_LABEL: &str = "object";

/// Key selecting one action within a `(version, verb)` action list.
///
/// # Invariants
/// - `Default` and `ObjectDefault` are the only reserved keys; every other
///   label is a named custom action.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKey {
    /// Default collection action, wire label `""`.
    Default,
    /// Named custom action.
    Named(String),
    /// Default per-object action, wire label `object`.
    ObjectDefault,
}

impl ActionKey {
    /// Creates a key from a wire label, normalizing the reserved forms.
    #[must_use]
    pub fn named(label: impl Into<String>) -> Self {
        let label = label.into();
        if label.is_empty() {
            Self::Default
        } else if label == OBJECT_DEFAULT_LABEL {
            Self::ObjectDefault
        } else {
            Self::Named(label)
        }
    }

    /// Derives the key a request selects, per route style and explicit
    /// action. An empty action label counts as no action.
    #[must_use]
    pub fn derive(style: RouteStyle, action: Option<&str>) -> Self {
        match (action, style) {
            (Some(label), _) if !label.is_empty() => Self::named(label),
            (_, RouteStyle::Object) => Self::ObjectDefault,
            (_, RouteStyle::Collection) => Self::Default,
        }
    }

    /// Returns the wire label for the key.
    #[must_use]
    pub fn wire_label(&self) -> &str {
        match self {
            Self::Default => "",
            Self::Named(label) => label,
            Self::ObjectDefault => OBJECT_DEFAULT_LABEL,
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Named(label) => f.write_str(label),
            Self::ObjectDefault => f.write_str(OBJECT_DEFAULT_LABEL),
        }
    }
}

// ============================================================================
// SECTION: Action Definition
// ============================================================================

/// One permission-gated unit of behavior registered in an action table.
///
/// # Invariants
/// - An empty permission set means the action is public.
/// - The same definition may be registered under several routes.
#[derive(Clone)]
pub struct ActionDefinition {
    /// Permissions of which the caller must hold at least one.
    required_permissions: BTreeSet<PermissionName>,
    /// Additional resource classes the action needs bound for execution.
    required_resources: Vec<ResourceName>,
    /// Handler invoked once the request clears every dispatch stage.
    handler: Arc<dyn ActionHandler>,
}

impl ActionDefinition {
    /// Creates a public action definition around a handler.
    #[must_use]
    pub fn new(handler: impl ActionHandler + 'static) -> Self {
        Self {
            required_permissions: BTreeSet::new(),
            required_resources: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Returns a copy that additionally requires the given permission.
    #[must_use]
    pub fn require(mut self, permission: impl Into<PermissionName>) -> Self {
        self.required_permissions.insert(permission.into());
        self
    }

    /// Returns a copy that additionally declares a needed resource class.
    #[must_use]
    pub fn needs(mut self, resource: impl Into<ResourceName>) -> Self {
        self.required_resources.push(resource.into());
        self
    }

    /// Returns the required permission set.
    #[must_use]
    pub const fn required_permissions(&self) -> &BTreeSet<PermissionName> {
        &self.required_permissions
    }

    /// Returns the resource classes the action declares it needs.
    #[must_use]
    pub fn required_resources(&self) -> &[ResourceName] {
        &self.required_resources
    }

    /// Returns true when the action carries no permission requirement.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.required_permissions.is_empty()
    }

    /// Returns the action handler.
    #[must_use]
    pub const fn handler(&self) -> &Arc<dyn ActionHandler> {
        &self.handler
    }
}

impl fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("required_permissions", &self.required_permissions)
            .field("required_resources", &self.required_resources)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Action Table
// ============================================================================

/// Versioned action surface for one resource class.
///
/// # Invariants
/// - Lookup is pure; the table never mutates after load.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    /// Actions indexed by version, then verb, then key.
    versions: BTreeMap<ApiVersion, BTreeMap<HttpVerb, BTreeMap<ActionKey, ActionDefinition>>>,
}

impl ActionTable {
    /// Creates an empty action table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with an action registered under the given route.
    ///
    /// Registering the same `(version, verb, key)` twice keeps the latest
    /// entry; providers that need duplicate detection perform it before
    /// building the table.
    #[must_use]
    pub fn route(
        mut self,
        version: impl Into<ApiVersion>,
        verb: HttpVerb,
        key: ActionKey,
        action: ActionDefinition,
    ) -> Self {
        self.versions
            .entry(version.into())
            .or_default()
            .entry(verb)
            .or_default()
            .insert(key, action);
        self
    }

    /// Returns the action list for a `(version, verb)` pair, if present.
    #[must_use]
    pub fn actions_for(
        &self,
        version: &ApiVersion,
        verb: HttpVerb,
    ) -> Option<&BTreeMap<ActionKey, ActionDefinition>> {
        self.versions.get(version).and_then(|verbs| verbs.get(&verb))
    }

    /// Returns true when the table declares no routes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.values().all(|verbs| verbs.values().all(BTreeMap::is_empty))
    }

    /// Returns the versions the table declares.
    pub fn versions(&self) -> impl Iterator<Item = &ApiVersion> {
        self.versions.keys()
    }
}
