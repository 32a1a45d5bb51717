// crates/restgate-http/src/server.rs
// ============================================================================
// Module: HTTP Server
// Description: Generic REST routes over the Restgate dispatch core.
// Purpose: Serve every resource class through two route templates.
// Dependencies: restgate-config, restgate-core, axum, tokio
// ============================================================================

//! ## Overview
//! The HTTP server exposes the generic route templates over the dispatch
//! core: a collection-style template and an object-style template, each with
//! an optional trailing action segment, plus an `/api` liveness probe. The
//! registry is loaded before the listener binds; a load failure keeps the
//! process out of the serving state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::routing::any;
use axum::routing::get;
use restgate_config::RegistryConfig;
use restgate_config::RestgateConfig;
use restgate_core::ActionResponse;
use restgate_core::DispatchRequest;
use restgate_core::Dispatcher;
use restgate_core::HttpVerb;
use restgate_core::ActionTableProvider;
use restgate_core::ModelProvider;
use restgate_core::ObjectId;
use restgate_core::ResourceEnumerator;
use restgate_core::Principal;
use restgate_core::RegistryLoadError;
use restgate_core::RegistryLoader;
use restgate_core::StaticResourceCatalog;
use restgate_core::StderrAuditSink;
use restgate_core::TenantDirectory;
use serde_json::json;

use crate::auth::PrincipalResolver;
use crate::auth::StaticPrincipalResolver;
use crate::auth::StderrAuthAuditSink;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Restgate HTTP server instance.
pub struct RestgateServer {
    /// Validated server configuration.
    config: RestgateConfig,
    /// Resource catalog feeding the registry loader.
    catalog: Arc<StaticResourceCatalog>,
    /// Tenant directory for per-request database handles.
    tenants: Arc<dyn TenantDirectory>,
    /// Principal resolver for inbound credentials.
    resolver: Arc<dyn PrincipalResolver>,
}

impl RestgateServer {
    /// Builds a server from configuration, a catalog, and a tenant directory.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when the configuration is invalid.
    pub fn from_parts(
        config: RestgateConfig,
        catalog: Arc<StaticResourceCatalog>,
        tenants: Arc<dyn TenantDirectory>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let resolver =
            Arc::new(StaticPrincipalResolver::from_config(&config.auth, Arc::new(StderrAuthAuditSink)));
        emit_anonymous_only_warning(&config);
        Ok(Self {
            config,
            catalog,
            tenants,
            resolver,
        })
    }

    /// Returns a copy with a custom principal resolver.
    #[must_use]
    pub fn with_principal_resolver(mut self, resolver: Arc<dyn PrincipalResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Loads the registry and serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Registry`] when the registry load fails (the
    /// listener is never bound in that case), [`ServerError::Config`] when
    /// no bind address is configured, and [`ServerError::Transport`] when
    /// the listener fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let bind = self
            .config
            .server
            .bind
            .as_ref()
            .ok_or_else(|| ServerError::Config("server.bind is required to serve".to_string()))?;
        let addr: SocketAddr = bind
            .parse()
            .map_err(|_| ServerError::Config(format!("invalid bind address: {bind}")))?;

        let state = self.into_state().await?;
        let app = router(state);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("listener bind failed: {err}")))?;
        axum::serve(listener, app)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }

    /// Loads the registry and assembles the shared request state.
    async fn into_state(self) -> Result<Arc<ServerState>, ServerError> {
        let enumerator: Arc<dyn ResourceEnumerator> = self.catalog.clone();
        let models: Arc<dyn ModelProvider> = self.catalog.clone();
        let actions: Arc<dyn ActionTableProvider> = self.catalog.clone();
        let loader = RegistryLoader::new(
            enumerator,
            models,
            actions,
            Arc::new(StderrAuditSink),
        );
        let snapshot = loader.load().await?;
        if snapshot.len() > self.config.registry.max_resources {
            return Err(ServerError::Config(format!(
                "registry exceeds registry.max_resources ({} > {})",
                snapshot.len(),
                self.config.registry.max_resources
            )));
        }
        let dispatcher =
            Dispatcher::new(Arc::new(snapshot), self.tenants, Arc::new(StderrAuditSink));
        Ok(Arc::new(ServerState {
            dispatcher,
            resolver: self.resolver,
            registry: self.config.registry.clone(),
            max_body_bytes: self.config.server.max_body_bytes,
        }))
    }
}

/// Shared state for route handlers.
struct ServerState {
    /// Dispatcher over the published snapshot.
    dispatcher: Dispatcher,
    /// Principal resolver for inbound credentials.
    resolver: Arc<dyn PrincipalResolver>,
    /// Registry configuration for tenant-scope mapping.
    registry: RegistryConfig,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

/// Assembles the generic route templates.
fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api", get(handle_probe))
        .route("/api/{version}/{db}/{classname}", any(handle_collection))
        .route("/api/{version}/{db}/{classname}/{action}", any(handle_collection_action))
        .route("/api/{version}/{db}/{classname}/id/{objectid}", any(handle_object))
        .route("/api/{version}/{db}/{classname}/id/{objectid}/{action}", any(handle_object_action))
        .with_state(state)
}

// ============================================================================
// SECTION: Route Handlers
// ============================================================================

/// Liveness probe.
async fn handle_probe() -> &'static str {
    "api_online"
}

/// Collection route without an action segment.
async fn handle_collection(
    State(state): State<Arc<ServerState>>,
    Path((version, db, classname)): Path<(String, String, String)>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let parts = RouteParts {
        version,
        db,
        classname,
        object_id: None,
        action: None,
    };
    serve_route(&state, parts, &method, &headers, &body).await
}

/// Collection route with an action segment.
async fn handle_collection_action(
    State(state): State<Arc<ServerState>>,
    Path((version, db, classname, action)): Path<(String, String, String, String)>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let parts = RouteParts {
        version,
        db,
        classname,
        object_id: None,
        action: Some(action),
    };
    serve_route(&state, parts, &method, &headers, &body).await
}

/// Object route without an action segment.
async fn handle_object(
    State(state): State<Arc<ServerState>>,
    Path((version, db, classname, objectid)): Path<(String, String, String, String)>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let parts = RouteParts {
        version,
        db,
        classname,
        object_id: Some(objectid),
        action: None,
    };
    serve_route(&state, parts, &method, &headers, &body).await
}

/// Object route with an action segment.
async fn handle_object_action(
    State(state): State<Arc<ServerState>>,
    Path((version, db, classname, objectid, action)): Path<(
        String,
        String,
        String,
        String,
        String,
    )>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let parts = RouteParts {
        version,
        db,
        classname,
        object_id: Some(objectid),
        action: Some(action),
    };
    serve_route(&state, parts, &method, &headers, &body).await
}

// ============================================================================
// SECTION: Request Construction
// ============================================================================

/// Raw path segments captured by a route template.
struct RouteParts {
    /// Version segment.
    version: String,
    /// Database segment.
    db: String,
    /// Resource class segment.
    classname: String,
    /// Object id segment, for object-style routes.
    object_id: Option<String>,
    /// Action segment, when present.
    action: Option<String>,
}

/// Runs the shared guard-resolve-dispatch flow for one matched route.
async fn serve_route(
    state: &ServerState,
    parts: RouteParts,
    method: &Method,
    headers: &HeaderMap,
    body: &Bytes,
) -> (StatusCode, axum::Json<serde_json::Value>) {
    if body.len() > state.max_body_bytes {
        return render(&ActionResponse::with_status(
            413,
            json!({
                "error": "body_too_large",
            }),
        ));
    }
    let auth_header = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());
    let principal = state.resolver.resolve(auth_header);
    let Some(request) = build_request(&state.registry, parts, method, principal) else {
        // Methods outside the verb enum resolve the same way a verb absent
        // from the version table would.
        return render(&ActionResponse::with_status(
            404,
            json!({
                "error": "unknown_version",
            }),
        ));
    };
    render(&state.dispatcher.dispatch(request).await)
}

/// Builds a dispatch request from route segments and a resolved principal.
fn build_request(
    registry: &RegistryConfig,
    parts: RouteParts,
    method: &Method,
    principal: Option<Principal>,
) -> Option<DispatchRequest> {
    let verb = HttpVerb::parse(method.as_str())?;
    let tenant = registry.scope_for(&parts.db);
    let mut request = match parts.object_id {
        Some(object_id) => DispatchRequest::object(
            parts.version,
            parts.classname,
            verb,
            tenant,
            Some(ObjectId::new(object_id)),
        ),
        None => DispatchRequest::collection(parts.version, parts.classname, verb, tenant),
    };
    if let Some(action) = parts.action {
        request = request.with_action(action);
    }
    if let Some(principal) = principal {
        request = request.with_principal(principal);
    }
    Some(request)
}

/// Renders an action response as an axum response pair.
fn render(response: &ActionResponse) -> (StatusCode, axum::Json<serde_json::Value>) {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, axum::Json(response.body.clone()))
}

/// Warns when no principals are configured and every caller is anonymous.
#[allow(clippy::print_stderr, reason = "Startup warning goes to stderr by contract.")]
fn emit_anonymous_only_warning(config: &RestgateConfig) {
    if config.auth.principals.is_empty() {
        eprintln!(
            "restgate-http: WARNING: no auth principals configured; every caller is anonymous \
             and only public actions are reachable"
        );
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Registry load failed; the server never reached the serving state.
    #[error(transparent)]
    Registry(#[from] RegistryLoadError),
    /// Listener or transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
