// crates/restgate-config/src/config.rs
// ============================================================================
// Module: Restgate Configuration
// Description: Configuration loading and validation for Restgate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: restgate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Missing
//! or invalid configuration fails closed: the server refuses to start rather
//! than serving with a partial or inconsistent setup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use restgate_core::TenantScope;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "restgate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "RESTGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum number of configured principals.
pub(crate) const MAX_AUTH_PRINCIPALS: usize = 64;
/// Minimum length of a bearer token.
pub(crate) const MIN_AUTH_TOKEN_LENGTH: usize = 8;
/// Maximum length of a bearer token.
pub(crate) const MAX_AUTH_TOKEN_LENGTH: usize = 256;
/// Maximum number of permissions per principal.
pub(crate) const MAX_PRINCIPAL_PERMISSIONS: usize = 64;
/// Default maximum request body size in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Maximum allowed request body size in bytes.
pub(crate) const MAX_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
/// Default system tenant name.
pub(crate) const DEFAULT_SYSTEM_TENANT: &str = "system";
/// Default cap on registered resources.
pub(crate) const DEFAULT_MAX_RESOURCES: usize = 256;
/// Maximum allowed cap on registered resources.
pub(crate) const MAX_MAX_RESOURCES: usize = 4096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Restgate server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestgateConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Registry configuration.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl RestgateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.registry.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the listener, required to serve.
    pub bind: Option<String>,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Validates the server configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bind) = &self.bind {
            bind.parse::<SocketAddr>().map_err(|_| {
                ConfigError::Invalid(format!("server.bind is not a socket address: {bind}"))
            })?;
        }
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between 1 and {MAX_MAX_BODY_BYTES}"
            )));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Registry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Name designating the system database in routed tenant segments.
    #[serde(default = "default_system_tenant")]
    pub system_tenant: String,
    /// Cap on the number of registered resources.
    #[serde(default = "default_max_resources")]
    pub max_resources: usize,
}

impl RegistryConfig {
    /// Validates the registry configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system_tenant.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "registry.system_tenant must not be empty".to_string(),
            ));
        }
        if self.max_resources == 0 || self.max_resources > MAX_MAX_RESOURCES {
            return Err(ConfigError::Invalid(format!(
                "registry.max_resources must be between 1 and {MAX_MAX_RESOURCES}"
            )));
        }
        Ok(())
    }

    /// Maps a routed database segment to a tenant scope.
    #[must_use]
    pub fn scope_for(&self, database: &str) -> TenantScope {
        if database == self.system_tenant {
            TenantScope::System
        } else {
            TenantScope::Tenant(database.into())
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            system_tenant: DEFAULT_SYSTEM_TENANT.to_string(),
            max_resources: DEFAULT_MAX_RESOURCES,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Principals resolvable from bearer tokens.
    #[serde(default)]
    pub principals: Vec<PrincipalConfig>,
}

impl AuthConfig {
    /// Validates the authentication configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.principals.len() > MAX_AUTH_PRINCIPALS {
            return Err(ConfigError::Invalid(format!(
                "auth.principals exceeds the {MAX_AUTH_PRINCIPALS} entry limit"
            )));
        }
        let mut tokens = BTreeSet::new();
        for principal in &self.principals {
            principal.validate()?;
            if !tokens.insert(principal.token.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "auth.principals declares a duplicate token for subject `{}`",
                    principal.subject
                )));
            }
        }
        Ok(())
    }
}

/// One bearer-token principal binding.
#[derive(Debug, Clone, Deserialize)]
pub struct PrincipalConfig {
    /// Bearer token presented by the caller.
    pub token: String,
    /// Subject identifier for audit events.
    pub subject: String,
    /// Permissions granted to the principal.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl PrincipalConfig {
    /// Validates one principal binding.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the binding is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.len() < MIN_AUTH_TOKEN_LENGTH || self.token.len() > MAX_AUTH_TOKEN_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "auth principal token length must be between {MIN_AUTH_TOKEN_LENGTH} and \
                 {MAX_AUTH_TOKEN_LENGTH}"
            )));
        }
        if self.subject.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "auth principal subject must not be empty".to_string(),
            ));
        }
        if self.permissions.len() > MAX_PRINCIPAL_PERMISSIONS {
            return Err(ConfigError::Invalid(format!(
                "auth principal permissions exceed the {MAX_PRINCIPAL_PERMISSIONS} entry limit"
            )));
        }
        for permission in &self.permissions {
            if permission.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "auth principal permissions must not be empty strings".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Serde Defaults
// ============================================================================

/// Serde default for `server.max_body_bytes`.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Serde default for `registry.system_tenant`.
fn default_system_tenant() -> String {
    DEFAULT_SYSTEM_TENANT.to_string()
}

/// Serde default for `registry.max_resources`.
const fn default_max_resources() -> usize {
    DEFAULT_MAX_RESOURCES
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the config path from the argument, env override, or default.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    if let Some(path) = path {
        return path.to_path_buf();
    }
    if let Ok(value) = env::var(CONFIG_ENV_VAR) {
        if !value.trim().is_empty() {
            return PathBuf::from(value);
        }
    }
    PathBuf::from(DEFAULT_CONFIG_NAME)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("config io error: {0}")]
    Io(String),
    /// Parsing the config file failed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The config file is inconsistent or out of limits.
    #[error("invalid config: {0}")]
    Invalid(String),
}
