// crates/restgate-config/src/lib.rs
// ============================================================================
// Module: Restgate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for restgate.toml semantics.
// Dependencies: restgate-core, serde, toml
// ============================================================================

//! ## Overview
//! `restgate-config` defines the canonical configuration model for Restgate.
//! It provides strict, fail-closed validation: size limits on the config
//! file, hard caps on principal and resource counts, and duplicate-token
//! rejection.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AuthConfig;
pub use config::ConfigError;
pub use config::PrincipalConfig;
pub use config::RegistryConfig;
pub use config::RestgateConfig;
pub use config::ServerConfig;
