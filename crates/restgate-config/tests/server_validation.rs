// crates/restgate-config/tests/server_validation.rs
// ============================================================================
// Module: Server Config Validation Tests
// Description: Tests for bind address and limit validation.
// ============================================================================
//! ## Overview
//! Validates bind-address parsing, body-size bounds, and registry limits.

#![allow(clippy::unwrap_used, reason = "Tests unwrap on deterministic fixtures.")]

use restgate_config::RestgateConfig;

/// Parses a config snippet, returning the validation outcome.
fn validate(snippet: &str) -> Result<(), restgate_config::ConfigError> {
    let config: RestgateConfig = toml::from_str(snippet).unwrap();
    config.validate()
}

// ============================================================================
// SECTION: Bind Address
// ============================================================================

#[test]
fn socket_addresses_are_accepted() {
    let outcome = validate(
        r#"
        [server]
        bind = "0.0.0.0:9000"
        "#,
    );
    assert!(outcome.is_ok());
}

#[test]
fn non_socket_bind_values_are_rejected() {
    let outcome = validate(
        r#"
        [server]
        bind = "not-an-address"
        "#,
    );
    assert!(outcome.is_err());
}

// ============================================================================
// SECTION: Limits
// ============================================================================

#[test]
fn zero_body_limit_is_rejected() {
    let outcome = validate(
        r#"
        [server]
        max_body_bytes = 0
        "#,
    );
    assert!(outcome.is_err());
}

#[test]
fn oversized_body_limit_is_rejected() {
    let outcome = validate(
        r#"
        [server]
        max_body_bytes = 999999999
        "#,
    );
    assert!(outcome.is_err());
}

#[test]
fn empty_system_tenant_is_rejected() {
    let outcome = validate(
        r#"
        [registry]
        system_tenant = ""
        "#,
    );
    assert!(outcome.is_err());
}

#[test]
fn zero_resource_cap_is_rejected() {
    let outcome = validate(
        r#"
        [registry]
        max_resources = 0
        "#,
    );
    assert!(outcome.is_err());
}
