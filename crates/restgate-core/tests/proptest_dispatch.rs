//! Dispatch-core property-based tests.
//!
//! ## Purpose
//! These tests fuzz action labels, verbs, and permission sets to ensure key
//! derivation and the permission gate behave as total functions with the
//! documented semantics.
//!
//! ## What is covered
//! - Key derivation is total and normalizes the reserved labels.
//! - The permission gate is equivalent to a naive any-match scan.
//!
//! ## What is intentionally out of scope
//! - Object lookups and table contents (covered by `resolver.rs`).
// crates/restgate-core/tests/proptest_dispatch.rs
// ============================================================================
// Module: Dispatch Property-Based Tests
// Description: Fuzz-like checks for key derivation and permission gating.
// Purpose: Ensure derivation and gating never panic and match the policy.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use restgate_core::ActionDefinition;
use restgate_core::ActionKey;
use restgate_core::ActionResponse;
use restgate_core::FixedResponseHandler;
use restgate_core::HttpVerb;
use restgate_core::PermissionGate;
use restgate_core::PermissionName;
use restgate_core::Principal;
use restgate_core::RouteStyle;
use serde_json::json;

/// Builds an action requiring the given permissions.
fn action_requiring(required: &[String]) -> ActionDefinition {
    required.iter().fold(
        ActionDefinition::new(FixedResponseHandler::new(ActionResponse::ok(json!({})))),
        |action, name| action.require(name.as_str()),
    )
}

proptest! {
    #[test]
    fn key_derivation_is_total_and_normalizes_reserved_labels(label in ".{0,32}") {
        for style in [RouteStyle::Collection, RouteStyle::Object] {
            let key = ActionKey::derive(style, Some(&label));
            match label.as_str() {
                // An empty label counts as no action for the route style.
                "" => prop_assert_eq!(key, ActionKey::derive(style, None)),
                "object" => prop_assert_eq!(key, ActionKey::ObjectDefault),
                other => prop_assert_eq!(key, ActionKey::named(other)),
            }
        }
    }

    #[test]
    fn implicit_keys_follow_the_route_style(_label in ".{0,8}") {
        prop_assert_eq!(ActionKey::derive(RouteStyle::Collection, None), ActionKey::Default);
        prop_assert_eq!(ActionKey::derive(RouteStyle::Object, None), ActionKey::ObjectDefault);
    }

    #[test]
    fn wire_labels_round_trip_through_named(label in "[a-z]{1,16}") {
        let key = ActionKey::named(label.clone());
        prop_assert_eq!(ActionKey::named(key.wire_label()), key);
    }

    #[test]
    fn verb_parsing_round_trips_case_insensitively(upper in prop::bool::ANY) {
        for verb in [HttpVerb::Get, HttpVerb::Post, HttpVerb::Put, HttpVerb::Delete, HttpVerb::Patch] {
            let label = if upper {
                verb.as_str().to_ascii_uppercase()
            } else {
                verb.as_str().to_string()
            };
            prop_assert_eq!(HttpVerb::parse(&label), Some(verb));
        }
    }

    #[test]
    fn permission_gate_matches_naive_any_scan(
        required in prop::collection::vec("[a-c]{1}", 0..4),
        granted in prop::collection::vec("[a-c]{1}", 0..4),
    ) {
        let action = action_requiring(&required);
        let caller = Principal::new(
            "fuzz",
            granted.iter().map(|name| PermissionName::new(name.as_str())),
        );

        let expected = required.is_empty()
            || granted.iter().any(|grant| required.contains(grant));
        let decision = PermissionGate.authorize(&action, Some(&caller)).is_ok();
        prop_assert_eq!(decision, expected);
    }

    #[test]
    fn anonymous_callers_pass_only_public_actions(
        required in prop::collection::vec("[a-c]{1}", 0..4),
    ) {
        let action = action_requiring(&required);
        let decision = PermissionGate.authorize(&action, None).is_ok();
        prop_assert_eq!(decision, required.is_empty());
    }
}
