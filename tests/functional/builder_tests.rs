//! Builder contract tests for the TokenReview response schema.
//!
//! Covers the same assembly path the authentication handler uses, plus a
//! property test that undeclared field names are always rejected.

use proptest::prelude::*;
use serde_json::json;

use token_webhook::Error;
use token_webhook::builder::Builder;
use token_webhook::schema::TokenReviewResponse;

#[test]
fn test_assembles_token_review_response() {
    let status = json!({
        "authenticated": true,
        "user": { "username": "test-ua" },
        "audiences": ["https://kubernetes.default.svc.cluster.local"]
    });

    let response = Builder::<TokenReviewResponse>::new()
        .set("kind", "TokenReview")
        .unwrap()
        .set("apiVersion", "authentication.k8s.io/v1")
        .unwrap()
        .set("status", &status)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(response.kind, "TokenReview");
    assert_eq!(response.api_version, "authentication.k8s.io/v1");
    assert_eq!(response.status, status);
}

#[test]
fn test_build_without_status_fails() {
    let err = Builder::<TokenReviewResponse>::new()
        .set("kind", "TokenReview")
        .unwrap()
        .set("apiVersion", "authentication.k8s.io/v1")
        .unwrap()
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::MissingField { field: "status", .. }));
    assert!(!err.is_client_error());
}

#[test]
fn test_rust_field_name_is_not_a_wire_field() {
    // The declared wire name is apiVersion, not the Rust identifier
    let err = Builder::<TokenReviewResponse>::new()
        .set("api_version", "v1")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidField { .. }));
}

/// Strategy for generating declared wire field names.
fn declared_field() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("kind"), Just("apiVersion"), Just("status")]
}

proptest! {
    #[test]
    fn test_set_rejects_any_undeclared_field(field in "[a-zA-Z0-9_-]{1,32}") {
        prop_assume!(field != "kind" && field != "apiVersion" && field != "status");

        let result = Builder::<TokenReviewResponse>::new().set(&field, "value");
        prop_assert!(
            matches!(result, Err(Error::InvalidField { .. })),
            "expected InvalidField error"
        );
    }

    #[test]
    fn test_set_accepts_every_declared_field(field in declared_field()) {
        let result = Builder::<TokenReviewResponse>::new().set(field, "value");
        prop_assert!(result.is_ok());
    }
}
