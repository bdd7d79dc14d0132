//! Wire-format scenario tests for the TokenReview schema.
//!
//! The payloads here are the ones a kubelet-style caller actually posts,
//! asserted byte-for-byte where ordering matters.

use serde_json::json;

use token_webhook::schema::{TokenReviewRequest, TokenReviewResponse};

#[test]
fn test_kubelet_style_review_round_trip() {
    let inbound = r#"{"kind":"TokenReview","apiVersion":"authentication.k8s.io/v1","metadata":{},"spec":{"token":"abc","audiences":["aud1"]},"status":{}}"#;
    let review: TokenReviewRequest = serde_json::from_str(inbound).unwrap();

    assert_eq!(review.kind, "TokenReview");
    assert_eq!(review.api_version, "authentication.k8s.io/v1");
    assert_eq!(review.spec.token, "abc");
    assert_eq!(review.spec.audiences, vec!["aud1"]);

    let response = TokenReviewResponse {
        kind: review.kind.clone(),
        api_version: review.api_version.clone(),
        status: json!({
            "authenticated": true,
            "user": {
                "username": "test-ua",
                "uid": "42",
                "groups": ["developers", "qa"],
                "extra": { "extrafield1": ["extravalue1", "extravalue2"] }
            },
            "audiences": ["https://kubernetes.default.svc.cluster.local"]
        }),
    };

    let expected = r#"{"kind":"TokenReview","apiVersion":"authentication.k8s.io/v1","status":{"authenticated":true,"user":{"username":"test-ua","uid":"42","groups":["developers","qa"],"extra":{"extrafield1":["extravalue1","extravalue2"]}},"audiences":["https://kubernetes.default.svc.cluster.local"]}}"#;
    assert_eq!(serde_json::to_string(&response).unwrap(), expected);
}

#[test]
fn test_review_without_spec_fails_validation() {
    let inbound = r#"{"kind":"TokenReview","apiVersion":"authentication.k8s.io/v1"}"#;
    let err = serde_json::from_str::<TokenReviewRequest>(inbound).unwrap_err();
    // serde names the missing field so callers get a field-level message
    assert!(err.to_string().contains("spec"));
}

#[test]
fn test_review_with_malformed_audiences_fails_validation() {
    let inbound = r#"{"kind":"TokenReview","apiVersion":"v1","spec":{"token":"abc","audiences":[1,2]}}"#;
    assert!(serde_json::from_str::<TokenReviewRequest>(inbound).is_err());
}

#[test]
fn test_extra_api_server_fields_are_tolerated() {
    // Real API servers send more fields than this webhook models
    let inbound = r#"{
        "kind": "TokenReview",
        "apiVersion": "authentication.k8s.io/v1",
        "metadata": { "creationTimestamp": "2026-08-07T00:00:00Z", "managedFields": [] },
        "spec": { "token": "abc", "audiences": [] },
        "status": { "user": { "extra": {}, "username": "ignored" } }
    }"#;
    let review: TokenReviewRequest = serde_json::from_str(inbound).unwrap();
    assert_eq!(
        review.metadata.creation_timestamp.as_deref(),
        Some("2026-08-07T00:00:00Z")
    );
}
