//! TokenReview request and response types.
//!
//! These mirror the Kubernetes `authentication.k8s.io` TokenReview wire
//! format, which is externally imposed and evolves outside this service.
//! Deserialization is deliberately lenient about unknown fields, strict
//! about the fields the webhook actually relies on.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::builder::{Buildable, FieldSpec};

/// Accept an explicit JSON `null` wherever a defaultable object is
/// expected, treating it the same as an absent field.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Object metadata on an inbound review. Only the creation timestamp is
/// modeled; everything else the API server sends is ignored.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

/// The authentication request payload: the bearer token under review and
/// the audiences the caller claims.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Spec {
    pub token: String,
    /// Ordered, may be empty.
    pub audiences: Vec<String>,
}

/// Free-form user attributes on an inbound review. Absent means no extra
/// attributes.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct StatusUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<BTreeMap<String, String>>,
}

/// Inbound status wrapper. `user` defaults to an empty [`StatusUser`]
/// when unset or null.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Status {
    #[serde(default, deserialize_with = "null_to_default")]
    pub user: StatusUser,
}

/// Inbound TokenReview.
///
/// `kind` and `apiVersion` are required but not checked against the
/// expected `"TokenReview"` literal; the response echoes whatever the
/// request carried. `metadata` and `status` default when absent.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReviewRequest {
    pub kind: String,
    pub api_version: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub metadata: Metadata,
    pub spec: Spec,
    #[serde(default, deserialize_with = "null_to_default")]
    pub status: Status,
}

/// Outbound TokenReview verdict.
///
/// `status` is an open-ended JSON value: its shape (authentication
/// result, user identity, audiences) is determined by the evolving
/// Kubernetes wire contract, not by this service.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenReviewResponse {
    pub kind: String,
    pub api_version: String,
    pub status: Value,
}

impl Buildable for TokenReviewResponse {
    const NAME: &'static str = "TokenReviewResponse";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("kind"),
        FieldSpec::required("apiVersion"),
        FieldSpec::required("status"),
    ];
}
