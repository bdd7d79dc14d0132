//! Webhook HTTP server.
//!
//! Serves the diagnostic, audit, and TokenReview authentication endpoints.
//!
//! The authentication endpoint is a mock: it never verifies the token it
//! receives. To serve the TLS that kubelets insist on for authentication
//! webhooks, mount a certificate pair at /etc/webhook/certs/ - the server
//! picks TLS automatically when both files are present.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::rejection::JsonRejection,
    extract::{ConnectInfo, MatchedPath, OriginalUri, Query, Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use jiff::Zoned;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::builder::Builder;
use crate::error::Error;
use crate::health::HealthState;
use crate::schema::{TokenReviewRequest, TokenReviewResponse};

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const DEFAULT_PORT: u16 = 80;

/// Identity embedded in every verdict. No verification happens here; the
/// webhook exists to exercise TokenReview plumbing, so every
/// syntactically valid review authenticates as this fixed user.
const STUB_USERNAME: &str = "test-ua";
const STUB_UID: &str = "42";
const STUB_GROUPS: [&str; 2] = ["developers", "qa"];
const STUB_EXTRA_KEY: &str = "extrafield1";
const STUB_EXTRA_VALUES: [&str; 2] = ["extravalue1", "extravalue2"];
const STUB_AUDIENCE: &str = "https://kubernetes.default.svc.cluster.local";

/// Shared state for webhook handlers
pub struct WebhookState {
    /// Version tag surfaced on the diagnostic page (TAG env var)
    pub tag: String,
    /// Readiness and metrics, shared with the health server
    pub health: Arc<HealthState>,
}

impl WebhookState {
    pub fn new(tag: impl Into<String>, health: Arc<HealthState>) -> Self {
        Self {
            tag: tag.into(),
            health,
        }
    }
}

/// Query parameters accepted by the audit and authentication endpoints.
///
/// The timeout is part of the wire contract the API server sends; it is
/// logged but not enforced as a deadline.
#[derive(Debug, Deserialize)]
struct TimeoutParams {
    timeout: String,
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/", get(diagnostics))
        .route("/audit/", post(audit))
        .route("/auth/", post(authenticate))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_requests,
        ))
        .with_state(state)
}

/// Record per-route request count, error count, and latency.
async fn track_requests(
    State(state): State<Arc<WebhookState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    let metrics = &state.health.metrics;
    metrics.record_request(&method, &path, start.elapsed().as_secs_f64());
    if response.status().is_client_error() || response.status().is_server_error() {
        metrics.record_error(&method, &path);
    }
    response
}

/// Diagnostic root handler.
///
/// Returns a plain-text page with the server time, the configured version
/// tag, the request URL, and the effective client address.
///
/// When an `X-Forwarded-For` header is present its value replaces the
/// socket-derived IP. That trusts whatever the client sends, so the
/// reported IP is spoofable unless the server sits behind a trusted
/// reverse proxy.
async fn diagnostics(
    State(state): State<Arc<WebhookState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> String {
    let now = Zoned::now();
    let client_ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| peer.ip().to_string());

    format!(
        "This is a test authentication webhook server!\n\
         The time is {time}\n\
         TAG VERSION: {tag}\n\
         Server hostname: {uri}\n\
         Client IP, Port: {ip}:{port}\n\
         ----------------------------------\n",
        time = now.strftime("%-I:%M:%S %p"),
        tag = state.tag,
        uri = uri,
        ip = client_ip,
        port = peer.port(),
    )
}

/// Audit handler.
///
/// Stub surface: the body is logged and discarded, and the response is an
/// empty JSON object no matter what was posted. Nothing here is a
/// contract beyond "accept anything, respond empty".
async fn audit(Query(params): Query<TimeoutParams>, body: Bytes) -> Json<Map<String, Value>> {
    debug!(timeout = %params.timeout, "audit request received");

    match serde_json::from_slice::<Value>(&body) {
        Ok(parsed) => info!(body = %parsed, "audit payload"),
        Err(_) => info!(body = %String::from_utf8_lossy(&body), "audit payload (not JSON)"),
    }

    Json(Map::new())
}

/// TokenReview authentication handler.
///
/// Mock implementation: the token and audiences in the review are logged
/// and ignored, and the verdict is always the same static identity with
/// `authenticated: true`. `kind` and `apiVersion` are echoed from the
/// request. Malformed bodies are rejected with 422 before any handler
/// logic runs.
async fn authenticate(
    Query(params): Query<TimeoutParams>,
    payload: Result<Json<TokenReviewRequest>, JsonRejection>,
) -> Result<Json<TokenReviewResponse>, Error> {
    let Json(review) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected malformed TokenReview payload");
        Error::Validation(rejection.body_text())
    })?;

    debug!(timeout = %params.timeout, review = ?review, "authentication request received");
    info!(
        kind = %review.kind,
        audiences = ?review.spec.audiences,
        "issuing static token review verdict"
    );

    let status = json!({
        "authenticated": true,
        "user": {
            "username": STUB_USERNAME,
            "uid": STUB_UID,
            "groups": STUB_GROUPS,
            "extra": { (STUB_EXTRA_KEY): STUB_EXTRA_VALUES },
        },
        "audiences": [STUB_AUDIENCE],
    });

    let response = Builder::<TokenReviewResponse>::new()
        .set("kind", &review.kind)?
        .set("apiVersion", &review.api_version)?
        .set("status", status)?
        .build()?;

    Ok(Json(response))
}

/// Errors that can occur when running the webhook server
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),
    /// Server error
    #[error("webhook server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Run the webhook server without TLS.
///
/// Binds all interfaces on the given port.
pub async fn run_webhook_server(state: Arc<WebhookState>, port: u16) -> Result<(), ServeError> {
    let app = create_webhook_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Webhook server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Run the webhook server with TLS.
///
/// TLS certificates are loaded from the given PEM files.
pub async fn run_webhook_server_tls(
    state: Arc<WebhookState>,
    port: u16,
    cert_path: &str,
    key_path: &str,
) -> Result<(), ServeError> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::path::PathBuf;

    let app = create_webhook_router(state);

    let config = RustlsConfig::from_pem_file(PathBuf::from(cert_path), PathBuf::from(key_path))
        .await
        .map_err(|e| ServeError::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Webhook server listening with TLS");

    axum_server::bind_rustls(addr, config)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}
