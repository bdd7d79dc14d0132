//! token-webhook library crate
//!
//! This module exports the TokenReview wire schema, the generic response
//! builder, and the webhook HTTP surface.

pub mod builder;
pub mod error;
pub mod health;
pub mod schema;
pub mod webhooks;

pub use error::Error;
pub use health::HealthState;
pub use webhooks::{
    DEFAULT_PORT, ServeError, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WebhookState,
    run_webhook_server, run_webhook_server_tls,
};
