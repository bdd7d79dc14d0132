//! HTTP surface of the mock authentication webhook.
//!
//! Three endpoints: a plain-text diagnostic page, a stub audit sink, and
//! the TokenReview authentication endpoint.

mod server;

pub use server::{
    DEFAULT_PORT, ServeError, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WebhookState,
    create_webhook_router, run_webhook_server, run_webhook_server_tls,
};
