//! token-webhook - a mock Kubernetes TokenReview authentication webhook.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Reads process configuration from the environment
//! - Starts the health server and the webhook server (TLS when certs exist)

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

use token_webhook::health::{HealthState, run_health_server};
use token_webhook::webhooks::WebhookState;
use token_webhook::{
    DEFAULT_PORT, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, run_webhook_server, run_webhook_server_tls,
};

/// Grace period for in-flight requests to complete during shutdown
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("token_webhook=info".parse()?),
        )
        .json()
        .init();

    info!("Starting token-webhook");

    let tag = std::env::var("TAG").unwrap_or_else(|_| {
        warn!("TAG not set, using 'unknown'");
        "unknown".to_string()
    });
    let port = match std::env::var("PORT") {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!(port = %value, "PORT is not a valid port number, using default");
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    };

    // Create shared health state
    let health_state = Arc::new(HealthState::new());

    // Start health server immediately (probes should work before ready)
    let health_handle = {
        let health_state = health_state.clone();
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state).await {
                error!("Health server error: {}", e);
            }
        })
    };

    let state = Arc::new(WebhookState::new(tag, health_state.clone()));

    // Serve TLS when the certificate pair is mounted, plaintext otherwise
    let webhook_handle = tokio::spawn(async move {
        let result = if Path::new(WEBHOOK_CERT_PATH).exists() && Path::new(WEBHOOK_KEY_PATH).exists()
        {
            info!("TLS certificates found, serving with TLS");
            run_webhook_server_tls(state, port, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH).await
        } else {
            info!("TLS certificates not found, serving plaintext");
            run_webhook_server(state, port).await
        };
        if let Err(e) = result {
            error!("Webhook server error: {}", e);
        }
    });

    health_state.set_ready(true).await;

    // Wait for any server to exit (or fail), or a shutdown signal
    tokio::select! {
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        result = webhook_handle => {
            if let Err(e) = result {
                error!("Webhook server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Stop receiving new work before dropping in-flight requests
            health_state.set_ready(false).await;
            info!("Marked webhook as not ready");

            info!(
                "Waiting {}s for in-flight requests to complete...",
                SHUTDOWN_GRACE_PERIOD_SECS
            );
            tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)).await;

            info!("Grace period complete, shutting down");
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the server cannot shut
/// down gracefully without them. Using expect() here is intentional.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
