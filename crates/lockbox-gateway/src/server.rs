// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes and shared state. There is no auth middleware layer:
//! the authorization model is per-handler (see `crate::gate`), because
//! which gate applies -- password verification or the coarse existence
//! check -- depends on the operation, not the route prefix.

use axum::routing::{get, post, put};
use axum::Router;
use lockbox_core::LockboxError;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::handlers;
use crate::AppState;

/// Gateway server configuration (mirrors `ServerConfig` from lockbox-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the application router.
///
/// Exposed separately from [`serve`] so tests can drive the router
/// in-process without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/auth/setup", post(handlers::auth::post_setup))
        .route("/v1/auth/login", post(handlers::auth::post_login))
        .route("/v1/auth/check", get(handlers::auth::get_check))
        .route(
            "/v1/auth/verify-biometric",
            post(handlers::auth::post_verify_biometric),
        )
        .route(
            "/v1/credentials",
            get(handlers::credentials::list).post(handlers::credentials::create),
        )
        .route(
            "/v1/credentials/{id}",
            get(handlers::credentials::get)
                .put(handlers::credentials::update)
                .delete(handlers::credentials::delete),
        )
        .route(
            "/v1/credentials/{id}/decrypt",
            post(handlers::credentials::decrypt),
        )
        .route(
            "/v1/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route(
            "/v1/categories/{id}",
            put(handlers::categories::update).delete(handlers::categories::delete),
        )
        .route("/v1/history", get(handlers::history::list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), LockboxError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LockboxError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("Lockbox listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| LockboxError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
