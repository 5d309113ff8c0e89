// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication handlers: first-run setup, login, setup status, and
//! biometric token issuance.
//!
//! The issued token is opaque and deliberately inert: it is never looked
//! up on later requests. Sensitive operations re-verify the master
//! password instead (see `crate::gate`).

use axum::extract::State;
use axum::Json;
use lockbox_core::LockboxError;
use lockbox_storage::queries::{categories, master};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::gate;
use crate::AppState;

/// Minimum master password length accepted at setup.
const MIN_PASSWORD_LEN: usize = 8;

/// Request body for POST /v1/auth/setup.
#[derive(Deserialize)]
pub struct SetupRequest {
    /// The master password to protect the vault with.
    pub master_password: String,
    /// Whether the client intends to use biometric unlock (client-side
    /// meaning only; the server just stores the flag).
    #[serde(default)]
    pub biometric_enabled: bool,
}

impl std::fmt::Debug for SetupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupRequest")
            .field("master_password", &"[redacted]")
            .field("biometric_enabled", &self.biometric_enabled)
            .finish()
    }
}

/// Request body for POST /v1/auth/login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub master_password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("master_password", &"[redacted]")
            .finish()
    }
}

/// Response body for successful authentication calls.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: i64,
    pub token: String,
    pub message: String,
}

/// Response body for GET /v1/auth/check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub setup_complete: bool,
    pub biometric_enabled: bool,
}

/// POST /v1/auth/setup
///
/// First-run master password setup. Hashes the password, creates the
/// singleton master credential, and seeds the default categories. A
/// concurrent or repeated setup loses at the storage layer's primary-key
/// constraint and surfaces as 400.
pub async fn post_setup(
    State(state): State<AppState>,
    Json(body): Json<SetupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if body.master_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError(LockboxError::Validation(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        ))));
    }

    let password = SecretString::from(body.master_password);
    let guard = state.guard.clone();
    let hash = tokio::task::spawn_blocking(move || guard.hash_master_password(&password))
        .await
        .map_err(ApiError::join)??;

    let created = master::create_master(&state.db, &hash, body.biometric_enabled).await?;
    categories::seed_default_categories(&state.db, created.id).await?;

    let token = state.guard.issue_token()?;
    info!("master password set up");

    Ok(Json(AuthResponse {
        user_id: created.id,
        token,
        message: "master password setup successful".to_string(),
    }))
}

/// POST /v1/auth/login
///
/// Verifies the master password and returns a fresh token.
pub async fn post_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let password = SecretString::from(body.master_password);
    let master = gate::authorize(&state, &password).await?;

    let token = state.guard.issue_token()?;
    Ok(Json(AuthResponse {
        user_id: master.id,
        token,
        message: "login successful".to_string(),
    }))
}

/// GET /v1/auth/check
///
/// Ungated: reports whether setup has happened, so clients know which
/// screen to show first.
pub async fn get_check(State(state): State<AppState>) -> Result<Json<CheckResponse>, ApiError> {
    let master = master::get_master(&state.db).await?;
    Ok(Json(CheckResponse {
        setup_complete: master.is_some(),
        biometric_enabled: master.map(|m| m.biometric_enabled).unwrap_or(false),
    }))
}

/// POST /v1/auth/verify-biometric
///
/// Biometric verification happens on the client; the server only checks
/// the flag and issues a token. The token grants nothing that the master
/// password header does not re-check.
pub async fn post_verify_biometric(
    State(state): State<AppState>,
) -> Result<Json<AuthResponse>, ApiError> {
    let master = gate::require_master(&state).await?;

    if !master.biometric_enabled {
        return Err(ApiError(LockboxError::Validation(
            "biometric authentication is not enabled".to_string(),
        )));
    }

    let token = state.guard.issue_token()?;
    Ok(Json(AuthResponse {
        user_id: master.id,
        token,
        message: "biometric authentication successful".to_string(),
    }))
}
