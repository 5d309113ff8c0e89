// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-request authorization gate.
//!
//! Every mutating or secret-revealing operation must, within the same
//! request: (a) load the single master credential, (b) verify the
//! password supplied in that request, and (c) only then touch the cipher.
//! Read-only metadata operations skip (b) but still require (a).
//!
//! Argon2 verification is blocking CPU work by design; it runs on the
//! blocking thread pool, never on the async executor.

use axum::http::HeaderMap;
use lockbox_core::{LockboxError, MasterCredential};
use lockbox_storage::queries::master;
use secrecy::SecretString;

use crate::error::ApiError;
use crate::AppState;

/// The request header carrying the plaintext master password.
///
/// A header, never a cookie or a stored session field: the password is
/// re-submitted on every sensitive call and exists only for the duration
/// of that request.
pub const MASTER_PASSWORD_HEADER: &str = "x-master-password";

/// Extract the master password from the request headers.
///
/// A missing or empty header fails exactly like a wrong password.
pub fn master_password(headers: &HeaderMap) -> Result<SecretString, ApiError> {
    headers
        .get(MASTER_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| SecretString::from(s.to_string()))
        .ok_or(ApiError(LockboxError::AuthenticationFailure))
}

/// Coarse single-tenant check: the master credential must exist.
pub async fn require_master(state: &AppState) -> Result<MasterCredential, ApiError> {
    master::get_master(&state.db)
        .await?
        .ok_or(ApiError(LockboxError::NotFound(
            "master password not set up".to_string(),
        )))
}

/// The full gate: load the master credential and verify this request's
/// password against the stored hash.
///
/// Returns the master credential on success so handlers can use its id
/// as the owner scope without a second lookup.
pub async fn authorize(
    state: &AppState,
    password: &SecretString,
) -> Result<MasterCredential, ApiError> {
    let master = require_master(state).await?;

    let guard = state.guard.clone();
    let stored_hash = master.password_hash.clone();
    let password = password.clone();
    let verified = tokio::task::spawn_blocking(move || {
        guard.verify_master_password(&password, &stored_hash)
    })
    .await
    .map_err(ApiError::join)??;

    if !verified {
        return Err(ApiError(LockboxError::AuthenticationFailure));
    }
    Ok(master)
}
