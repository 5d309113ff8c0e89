// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential record handlers.
//!
//! Listing and fetching return ciphertext metadata only and are gated by
//! "a master credential exists". Creating, updating, revealing, and
//! deleting are gated by per-request master password verification. The
//! plaintext secret appears only inside encrypt/decrypt calls and the
//! one response body that deliberately reveals it; it is never logged.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use lockbox_core::{ActivityAction, CredentialRecord, LockboxError};
use lockbox_storage::queries::{activity, credentials};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::gate;
use crate::AppState;

/// Query parameters for GET /v1/credentials.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Substring match on title/username/email/website.
    #[serde(default)]
    pub search: Option<String>,
    /// Narrow to a single category.
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Request body for POST /v1/credentials.
#[derive(Deserialize)]
pub struct CreateCredentialRequest {
    pub title: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// The secret to store. Encrypted before it touches storage.
    pub password: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl std::fmt::Debug for CreateCredentialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateCredentialRequest")
            .field("title", &self.title)
            .field("password", &"[redacted]")
            .finish_non_exhaustive()
    }
}

/// Request body for PUT /v1/credentials/{id}. Absent fields are left
/// unchanged; a present `password` is re-encrypted.
#[derive(Default, Deserialize)]
pub struct UpdateCredentialRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl std::fmt::Debug for UpdateCredentialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateCredentialRequest")
            .field("title", &self.title)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

/// Response body for POST /v1/credentials/{id}/decrypt.
#[derive(Serialize)]
pub struct DecryptedResponse {
    /// The revealed secret.
    pub password: String,
}

/// Response body for DELETE /v1/credentials/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// GET /v1/credentials
///
/// Ciphertext is never decrypted here, so this is existence-gated only.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CredentialRecord>>, ApiError> {
    let master = gate::require_master(&state).await?;
    let records = credentials::list_credentials(
        &state.db,
        master.id,
        query.search.as_deref(),
        query.category_id,
    )
    .await?;
    Ok(Json(records))
}

/// POST /v1/credentials
///
/// Password-gated: verifies, encrypts, stores, and logs the creation.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateCredentialRequest>,
) -> Result<Json<CredentialRecord>, ApiError> {
    let password = gate::master_password(&headers)?;
    let master = gate::authorize(&state, &password).await?;

    if body.title.trim().is_empty() {
        return Err(ApiError(LockboxError::Validation(
            "title must not be empty".to_string(),
        )));
    }
    if body.password.is_empty() {
        return Err(ApiError(LockboxError::Validation(
            "password must not be empty".to_string(),
        )));
    }

    let encrypted_secret = encrypt_blocking(&state, body.password, &password).await?;

    let record = credentials::create_credential(
        &state.db,
        master.id,
        &credentials::NewCredential {
            title: body.title,
            username: body.username,
            email: body.email,
            website: body.website,
            notes: body.notes,
            encrypted_secret,
            category_id: body.category_id,
        },
    )
    .await?;

    activity::record_activity(
        &state.db,
        master.id,
        Some(record.id),
        ActivityAction::Created,
        Some(&format!("Created password for {}", record.title)),
    )
    .await?;

    debug!(id = record.id, "credential created");
    Ok(Json(record))
}

/// GET /v1/credentials/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CredentialRecord>, ApiError> {
    let master = gate::require_master(&state).await?;
    let record = credentials::get_credential(&state.db, master.id, id)
        .await?
        .ok_or_else(|| ApiError(LockboxError::NotFound("credential".to_string())))?;
    Ok(Json(record))
}

/// POST /v1/credentials/{id}/decrypt
///
/// The only operation that reveals a stored secret. Password-gated, and
/// the reveal is recorded in the timeline as a copy.
pub async fn decrypt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<DecryptedResponse>, ApiError> {
    let password = gate::master_password(&headers)?;
    let master = gate::authorize(&state, &password).await?;

    let record = credentials::get_credential(&state.db, master.id, id)
        .await?
        .ok_or_else(|| ApiError(LockboxError::NotFound("credential".to_string())))?;

    let cipher = state.cipher.clone();
    let token = record.encrypted_secret.clone();
    let key_password = password.clone();
    let plaintext =
        tokio::task::spawn_blocking(move || cipher.decrypt(&token, &key_password))
            .await
            .map_err(ApiError::join)??;

    activity::record_activity(
        &state.db,
        master.id,
        Some(record.id),
        ActivityAction::Copied,
        Some(&format!("Copied password for {}", record.title)),
    )
    .await?;

    Ok(Json(DecryptedResponse {
        password: plaintext.expose_secret().to_string(),
    }))
}

/// PUT /v1/credentials/{id}
///
/// Password-gated partial update. A supplied secret is re-encrypted
/// under the (just verified) master password.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<UpdateCredentialRequest>,
) -> Result<Json<CredentialRecord>, ApiError> {
    let password = gate::master_password(&headers)?;
    let master = gate::authorize(&state, &password).await?;

    if let Some(title) = &body.title
        && title.trim().is_empty()
    {
        return Err(ApiError(LockboxError::Validation(
            "title must not be empty".to_string(),
        )));
    }

    let encrypted_secret = match body.password {
        Some(secret) if !secret.is_empty() => {
            Some(encrypt_blocking(&state, secret, &password).await?)
        }
        Some(_) => {
            return Err(ApiError(LockboxError::Validation(
                "password must not be empty".to_string(),
            )))
        }
        None => None,
    };

    let record = credentials::update_credential(
        &state.db,
        master.id,
        id,
        &credentials::CredentialPatch {
            title: body.title,
            username: body.username,
            email: body.email,
            website: body.website,
            notes: body.notes,
            encrypted_secret,
            category_id: body.category_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError(LockboxError::NotFound("credential".to_string())))?;

    activity::record_activity(
        &state.db,
        master.id,
        Some(record.id),
        ActivityAction::Updated,
        Some(&format!("Updated password for {}", record.title)),
    )
    .await?;

    debug!(id = record.id, "credential updated");
    Ok(Json(record))
}

/// DELETE /v1/credentials/{id}
///
/// Password-gated like every other mutation. Dependent activity entries
/// cascade away with the record; the deletion event itself is recorded
/// afterwards with no credential reference.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>, ApiError> {
    let password = gate::master_password(&headers)?;
    let master = gate::authorize(&state, &password).await?;

    let record = credentials::get_credential(&state.db, master.id, id)
        .await?
        .ok_or_else(|| ApiError(LockboxError::NotFound("credential".to_string())))?;

    credentials::delete_credential(&state.db, master.id, id).await?;

    activity::record_activity(
        &state.db,
        master.id,
        None,
        ActivityAction::Deleted,
        Some(&format!("Deleted password for {}", record.title)),
    )
    .await?;

    debug!(id, "credential deleted");
    Ok(Json(DeleteResponse {
        message: format!("credential '{}' deleted", record.title),
    }))
}

/// Run an encryption on the blocking pool (the KDF is deliberately slow).
async fn encrypt_blocking(
    state: &AppState,
    plaintext: String,
    master_password: &SecretString,
) -> Result<String, ApiError> {
    let cipher = state.cipher.clone();
    let password = master_password.clone();
    let token = tokio::task::spawn_blocking(move || cipher.encrypt(&plaintext, &password))
        .await
        .map_err(ApiError::join)??;
    Ok(token)
}
