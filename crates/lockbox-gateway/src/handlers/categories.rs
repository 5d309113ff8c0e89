// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category handlers.
//!
//! Categories carry no secrets, so these are existence-gated only.
//! Default categories are protected: they cannot be renamed or deleted.

use axum::extract::{Path, State};
use axum::Json;
use lockbox_core::{Category, LockboxError};
use lockbox_storage::queries::categories;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::gate;
use crate::AppState;

/// Request body for POST /v1/categories.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Request body for PUT /v1/categories/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Response body for DELETE /v1/categories/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// GET /v1/categories
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    let master = gate::require_master(&state).await?;
    let categories = categories::list_categories(&state.db, master.id).await?;
    Ok(Json(categories))
}

/// POST /v1/categories
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let master = gate::require_master(&state).await?;

    if body.name.trim().is_empty() {
        return Err(ApiError(LockboxError::Validation(
            "category name must not be empty".to_string(),
        )));
    }
    if body.color.trim().is_empty() {
        return Err(ApiError(LockboxError::Validation(
            "category color must not be empty".to_string(),
        )));
    }

    let category = categories::create_category(
        &state.db,
        master.id,
        body.name.trim(),
        body.color.trim(),
        body.icon.as_deref(),
    )
    .await?;
    Ok(Json(category))
}

/// PUT /v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let master = gate::require_master(&state).await?;

    let existing = categories::get_category(&state.db, master.id, id)
        .await?
        .ok_or_else(|| ApiError(LockboxError::NotFound("category".to_string())))?;

    if existing.is_default && body.name.is_some() {
        return Err(ApiError(LockboxError::Validation(
            "cannot rename default categories".to_string(),
        )));
    }

    let updated = categories::update_category(
        &state.db,
        master.id,
        id,
        body.name.as_deref(),
        body.color.as_deref(),
        body.icon.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError(LockboxError::NotFound("category".to_string())))?;

    Ok(Json(updated))
}

/// DELETE /v1/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let master = gate::require_master(&state).await?;

    let existing = categories::get_category(&state.db, master.id, id)
        .await?
        .ok_or_else(|| ApiError(LockboxError::NotFound("category".to_string())))?;

    if existing.is_default {
        return Err(ApiError(LockboxError::Validation(
            "cannot delete default categories".to_string(),
        )));
    }

    categories::delete_category(&state.db, master.id, id).await?;
    Ok(Json(DeleteResponse {
        message: format!("category '{}' deleted", existing.name),
    }))
}
