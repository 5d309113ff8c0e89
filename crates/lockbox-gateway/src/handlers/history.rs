// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activity timeline handler.

use axum::extract::{Query, State};
use axum::Json;
use lockbox_core::ActivityEntry;
use lockbox_storage::queries::activity;
use serde::Deserialize;

use crate::error::ApiError;
use crate::gate;
use crate::AppState;

const DEFAULT_LIMIT: u32 = 50;

/// Query parameters for GET /v1/history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of entries to return (default 50).
    #[serde(default)]
    pub limit: Option<u32>,
}

/// GET /v1/history
///
/// Newest-first timeline of actions against credential records. Entries
/// carry no secrets, so this is existence-gated only.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    let master = gate::require_master(&state).await?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let entries = activity::list_activity(&state.db, master.id, limit).await?;
    Ok(Json(entries))
}
