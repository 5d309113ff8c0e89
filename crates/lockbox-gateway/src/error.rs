// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation of core errors into HTTP responses.
//!
//! This is the only place internal failures become user-visible. Internal
//! error text never leaves the process: storage, vault, and internal
//! errors are logged with detail and answered with a generic message.
//! Authentication and decryption failures keep their deliberately generic
//! wording from the core.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lockbox_core::LockboxError;
use serde::Serialize;
use tracing::error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Handler-level error: a core error on its way to becoming a response.
#[derive(Debug)]
pub struct ApiError(pub LockboxError);

impl From<LockboxError> for ApiError {
    fn from(err: LockboxError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Wrap a `spawn_blocking` join failure.
    pub fn join(err: tokio::task::JoinError) -> Self {
        Self(LockboxError::Internal(format!("blocking task failed: {err}")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            LockboxError::AlreadyInitialized => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            LockboxError::AuthenticationFailure => {
                (StatusCode::UNAUTHORIZED, self.0.to_string())
            }
            LockboxError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            LockboxError::Decryption => (StatusCode::BAD_REQUEST, self.0.to_string()),
            LockboxError::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            LockboxError::Storage { .. }
            | LockboxError::Vault(_)
            | LockboxError::Config(_)
            | LockboxError::Internal(_) => {
                // Detail stays in the log; the response is generic.
                error!(error = %self.0, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
