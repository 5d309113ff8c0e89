// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Lockbox crates.
//!
//! Timestamps are ISO 8601 UTC strings produced by the storage layer
//! (`strftime('%Y-%m-%dT%H:%M:%fZ', 'now')`); they are treated as opaque
//! ordered values everywhere else.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The single master credential.
///
/// At most one row ever exists (`id` is fixed to 1 by a DB constraint).
/// `password_hash` is an Argon2id PHC string with salt and cost embedded;
/// the plaintext master password is never stored anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterCredential {
    pub id: i64,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub biometric_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// One stored secret.
///
/// All fields except `encrypted_secret` are plaintext metadata. The
/// `encrypted_secret` is an opaque ciphertext token produced by the
/// cipher; storage and transport never interpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: i64,
    pub title: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    #[serde(skip_serializing)]
    pub encrypted_secret: String,
    pub category_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A credential category (Personal, Work, ...).
///
/// Default categories are seeded at setup and cannot be renamed or
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub is_default: bool,
    pub created_at: String,
}

/// Action recorded in the activity timeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
    Copied,
}

/// One entry in the append-only activity timeline.
///
/// `credential_id` is nulled when the referenced credential is deleted,
/// so the timeline survives deletions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub credential_id: Option<i64>,
    pub action: ActivityAction,
    pub description: Option<String>,
    pub timestamp: String,
}
