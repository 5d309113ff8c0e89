// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport layer for the Lockbox secrets vault.
//!
//! Turns HTTP requests into calls against the crypto core and the
//! persistence store, and maps typed failures to status codes. This crate
//! owns the authorization gate: every operation that creates, updates, or
//! reveals a secret re-verifies the master password supplied in that
//! request's `X-Master-Password` header. There is no cached "is
//! authenticated" state anywhere.

pub mod error;
pub mod gate;
pub mod handlers;
pub mod server;

use std::sync::Arc;

use lockbox_config::model::VaultConfig;
use lockbox_storage::Database;
use lockbox_vault::{CredentialCipher, MasterPasswordGuard};

pub use server::{build_router, serve, ServerConfig};

/// Shared state for axum request handlers.
///
/// Everything here is immutable configuration or the cloneable database
/// handle; no request ever mutates it.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (cheap clone, single serialized writer).
    pub db: Database,
    /// Master-password hashing and verification.
    pub guard: Arc<MasterPasswordGuard>,
    /// Credential encryption/decryption.
    pub cipher: Arc<CredentialCipher>,
    /// Process start time for /health uptime reporting.
    pub started_at: std::time::Instant,
}

impl AppState {
    /// Build application state from an open database and vault config.
    pub fn new(db: Database, vault: &VaultConfig) -> Self {
        Self {
            db,
            guard: Arc::new(MasterPasswordGuard::from_config(vault)),
            cipher: Arc::new(CredentialCipher::from_config(vault)),
            started_at: std::time::Instant::now(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("guard", &self.guard)
            .field("cipher", &self.cipher)
            .finish()
    }
}
