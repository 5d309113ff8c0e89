// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lockbox secrets vault.

use thiserror::Error;

/// The primary error type used across all Lockbox crates.
///
/// The gateway is the only place these are translated into HTTP status
/// codes; the vault and storage crates signal typed failures upward and
/// never catch-and-suppress.
#[derive(Debug, Error)]
pub enum LockboxError {
    /// Setup attempted while a master credential already exists.
    #[error("master password already set")]
    AlreadyInitialized,

    /// Master password verification failed.
    ///
    /// The message deliberately does not say why.
    #[error("invalid master password")]
    AuthenticationFailure,

    /// No master credential, or no matching record.
    #[error("not found: {0}")]
    NotFound(String),

    /// Ciphertext token could not be decrypted.
    ///
    /// Covers tag mismatch, malformed tokens, and wrong derived keys
    /// without distinguishing between them: telling a caller which one
    /// happened is an oracle for password guessing.
    #[error("invalid master password or corrupted data")]
    Decryption,

    /// Malformed input to setup/create/update.
    #[error("validation error: {0}")]
    Validation(String),

    /// Cryptographic machinery failure (RNG, KDF parameters, hash parse).
    ///
    /// Not a decryption failure -- these indicate the vault itself is
    /// misconfigured or the platform RNG is unavailable.
    #[error("vault error: {0}")]
    Vault(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
