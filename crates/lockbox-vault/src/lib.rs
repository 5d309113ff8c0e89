// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential encryption and access control for the Lockbox secrets vault.
//!
//! Two components, both small but security-critical:
//!
//! - [`MasterPasswordGuard`] hashes and verifies the master password with
//!   Argon2id and issues opaque session tokens.
//! - [`CredentialCipher`] derives a symmetric key from the plaintext
//!   master password plus a server-wide salt via PBKDF2-HMAC-SHA256, then
//!   encrypts/decrypts credential payloads with AES-256-GCM.
//!
//! No key is ever stored: the derived key is reconstructed from the
//! password on every request and zeroed when the call returns. This crate
//! performs no I/O; persistence and transport are the callers' concern.

pub mod cipher;
pub mod guard;
pub mod kdf;

pub use cipher::CredentialCipher;
pub use guard::MasterPasswordGuard;
