// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated encryption of credential secrets.
//!
//! [`CredentialCipher`] derives a key per call via [`crate::kdf`] and
//! seals with AES-256-GCM. Every call to [`CredentialCipher::encrypt`]
//! generates a fresh random 96-bit nonce via the system CSPRNG -- nonce
//! reuse would be catastrophic for GCM security, and the random nonce is
//! also what keeps two encryptions of the same secret from producing
//! equal ciphertext.
//!
//! The ciphertext token is a versioned, self-describing envelope:
//!
//! ```text
//! base64url( version (1) || nonce (12) || ciphertext || tag (16) )
//! ```
//!
//! Storage and transport treat the token as an opaque string.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use lockbox_config::model::VaultConfig;
use lockbox_core::LockboxError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};

use crate::kdf;

/// Current ciphertext envelope version.
const TOKEN_VERSION: u8 = 0x01;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Encrypts and decrypts credential secrets under a password-derived key.
///
/// Holds only immutable KDF configuration; the derived key exists solely
/// inside a single encrypt/decrypt call and is zeroed on drop.
pub struct CredentialCipher {
    kdf_salt: Vec<u8>,
    kdf_iterations: u32,
}

impl std::fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("kdf_iterations", &self.kdf_iterations)
            .field("kdf_salt", &"[REDACTED]")
            .finish()
    }
}

impl CredentialCipher {
    /// Build a cipher from vault configuration.
    pub fn from_config(config: &VaultConfig) -> Self {
        Self {
            kdf_salt: config.kdf_salt.as_bytes().to_vec(),
            kdf_iterations: config.kdf_iterations,
        }
    }

    /// Encrypt a secret under the master password.
    ///
    /// Returns the versioned ciphertext token. Two calls with the same
    /// inputs return different tokens (fresh nonce per call).
    pub fn encrypt(
        &self,
        plaintext: &str,
        master_password: &SecretString,
    ) -> Result<String, LockboxError> {
        let key = kdf::derive_key(
            master_password.expose_secret().as_bytes(),
            &self.kdf_salt,
            self.kdf_iterations,
        )?;

        let unbound = UnboundKey::new(&AES_256_GCM, key.as_ref())
            .map_err(|_| LockboxError::Vault("failed to create AES-256-GCM key".to_string()))?;
        let sealing_key = LessSafeKey::new(unbound);

        let rng = SystemRandom::new();
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rng.fill(&mut nonce_bytes)
            .map_err(|_| LockboxError::Vault("failed to generate random nonce".to_string()))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        // Seal in place: the buffer is extended with the 16-byte tag.
        let mut in_out = plaintext.as_bytes().to_vec();
        sealing_key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| LockboxError::Vault("AES-256-GCM encryption failed".to_string()))?;

        let mut envelope = Vec::with_capacity(1 + NONCE_LEN + in_out.len());
        envelope.push(TOKEN_VERSION);
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&in_out);

        Ok(URL_SAFE_NO_PAD.encode(envelope))
    }

    /// Decrypt a ciphertext token under the master password.
    ///
    /// Fails closed: a malformed token, an unknown version, a failed tag
    /// check, a wrong derived key, and non-UTF-8 plaintext all collapse
    /// into [`LockboxError::Decryption`]. Distinguishing "wrong password"
    /// from "corrupted ciphertext" would hand an oracle to anyone
    /// guessing passwords, so the error surface deliberately does not.
    pub fn decrypt(
        &self,
        token: &str,
        master_password: &SecretString,
    ) -> Result<SecretString, LockboxError> {
        let envelope = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| LockboxError::Decryption)?;

        if envelope.len() < 1 + NONCE_LEN + TAG_LEN {
            return Err(LockboxError::Decryption);
        }
        if envelope[0] != TOKEN_VERSION {
            return Err(LockboxError::Decryption);
        }

        let nonce_bytes: [u8; NONCE_LEN] = envelope[1..1 + NONCE_LEN]
            .try_into()
            .map_err(|_| LockboxError::Decryption)?;
        let ciphertext = &envelope[1 + NONCE_LEN..];

        let key = kdf::derive_key(
            master_password.expose_secret().as_bytes(),
            &self.kdf_salt,
            self.kdf_iterations,
        )
        .map_err(|_| LockboxError::Decryption)?;

        let unbound =
            UnboundKey::new(&AES_256_GCM, key.as_ref()).map_err(|_| LockboxError::Decryption)?;
        let opening_key = LessSafeKey::new(unbound);
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = ciphertext.to_vec();
        let plaintext = opening_key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| LockboxError::Decryption)?;

        let value = String::from_utf8(plaintext.to_vec()).map_err(|_| LockboxError::Decryption)?;
        Ok(SecretString::from(value))
    }
}
