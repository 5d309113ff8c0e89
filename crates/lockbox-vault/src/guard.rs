// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master-password hashing, verification, and session-token issuance.
//!
//! Hashing uses Argon2id with a fresh random salt per hash; the output is
//! a PHC string with salt and cost parameters embedded, so verification
//! needs no external state. Cost parameters come from `VaultConfig` and
//! are tuned so a verification takes on the order of 100ms on commodity
//! hardware.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use lockbox_config::model::VaultConfig;
use lockbox_core::LockboxError;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};

/// Number of random bytes in an issued session token, before encoding.
const TOKEN_BYTES: usize = 32;

/// Hashes and verifies the master password; issues opaque session tokens.
///
/// Stateless apart from immutable cost parameters -- safe to share across
/// concurrent requests without locking.
pub struct MasterPasswordGuard {
    memory_cost: u32,
    iterations: u32,
    parallelism: u32,
}

impl std::fmt::Debug for MasterPasswordGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterPasswordGuard")
            .field("memory_cost", &self.memory_cost)
            .field("iterations", &self.iterations)
            .field("parallelism", &self.parallelism)
            .finish()
    }
}

impl MasterPasswordGuard {
    /// Build a guard from vault configuration.
    pub fn from_config(config: &VaultConfig) -> Self {
        Self {
            memory_cost: config.hash_memory_cost,
            iterations: config.hash_iterations,
            parallelism: config.hash_parallelism,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, LockboxError> {
        let params = argon2::Params::new(
            self.memory_cost,
            self.iterations,
            self.parallelism,
            None,
        )
        .map_err(|e| LockboxError::Vault(format!("invalid Argon2id parameters: {e}")))?;
        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    /// Hash the master password for storage.
    ///
    /// Pure computation: persisting the returned PHC string is the
    /// caller's responsibility. Fails only on parameter or RNG problems,
    /// never on the password's content.
    pub fn hash_master_password(
        &self,
        password: &SecretString,
    ) -> Result<String, LockboxError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map_err(|e| LockboxError::Vault(format!("Argon2id hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verify the master password against a stored PHC hash string.
    ///
    /// Returns `Ok(false)` on mismatch without saying why -- timing
    /// safety comes from the hash scheme itself, not from a manual
    /// comparison. A stored hash that cannot be parsed is an internal
    /// error, not a mismatch: it means the users row is corrupted.
    pub fn verify_master_password(
        &self,
        password: &SecretString,
        stored_hash: &str,
    ) -> Result<bool, LockboxError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| LockboxError::Internal(format!("stored master hash is malformed: {e}")))?;

        // Cost parameters are read from the PHC string, so verification
        // stays correct even if config params changed since setup.
        match self.argon2()?.verify_password(
            password.expose_secret().as_bytes(),
            &parsed,
        ) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(LockboxError::Internal(format!(
                "password verification failed: {e}"
            ))),
        }
    }

    /// Issue an opaque session token: 32 CSPRNG bytes, URL-safe base64.
    ///
    /// No server-side state is recorded and the token is not looked up on
    /// later requests -- every sensitive operation independently
    /// re-verifies the master password.
    pub fn issue_token(&self) -> Result<String, LockboxError> {
        let rng = SystemRandom::new();
        let mut bytes = [0u8; TOKEN_BYTES];
        rng.fill(&mut bytes)
            .map_err(|_| LockboxError::Vault("failed to generate random token".to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }
}
