// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: KDF cost floors, salt presence, bind address shape.

use crate::diagnostic::ConfigError;
use crate::model::LockboxConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LockboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate host is not empty and looks like an IP or hostname.
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Validate database_path is not empty.
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Argon2id parameter floors for master-password hashing.
    if config.vault.hash_memory_cost < 32768 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.hash_memory_cost must be at least 32768 (32 MiB), got {}",
                config.vault.hash_memory_cost
            ),
        });
    }

    if config.vault.hash_iterations < 2 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.hash_iterations must be at least 2, got {}",
                config.vault.hash_iterations
            ),
        });
    }

    if config.vault.hash_parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.hash_parallelism must be at least 1, got {}",
                config.vault.hash_parallelism
            ),
        });
    }

    // PBKDF2 iteration floor for encryption-key derivation. Lowering this
    // below 100k would both weaken the key and change every derived key,
    // making existing ciphertext undecryptable.
    if config.vault.kdf_iterations < 100_000 {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least 100000, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.vault.kdf_salt.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "vault.kdf_salt must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LockboxConfig;

    #[test]
    fn default_config_is_valid() {
        let config = LockboxConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = LockboxConfig::default();
        config.server.host = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("server.host")));
    }

    #[test]
    fn low_kdf_iterations_rejected() {
        let mut config = LockboxConfig::default();
        config.vault.kdf_iterations = 1000;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("kdf_iterations")));
    }

    #[test]
    fn empty_salt_rejected() {
        let mut config = LockboxConfig::default();
        config.vault.kdf_salt = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("kdf_salt")));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = LockboxConfig::default();
        config.server.host = "".to_string();
        config.vault.kdf_iterations = 1;
        config.vault.hash_iterations = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
