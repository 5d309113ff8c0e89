// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Lockbox secrets vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Lockbox configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LockboxConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Master-password and key-derivation settings.
    #[serde(default)]
    pub vault: VaultConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("lockbox").join("lockbox.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("lockbox.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Master-password hashing and key-derivation configuration.
///
/// `hash_*` parameters tune Argon2id for master-password verification
/// (target: on the order of 100ms on commodity hardware). `kdf_*`
/// parameters tune the PBKDF2-HMAC-SHA256 derivation of the symmetric
/// encryption key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Argon2id memory cost in KiB for master-password hashing
    /// (default: 65536 = 64 MiB).
    #[serde(default = "default_hash_memory_cost")]
    pub hash_memory_cost: u32,

    /// Argon2id iteration count for master-password hashing (default: 3).
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,

    /// Argon2id parallelism lanes for master-password hashing (default: 4).
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,

    /// PBKDF2-HMAC-SHA256 iteration count for encryption-key derivation
    /// (default: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Server-wide salt for encryption-key derivation.
    ///
    /// Deliberately fixed (not per-record): the derived key must be
    /// reconstructible from the master password alone on every request.
    /// Changing this value makes every stored ciphertext undecryptable.
    #[serde(default = "default_kdf_salt")]
    pub kdf_salt: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            hash_memory_cost: default_hash_memory_cost(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
            kdf_iterations: default_kdf_iterations(),
            kdf_salt: default_kdf_salt(),
        }
    }
}

fn default_hash_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_hash_iterations() -> u32 {
    3
}

fn default_hash_parallelism() -> u32 {
    4
}

fn default_kdf_iterations() -> u32 {
    100_000
}

fn default_kdf_salt() -> String {
    // Placeholder that validation flags with a warning path; deployments
    // must override via LOCKBOX_VAULT_KDF_SALT or lockbox.toml.
    "change-this-server-salt".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = LockboxConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.log_level, "info");
        assert!(config.storage.wal_mode);
        assert_eq!(config.vault.kdf_iterations, 100_000);
        assert_eq!(config.vault.hash_memory_cost, 65536);
    }

    #[test]
    fn vault_config_round_trips_through_toml() {
        let config = VaultConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: VaultConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.kdf_iterations, config.kdf_iterations);
        assert_eq!(parsed.kdf_salt, config.kdf_salt);
    }
}
