// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox serve` command implementation.
//!
//! Opens the database, builds the gateway state, and serves HTTP until
//! the process is stopped.

use lockbox_config::model::LockboxConfig;
use lockbox_core::LockboxError;
use lockbox_gateway::{AppState, ServerConfig};
use lockbox_storage::Database;
use tracing::{info, warn};

/// Run the `lockbox serve` command.
pub async fn run_serve(config: LockboxConfig) -> Result<(), LockboxError> {
    init_tracing(&config.server.log_level);

    if config.vault.kdf_salt == "change-this-server-salt" {
        warn!(
            "vault.kdf_salt is still the placeholder value -- set a \
             per-deployment salt before storing real secrets"
        );
    }

    let db = Database::open_with_options(
        &config.storage.database_path,
        config.storage.wal_mode,
    )
    .await?;
    info!(path = %config.storage.database_path, "database ready");

    let state = AppState::new(db, &config.vault);
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    lockbox_gateway::serve(&server_config, state).await
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lockbox={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
