// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox setup` command implementation.
//!
//! First-run master password setup from the terminal, as an alternative
//! to POST /v1/auth/setup. Prompts twice (or reads
//! `LOCKBOX_MASTER_PASSWORD` for headless provisioning), hashes, creates
//! the singleton master credential, and seeds the default categories.

use std::io::IsTerminal;

use lockbox_config::model::LockboxConfig;
use lockbox_core::LockboxError;
use lockbox_storage::queries::{categories, master};
use lockbox_storage::Database;
use lockbox_vault::MasterPasswordGuard;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable consulted before prompting.
pub const MASTER_PASSWORD_ENV_VAR: &str = "LOCKBOX_MASTER_PASSWORD";

const MIN_PASSWORD_LEN: usize = 8;

/// Run the `lockbox setup` command.
pub async fn run_setup(config: &LockboxConfig) -> Result<(), LockboxError> {
    let password = read_master_password()?;
    if password.expose_secret().len() < MIN_PASSWORD_LEN {
        return Err(LockboxError::Validation(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let db = Database::open_with_options(
        &config.storage.database_path,
        config.storage.wal_mode,
    )
    .await?;

    let guard = MasterPasswordGuard::from_config(&config.vault);
    let hash = tokio::task::spawn_blocking(move || guard.hash_master_password(&password))
        .await
        .map_err(|e| LockboxError::Internal(format!("blocking task failed: {e}")))??;

    let created = master::create_master(&db, &hash, false).await?;
    categories::seed_default_categories(&db, created.id).await?;
    db.close().await?;

    println!("Master password set. Start the server with `lockbox serve`.");
    Ok(())
}

/// Get the master password from env var or interactive TTY prompt.
///
/// Priority:
/// 1. `LOCKBOX_MASTER_PASSWORD` environment variable (headless setup)
/// 2. Interactive TTY prompt with confirmation via `rpassword`
fn read_master_password() -> Result<SecretString, LockboxError> {
    // Env var does not need confirmation.
    if let Ok(value) = std::env::var(MASTER_PASSWORD_ENV_VAR)
        && !value.is_empty()
    {
        return Ok(SecretString::from(value));
    }

    if std::io::stdin().is_terminal() {
        eprint!("New master password: ");
        let pass1 = rpassword::read_password()
            .map_err(|e| LockboxError::Vault(format!("failed to read password: {e}")))?;
        eprint!("Confirm master password: ");
        let pass2 = rpassword::read_password()
            .map_err(|e| LockboxError::Vault(format!("failed to read password: {e}")))?;

        if pass1 != pass2 {
            return Err(LockboxError::Validation(
                "passwords do not match".to_string(),
            ));
        }
        return Ok(SecretString::from(pass1));
    }

    Err(LockboxError::Validation(format!(
        "no password provided -- set {MASTER_PASSWORD_ENV_VAR} or run interactively"
    )))
}
