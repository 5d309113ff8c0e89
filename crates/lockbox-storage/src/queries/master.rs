// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master credential operations.
//!
//! The `users` table holds at most one row (`id` pinned to 1 by a CHECK'd
//! primary key). Creation races are decided by the constraint, not by a
//! read-then-write existence check.

use lockbox_core::LockboxError;
use rusqlite::params;

use crate::database::Database;
use crate::models::MasterCredential;

fn row_to_master(row: &rusqlite::Row<'_>) -> Result<MasterCredential, rusqlite::Error> {
    Ok(MasterCredential {
        id: row.get(0)?,
        password_hash: row.get(1)?,
        biometric_enabled: row.get::<_, i64>(2)? != 0,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Create the master credential.
///
/// Fails with [`LockboxError::AlreadyInitialized`] if the row already
/// exists -- including when a concurrent setup won the race an instant
/// earlier.
pub async fn create_master(
    db: &Database,
    password_hash: &str,
    biometric_enabled: bool,
) -> Result<MasterCredential, LockboxError> {
    let password_hash = password_hash.to_string();
    let result = db
        .connection()
        .call(move |conn| -> Result<MasterCredential, rusqlite::Error> {
            conn.execute(
                "INSERT INTO users (id, password_hash, biometric_enabled) VALUES (1, ?1, ?2)",
                params![password_hash, biometric_enabled as i64],
            )?;
            conn.query_row(
                "SELECT id, password_hash, biometric_enabled, created_at, updated_at
                 FROM users WHERE id = 1",
                [],
                row_to_master,
            )
        })
        .await;

    match result {
        Ok(master) => Ok(master),
        // The losing INSERT of a setup race surfaces here as a primary
        // key violation on users.id.
        Err(e) if e.to_string().contains("UNIQUE constraint failed: users.id") => {
            Err(LockboxError::AlreadyInitialized)
        }
        Err(e) => Err(crate::database::map_tr_err(e)),
    }
}

/// Get the master credential, if setup has happened.
pub async fn get_master(db: &Database) -> Result<Option<MasterCredential>, LockboxError> {
    db.connection()
        .call(|conn| -> Result<Option<MasterCredential>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT id, password_hash, biometric_enabled, created_at, updated_at
                 FROM users WHERE id = 1",
                [],
                row_to_master,
            );
            match result {
                Ok(master) => Ok(Some(master)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
