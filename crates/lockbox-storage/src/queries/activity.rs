// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only activity timeline.

use lockbox_core::LockboxError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{ActivityAction, ActivityEntry};

fn row_to_entry(row: &rusqlite::Row<'_>) -> Result<ActivityEntry, rusqlite::Error> {
    let action_str: String = row.get(2)?;
    let action = action_str.parse::<ActivityAction>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown activity action: {action_str}").into(),
        )
    })?;
    Ok(ActivityEntry {
        id: row.get(0)?,
        credential_id: row.get(1)?,
        action,
        description: row.get(3)?,
        timestamp: row.get(4)?,
    })
}

/// Append an entry to the timeline. Returns the new entry id.
///
/// `credential_id` is `None` for events whose subject no longer exists
/// (the deletion event itself).
pub async fn record_activity(
    db: &Database,
    owner_id: i64,
    credential_id: Option<i64>,
    action: ActivityAction,
    description: Option<&str>,
) -> Result<i64, LockboxError> {
    let action = action.to_string();
    let description = description.map(|s| s.to_string());
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO activity_log (user_id, credential_id, action, description)
                 VALUES (?1, ?2, ?3, ?4)",
                params![owner_id, credential_id, action, description],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List the most recent activity entries, newest first.
pub async fn list_activity(
    db: &Database,
    owner_id: i64,
    limit: u32,
) -> Result<Vec<ActivityEntry>, LockboxError> {
    db.connection()
        .call(move |conn| -> Result<Vec<ActivityEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, credential_id, action, description, timestamp
                 FROM activity_log WHERE user_id = ?1
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![owner_id, limit], row_to_entry)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{credentials, master};
    use tempfile::tempdir;

    const HASH: &str = "$argon2id$v=19$m=32768,t=2,p=1$c29tZXNhbHQ$aGFzaGhhc2hoYXNoaGFzaA";

    async fn setup_db() -> (Database, i64, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let owner = master::create_master(&db, HASH, false).await.unwrap();
        (db, owner.id, dir)
    }

    async fn sample_credential(db: &Database, owner: i64, title: &str) -> i64 {
        credentials::create_credential(
            db,
            owner,
            &credentials::NewCredential {
                title: title.to_string(),
                username: None,
                email: None,
                website: None,
                notes: None,
                encrypted_secret: "AdG9rZW4".to_string(),
                category_id: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn record_and_list_newest_first() {
        let (db, owner, _dir) = setup_db().await;
        let cred = sample_credential(&db, owner, "GitHub").await;

        record_activity(&db, owner, Some(cred), ActivityAction::Created, Some("Created password for GitHub"))
            .await
            .unwrap();
        record_activity(&db, owner, Some(cred), ActivityAction::Copied, Some("Copied password for GitHub"))
            .await
            .unwrap();

        let entries = list_activity(&db, owner, 50).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, ActivityAction::Copied);
        assert_eq!(entries[1].action, ActivityAction::Created);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn limit_caps_the_timeline() {
        let (db, owner, _dir) = setup_db().await;
        let cred = sample_credential(&db, owner, "Busy").await;
        for _ in 0..5 {
            record_activity(&db, owner, Some(cred), ActivityAction::Updated, None)
                .await
                .unwrap();
        }

        let entries = list_activity(&db, owner, 3).await.unwrap();
        assert_eq!(entries.len(), 3);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn deleting_credential_cascades_its_entries_and_keeps_the_event() {
        let (db, owner, _dir) = setup_db().await;
        let cred = sample_credential(&db, owner, "Doomed").await;
        record_activity(&db, owner, Some(cred), ActivityAction::Created, Some("Created password for Doomed"))
            .await
            .unwrap();

        // Delete the credential, then record the deletion with a NULL
        // reference -- the order the transport layer uses.
        assert!(credentials::delete_credential(&db, owner, cred).await.unwrap());
        record_activity(&db, owner, None, ActivityAction::Deleted, Some("Deleted password for Doomed"))
            .await
            .unwrap();

        let entries = list_activity(&db, owner, 50).await.unwrap();
        // The 'created' entry went with the credential; the 'deleted'
        // event remains, with no dangling reference.
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, ActivityAction::Deleted);
        assert!(entries[0].credential_id.is_none());

        db.close().await.unwrap();
    }
}
