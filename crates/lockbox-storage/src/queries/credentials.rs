// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential record CRUD, scoped by owner id.
//!
//! `encrypted_secret` is written and read as an opaque string; nothing
//! here decrypts, inspects, or logs it.

use lockbox_core::LockboxError;
use rusqlite::params;

use crate::database::Database;
use crate::models::CredentialRecord;

/// Fields for a new credential record. The secret arrives already
/// encrypted; plaintext never reaches this crate.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub title: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub encrypted_secret: String,
    pub category_id: Option<i64>,
}

/// Partial update for a credential record. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct CredentialPatch {
    pub title: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub encrypted_secret: Option<String>,
    pub category_id: Option<i64>,
}

const SELECT_COLS: &str = "id, title, username, email, website, notes, encrypted_secret,
                           category_id, created_at, updated_at";

fn row_to_credential(row: &rusqlite::Row<'_>) -> Result<CredentialRecord, rusqlite::Error> {
    Ok(CredentialRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        website: row.get(4)?,
        notes: row.get(5)?,
        encrypted_secret: row.get(6)?,
        category_id: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Insert a new credential record and return it.
pub async fn create_credential(
    db: &Database,
    owner_id: i64,
    new: &NewCredential,
) -> Result<CredentialRecord, LockboxError> {
    let new = new.clone();
    db.connection()
        .call(move |conn| -> Result<CredentialRecord, rusqlite::Error> {
            conn.execute(
                "INSERT INTO credentials
                     (user_id, category_id, title, username, email, website, notes, encrypted_secret)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    owner_id,
                    new.category_id,
                    new.title,
                    new.username,
                    new.email,
                    new.website,
                    new.notes,
                    new.encrypted_secret,
                ],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {SELECT_COLS} FROM credentials WHERE id = ?1"),
                params![id],
                row_to_credential,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a single credential record by id.
pub async fn get_credential(
    db: &Database,
    owner_id: i64,
    id: i64,
) -> Result<Option<CredentialRecord>, LockboxError> {
    db.connection()
        .call(move |conn| -> Result<Option<CredentialRecord>, rusqlite::Error> {
            let result = conn.query_row(
                &format!("SELECT {SELECT_COLS} FROM credentials WHERE id = ?1 AND user_id = ?2"),
                params![id, owner_id],
                row_to_credential,
            );
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List credential records, newest first.
///
/// `search` substring-matches title, username, email, and website;
/// `category_id` narrows to one category. Both filters are optional.
pub async fn list_credentials(
    db: &Database,
    owner_id: i64,
    search: Option<&str>,
    category_id: Option<i64>,
) -> Result<Vec<CredentialRecord>, LockboxError> {
    let like = search.map(|s| format!("%{s}%"));
    db.connection()
        .call(move |conn| -> Result<Vec<CredentialRecord>, rusqlite::Error> {
            let mut records = Vec::new();
            match (&like, category_id) {
                (Some(like), Some(cat)) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLS} FROM credentials
                         WHERE user_id = ?1
                           AND (title LIKE ?2 OR username LIKE ?2 OR email LIKE ?2 OR website LIKE ?2)
                           AND category_id = ?3
                         ORDER BY created_at DESC, id DESC"
                    ))?;
                    let rows = stmt.query_map(params![owner_id, like, cat], row_to_credential)?;
                    for row in rows {
                        records.push(row?);
                    }
                }
                (Some(like), None) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLS} FROM credentials
                         WHERE user_id = ?1
                           AND (title LIKE ?2 OR username LIKE ?2 OR email LIKE ?2 OR website LIKE ?2)
                         ORDER BY created_at DESC, id DESC"
                    ))?;
                    let rows = stmt.query_map(params![owner_id, like], row_to_credential)?;
                    for row in rows {
                        records.push(row?);
                    }
                }
                (None, Some(cat)) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLS} FROM credentials
                         WHERE user_id = ?1 AND category_id = ?2
                         ORDER BY created_at DESC, id DESC"
                    ))?;
                    let rows = stmt.query_map(params![owner_id, cat], row_to_credential)?;
                    for row in rows {
                        records.push(row?);
                    }
                }
                (None, None) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLS} FROM credentials
                         WHERE user_id = ?1
                         ORDER BY created_at DESC, id DESC"
                    ))?;
                    let rows = stmt.query_map(params![owner_id], row_to_credential)?;
                    for row in rows {
                        records.push(row?);
                    }
                }
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a partial update and return the refreshed record.
///
/// Returns `None` if no record with that id belongs to the owner.
pub async fn update_credential(
    db: &Database,
    owner_id: i64,
    id: i64,
    patch: &CredentialPatch,
) -> Result<Option<CredentialRecord>, LockboxError> {
    let patch = patch.clone();
    db.connection()
        .call(move |conn| -> Result<Option<CredentialRecord>, rusqlite::Error> {
            let tx = conn.transaction()?;

            let existing = {
                let result = tx.query_row(
                    &format!(
                        "SELECT {SELECT_COLS} FROM credentials WHERE id = ?1 AND user_id = ?2"
                    ),
                    params![id, owner_id],
                    row_to_credential,
                );
                match result {
                    Ok(record) => record,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(e),
                }
            };

            let title = patch.title.unwrap_or(existing.title);
            let username = patch.username.or(existing.username);
            let email = patch.email.or(existing.email);
            let website = patch.website.or(existing.website);
            let notes = patch.notes.or(existing.notes);
            let encrypted_secret = patch.encrypted_secret.unwrap_or(existing.encrypted_secret);
            let category_id = patch.category_id.or(existing.category_id);

            tx.execute(
                "UPDATE credentials
                 SET title = ?1, username = ?2, email = ?3, website = ?4, notes = ?5,
                     encrypted_secret = ?6, category_id = ?7,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?8 AND user_id = ?9",
                params![
                    title,
                    username,
                    email,
                    website,
                    notes,
                    encrypted_secret,
                    category_id,
                    id,
                    owner_id,
                ],
            )?;

            let refreshed = tx.query_row(
                &format!("SELECT {SELECT_COLS} FROM credentials WHERE id = ?1"),
                params![id],
                row_to_credential,
            )?;
            tx.commit()?;
            Ok(Some(refreshed))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a credential record. Returns `true` if a row was deleted.
///
/// Dependent activity entries go with it (`ON DELETE CASCADE`); callers
/// record the deletion event afterwards with a NULL credential reference.
pub async fn delete_credential(
    db: &Database,
    owner_id: i64,
    id: i64,
) -> Result<bool, LockboxError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "DELETE FROM credentials WHERE id = ?1 AND user_id = ?2",
                params![id, owner_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::master;
    use tempfile::tempdir;

    const HASH: &str = "$argon2id$v=19$m=32768,t=2,p=1$c29tZXNhbHQ$aGFzaGhhc2hoYXNoaGFzaA";

    async fn setup_db() -> (Database, i64, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let owner = master::create_master(&db, HASH, false).await.unwrap();
        (db, owner.id, dir)
    }

    fn sample(title: &str) -> NewCredential {
        NewCredential {
            title: title.to_string(),
            username: Some("octocat".to_string()),
            email: Some("octo@example.com".to_string()),
            website: Some("https://github.com".to_string()),
            notes: None,
            encrypted_secret: "AdmVyc2lvbmVkLXRva2Vu".to_string(),
            category_id: None,
        }
    }

    #[tokio::test]
    async fn create_get_roundtrip() {
        let (db, owner, _dir) = setup_db().await;

        let created = create_credential(&db, owner, &sample("GitHub")).await.unwrap();
        let fetched = get_credential(&db, owner, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "GitHub");
        assert_eq!(fetched.username.as_deref(), Some("octocat"));
        assert_eq!(fetched.encrypted_secret, "AdmVyc2lvbmVkLXRva2Vu");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (db, owner, _dir) = setup_db().await;
        assert!(get_credential(&db, owner, 999).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (db, owner, _dir) = setup_db().await;
        let first = create_credential(&db, owner, &sample("First")).await.unwrap();
        let second = create_credential(&db, owner, &sample("Second")).await.unwrap();

        let all = list_credentials(&db, owner, None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        // Same-millisecond inserts fall back to id ordering.
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn search_matches_all_text_fields() {
        let (db, owner, _dir) = setup_db().await;
        create_credential(&db, owner, &sample("GitHub")).await.unwrap();
        let mut other = sample("Bank");
        other.username = Some("alice".to_string());
        other.email = Some("alice@bank.test".to_string());
        other.website = Some("https://bank.test".to_string());
        create_credential(&db, owner, &other).await.unwrap();

        let by_title = list_credentials(&db, owner, Some("GitH"), None).await.unwrap();
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "GitHub");

        let by_email = list_credentials(&db, owner, Some("bank.test"), None).await.unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].title, "Bank");

        let none = list_credentials(&db, owner, Some("nomatch"), None).await.unwrap();
        assert!(none.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn category_filter_narrows_results() {
        let (db, owner, _dir) = setup_db().await;
        let cat = crate::queries::categories::create_category(
            &db, owner, "Work", "#B4C7E7", Some("briefcase"),
        )
        .await
        .unwrap();

        let mut work = sample("Jira");
        work.category_id = Some(cat.id);
        create_credential(&db, owner, &work).await.unwrap();
        create_credential(&db, owner, &sample("Personal thing")).await.unwrap();

        let filtered = list_credentials(&db, owner, None, Some(cat.id)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Jira");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn patch_updates_only_given_fields() {
        let (db, owner, _dir) = setup_db().await;
        let created = create_credential(&db, owner, &sample("GitHub")).await.unwrap();

        let patch = CredentialPatch {
            title: Some("GitHub (work)".to_string()),
            notes: Some("rotated".to_string()),
            ..Default::default()
        };
        let updated = update_credential(&db, owner, created.id, &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "GitHub (work)");
        assert_eq!(updated.notes.as_deref(), Some("rotated"));
        // Untouched fields survive.
        assert_eq!(updated.username.as_deref(), Some("octocat"));
        assert_eq!(updated.encrypted_secret, created.encrypted_secret);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let (db, owner, _dir) = setup_db().await;
        let patch = CredentialPatch::default();
        assert!(update_credential(&db, owner, 42, &patch).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let (db, owner, _dir) = setup_db().await;
        let created = create_credential(&db, owner, &sample("Doomed")).await.unwrap();

        assert!(delete_credential(&db, owner, created.id).await.unwrap());
        assert!(get_credential(&db, owner, created.id).await.unwrap().is_none());
        // Second delete is a no-op.
        assert!(!delete_credential(&db, owner, created.id).await.unwrap());

        db.close().await.unwrap();
    }
}
