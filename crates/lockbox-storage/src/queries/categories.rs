// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category CRUD and default-category seeding.

use lockbox_core::LockboxError;
use rusqlite::params;
use tracing::debug;

use crate::database::Database;
use crate::models::Category;

/// The categories seeded at first-run setup.
///
/// `(name, color, icon)` -- colors match the PWA client's palette.
const DEFAULT_CATEGORIES: [(&str, &str, &str); 4] = [
    ("Personal", "#D5B3E0", "person"),
    ("Work", "#B4C7E7", "briefcase"),
    ("Social", "#F4C2C2", "users"),
    ("Banking", "#FBBF24", "bank"),
];

fn row_to_category(row: &rusqlite::Row<'_>) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        icon: row.get(3)?,
        is_default: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
    })
}

/// Seed the default categories for a fresh setup.
pub async fn seed_default_categories(db: &Database, owner_id: i64) -> Result<(), LockboxError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            for (name, color, icon) in DEFAULT_CATEGORIES {
                tx.execute(
                    "INSERT INTO categories (user_id, name, color, icon, is_default)
                     VALUES (?1, ?2, ?3, ?4, 1)",
                    params![owner_id, name, color, icon],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    debug!("default categories seeded");
    Ok(())
}

/// List categories: defaults first, then alphabetical.
pub async fn list_categories(db: &Database, owner_id: i64) -> Result<Vec<Category>, LockboxError> {
    db.connection()
        .call(move |conn| -> Result<Vec<Category>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, name, color, icon, is_default, created_at
                 FROM categories WHERE user_id = ?1
                 ORDER BY is_default DESC, name",
            )?;
            let rows = stmt.query_map(params![owner_id], row_to_category)?;
            let mut categories = Vec::new();
            for row in rows {
                categories.push(row?);
            }
            Ok(categories)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a single category by id.
pub async fn get_category(
    db: &Database,
    owner_id: i64,
    id: i64,
) -> Result<Option<Category>, LockboxError> {
    db.connection()
        .call(move |conn| -> Result<Option<Category>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT id, name, color, icon, is_default, created_at
                 FROM categories WHERE id = ?1 AND user_id = ?2",
                params![id, owner_id],
                row_to_category,
            );
            match result {
                Ok(category) => Ok(Some(category)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Create a custom (non-default) category.
pub async fn create_category(
    db: &Database,
    owner_id: i64,
    name: &str,
    color: &str,
    icon: Option<&str>,
) -> Result<Category, LockboxError> {
    let name = name.to_string();
    let color = color.to_string();
    let icon = icon.map(|s| s.to_string());
    db.connection()
        .call(move |conn| -> Result<Category, rusqlite::Error> {
            conn.execute(
                "INSERT INTO categories (user_id, name, color, icon, is_default)
                 VALUES (?1, ?2, ?3, ?4, 0)",
                params![owner_id, name, color, icon],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                "SELECT id, name, color, icon, is_default, created_at
                 FROM categories WHERE id = ?1",
                params![id],
                row_to_category,
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a category's name/color/icon. `None` fields stay unchanged.
///
/// Policy (default categories cannot be renamed) is enforced by the
/// transport layer, which sees `is_default` on the fetched row.
pub async fn update_category(
    db: &Database,
    owner_id: i64,
    id: i64,
    name: Option<&str>,
    color: Option<&str>,
    icon: Option<&str>,
) -> Result<Option<Category>, LockboxError> {
    let name = name.map(|s| s.to_string());
    let color = color.map(|s| s.to_string());
    let icon = icon.map(|s| s.to_string());
    db.connection()
        .call(move |conn| -> Result<Option<Category>, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE categories
                 SET name = COALESCE(?1, name),
                     color = COALESCE(?2, color),
                     icon = COALESCE(?3, icon)
                 WHERE id = ?4 AND user_id = ?5",
                params![name, color, icon, id, owner_id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let refreshed = conn.query_row(
                "SELECT id, name, color, icon, is_default, created_at
                 FROM categories WHERE id = ?1",
                params![id],
                row_to_category,
            )?;
            Ok(Some(refreshed))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a category. Returns `true` if a row was deleted.
///
/// Credentials referencing it fall back to uncategorized
/// (`ON DELETE SET NULL`).
pub async fn delete_category(db: &Database, owner_id: i64, id: i64) -> Result<bool, LockboxError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "DELETE FROM categories WHERE id = ?1 AND user_id = ?2",
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

    #[tokio::test]
    async fn seeding_creates_four_defaults_in_order() {
        let (db, owner, _dir) = setup_db().await;
        seed_default_categories(&db, owner).await.unwrap();

        let categories = list_categories(&db, owner).await.unwrap();
        assert_eq!(categories.len(), 4);
        assert!(categories.iter().all(|c| c.is_default));
        // Defaults first (all of them here), then alphabetical.
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Banking", "Personal", "Social", "Work"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn custom_categories_sort_after_defaults() {
        let (db, owner, _dir) = setup_db().await;
        seed_default_categories(&db, owner).await.unwrap();
        create_category(&db, owner, "Archive", "#CCCCCC", None)
            .await
            .unwrap();

        let categories = list_categories(&db, owner).await.unwrap();
        assert_eq!(categories.len(), 5);
        assert_eq!(categories.last().unwrap().name, "Archive");
        assert!(!categories.last().unwrap().is_default);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let (db, owner, _dir) = setup_db().await;
        let cat = create_category(&db, owner, "Shopping", "#FF0000", Some("cart"))
            .await
            .unwrap();

        let updated = update_category(&db, owner, cat.id, None, Some("#00FF00"), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Shopping");
        assert_eq!(updated.color, "#00FF00");
        assert_eq!(updated.icon.as_deref(), Some("cart"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn deleting_category_uncategorizes_credentials() {
        let (db, owner, _dir) = setup_db().await;
        let cat = create_category(&db, owner, "Doomed", "#000000", None)
            .await
            .unwrap();

        let record = credentials::create_credential(
            &db,
            owner,
            &credentials::NewCredential {
                title: "Orphan".to_string(),
                username: None,
                email: None,
                website: None,
                notes: None,
                encrypted_secret: "AdG9rZW4".to_string(),
                category_id: Some(cat.id),
            },
        )
        .await
        .unwrap();

        assert!(delete_category(&db, owner, cat.id).await.unwrap());

        let refreshed = credentials::get_credential(&db, owner, record.id)
            .await
            .unwrap()
            .unwrap();
        assert!(refreshed.category_id.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_missing_returns_false() {
        let (db, owner, _dir) = setup_db().await;
        assert!(!delete_category(&db, owner, 77).await.unwrap());
        db.close().await.unwrap();
    }
}
