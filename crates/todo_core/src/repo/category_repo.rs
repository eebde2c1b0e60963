//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Account-scoped category list/create/upsert/delete.
//!
//! # Invariants
//! - Listing order is creation order: `created_at ASC, rowid ASC`.
//! - Upserts never move a category to another account.
//! - Deleting a category removes its tasks through `ON DELETE CASCADE`.

use crate::model::account::AccountId;
use crate::model::category::{normalize_category_name, Category, CategoryId};
use crate::repo::{ensure_connection_ready, is_unique_violation, parse_uuid, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name,
    account_id,
    created_at,
    updated_at
FROM category";

/// Repository interface for category persistence.
pub trait CategoryRepository {
    /// Lists categories owned by `account_id` in creation order.
    fn list_categories(&self, account_id: AccountId) -> RepoResult<Vec<Category>>;
    /// Loads one category owned by `account_id`.
    fn get_category(&self, account_id: AccountId, id: CategoryId)
        -> RepoResult<Option<Category>>;
    /// Inserts a category with a fresh id.
    fn create_category(&self, account_id: AccountId, name: &str) -> RepoResult<Category>;
    /// Inserts or overwrites the category with `id`.
    fn save_category(
        &self,
        account_id: AccountId,
        id: CategoryId,
        name: &str,
    ) -> RepoResult<Category>;
    /// Deletes one category and, by cascade, its tasks.
    fn delete_category(&self, account_id: AccountId, id: CategoryId) -> RepoResult<()>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[(
                "category",
                &["id", "name", "account_id", "created_at", "updated_at"],
            )],
        )?;
        Ok(Self { conn })
    }

    fn load_required(&self, account_id: AccountId, id: CategoryId) -> RepoResult<Category> {
        self.get_category(account_id, id)?
            .ok_or(RepoError::NotFound {
                entity: "category",
                id,
            })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn list_categories(&self, account_id: AccountId) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             WHERE account_id = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([account_id.to_string()])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn get_category(
        &self,
        account_id: AccountId,
        id: CategoryId,
    ) -> RepoResult<Option<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             WHERE id = ?1
               AND account_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), account_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn create_category(&self, account_id: AccountId, name: &str) -> RepoResult<Category> {
        let name = normalize_category_name(name)?;
        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO category (id, name, account_id) VALUES (?1, ?2, ?3);",
                params![id.to_string(), name.as_str(), account_id.to_string()],
            )
            .map_err(|err| map_name_conflict(err, &name))?;
        debug!("event=category_create module=repo status=ok");
        self.load_required(account_id, id)
    }

    fn save_category(
        &self,
        account_id: AccountId,
        id: CategoryId,
        name: &str,
    ) -> RepoResult<Category> {
        let name = normalize_category_name(name)?;
        let changed = self
            .conn
            .execute(
                "INSERT INTO category (id, name, account_id) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    updated_at = (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
                 WHERE category.account_id = excluded.account_id;",
                params![id.to_string(), name.as_str(), account_id.to_string()],
            )
            .map_err(|err| map_name_conflict(err, &name))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "category",
                id,
            });
        }

        self.load_required(account_id, id)
    }

    fn delete_category(&self, account_id: AccountId, id: CategoryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM category WHERE id = ?1 AND account_id = ?2;",
            params![id.to_string(), account_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "category",
                id,
            });
        }

        Ok(())
    }
}

fn map_name_conflict(err: rusqlite::Error, name: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateCategoryName(name.to_string())
    } else {
        err.into()
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get("id")?;
    let account_text: String = row.get("account_id")?;
    Ok(Category {
        id: parse_uuid(&id_text, "category.id")?,
        name: row.get("name")?,
        account_id: parse_uuid(&account_text, "category.account_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
