//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Account-scoped task listing with the home-screen ordering.
//! - Full-row upsert for create/update/toggle paths.
//!
//! # Invariants
//! - List order: `important DESC, completed ASC, created_at ASC, rowid ASC`.
//! - A task can only reference a category owned by the same account.
//! - Upserts keep `created_at` and never move a task to another account.

use crate::model::account::AccountId;
use crate::model::category::CategoryId;
use crate::model::task::{Task, TaskId, TaskInput};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_flag, parse_uuid, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    content,
    completed,
    important,
    account_id,
    category_id,
    created_at,
    updated_at
FROM task";

const TASK_ORDER_SQL: &str = "ORDER BY important DESC, completed ASC, created_at ASC, rowid ASC";

/// Repository interface for task persistence.
pub trait TaskRepository {
    /// Lists every task owned by `account_id`.
    fn list_tasks(&self, account_id: AccountId) -> RepoResult<Vec<Task>>;
    /// Lists tasks owned by `account_id` inside one category.
    fn list_tasks_in_category(
        &self,
        account_id: AccountId,
        category_id: CategoryId,
    ) -> RepoResult<Vec<Task>>;
    /// Loads one task owned by `account_id`.
    fn get_task(&self, account_id: AccountId, id: TaskId) -> RepoResult<Option<Task>>;
    /// Inserts the task, or overwrites every field if the id already exists.
    fn save_task(&self, account_id: AccountId, input: &TaskInput) -> RepoResult<Task>;
    /// Deletes one task.
    fn delete_task(&self, account_id: AccountId, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[(
                "task",
                &[
                    "id",
                    "content",
                    "completed",
                    "important",
                    "account_id",
                    "category_id",
                    "created_at",
                    "updated_at",
                ],
            )],
        )?;
        Ok(Self { conn })
    }

    fn query_tasks(&self, filter_sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Task>> {
        let sql = format!("{TASK_SELECT_SQL} WHERE {filter_sql} {TASK_ORDER_SQL};");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn category_owned_by(&self, account_id: AccountId, category_id: CategoryId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM category
                WHERE id = ?1 AND account_id = ?2
            );",
            params![category_id.to_string(), account_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn list_tasks(&self, account_id: AccountId) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            "account_id = ?",
            vec![Value::Text(account_id.to_string())],
        )
    }

    fn list_tasks_in_category(
        &self,
        account_id: AccountId,
        category_id: CategoryId,
    ) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            "account_id = ? AND category_id = ?",
            vec![
                Value::Text(account_id.to_string()),
                Value::Text(category_id.to_string()),
            ],
        )
    }

    fn get_task(&self, account_id: AccountId, id: TaskId) -> RepoResult<Option<Task>> {
        let mut tasks = self.query_tasks(
            "id = ? AND account_id = ?",
            vec![
                Value::Text(id.to_string()),
                Value::Text(account_id.to_string()),
            ],
        )?;
        Ok(tasks.pop())
    }

    fn save_task(&self, account_id: AccountId, input: &TaskInput) -> RepoResult<Task> {
        let input = input.clone().normalized()?;
        if !self.category_owned_by(account_id, input.category_id)? {
            return Err(RepoError::NotFound {
                entity: "category",
                id: input.category_id,
            });
        }

        let changed = self.conn.execute(
            "INSERT INTO task (id, content, completed, important, account_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                content = excluded.content,
                completed = excluded.completed,
                important = excluded.important,
                category_id = excluded.category_id,
                updated_at = (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             WHERE task.account_id = excluded.account_id;",
            params![
                input.id.to_string(),
                input.content.as_str(),
                bool_to_int(input.completed),
                bool_to_int(input.important),
                account_id.to_string(),
                input.category_id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "task",
                id: input.id,
            });
        }

        self.get_task(account_id, input.id)?
            .ok_or(RepoError::NotFound {
                entity: "task",
                id: input.id,
            })
    }

    fn delete_task(&self, account_id: AccountId, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM task WHERE id = ?1 AND account_id = ?2;",
            params![id.to_string(), account_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let account_text: String = row.get("account_id")?;
    let category_text: String = row.get("category_id")?;
    Ok(Task {
        id: parse_uuid(&id_text, "task.id")?,
        content: row.get("content")?,
        completed: parse_flag(row.get("completed")?, "task.completed")?,
        important: parse_flag(row.get("important")?, "task.important")?,
        account_id: parse_uuid(&account_text, "task.account_id")?,
        category_id: parse_uuid(&category_text, "task.category_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
