//! Account repository contract and SQLite implementation.
//!
//! # Invariants
//! - Only password digests reach this layer; plaintext never does.
//! - Duplicate usernames surface as `RepoError::DuplicateUsername`.

use crate::model::account::{Account, AccountId};
use crate::repo::{ensure_connection_ready, is_unique_violation, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const ACCOUNT_SELECT_SQL: &str = "SELECT
    id,
    username,
    password_hash,
    created_at,
    updated_at
FROM account";

/// Repository interface for account lookups and registration.
pub trait AccountRepository {
    /// Inserts a new account with a fresh id and returns the stored row.
    fn create_account(&self, username: &str, password_hash: &str) -> RepoResult<Account>;
    /// Loads one account by id.
    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>>;
    /// Loads one account by exact username.
    fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[(
                "account",
                &["id", "username", "password_hash", "created_at", "updated_at"],
            )],
        )?;
        Ok(Self { conn })
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, username: &str, password_hash: &str) -> RepoResult<Account> {
        let id = Uuid::new_v4();
        self.conn
            .execute(
                "INSERT INTO account (id, username, password_hash) VALUES (?1, ?2, ?3);",
                params![id.to_string(), username, password_hash],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::DuplicateUsername(username.to_string())
                } else {
                    err.into()
                }
            })?;

        self.get_account(id)?.ok_or(RepoError::NotFound {
            entity: "account",
            id,
        })
    }

    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>> {
        self.conn
            .query_row(
                &format!("{ACCOUNT_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_account_columns,
            )
            .optional()?
            .map(parse_account)
            .transpose()
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        self.conn
            .query_row(
                &format!("{ACCOUNT_SELECT_SQL} WHERE username = ?1;"),
                [username],
                read_account_columns,
            )
            .optional()?
            .map(parse_account)
            .transpose()
    }
}

type AccountColumns = (String, String, String, i64, i64);

fn read_account_columns(row: &Row<'_>) -> rusqlite::Result<AccountColumns> {
    Ok((
        row.get("id")?,
        row.get("username")?,
        row.get("password_hash")?,
        row.get("created_at")?,
        row.get("updated_at")?,
    ))
}

fn parse_account(columns: AccountColumns) -> RepoResult<Account> {
    let (id, username, password_hash, created_at, updated_at) = columns;
    Ok(Account {
        id: parse_uuid(&id, "account.id")?,
        username,
        password_hash,
        created_at,
        updated_at,
    })
}
