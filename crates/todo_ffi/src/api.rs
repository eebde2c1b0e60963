//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Reduce every core error to envelope fields the UI can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens its own connection; no connection outlives a call.
//! - The selected category id is owned by the UI and passed back in on every
//!   home call; nothing here keeps presentation state between calls.

use log::warn;
use rusqlite::Connection;
use std::sync::OnceLock;
use todo_core::db::open_db;
use todo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, AccountError, AccountService, Category, CoreConfig,
    FileSessionStore, HomeViewModel, LoginViewModel, RegisterViewModel, SqliteAccountRepository,
    Task,
};
use uuid::Uuid;

static FFI_CONFIG: OnceLock<CoreConfig> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive); blank
///   falls back to `TODO_LOG_LEVEL` or the build-mode default.
/// - `log_dir`: absolute directory path where rolling logs are written; blank
///   falls back to `logs/` under the configured data directory.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let config = resolve_config();
    let result = match (level.trim().is_empty(), log_dir.trim().is_empty()) {
        (true, true) => init_logging_from_config(config),
        (level_blank, dir_blank) => {
            let level = if level_blank {
                config.log_level.clone()
            } else {
                level
            };
            let log_dir = if dir_blank {
                config.log_dir().to_string_lossy().into_owned()
            } else {
                log_dir
            };
            init_logging_inner(level.as_str(), log_dir.as_str())
        }
    };
    match result {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for login/register/logout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Account id on successful register/login.
    pub account_id: Option<String>,
    pub username_error: Option<String>,
    pub password_error: Option<String>,
    pub confirm_password_error: Option<String>,
    /// General failure message; field errors additionally fill the fields above.
    pub message: Option<String>,
}

impl AuthResponse {
    fn success(account_id: Uuid) -> Self {
        Self {
            ok: true,
            account_id: Some(account_id.to_string()),
            ..Self::default()
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Account restored from the session holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub account_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub content: String,
    pub completed: bool,
    pub important: bool,
    pub category_id: String,
}

/// Home screen state after one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeSnapshot {
    /// Categories in creation order.
    pub categories: Vec<CategoryItem>,
    /// Tasks of the selected category in display order.
    pub tasks: Vec<TaskItem>,
    /// Selection to pass back into the next home call.
    pub selected_category_id: Option<String>,
    /// Transient notification, success or failure.
    pub message: Option<String>,
}

impl HomeSnapshot {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    fn from_view_model(vm: &HomeViewModel<'_, &FileSessionStore>) -> Self {
        Self {
            categories: vm.categories().iter().map(to_category_item).collect(),
            tasks: vm.tasks().iter().map(to_task_item).collect(),
            selected_category_id: vm.selected_category().map(|category| category.id.to_string()),
            message: vm.event().map(str::to_string),
        }
    }
}

/// Registers a new account. Does not log in.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Field errors are reported before any store access.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_register(username: String, password: String, confirm_password: String) -> AuthResponse {
    with_connection(|conn, sessions| {
        let mut vm = RegisterViewModel::new(conn, sessions);
        vm.update_username(username);
        vm.update_password(password);
        vm.update_confirm_password(confirm_password);
        match vm.register() {
            Ok(account) => AuthResponse::success(account.id),
            Err(err) => auth_failure(
                &err,
                vm.errors().username.clone(),
                vm.errors().password.clone(),
                vm.errors().confirm_password.clone(),
            ),
        }
    })
}

/// Checks credentials and stores the session on success.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Failure leaves any previous session untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(username: String, password: String) -> AuthResponse {
    with_connection(|conn, sessions| {
        let mut vm = LoginViewModel::new(conn, sessions);
        vm.update_username(username);
        vm.update_password(password);
        match vm.login() {
            Ok(session) => AuthResponse::success(session.account_id()),
            Err(err) => auth_failure(
                &err,
                vm.errors().username.clone(),
                vm.errors().password.clone(),
                None,
            ),
        }
    })
}

/// Clears the stored session.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_logout() -> AuthResponse {
    with_connection(|conn, sessions| {
        let result = SqliteAccountRepository::try_new(conn)
            .map_err(AccountError::from)
            .and_then(|repo| AccountService::new(repo, sessions).logout());
        match result {
            Ok(()) => AuthResponse {
                ok: true,
                ..AuthResponse::default()
            },
            Err(err) => AuthResponse::failure(err.to_string()),
        }
    })
}

/// Restores the logged-in account on app start.
///
/// # FFI contract
/// - Returns `None` when logged out, when the stored account no longer
///   exists, or when storage fails (failure is logged).
#[flutter_rust_bridge::frb(sync)]
pub fn auth_current_account() -> Option<AccountSummary> {
    let config = resolve_config();
    let conn = match open_store(config) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_current_account module=ffi status=error error={err}");
            return None;
        }
    };
    let sessions = FileSessionStore::new(config.session_path());
    let result = SqliteAccountRepository::try_new(&conn)
        .map_err(AccountError::from)
        .and_then(|repo| {
            let service = AccountService::new(repo, &sessions);
            match service.current_session()? {
                Some(session) => service.current_account(&session),
                None => Ok(None),
            }
        });

    match result {
        Ok(account) => account.map(|account| AccountSummary {
            account_id: account.id.to_string(),
            username: account.username,
        }),
        Err(err) => {
            warn!(
                "event=ffi_current_account module=ffi status=error error_code={}",
                err.code()
            );
            None
        }
    }
}

/// Loads the home screen, keeping `selected_category_id` when it still exists.
#[flutter_rust_bridge::frb(sync)]
pub fn home_load(selected_category_id: Option<String>) -> HomeSnapshot {
    with_home(selected_category_id, |_| {})
}

#[flutter_rust_bridge::frb(sync)]
pub fn home_select_category(category_id: String) -> HomeSnapshot {
    with_home_target(None, &category_id, "category_id", |vm, id| {
        vm.select_category(id)
    })
}

/// Creates a category and selects it.
#[flutter_rust_bridge::frb(sync)]
pub fn category_create(selected_category_id: Option<String>, name: String) -> HomeSnapshot {
    with_home(selected_category_id, |vm| vm.add_category(&name))
}

#[flutter_rust_bridge::frb(sync)]
pub fn category_rename(
    selected_category_id: Option<String>,
    category_id: String,
    name: String,
) -> HomeSnapshot {
    with_home_target(selected_category_id, &category_id, "category_id", |vm, id| {
        vm.rename_category(id, &name)
    })
}

/// Deletes a category and its tasks, then selects the first remaining one.
#[flutter_rust_bridge::frb(sync)]
pub fn category_delete(selected_category_id: Option<String>, category_id: String) -> HomeSnapshot {
    with_home_target(selected_category_id, &category_id, "category_id", |vm, id| {
        vm.delete_category(id)
    })
}

/// Adds a task to the selected category; no-op when none is selected.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(selected_category_id: Option<String>, content: String) -> HomeSnapshot {
    with_home(selected_category_id, |vm| vm.add_task(&content))
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_set_completed(
    selected_category_id: Option<String>,
    task_id: String,
    completed: bool,
) -> HomeSnapshot {
    with_home_target(selected_category_id, &task_id, "task_id", |vm, id| {
        vm.update_task(id, Some(completed), None)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_set_important(
    selected_category_id: Option<String>,
    task_id: String,
    important: bool,
) -> HomeSnapshot {
    with_home_target(selected_category_id, &task_id, "task_id", |vm, id| {
        vm.update_task(id, None, Some(important))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_rename(
    selected_category_id: Option<String>,
    task_id: String,
    content: String,
) -> HomeSnapshot {
    with_home_target(selected_category_id, &task_id, "task_id", |vm, id| {
        vm.rename_task(id, &content)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(selected_category_id: Option<String>, task_id: String) -> HomeSnapshot {
    with_home_target(selected_category_id, &task_id, "task_id", |vm, id| {
        vm.delete_task(id)
    })
}

fn resolve_config() -> &'static CoreConfig {
    FFI_CONFIG.get_or_init(|| {
        CoreConfig::from_env().unwrap_or_else(|err| {
            warn!("event=ffi_config module=ffi status=fallback error={err}");
            CoreConfig::default()
        })
    })
}

fn open_store(config: &CoreConfig) -> Result<Connection, String> {
    std::fs::create_dir_all(config.data_dir()).map_err(|err| {
        format!(
            "failed to create data directory `{}`: {err}",
            config.data_dir().display()
        )
    })?;
    open_db(config.db_path()).map_err(|err| err.to_string())
}

fn with_connection(f: impl FnOnce(&Connection, &FileSessionStore) -> AuthResponse) -> AuthResponse {
    let config = resolve_config();
    let conn = match open_store(config) {
        Ok(conn) => conn,
        Err(err) => return AuthResponse::failure(format!("auth DB open failed: {err}")),
    };
    let sessions = FileSessionStore::new(config.session_path());
    f(&conn, &sessions)
}

fn auth_failure(
    err: &AccountError,
    username_error: Option<String>,
    password_error: Option<String>,
    confirm_password_error: Option<String>,
) -> AuthResponse {
    AuthResponse {
        ok: false,
        account_id: None,
        username_error,
        password_error,
        confirm_password_error,
        message: Some(err.to_string()),
    }
}

fn with_home(
    selected_category_id: Option<String>,
    op: impl FnOnce(&mut HomeViewModel<'_, &FileSessionStore>),
) -> HomeSnapshot {
    let config = resolve_config();
    let conn = match open_store(config) {
        Ok(conn) => conn,
        Err(err) => return HomeSnapshot::failure(format!("home DB open failed: {err}")),
    };
    let sessions = FileSessionStore::new(config.session_path());
    let mut vm = HomeViewModel::new(&conn, &sessions);

    let preferred = selected_category_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok());
    vm.load_with_selection(preferred);
    if vm.event().is_none() {
        op(&mut vm);
    }
    HomeSnapshot::from_view_model(&vm)
}

fn with_home_target(
    selected_category_id: Option<String>,
    raw_id: &str,
    field: &str,
    op: impl FnOnce(&mut HomeViewModel<'_, &FileSessionStore>, Uuid),
) -> HomeSnapshot {
    match Uuid::parse_str(raw_id.trim()) {
        Ok(id) => with_home(selected_category_id, |vm| op(vm, id)),
        Err(_) => HomeSnapshot::failure(format!("invalid {field}: `{raw_id}`")),
    }
}

fn to_category_item(category: &Category) -> CategoryItem {
    CategoryItem {
        id: category.id.to_string(),
        name: category.name.clone(),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        content: task.content.clone(),
        completed: task.completed,
        important: task.important,
        category_id: task.category_id.to_string(),
    }
}
