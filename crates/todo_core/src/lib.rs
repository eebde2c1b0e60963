//! Core domain logic for the to-do app.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod viewmodel;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::account::{hash_password, verify_password, Account, AccountId};
pub use model::category::{Category, CategoryId};
pub use model::credentials::{FieldErrors, LoginRequest, RegisterRequest};
pub use model::task::{Task, TaskId, TaskInput};
pub use model::ModelValidationError;
pub use repo::account_repo::{AccountRepository, SqliteAccountRepository};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{AccountError, AccountService};
pub use service::category_service::CategoryService;
pub use service::task_service::TaskService;
pub use service::{ServiceError, ServiceResult};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore};
pub use viewmodel::home::HomeViewModel;
pub use viewmodel::login::LoginViewModel;
pub use viewmodel::register::RegisterViewModel;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
