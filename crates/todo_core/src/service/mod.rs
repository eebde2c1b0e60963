//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - Category/task services take an explicit [`Session`](crate::session::Session)
//!   on every call; they never read the session store themselves.

pub mod account_service;
pub mod category_service;
pub mod task_service;

use crate::repo::RepoError;
use crate::session::SessionError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from category/task use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// No account id is stored in the session holder.
    NotLoggedIn,
    /// Session holder failed to load.
    Session(SessionError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Stable metadata-only code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotLoggedIn => "not_logged_in",
            Self::Session(_) => "session_failed",
            Self::Repo(RepoError::Validation(_)) => "invalid_input",
            Self::Repo(RepoError::NotFound { .. }) => "not_found",
            Self::Repo(RepoError::DuplicateCategoryName(_)) => "duplicate_category",
            Self::Repo(RepoError::DuplicateUsername(_)) => "duplicate_username",
            Self::Repo(_) => "storage_failed",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoggedIn => write!(f, "not logged in"),
            Self::Session(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotLoggedIn => None,
            Self::Session(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<SessionError> for ServiceError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
