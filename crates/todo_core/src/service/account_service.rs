//! Account use-case service: register, login, logout, session restore.
//!
//! # Invariants
//! - Form validation runs before any repository call.
//! - Only a successful login writes the session; failures leave it as-is.
//! - Log events carry no usernames or passwords.

use crate::model::account::{hash_password, Account};
use crate::model::credentials::{FieldErrors, LoginRequest, RegisterRequest};
use crate::repo::account_repo::AccountRepository;
use crate::repo::RepoError;
use crate::session::{Session, SessionError, SessionStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from account use-cases.
#[derive(Debug)]
pub enum AccountError {
    /// One or more form fields are invalid; nothing was sent to the store.
    Validation(FieldErrors),
    /// Registration hit an existing username.
    DuplicateUsername(String),
    /// Login username does not exist.
    AccountNotFound,
    /// Login password digest mismatch.
    IncorrectPassword,
    /// Session holder failure.
    Session(SessionError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl AccountError {
    /// Stable metadata-only code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_input",
            Self::DuplicateUsername(_) => "duplicate_username",
            Self::AccountNotFound => "account_not_found",
            Self::IncorrectPassword => "password_incorrect",
            Self::Session(_) => "session_failed",
            Self::Repo(_) => "storage_failed",
        }
    }
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::DuplicateUsername(username) => write!(f, "Username already exists: {username}"),
            Self::AccountNotFound => write!(f, "Username not exists"),
            Self::IncorrectPassword => write!(f, "Password incorrect"),
            Self::Session(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Session(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldErrors> for AccountError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<SessionError> for AccountError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateUsername(username) => Self::DuplicateUsername(username),
            other => Self::Repo(other),
        }
    }
}

/// Account use-case service over an account repository and session store.
pub struct AccountService<R: AccountRepository, S: SessionStore> {
    repo: R,
    sessions: S,
}

impl<R: AccountRepository, S: SessionStore> AccountService<R, S> {
    pub fn new(repo: R, sessions: S) -> Self {
        Self { repo, sessions }
    }

    /// Validates the form, hashes the password and stores a new account.
    pub fn register(&self, request: &RegisterRequest) -> Result<Account, AccountError> {
        request.validate()?;

        match self
            .repo
            .create_account(&request.username, &hash_password(&request.password))
        {
            Ok(account) => {
                info!("event=account_register module=service status=ok");
                Ok(account)
            }
            Err(err) => {
                let err = AccountError::from(err);
                warn!(
                    "event=account_register module=service status=error error_code={}",
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Validates the form, checks credentials and stores the session.
    pub fn login(&self, request: &LoginRequest) -> Result<Session, AccountError> {
        request.validate()?;

        let account = self
            .repo
            .find_by_username(&request.username)?
            .ok_or_else(|| {
                warn!("event=account_login module=service status=error error_code=account_not_found");
                AccountError::AccountNotFound
            })?;

        if !account.password_matches(&request.password) {
            warn!("event=account_login module=service status=error error_code=password_incorrect");
            return Err(AccountError::IncorrectPassword);
        }

        self.sessions.save(account.id)?;
        info!("event=account_login module=service status=ok");
        Ok(Session::new(account.id))
    }

    /// Clears the stored session.
    pub fn logout(&self) -> Result<(), AccountError> {
        self.sessions.clear()?;
        info!("event=account_logout module=service status=ok");
        Ok(())
    }

    /// Restores the session on app start.
    ///
    /// A stored id whose account no longer exists is cleared and reported as
    /// logged out.
    pub fn current_session(&self) -> Result<Option<Session>, AccountError> {
        let Some(session) = self.sessions.current()? else {
            return Ok(None);
        };

        if self.repo.get_account(session.account_id())?.is_none() {
            warn!("event=session_restore module=service status=stale");
            self.sessions.clear()?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Loads the account behind a session.
    pub fn current_account(&self, session: &Session) -> Result<Option<Account>, AccountError> {
        Ok(self.repo.get_account(session.account_id())?)
    }
}
