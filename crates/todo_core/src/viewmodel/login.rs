//! Login screen view-model.

use crate::model::credentials::{FieldErrors, LoginRequest};
use crate::repo::account_repo::SqliteAccountRepository;
use crate::service::account_service::{AccountError, AccountService};
use crate::session::{Session, SessionStore};
use rusqlite::Connection;

/// Login form state with per-field and general errors.
pub struct LoginViewModel<'conn, S: SessionStore> {
    conn: &'conn Connection,
    sessions: S,
    form: LoginRequest,
    errors: FieldErrors,
    general_error: Option<String>,
}

impl<'conn, S: SessionStore> LoginViewModel<'conn, S> {
    pub fn new(conn: &'conn Connection, sessions: S) -> Self {
        Self {
            conn,
            sessions,
            form: LoginRequest::default(),
            errors: FieldErrors::default(),
            general_error: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.form.username
    }

    pub fn password(&self) -> &str {
        &self.form.password
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    /// Updates the username and clears its error.
    pub fn update_username(&mut self, value: impl Into<String>) {
        self.form.username = value.into();
        self.errors.username = None;
    }

    /// Updates the password and clears its error.
    pub fn update_password(&mut self, value: impl Into<String>) {
        self.form.password = value.into();
        self.errors.password = None;
    }

    /// Re-runs every field rule; returns whether the form is valid.
    pub fn validate_form(&mut self) -> bool {
        self.errors = self.form.validate().err().unwrap_or_default();
        self.errors.is_empty()
    }

    /// Validates, then checks credentials and stores the session.
    ///
    /// Field errors are published before any store access; every failure
    /// also lands in `general_error`.
    pub fn login(&mut self) -> Result<Session, AccountError> {
        if !self.validate_form() {
            let err = AccountError::Validation(self.errors.clone());
            self.general_error = Some(err.to_string());
            return Err(err);
        }

        self.general_error = None;
        let result = SqliteAccountRepository::try_new(self.conn)
            .map_err(AccountError::from)
            .and_then(|repo| AccountService::new(repo, &self.sessions).login(&self.form));
        if let Err(err) = &result {
            self.general_error = Some(err.to_string());
        }
        result
    }

    pub fn clear_errors(&mut self) {
        self.errors = FieldErrors::default();
        self.general_error = None;
    }

    pub fn reset_form(&mut self) {
        self.form = LoginRequest::default();
        self.clear_errors();
    }
}
