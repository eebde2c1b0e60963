//! Registration screen view-model.

use crate::model::account::Account;
use crate::model::credentials::{validate_confirm_password, FieldErrors, RegisterRequest};
use crate::repo::account_repo::SqliteAccountRepository;
use crate::service::account_service::{AccountError, AccountService};
use crate::session::SessionStore;
use rusqlite::Connection;

/// Registration form state with per-field and general errors.
pub struct RegisterViewModel<'conn, S: SessionStore> {
    conn: &'conn Connection,
    sessions: S,
    form: RegisterRequest,
    errors: FieldErrors,
    general_error: Option<String>,
}

impl<'conn, S: SessionStore> RegisterViewModel<'conn, S> {
    pub fn new(conn: &'conn Connection, sessions: S) -> Self {
        Self {
            conn,
            sessions,
            form: RegisterRequest::default(),
            errors: FieldErrors::default(),
            general_error: None,
        }
    }

    pub fn form(&self) -> &RegisterRequest {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    pub fn update_username(&mut self, value: impl Into<String>) {
        self.form.username = value.into();
        self.errors.username = None;
    }

    /// Updates the password; a non-empty confirmation is re-checked against it.
    pub fn update_password(&mut self, value: impl Into<String>) {
        self.form.password = value.into();
        self.errors.password = None;
        if !self.form.confirm_password.is_empty() {
            self.errors.confirm_password =
                validate_confirm_password(&self.form.password, &self.form.confirm_password)
                    .map(str::to_string);
        }
    }

    pub fn update_confirm_password(&mut self, value: impl Into<String>) {
        self.form.confirm_password = value.into();
        self.errors.confirm_password = None;
    }

    pub fn validate_form(&mut self) -> bool {
        self.errors = self.form.validate().err().unwrap_or_default();
        self.errors.is_empty()
    }

    /// Validates, then creates the account. Does not log in.
    pub fn register(&mut self) -> Result<Account, AccountError> {
        if !self.validate_form() {
            let err = AccountError::Validation(self.errors.clone());
            self.general_error = Some(err.to_string());
            return Err(err);
        }

        self.general_error = None;
        let result = SqliteAccountRepository::try_new(self.conn)
            .map_err(AccountError::from)
            .and_then(|repo| AccountService::new(repo, &self.sessions).register(&self.form));
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
        self.form = RegisterRequest::default();
        self.clear_errors();
    }
}
