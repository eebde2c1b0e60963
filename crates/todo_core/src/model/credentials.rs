//! Login/registration form validation.
//!
//! # Responsibility
//! - Check credential input before any store access.
//! - Report the first violated rule per field as a UI-ready message.
//!
//! # Invariants
//! - Lengths are counted in chars, not bytes.
//! - Registration passwords additionally require upper, lower and digit.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const USERNAME_MIN_CHARS: usize = 3;
const USERNAME_MAX_CHARS: usize = 20;
const PASSWORD_MIN_CHARS: usize = 6;
const PASSWORD_MAX_CHARS: usize = 50;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid username regex"));
static UPPERCASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("valid upper regex"));
static LOWERCASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("valid lower regex"));
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid digit regex"));

/// Per-field validation messages. `None` means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.confirm_password.is_none()
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Please fix the validation errors")
    }
}

impl Error for FieldErrors {}

/// Registration input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    /// Validates all fields; returns `Err` with every failing field filled.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let errors = FieldErrors {
            username: validate_username(&self.username).map(str::to_string),
            password: validate_register_password(&self.password).map(str::to_string),
            confirm_password: validate_confirm_password(&self.password, &self.confirm_password)
                .map(str::to_string),
        };
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl LoginRequest {
    /// Validates username and password shape; never inspects the store.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let errors = FieldErrors {
            username: validate_username(&self.username).map(str::to_string),
            password: validate_login_password(&self.password).map(str::to_string),
            confirm_password: None,
        };
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Returns the first violated username rule, if any.
pub fn validate_username(value: &str) -> Option<&'static str> {
    let chars = value.chars().count();
    if value.is_empty() {
        Some("Username is required")
    } else if chars < USERNAME_MIN_CHARS {
        Some("Username must be at least 3 characters")
    } else if chars > USERNAME_MAX_CHARS {
        Some("Username must be less than 20 characters")
    } else if !USERNAME_RE.is_match(value) {
        Some("Username can only contain letters, numbers, and underscores")
    } else {
        None
    }
}

/// Returns the first violated login password rule, if any.
pub fn validate_login_password(value: &str) -> Option<&'static str> {
    let chars = value.chars().count();
    if value.is_empty() {
        Some("Password is required")
    } else if chars < PASSWORD_MIN_CHARS {
        Some("Password must be at least 6 characters")
    } else if chars > PASSWORD_MAX_CHARS {
        Some("Password must be less than 50 characters")
    } else {
        None
    }
}

/// Returns the first violated registration password rule, if any.
pub fn validate_register_password(value: &str) -> Option<&'static str> {
    if let Some(message) = validate_login_password(value) {
        return Some(message);
    }
    if !UPPERCASE_RE.is_match(value) {
        Some("Password must contain at least one uppercase letter")
    } else if !LOWERCASE_RE.is_match(value) {
        Some("Password must contain at least one lowercase letter")
    } else if !DIGIT_RE.is_match(value) {
        Some("Password must contain at least one number")
    } else {
        None
    }
}

/// Returns the first violated confirmation rule, if any.
pub fn validate_confirm_password(password: &str, confirm: &str) -> Option<&'static str> {
    if confirm.is_empty() {
        Some("Please confirm your password")
    } else if confirm != password {
        Some("Passwords do not match")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules_report_first_violation() {
        assert_eq!(validate_username(""), Some("Username is required"));
        assert_eq!(
            validate_username("ab"),
            Some("Username must be at least 3 characters")
        );
        assert_eq!(
            validate_username("a".repeat(21).as_str()),
            Some("Username must be less than 20 characters")
        );
        assert_eq!(
            validate_username("bad name"),
            Some("Username can only contain letters, numbers, and underscores")
        );
        assert_eq!(validate_username("good_name_1"), None);
        assert_eq!(validate_username("a".repeat(20).as_str()), None);
    }

    #[test]
    fn register_password_requires_each_character_class() {
        assert_eq!(
            validate_register_password("Ab1"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(
            validate_register_password("abcdef1"),
            Some("Password must contain at least one uppercase letter")
        );
        assert_eq!(
            validate_register_password("ABCDEF1"),
            Some("Password must contain at least one lowercase letter")
        );
        assert_eq!(
            validate_register_password("Abcdefg"),
            Some("Password must contain at least one number")
        );
        assert_eq!(validate_register_password("Abcdef1"), None);
    }

    #[test]
    fn login_password_only_checks_length() {
        assert_eq!(validate_login_password(""), Some("Password is required"));
        assert_eq!(validate_login_password("abcdef"), None);
        assert_eq!(
            validate_login_password("a".repeat(51).as_str()),
            Some("Password must be less than 50 characters")
        );
    }

    #[test]
    fn register_request_collects_all_field_errors() {
        let request = RegisterRequest {
            username: "x".to_string(),
            password: "Secret123".to_string(),
            confirm_password: "Secret124".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(
            errors.username.as_deref(),
            Some("Username must be at least 3 characters")
        );
        assert!(errors.password.is_none());
        assert_eq!(
            errors.confirm_password.as_deref(),
            Some("Passwords do not match")
        );
        assert_eq!(errors.to_string(), "Please fix the validation errors");
    }

    #[test]
    fn login_request_accepts_valid_shape() {
        let request = LoginRequest {
            username: "alice".to_string(),
            password: "whatever".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
